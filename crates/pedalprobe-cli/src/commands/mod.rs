//! CLI command implementations.

pub mod analyze;
pub mod common;
pub mod import;
pub mod info;
pub mod plan;
pub mod simulate;
