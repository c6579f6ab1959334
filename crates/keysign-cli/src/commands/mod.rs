//! CLI command implementations.

pub mod keyfile;
pub mod resolve;
