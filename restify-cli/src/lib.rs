//! Library side of the restify CLI.
//!
//! The batch orchestration lives here so the binary stays a thin argument
//! parsing and reporting shell, and so integration tests can drive the
//! orchestration directly.

pub mod batch;
