//! Command-line driver for the gcjs namespace rewriter.

pub mod args;
pub mod config;
pub mod driver;
pub mod reporter;
pub mod tracing_config;
