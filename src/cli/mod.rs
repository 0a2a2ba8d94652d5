//! CLI module
//!
//! Command-line interface for running the source.
//!
//! # Commands
//!
//! - `spec` - Print the connection specification
//! - `check` - Test the credentials
//! - `discover` - List available streams
//! - `read` - Extract worker records

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{message_to_json, Runner};

#[cfg(test)]
mod tests;
