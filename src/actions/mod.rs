//! Execution of the CLI commands defined in [`crate::commands`].

pub mod assets;
pub mod config;
pub mod utils;
