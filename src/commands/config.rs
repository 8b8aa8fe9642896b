//! Configuration command definitions.
//!
//! This module defines CLI commands related to configuration management.

use crate::commands::params::{
    auth_scheme_parameter, base_url_parameter, timeout_parameter, COMMAND_CONFIG, COMMAND_PATH,
    COMMAND_SET, COMMAND_SHOW,
};
use clap::{ArgGroup, Command};

/// Create the config command with all its subcommands.
pub fn config_command() -> Command {
    Command::new(COMMAND_CONFIG)
        .about("Configuration management")
        .subcommand_required(true)
        .subcommand(Command::new(COMMAND_SHOW).about("Display the current configuration"))
        .subcommand(Command::new(COMMAND_PATH).about("Show the configuration file path"))
        .subcommand(
            Command::new(COMMAND_SET)
                .about("Set configuration properties")
                .arg(base_url_parameter())
                .arg(auth_scheme_parameter())
                .arg(timeout_parameter())
                .group(
                    ArgGroup::new("properties")
                        .args(["base-url", "auth-scheme", "timeout"])
                        .multiple(true)
                        .required(true),
                ),
        )
}
