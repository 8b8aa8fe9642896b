//! CLI command definitions and argument parsing.
//!
//! This module defines all the CLI commands and their arguments using the clap crate.
//! The definitions are split per command group; `params` holds the shared pieces.

use clap::{ArgMatches, Command};

pub mod asset;
pub mod config;
pub mod params;

pub use params::{
    COMMAND_ALL, COMMAND_ASSET, COMMAND_BROWSE, COMMAND_CONFIG, COMMAND_DOWNLOAD, COMMAND_LIST,
    COMMAND_PATH, COMMAND_REVIT, COMMAND_SEARCH, COMMAND_SET, COMMAND_SHOW, PARAMETER_VERBOSE,
};

/// Build the full command tree without parsing anything.
pub fn build_cli() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .propagate_version(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(params::verbose_parameter())
        .arg(params::format_parameter())
        .arg(params::format_pretty_parameter())
        .arg(params::format_with_headers_parameter())
        .subcommand(asset::asset_command())
        .subcommand(config::config_command())
}

/// Parse the process arguments.
///
/// Exits the process with a usage message when they are invalid.
pub fn create_cli_commands() -> ArgMatches {
    build_cli().get_matches()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::params::{PARAMETER_FORMAT, PARAMETER_PAGE, PARAMETER_PAGE_SIZE};

    #[test]
    fn test_command_tree_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_list_defaults() {
        let matches = build_cli()
            .try_get_matches_from(["ephany", "asset", "list"])
            .unwrap();
        let (_, asset) = matches.subcommand().unwrap();
        let (name, list) = asset.subcommand().unwrap();

        assert_eq!(COMMAND_LIST, name);
        assert_eq!(Some(&1u32), list.get_one::<u32>(PARAMETER_PAGE));
        assert_eq!(Some(&20u32), list.get_one::<u32>(PARAMETER_PAGE_SIZE));
    }

    #[test]
    fn test_global_format_reaches_subcommand() {
        let matches = build_cli()
            .try_get_matches_from(["ephany", "asset", "revit", "--format", "json"])
            .unwrap();
        let (_, asset) = matches.subcommand().unwrap();
        let (_, revit) = asset.subcommand().unwrap();

        assert_eq!(
            Some("json"),
            revit.get_one::<String>(PARAMETER_FORMAT).map(String::as_str)
        );
    }

    #[test]
    fn test_page_zero_is_rejected() {
        let result = build_cli().try_get_matches_from(["ephany", "asset", "list", "--page", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_set_requires_a_property() {
        let result = build_cli().try_get_matches_from(["ephany", "config", "set"]);
        assert!(result.is_err());

        let result = build_cli().try_get_matches_from([
            "ephany",
            "config",
            "set",
            "--auth-scheme",
            "user-token",
        ]);
        assert!(result.is_ok());
    }
}
