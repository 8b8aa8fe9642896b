//! Shared command parameters for all CLI commands.
//!
//! This module defines parameter names and the argument configurations that
//! are reused across command modules.

use crate::format::{OutputFormat, TABLE};
use clap::{Arg, ArgAction};
use std::path::PathBuf;

// Asset commands
pub const COMMAND_ASSET: &str = "asset";
pub const COMMAND_LIST: &str = "list";
pub const COMMAND_BROWSE: &str = "browse";
pub const COMMAND_ALL: &str = "all";
pub const COMMAND_REVIT: &str = "revit";
pub const COMMAND_SEARCH: &str = "search";
pub const COMMAND_DOWNLOAD: &str = "download";

// Config commands
pub const COMMAND_CONFIG: &str = "config";
pub const COMMAND_SHOW: &str = "show";
pub const COMMAND_PATH: &str = "path";
pub const COMMAND_SET: &str = "set";

// Parameter names
pub const PARAMETER_VERBOSE: &str = "verbose";
pub const PARAMETER_FORMAT: &str = "format";
pub const PARAMETER_PRETTY: &str = "pretty";
pub const PARAMETER_HEADERS: &str = "headers";
pub const PARAMETER_BASE_URL: &str = "base-url";
pub const PARAMETER_API_KEY: &str = "api-key";
pub const PARAMETER_AUTH_SCHEME: &str = "auth-scheme";
pub const PARAMETER_TIMEOUT: &str = "timeout";
pub const PARAMETER_PAGE: &str = "page";
pub const PARAMETER_PAGE_SIZE: &str = "page-size";
pub const PARAMETER_KEYWORD: &str = "keyword";
pub const PARAMETER_ID: &str = "id";
pub const PARAMETER_OUTPUT: &str = "output";

// Mirrors client::DEFAULT_PAGE_SIZE, clap needs a static string
pub const DEFAULT_PAGE_SIZE_VALUE: &str = "20";

// Environment variables
pub const ENV_FORMAT: &str = "EPHANY_FORMAT";
pub const ENV_BASE_URL: &str = "EPHANY_BASE_URL";
pub const ENV_API_KEY: &str = "EPHANY_API_KEY";
pub const ENV_AUTH_SCHEME: &str = "EPHANY_AUTH_SCHEME";

/// Enables debug logging for the whole run.
pub fn verbose_parameter() -> Arg {
    Arg::new(PARAMETER_VERBOSE)
        .short('v')
        .long(PARAMETER_VERBOSE)
        .action(ArgAction::SetTrue)
        .global(true)
        .help("Enable verbose output for debugging")
}

/// Create the global format parameter.
///
/// This parameter is used across multiple commands for output formatting.
pub fn format_parameter() -> Arg {
    Arg::new(PARAMETER_FORMAT)
        .short('f')
        .long(PARAMETER_FORMAT)
        .num_args(1)
        .required(false)
        .env(ENV_FORMAT)
        .default_value(TABLE)
        .global(true)
        .help("Output data format")
        .value_parser(OutputFormat::names())
}

/// This parameter flag is used across multiple commands for output formatting.
pub fn format_pretty_parameter() -> Arg {
    Arg::new(PARAMETER_PRETTY)
        .long(PARAMETER_PRETTY)
        .action(ArgAction::SetTrue)
        .required(false)
        .global(true)
        .help("Format the output pretty (JSON only)")
}

/// This parameter flag is used across multiple commands for output formatting.
pub fn format_with_headers_parameter() -> Arg {
    Arg::new(PARAMETER_HEADERS)
        .long(PARAMETER_HEADERS)
        .action(ArgAction::SetTrue)
        .required(false)
        .global(true)
        .help("Include a header row (CSV only)")
}

pub fn base_url_parameter() -> Arg {
    Arg::new(PARAMETER_BASE_URL)
        .long(PARAMETER_BASE_URL)
        .num_args(1)
        .required(false)
        .help("Base URL of the catalog API, e.g. https://example.com/api")
}

/// The credential is only ever read from the command line or the environment.
pub fn api_key_parameter() -> Arg {
    Arg::new(PARAMETER_API_KEY)
        .long(PARAMETER_API_KEY)
        .num_args(1)
        .required(false)
        .env(ENV_API_KEY)
        .hide_env_values(true)
        .global(true)
        .help("API key or user token used to authenticate")
}

pub fn auth_scheme_parameter() -> Arg {
    Arg::new(PARAMETER_AUTH_SCHEME)
        .long(PARAMETER_AUTH_SCHEME)
        .num_args(1)
        .required(false)
        .help("How the credential is sent: api-key or user-token")
}

pub fn timeout_parameter() -> Arg {
    Arg::new(PARAMETER_TIMEOUT)
        .long(PARAMETER_TIMEOUT)
        .num_args(1)
        .required(false)
        .help("Request timeout in seconds")
        .value_parser(clap::value_parser!(u64).range(1..))
}

pub fn page_parameter() -> Arg {
    Arg::new(PARAMETER_PAGE)
        .short('p')
        .long(PARAMETER_PAGE)
        .num_args(1)
        .required(false)
        .default_value("1")
        .help("Page number, starting at 1")
        .value_parser(clap::value_parser!(u32).range(1..))
}

pub fn page_size_parameter() -> Arg {
    Arg::new(PARAMETER_PAGE_SIZE)
        .short('s')
        .long(PARAMETER_PAGE_SIZE)
        .num_args(1)
        .required(false)
        .default_value(DEFAULT_PAGE_SIZE_VALUE)
        .help("Number of assets per page")
        .value_parser(clap::value_parser!(u32).range(1..))
}

pub fn keyword_parameter() -> Arg {
    Arg::new(PARAMETER_KEYWORD)
        .num_args(1)
        .required(true)
        .help("Search keyword")
}

pub fn id_parameter() -> Arg {
    Arg::new(PARAMETER_ID)
        .long(PARAMETER_ID)
        .num_args(1)
        .required(false)
        .help("Asset ID; prompts for a selection when omitted")
        .value_parser(clap::value_parser!(i64))
}

pub fn output_file_parameter() -> Arg {
    Arg::new(PARAMETER_OUTPUT)
        .short('o')
        .long(PARAMETER_OUTPUT)
        .num_args(1)
        .required(false)
        .help("Destination file path")
        .value_parser(clap::value_parser!(PathBuf))
}

/// Connection overrides shared by every command that talks to the service.
///
/// Unlike the `config set` arguments these also read the environment.
pub fn connection_parameters() -> Vec<Arg> {
    vec![
        base_url_parameter().env(ENV_BASE_URL).global(true),
        api_key_parameter(),
        auth_scheme_parameter().env(ENV_AUTH_SCHEME).global(true),
        timeout_parameter().global(true),
    ]
}
