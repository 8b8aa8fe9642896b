use std::time::Duration;

use clap::ArgMatches;
use tracing::{debug, trace};

use crate::{
    auth::{AuthScheme, Credential},
    client::EphanyClient,
    commands::params::{
        PARAMETER_API_KEY, PARAMETER_AUTH_SCHEME, PARAMETER_BASE_URL, PARAMETER_FORMAT,
        PARAMETER_HEADERS, PARAMETER_PRETTY, PARAMETER_TIMEOUT,
    },
    configuration::{ClientConfig, Configuration, ConfigurationError},
    error::CliError,
    format::{OutputFormat, OutputFormatOptions, TABLE},
};

pub fn get_format_parameter_value(sub_matches: &ArgMatches) -> OutputFormat {
    trace!("Resolving output format options...");

    let format = sub_matches
        .get_one::<String>(PARAMETER_FORMAT)
        .map(String::as_str)
        .unwrap_or(TABLE);
    let with_headers = sub_matches.get_flag(PARAMETER_HEADERS);
    let pretty = sub_matches.get_flag(PARAMETER_PRETTY);

    trace!("Format: {}", format);
    trace!("With headers: {}", with_headers);
    trace!("Pretty: {}", pretty);

    let options = OutputFormatOptions {
        with_headers,
        pretty,
        numbered: false,
    };

    // clap only lets known names through
    OutputFormat::from_string_with_options(format, options).unwrap_or_default()
}

/// Connection settings given on the command line or in the environment.
#[derive(Debug, Default)]
pub struct ConnectionOverrides<'a> {
    pub base_url: Option<&'a str>,
    pub credential: Option<&'a str>,
    pub auth_scheme: Option<&'a str>,
    pub timeout_seconds: Option<u64>,
}

impl<'a> ConnectionOverrides<'a> {
    pub fn from_matches(sub_matches: &'a ArgMatches) -> ConnectionOverrides<'a> {
        ConnectionOverrides {
            base_url: sub_matches
                .get_one::<String>(PARAMETER_BASE_URL)
                .map(String::as_str),
            credential: sub_matches
                .get_one::<String>(PARAMETER_API_KEY)
                .map(String::as_str),
            auth_scheme: sub_matches
                .get_one::<String>(PARAMETER_AUTH_SCHEME)
                .map(String::as_str),
            timeout_seconds: sub_matches.get_one::<u64>(PARAMETER_TIMEOUT).copied(),
        }
    }
}

/// Combine the overrides with the stored configuration. Overrides win.
pub fn resolve_client_config(
    overrides: &ConnectionOverrides,
    configuration: &Configuration,
) -> Result<ClientConfig, ConfigurationError> {
    let base_url = overrides
        .base_url
        .or(configuration.base_url())
        .ok_or(ConfigurationError::MissingBaseUrl)?;
    let secret = overrides
        .credential
        .ok_or(ConfigurationError::MissingCredential)?;
    let scheme = overrides
        .auth_scheme
        .map(AuthScheme::from_name)
        .unwrap_or_else(|| configuration.auth_scheme());
    let timeout = overrides
        .timeout_seconds
        .map(Duration::from_secs)
        .unwrap_or_else(|| configuration.timeout());

    debug!(
        "Using base URL {} with {} authentication and a {}s timeout",
        base_url,
        scheme,
        timeout.as_secs()
    );

    Ok(ClientConfig::new(base_url, Credential::new(secret, scheme))?.with_timeout(timeout))
}

/// Build a client for the command being run.
pub fn create_client(sub_matches: &ArgMatches) -> Result<EphanyClient, CliError> {
    let configuration = Configuration::load_or_default()?;
    let config = resolve_client_config(&ConnectionOverrides::from_matches(sub_matches), &configuration)?;
    Ok(EphanyClient::new(config)?)
}
