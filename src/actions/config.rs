use clap::ArgMatches;
use tracing::trace;

use crate::{
    auth::AuthScheme,
    commands::params::{PARAMETER_AUTH_SCHEME, PARAMETER_BASE_URL, PARAMETER_TIMEOUT},
    configuration::{normalize_base_url, Configuration},
    error::CliError,
};

pub fn show_configuration() -> Result<(), CliError> {
    trace!("Executing \"config show\" command...");

    let configuration = Configuration::load_or_default()?;
    print!("{}", configuration.to_yaml()?);
    Ok(())
}

pub fn print_configuration_path() -> Result<(), CliError> {
    let path = Configuration::get_default_configuration_file_path()?;
    println!("{}", path.display());
    Ok(())
}

pub fn set_configuration(sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing \"config set\" command...");

    let mut configuration = Configuration::load_or_default()?;
    apply_settings(
        &mut configuration,
        sub_matches.get_one::<String>(PARAMETER_BASE_URL).map(String::as_str),
        sub_matches.get_one::<String>(PARAMETER_AUTH_SCHEME).map(String::as_str),
        sub_matches.get_one::<u64>(PARAMETER_TIMEOUT).copied(),
    )?;
    configuration.save_to_default()?;

    print!("{}", configuration.to_yaml()?);
    Ok(())
}

/// Validates and stores each given value; absent values are left as they are.
pub fn apply_settings(
    configuration: &mut Configuration,
    base_url: Option<&str>,
    auth_scheme: Option<&str>,
    timeout_seconds: Option<u64>,
) -> Result<(), CliError> {
    if let Some(base_url) = base_url {
        let url = normalize_base_url(base_url)?;
        configuration.set_base_url(Some(url.to_string()));
    }
    if let Some(auth_scheme) = auth_scheme {
        configuration.set_auth_scheme(AuthScheme::from_name(auth_scheme));
    }
    if timeout_seconds.is_some() {
        configuration.set_timeout_seconds(timeout_seconds);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_apply_settings() {
        let mut configuration = Configuration::default();
        apply_settings(
            &mut configuration,
            Some("https://api.ephany.io/api"),
            Some("user-token"),
            Some(15),
        )
        .unwrap();

        assert_eq!(Some("https://api.ephany.io/api/"), configuration.base_url());
        assert_eq!(AuthScheme::UserToken, configuration.auth_scheme());
        assert_eq!(Duration::from_secs(15), configuration.timeout());
    }

    #[test]
    fn test_apply_settings_keeps_absent_values() {
        let mut configuration = Configuration::default();
        configuration.set_base_url(Some("https://keep.example/".to_string()));

        apply_settings(&mut configuration, None, Some("api-key"), None).unwrap();
        assert_eq!(Some("https://keep.example/"), configuration.base_url());
    }

    #[test]
    fn test_apply_settings_rejects_invalid_url() {
        let mut configuration = Configuration::default();
        let result = apply_settings(&mut configuration, Some("ftp://x.example"), None, None);
        assert!(matches!(result, Err(CliError::ConfigurationError(_))));
        assert_eq!(None, configuration.base_url());
    }
}
