use crate::auth::{AuthScheme, Credential};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;
use url::Url;

pub const DEFAULT_APPLICATION_ID: &str = "ephany";
pub const DEFAULT_CONFIGURATION_FILE_NAME: &str = "config.yml";
pub const CONFIGURATION_DIRECTORY_ENV: &str = "EPHANY_CONFIG_DIR";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(100);

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("base URL is required")]
    MissingBaseUrl,
    #[error("authentication credential (API key or user token) is required")]
    MissingCredential,
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("the credential contains characters that cannot be sent in an HTTP header")]
    InvalidCredential,
    #[error("failed to initialize the HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("failed to resolve the configuration directory")]
    FailedToFindConfigurationDirectory,
    #[error("failed to load configuration data, because of: {cause}")]
    FailedToLoadData {
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("failed to write configuration data to file, because of: {cause}")]
    FailedToWriteData {
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("missing value for property {name:?}")]
    MissingRequiredPropertyValue { name: String },
}

/// Connection settings for [`crate::client::EphanyClient`].
///
/// Construction fails immediately when the base URL or the credential is
/// blank. The base URL always ends with exactly one `/`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    credential: Credential,
    timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str, credential: Credential) -> Result<ClientConfig, ConfigurationError> {
        let base_url = normalize_base_url(base_url)?;
        if credential.is_blank() {
            return Err(ConfigurationError::MissingCredential);
        }

        Ok(ClientConfig {
            base_url,
            credential,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> ClientConfig {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn scheme(&self) -> AuthScheme {
        self.credential.scheme()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Parses `raw` and makes sure the path ends with a single `/` so that
/// relative endpoints join underneath it.
pub fn normalize_base_url(raw: &str) -> Result<Url, ConfigurationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigurationError::MissingBaseUrl);
    }

    let normalized = format!("{}/", trimmed.trim_end_matches('/'));
    let url = Url::parse(&normalized).map_err(|e| ConfigurationError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigurationError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "expected an http or https URL".to_string(),
        });
    }

    Ok(url)
}

/// Settings persisted by the command line tool.
///
/// The credential is deliberately not part of this file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    base_url: Option<String>,
    #[serde(default)]
    auth_scheme: AuthScheme,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    timeout_seconds: Option<u64>,
}

impl Configuration {
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn set_base_url(&mut self, base_url: Option<String>) {
        self.base_url = base_url;
    }

    pub fn auth_scheme(&self) -> AuthScheme {
        self.auth_scheme
    }

    pub fn set_auth_scheme(&mut self, auth_scheme: AuthScheme) {
        self.auth_scheme = auth_scheme;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn set_timeout_seconds(&mut self, timeout_seconds: Option<u64>) {
        self.timeout_seconds = timeout_seconds;
    }

    pub fn get_default_configuration_file_path() -> Result<PathBuf, ConfigurationError> {
        if let Ok(config_dir_str) = std::env::var(CONFIGURATION_DIRECTORY_ENV) {
            let mut config_path = PathBuf::from(config_dir_str);
            config_path.push(DEFAULT_CONFIGURATION_FILE_NAME);
            return Ok(config_path);
        }

        match config_dir() {
            Some(mut path) => {
                path.push(DEFAULT_APPLICATION_ID);
                path.push(DEFAULT_CONFIGURATION_FILE_NAME);
                Ok(path)
            }
            None => Err(ConfigurationError::FailedToFindConfigurationDirectory),
        }
    }

    /// Load the default configuration file, or defaults when there is none yet.
    pub fn load_or_default() -> Result<Configuration, ConfigurationError> {
        let path = Configuration::get_default_configuration_file_path()?;
        debug!("Loading configuration from {}...", path.display());

        if !path.exists() {
            debug!("Configuration file not found, using defaults");
            return Ok(Configuration::default());
        }

        Configuration::load_from_file(&path)
    }

    pub fn load_from_file(path: &Path) -> Result<Configuration, ConfigurationError> {
        let data = fs::read_to_string(path)
            .map_err(|e| ConfigurationError::FailedToLoadData { cause: Box::new(e) })?;
        serde_yaml::from_str(&data)
            .map_err(|e| ConfigurationError::FailedToLoadData { cause: Box::new(e) })
    }

    pub fn to_yaml(&self) -> Result<String, ConfigurationError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })
    }

    pub fn write<W: Write>(&self, writer: W) -> Result<(), ConfigurationError> {
        serde_yaml::to_writer(writer, self)
            .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigurationError> {
        // make sure the parent directory exists
        match path.parent() {
            Some(directory) => fs::create_dir_all(directory)
                .map_err(|_| ConfigurationError::FailedToFindConfigurationDirectory)?,
            None => return Err(ConfigurationError::FailedToFindConfigurationDirectory),
        }

        let file = File::create(path)
            .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })?;
        self.write(file)
    }

    pub fn save_to_default(&self) -> Result<(), ConfigurationError> {
        self.save(&Self::get_default_configuration_file_path()?)
    }
}
