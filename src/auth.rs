//! Authentication schemes for the Ephany API.
//!
//! Machine clients authenticate with an API key sent in `X-Api-Key`; users
//! authenticate with a token sent as `Authorization: Token <value>`. The scheme
//! is always chosen explicitly, never guessed from the shape of the secret.

use crate::configuration::ConfigurationError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};
use tracing::warn;

pub const API_KEY_HEADER: &str = "X-Api-Key";
pub const TOKEN_AUTH_PREFIX: &str = "Token";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// How the credential is attached to each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter)]
#[serde(from = "String", into = "String")]
pub enum AuthScheme {
    /// Machine-to-machine: `X-Api-Key: <key>`
    #[default]
    ApiKey,
    /// User-to-server: `Authorization: Token <token>`
    UserToken,
}

impl AuthScheme {
    pub fn name(&self) -> &'static str {
        match self {
            AuthScheme::ApiKey => "api-key",
            AuthScheme::UserToken => "user-token",
        }
    }

    pub fn names() -> Vec<&'static str> {
        AuthScheme::iter().map(|s| s.name()).collect()
    }

    /// Parses a scheme name. Unrecognized names fall back to [`AuthScheme::ApiKey`].
    pub fn from_name(name: &str) -> AuthScheme {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "apikey" | "key" => AuthScheme::ApiKey,
            "usertoken" | "token" => AuthScheme::UserToken,
            _ => {
                warn!(
                    "Unrecognized authentication scheme {:?}, falling back to {}",
                    name,
                    AuthScheme::ApiKey
                );
                AuthScheme::ApiKey
            }
        }
    }
}

impl std::fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<String> for AuthScheme {
    fn from(name: String) -> Self {
        AuthScheme::from_name(&name)
    }
}

impl From<AuthScheme> for String {
    fn from(scheme: AuthScheme) -> Self {
        scheme.name().to_string()
    }
}

/// A secret plus the scheme used to present it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    secret: String,
    scheme: AuthScheme,
}

impl Credential {
    pub fn new(secret: impl Into<String>, scheme: AuthScheme) -> Credential {
        Credential {
            secret: secret.into(),
            scheme,
        }
    }

    pub fn api_key(key: impl Into<String>) -> Credential {
        Credential::new(key, AuthScheme::ApiKey)
    }

    pub fn user_token(token: impl Into<String>) -> Credential {
        Credential::new(token, AuthScheme::UserToken)
    }

    pub fn scheme(&self) -> AuthScheme {
        self.scheme
    }

    pub fn is_blank(&self) -> bool {
        self.secret.trim().is_empty()
    }

    /// The header carrying this credential.
    fn header(&self) -> Result<(HeaderName, HeaderValue), ConfigurationError> {
        let (name, value) = match self.scheme {
            AuthScheme::ApiKey => (
                HeaderName::from_static("x-api-key"),
                HeaderValue::from_str(&self.secret),
            ),
            AuthScheme::UserToken => (
                AUTHORIZATION,
                HeaderValue::from_str(&format!("{} {}", TOKEN_AUTH_PREFIX, self.secret)),
            ),
        };
        let mut value = value.map_err(|_| ConfigurationError::InvalidCredential)?;
        value.set_sensitive(true);
        Ok((name, value))
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("secret", &"<redacted>")
            .field("scheme", &self.scheme)
            .finish()
    }
}

/// Headers sent with every request made by a client holding `credential`.
pub fn default_headers(credential: &Credential) -> Result<HeaderMap, ConfigurationError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
    let (name, value) = credential.header()?;
    headers.insert(name, value);
    Ok(headers)
}
