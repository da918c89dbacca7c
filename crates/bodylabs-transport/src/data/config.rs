use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// API version sent with every authenticated request unless overridden.
pub const DEFAULT_API_VERSION: &str = "v1";

/// How the access key and secret are presented to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthScheme {
    /// `Authorization: Basic base64(access_key:secret)`.
    #[default]
    Basic,

    /// `Authorization: SecretPair accessKey=<key>,secret=<secret>`, used by
    /// older API deployments.
    SecretPair,
}

/// Connection settings for a [`Client`](crate::Client).
///
/// Everything is supplied by the caller; nothing is read from the
/// environment.
///
/// # Examples
///
/// ```
/// use bodylabs_transport::{AuthScheme, ClientConfig};
///
/// let config = ClientConfig::new("https://api.bodylabs.com", "key", "secret")
///     .verbose(false)
///     .auth(AuthScheme::SecretPair);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URI every relative API path is joined onto.
    pub base_uri: String,

    pub access_key: String,

    pub secret: String,

    /// Log each call at `info` level instead of `debug`.
    ///
    /// Default: true
    #[serde(default = "default_verbose")]
    pub verbose: bool,

    /// Value of the `X-Requested-API-Version` header.
    ///
    /// Default: `v1`
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default)]
    pub auth: AuthScheme,

    /// Per-request timeout applied by the transport, in seconds.
    ///
    /// Default: none (a single request may block indefinitely)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

fn default_verbose() -> bool { true }

fn default_api_version() -> String { DEFAULT_API_VERSION.to_string() }

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_uri", &self.base_uri)
            .field("access_key", &self.access_key)
            .field("secret", &"<redacted>")
            .field("verbose", &self.verbose)
            .field("api_version", &self.api_version)
            .field("auth", &self.auth)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(
        base_uri: impl Into<String>,
        access_key: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            base_uri:             base_uri.into(),
            access_key:           access_key.into(),
            secret:               secret.into(),
            verbose:              default_verbose(),
            api_version:          default_api_version(),
            auth:                 AuthScheme::default(),
            request_timeout_secs: None,
        }
    }

    /// Parse a configuration from TOML text.
    ///
    /// ```
    /// use bodylabs_transport::ClientConfig;
    ///
    /// let config = ClientConfig::from_toml_str(r#"
    ///     base_uri = "https://api.bodylabs.com"
    ///     access_key = "key"
    ///     secret = "secret"
    /// "#).unwrap();
    /// assert!(config.verbose);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    #[must_use]
    pub fn auth(mut self, auth: AuthScheme) -> Self {
        self.auth = auth;
        self
    }

    /// Set the per-request timeout. Sub-second precision is rounded up.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        self.request_timeout_secs = Some(secs);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Check that the base URI is an absolute http(s) URL and that
    /// credentials are present.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_uri)
            .map_err(|e| Error::Config(format!("base_uri {:?}: {e}", self.base_uri)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "base_uri must use http or https, got {}",
                url.scheme()
            )));
        }
        if self.access_key.is_empty() {
            return Err(Error::Config("access_key is empty".into()));
        }
        if self.secret.is_empty() {
            return Err(Error::Config("secret is empty".into()));
        }
        if self.api_version.is_empty() {
            return Err(Error::Config("api_version is empty".into()));
        }
        Ok(())
    }
}
