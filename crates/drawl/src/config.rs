//! Where the game server lives and how to reach it.

use reqwest::Url;

use crate::ConfigError;

/// Default server address when nothing else is configured.
pub const DEFAULT_HOST: &str = "127.0.0.1:8080";

/// Environment variable holding the server `host[:port]`.
pub const ENV_HOST: &str = "DRAWL_HOST";

/// Environment variable switching to `wss://` / `https://` (`1`/`true`).
pub const ENV_SECURE: &str = "DRAWL_SECURE";

/// Connection settings shared by the onboarding client and the
/// persistent connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// `host[:port]` of the game server, no scheme.
    pub host: String,

    /// Use TLS (`wss`/`https`) instead of plain `ws`/`http`.
    pub secure: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            secure: false,
        }
    }
}

impl ClientConfig {
    /// Creates a new builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Reads [`ENV_HOST`] and [`ENV_SECURE`], falling back to defaults
    /// for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = ClientConfigBuilder::new();
        if let Ok(host) = std::env::var(ENV_HOST) {
            builder = builder.host(&host);
        }
        if let Ok(raw) = std::env::var(ENV_SECURE) {
            builder = builder.secure(parse_flag(ENV_SECURE, &raw)?);
        }
        Ok(builder.build())
    }

    /// URL of the persistent connection for one player in one game:
    /// `<ws|wss>://<host>/ws?token=<token>&game=<code>`.
    pub fn ws_url(&self, token: &str, code: &str) -> Result<Url, ConfigError> {
        let scheme = if self.secure { "wss" } else { "ws" };
        let base = format!("{scheme}://{}/ws", self.host);
        Url::parse_with_params(&base, &[("token", token), ("game", code)]).map_err(|e| {
            ConfigError::InvalidUrl {
                url: base.clone(),
                reason: e.to_string(),
            }
        })
    }

    /// URL of an onboarding endpoint, e.g. `api_url("/api/games")`.
    pub fn api_url(&self, path: &str) -> Result<Url, ConfigError> {
        let scheme = if self.secure { "https" } else { "http" };
        let raw = format!("{scheme}://{}{path}", self.host);
        Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })
    }
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            var,
            value: raw.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for [`ClientConfig`].
///
/// # Example
///
/// ```rust
/// use drawl::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .host("play.example.com")
///     .secure(true)
///     .build();
/// assert_eq!(
///     config.api_url("/api/games").unwrap().as_str(),
///     "https://play.example.com/api/games",
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Sets the server `host[:port]`.
    pub fn host(mut self, host: &str) -> Self {
        self.config.host = host.to_string();
        self
    }

    /// Enables or disables TLS.
    pub fn secure(mut self, secure: bool) -> Self {
        self.config.secure = secure;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
