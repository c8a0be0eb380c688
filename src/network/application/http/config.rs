//! HTTP client configuration.

use serde::Deserialize;

use super::error::Error;

/// Port used when the URL does not name one.
pub const DEFAULT_PORT: u16 = 80;
/// Receive and send timeout applied before connecting.
pub const DEFAULT_SOCKET_TIMEOUT_MS: u32 = 4000;
/// Value of the `User-Agent` request header.
pub const DEFAULT_USER_AGENT: &str = "embnet";

/// Client settings.
///
/// Usually built with [`Default`] or loaded from a provisioning blob with
/// [`Config::from_json`]; missing fields keep their defaults.
///
/// # Examples
///
/// ```rust
/// use embnet::network::application::http::Config;
///
/// let cfg = Config::from_json(br#"{"port":8080,"user_agent":"sensor"}"#).unwrap();
/// assert_eq!(cfg.port, 8080);
/// assert_eq!(cfg.user_agent, "sensor");
/// assert_eq!(cfg.socket_timeout_ms, 4000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config<'a> {
    /// Destination port unless the URL carries one.
    pub port: u16,
    /// Receive and send timeout in milliseconds; 0 disables them.
    pub socket_timeout_ms: u32,
    /// Sent as the `User-Agent` header.
    #[serde(borrow)]
    pub user_agent: &'a str,
}

impl<'a> Config<'a> {
    /// Parse a JSON configuration object.
    pub fn from_json(json: &'a [u8]) -> Result<Self, Error> {
        serde_json_core::from_slice::<Config<'a>>(json)
            .map(|(cfg, _)| cfg)
            .map_err(|_| Error::Config)
    }
}

impl Default for Config<'_> {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            socket_timeout_ms: DEFAULT_SOCKET_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT,
        }
    }
}
