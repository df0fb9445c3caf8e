//! Player configuration

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::infrastructure::http_client::DEFAULT_API_URL;
use crate::infrastructure::platform::DirectoryDownloadProvider;

/// Default request timeout in milliseconds (2 minutes)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 120_000;

/// Default diorama map poll period
pub const DEFAULT_MAP_POLL_MS: u64 = 5_000;

/// Default status poll period
pub const DEFAULT_STATUS_POLL_MS: u64 = 3_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("{var} must be a server origin without a path, got {value:?}")]
    BaseUrlHasPath { var: &'static str, value: String },
    #[error("{var} must be a positive number of milliseconds, got {value:?}")]
    InvalidMillis { var: &'static str, value: String },
    #[error("{var} must be one of panel, studio, diorama; got {value:?}")]
    InvalidSkin { var: &'static str, value: String },
}

/// Which front-end renders view updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SkinKind {
    /// Basic panel UI
    #[default]
    Panel,
    /// Studio UI with chips and toasts
    Studio,
    /// Interactive diorama map
    Diorama,
}

impl FromStr for SkinKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "panel" => Ok(SkinKind::Panel),
            "studio" => Ok(SkinKind::Studio),
            "diorama" | "map" => Ok(SkinKind::Diorama),
            _ => Err(()),
        }
    }
}

/// Player configuration loaded from environment
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Backend base URL
    pub api_url: Url,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Where exported datasets and moment files land
    pub download_dir: PathBuf,
    pub map_poll_interval: Duration,
    pub status_poll_interval: Duration,
    pub skin: SkinKind,
}

impl PlayerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("AUTOWORLD_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = parse_url("AUTOWORLD_API_URL", &api_url)?;

        let skin = match lookup("AUTOWORLD_SKIN") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidSkin {
                    var: "AUTOWORLD_SKIN",
                    value,
                })?,
            None => SkinKind::default(),
        };

        Ok(Self {
            api_url,
            request_timeout: millis(
                &lookup,
                "AUTOWORLD_REQUEST_TIMEOUT_MS",
                DEFAULT_REQUEST_TIMEOUT_MS,
            )?,
            download_dir: lookup("AUTOWORLD_DOWNLOAD_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(DirectoryDownloadProvider::default_dir),
            map_poll_interval: millis(&lookup, "AUTOWORLD_MAP_POLL_MS", DEFAULT_MAP_POLL_MS)?,
            status_poll_interval: millis(
                &lookup,
                "AUTOWORLD_STATUS_POLL_MS",
                DEFAULT_STATUS_POLL_MS,
            )?,
            skin,
        })
    }

    /// Replace the backend URL (command-line override)
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, ConfigError> {
        self.api_url = parse_url("--api-url", api_url)?;
        Ok(self)
    }
}

/// API routes are absolute, so joining them onto the base keeps only its origin
fn parse_url(var: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|source| ConfigError::InvalidUrl { var, source })?;
    if url.cannot_be_a_base() || url.path() != "/" {
        return Err(ConfigError::BaseUrlHasPath {
            var,
            value: value.to_string(),
        });
    }
    Ok(url)
}

fn millis(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: u64,
) -> Result<Duration, ConfigError> {
    match lookup(var) {
        None => Ok(Duration::from_millis(default)),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
            _ => Err(ConfigError::InvalidMillis { var, value }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = PlayerConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.api_url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(config.request_timeout, Duration::from_millis(120_000));
        assert_eq!(config.map_poll_interval, Duration::from_millis(5_000));
        assert_eq!(config.status_poll_interval, Duration::from_millis(3_000));
        assert_eq!(config.skin, SkinKind::Panel);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = PlayerConfig::from_lookup(lookup(&[
            ("AUTOWORLD_API_URL", "http://sim.local:8080"),
            ("AUTOWORLD_DOWNLOAD_DIR", "/tmp/autoworld"),
            ("AUTOWORLD_MAP_POLL_MS", "250"),
            ("AUTOWORLD_SKIN", "Studio"),
        ]))
        .unwrap();

        assert_eq!(config.api_url.host_str(), Some("sim.local"));
        assert_eq!(config.download_dir, PathBuf::from("/tmp/autoworld"));
        assert_eq!(config.map_poll_interval, Duration::from_millis(250));
        assert_eq!(config.skin, SkinKind::Studio);
    }

    #[test]
    fn invalid_values_are_reported_by_variable() {
        let err = PlayerConfig::from_lookup(lookup(&[("AUTOWORLD_STATUS_POLL_MS", "0")]))
            .unwrap_err();
        assert!(err.to_string().contains("AUTOWORLD_STATUS_POLL_MS"));

        let err =
            PlayerConfig::from_lookup(lookup(&[("AUTOWORLD_API_URL", "not a url")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));

        let err = PlayerConfig::from_lookup(lookup(&[("AUTOWORLD_SKIN", "web")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSkin { .. }));
    }

    #[test]
    fn api_url_must_be_an_origin() {
        let err = PlayerConfig::from_lookup(lookup(&[(
            "AUTOWORLD_API_URL",
            "http://sim.local:8080/autoworld",
        )]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::BaseUrlHasPath { var: "AUTOWORLD_API_URL", .. }
        ));

        let config = PlayerConfig::from_lookup(lookup(&[])).unwrap();
        let err = config.clone().with_api_url("http://sim.local/api/").unwrap_err();
        assert!(err.to_string().starts_with("--api-url must be a server origin"));

        let config = config.with_api_url("http://sim.local:8080/").unwrap();
        assert_eq!(config.api_url.as_str(), "http://sim.local:8080/");
    }
}
