//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a sensible default so the application works out of the box.

use crate::selector::{FallbackPolicy, Level};
use serde::{Deserialize, Serialize};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Shape of the remote location API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `GET /countries`, `GET /country={c}/states`, `GET /country={c}/state={s}/cities`
    #[default]
    Path,
    /// POST endpoints answering with `{"data": ...}` envelopes.
    Envelope,
}

impl Dialect {
    pub fn default_base_url(self) -> &'static str {
        match self {
            Dialect::Path => "https://crio-location-selector.onrender.com",
            Dialect::Envelope => "https://countriesnow.space/api/v0.1",
        }
    }
}

/// Location API endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub dialect: Dialect,
    /// Overrides the dialect's default base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ApiConfig {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.dialect.default_base_url())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// What to show when a list cannot be fetched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FallbackConfig {
    #[serde(default)]
    pub policy: FallbackPolicy,
}

/// UI appearance and behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Label shown while no country is selected.
    #[serde(default = "default_placeholder_country")]
    pub placeholder_country: String,
    #[serde(default = "default_placeholder_state")]
    pub placeholder_state: String,
    #[serde(default = "default_placeholder_city")]
    pub placeholder_city: String,
    /// Show the "You selected ..." line once a city is chosen.
    #[serde(default = "default_true")]
    pub show_result: bool,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

impl UiConfig {
    /// Text for the empty choice of a level.
    pub fn placeholder(&self, level: Level) -> &str {
        match level {
            Level::Country => &self.placeholder_country,
            Level::State => &self.placeholder_state,
            Level::City => &self.placeholder_city,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            placeholder_country: default_placeholder_country(),
            placeholder_state: default_placeholder_state(),
            placeholder_city: default_placeholder_city(),
            show_result: true,
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

/// Diagnostic log file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    /// `EnvFilter` directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_dir: default_log_dir(),
            level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("cityselect/{}", env!("CARGO_PKG_VERSION"))
}

fn default_placeholder_country() -> String {
    "Select Country".to_string()
}

fn default_placeholder_state() -> String {
    "Select State".to_string()
}

fn default_placeholder_city() -> String {
    "Select City".to_string()
}

fn default_tick_rate_ms() -> u64 {
    100
}

fn default_log_dir() -> String {
    "~/.local/share/cityselect/logs".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.api.dialect, Dialect::Path);
        assert_eq!(cfg.api.base_url(), "https://crio-location-selector.onrender.com");
        assert_eq!(cfg.api.timeout_secs, 10);
        assert_eq!(cfg.fallback.policy, FallbackPolicy::Disabled);
        assert!(cfg.ui.show_result);
        assert_eq!(cfg.ui.placeholder(Level::Country), "Select Country");
        assert_eq!(cfg.ui.placeholder(Level::State), "Select State");
        assert_eq!(cfg.ui.placeholder(Level::City), "Select City");
        assert!(!cfg.logging.enabled);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_partial_sections() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [api]
            dialect = "envelope"
            timeout_secs = 3

            [fallback]
            policy = "static"

            [ui]
            placeholder_state = "Pick a state"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.api.dialect, Dialect::Envelope);
        assert_eq!(cfg.api.base_url(), "https://countriesnow.space/api/v0.1");
        assert_eq!(cfg.api.timeout_secs, 3);
        assert_eq!(cfg.fallback.policy, FallbackPolicy::Static);
        assert_eq!(cfg.ui.tick_rate_ms, 100);
        assert_eq!(cfg.ui.placeholder(Level::State), "Pick a state");
        assert_eq!(cfg.ui.placeholder(Level::Country), "Select Country");
        assert!(cfg.ui.show_result);
    }

    #[test]
    fn test_base_url_override() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [api]
            base_url = "http://localhost:8080"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.api.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let parsed: Result<AppConfig, _> = toml::from_str("[fallback]\npolicy = \"sometimes\"\n");
        assert!(parsed.is_err());
    }
}
