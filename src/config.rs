//! Dashboard configuration
//!
//! Loaded from a TOML file or from a flat key/value option map. Every field
//! has a default, so an empty file is a valid configuration.
//!
//! # Example
//!
//! ```rust
//! use energy_resilience_stats::config::DashboardConfig;
//!
//! let config = DashboardConfig::from_toml_str(r#"
//!     api_base_url = "http://127.0.0.1:8000"
//!     default_country = "FR"
//!
//!     [aggregator]
//!     classification = "keyword"
//! "#).unwrap();
//!
//! assert_eq!(config.default_country.as_str(), "FR");
//! assert_eq!(config.request_timeout_secs, 10);
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::aggregator::AggregatorConfig;
use crate::classification::ClassificationMode;
use crate::endpoint::{known_countries, CountryCode};
use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Base URL of the energy data API
    pub api_base_url: String,

    /// Country shown on start-up
    pub default_country: CountryCode,

    /// Markets offered for selection and comparison
    pub countries: Vec<CountryCode>,

    /// Whole-request timeout for the HTTP source
    pub request_timeout_secs: u64,

    pub aggregator: AggregatorConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let countries = known_countries();
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            default_country: countries[0].clone(),
            countries,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            aggregator: AggregatorConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig =
            toml::from_str(content).map_err(|e| ConfigError::Toml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), "loading dashboard config");
        Self::from_toml_str(&content)
    }

    /// Build from a flat option map
    ///
    /// `api_base_url` is required; everything else falls back to defaults.
    ///
    /// # Keys
    ///
    /// - `api_base_url` (required)
    /// - `default_country`, `countries` (comma separated), `request_timeout_secs`
    /// - `classification` (`enumerated` | `keyword`), `diversity_weight`,
    ///   `renewable_weight`, `renewable_warning_percent`, `min_active_resources`
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::collections::HashMap;
    /// # use energy_resilience_stats::config::DashboardConfig;
    /// let mut opts = HashMap::new();
    /// opts.insert("api_base_url".to_string(), "http://localhost:8000".to_string());
    /// opts.insert("countries".to_string(), "DE, ES".to_string());
    ///
    /// let config = DashboardConfig::from_options(&opts).unwrap();
    /// assert_eq!(config.countries.len(), 2);
    ///
    /// assert!(DashboardConfig::from_options(&HashMap::new()).is_err());
    /// ```
    pub fn from_options(options: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let opts = Options(options);
        let defaults = DashboardConfig::default();
        let aggregator_defaults = AggregatorConfig::default();

        let countries = match opts.get("countries") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(|c| parse_country("countries", c))
                .collect::<Result<Vec<_>, _>>()?,
            None => defaults.countries,
        };

        let default_country = match opts.get("default_country") {
            Some(code) => parse_country("default_country", code)?,
            None => countries
                .first()
                .cloned()
                .unwrap_or(defaults.default_country),
        };

        let classification = match opts.get("classification") {
            Some("enumerated") => ClassificationMode::Enumerated,
            Some("keyword") => ClassificationMode::Keyword,
            Some(other) => return Err(invalid("classification", other)),
            None => aggregator_defaults.classification,
        };

        let config = DashboardConfig {
            api_base_url: opts.require("api_base_url")?.to_string(),
            default_country,
            countries,
            request_timeout_secs: opts
                .parse_or("request_timeout_secs", defaults.request_timeout_secs)?,
            aggregator: AggregatorConfig {
                classification,
                diversity_weight: opts
                    .parse_or("diversity_weight", aggregator_defaults.diversity_weight)?,
                renewable_weight: opts
                    .parse_or("renewable_weight", aggregator_defaults.renewable_weight)?,
                renewable_warning_percent: opts.parse_or(
                    "renewable_warning_percent",
                    aggregator_defaults.renewable_warning_percent,
                )?,
                min_active_resources: opts.parse_or(
                    "min_active_resources",
                    aggregator_defaults.min_active_resources,
                )?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(invalid("api_base_url", &self.api_base_url));
        }

        if self.request_timeout_secs == 0 {
            return Err(invalid("request_timeout_secs", "0"));
        }

        let weights = [
            ("diversity_weight", self.aggregator.diversity_weight),
            ("renewable_weight", self.aggregator.renewable_weight),
            (
                "renewable_warning_percent",
                self.aggregator.renewable_warning_percent,
            ),
        ];
        for (key, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(key, &value.to_string()));
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Read-only view over string options
struct Options<'a>(&'a HashMap<String, String>);

impl<'a> Options<'a> {
    fn get(&self, key: &str) -> Option<&'a str> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn require(&self, key: &str) -> Result<&'a str, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingOption(key.to_string()))
    }

    fn parse_or<T: std::str::FromStr>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        match self.get(key) {
            Some(raw) => raw.parse().map_err(|_| invalid(key, raw)),
            None => Ok(default),
        }
    }
}

fn parse_country(key: &str, value: &str) -> Result<CountryCode, ConfigError> {
    CountryCode::parse(value).map_err(|_| invalid(key, value))
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
