//! Energy data endpoint addressing
//!
//! Maps a country selection to the records endpoint of the local API.
//!
//! # URL shape
//!
//! `{base}/api/energy-data/?country={CODE}`
//!
//! # Example
//!
//! ```rust
//! use energy_resilience_stats::endpoint::*;
//!
//! let country = CountryCode::parse("DE").unwrap();
//! let url = build_records_url("http://127.0.0.1:8000/", &country);
//! assert_eq!(url, "http://127.0.0.1:8000/api/energy-data/?country=DE");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Path of the records endpoint, relative to the API base URL
pub const RECORDS_PATH: &str = "api/energy-data/";

/// Markets the dashboard lists by default
pub const KNOWN_COUNTRIES: [(&str, &str); 4] = [
    ("DE", "Germany"),
    ("FR", "France"),
    ("ES", "Spain"),
    ("GB", "United Kingdom"),
];

/// Two-letter upper-case market code, e.g. `DE`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Validate a country code
    ///
    /// Surrounding whitespace is trimmed; case is not folded, so `"de"` is
    /// rejected rather than silently rewritten.
    ///
    /// # Examples
    ///
    /// ```
    /// # use energy_resilience_stats::endpoint::CountryCode;
    /// assert!(CountryCode::parse("FR").is_ok());
    /// assert!(CountryCode::parse(" GB ").is_ok());
    /// assert!(CountryCode::parse("de").is_err());
    /// assert!(CountryCode::parse("DEU").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Self, ApiError> {
        let trimmed = value.trim();
        let valid = trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_uppercase());

        if valid {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ApiError::InvalidCountryCode(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display name for known markets, the code itself otherwise
    pub fn display_name(&self) -> &str {
        KNOWN_COUNTRIES
            .iter()
            .find(|(code, _)| *code == self.0)
            .map(|(_, name)| *name)
            .unwrap_or(self.0.as_str())
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = ApiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CountryCode::parse(&value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

/// Build the records URL for a country
///
/// A trailing slash on `base_url` is tolerated.
pub fn build_records_url(base_url: &str, country: &CountryCode) -> String {
    let base = base_url.trim_end_matches('/');
    format!("{}/{}?country={}", base, RECORDS_PATH, country.as_str())
}

/// Known markets as validated codes
pub fn known_countries() -> Vec<CountryCode> {
    KNOWN_COUNTRIES
        .iter()
        .map(|(code, _)| CountryCode((*code).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_records_url() {
        let de = CountryCode::parse("DE").unwrap();
        assert_eq!(
            build_records_url("http://127.0.0.1:8000", &de),
            "http://127.0.0.1:8000/api/energy-data/?country=DE"
        );
    }

    #[test]
    fn test_build_records_url_trailing_slashes() {
        let es = CountryCode::parse("ES").unwrap();
        assert_eq!(
            build_records_url("http://localhost:8000//", &es),
            "http://localhost:8000/api/energy-data/?country=ES"
        );
    }

    #[test]
    fn test_country_code_rejects_invalid() {
        for bad in ["", "D", "DEU", "de", "D1", "ÄÖ"] {
            assert_eq!(
                CountryCode::parse(bad),
                Err(ApiError::InvalidCountryCode(bad.to_string()))
            );
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(CountryCode::parse("GB").unwrap().display_name(), "United Kingdom");
        assert_eq!(CountryCode::parse("PL").unwrap().display_name(), "PL");
    }

    #[test]
    fn test_country_code_serde() {
        let code: CountryCode = serde_json::from_str(r#""FR""#).unwrap();
        assert_eq!(code.as_str(), "FR");
        assert!(serde_json::from_str::<CountryCode>(r#""france""#).is_err());
        assert_eq!(serde_json::to_string(&code).unwrap(), r#""FR""#);
    }

    #[test]
    fn test_known_countries() {
        let codes: Vec<String> = known_countries().into_iter().map(String::from).collect();
        assert_eq!(codes, vec!["DE", "FR", "ES", "GB"]);
    }
}
