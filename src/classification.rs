//! Resource type classification
//!
//! Maps free-text `resource_type` labels to a [`ResourceCategory`].
//!
//! Two modes exist:
//!
//! - [`ClassificationMode::Enumerated`] (default): exact match against the
//!   ENTSO-E production type names and a handful of short labels. Anything
//!   unknown is [`ResourceCategory::Other`] and counts as non-renewable.
//! - [`ClassificationMode::Keyword`]: case-sensitive substring match against
//!   `Wind`, `Solar`, `Hydro`, `Biomass`, `Geothermal`. Kept for parity with
//!   older dashboards; it misclassifies labels such as `"Windfall"`.
//!
//! # Example
//!
//! ```rust
//! use energy_resilience_stats::classification::*;
//!
//! assert_eq!(ResourceCategory::classify("Wind Onshore"), ResourceCategory::Wind);
//! assert!(is_renewable("Hydro Run-of-river and poundage", ClassificationMode::Enumerated));
//!
//! // The keyword matcher accepts anything containing a keyword
//! assert!(is_renewable("Windfall", ClassificationMode::Keyword));
//! assert!(!is_renewable("Windfall", ClassificationMode::Enumerated));
//! ```

use serde::{Deserialize, Serialize};

/// Keywords used by [`ClassificationMode::Keyword`]
pub const RENEWABLE_KEYWORDS: [&str; 5] = ["Wind", "Solar", "Hydro", "Biomass", "Geothermal"];

/// How resource type labels are matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMode {
    /// Exact label lookup
    #[default]
    Enumerated,
    /// Legacy substring match on [`RENEWABLE_KEYWORDS`]
    Keyword,
}

/// Generation category of a resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    Wind,
    Solar,
    Hydro,
    Biomass,
    Geothermal,
    Marine,
    OtherRenewable,
    Nuclear,
    Fossil,
    Storage,
    Waste,
    Other,
}

impl ResourceCategory {
    /// Classify a resource type label by exact name
    ///
    /// Labels are matched after trimming surrounding whitespace. Matching is
    /// case-sensitive, as the upstream feed uses fixed spellings.
    pub fn classify(resource_type: &str) -> Self {
        match resource_type.trim() {
            "Wind" | "Wind Onshore" | "Wind Offshore" => ResourceCategory::Wind,
            "Solar" => ResourceCategory::Solar,
            "Hydro"
            | "Hydro Run-of-river and poundage"
            | "Hydro Water Reservoir"
            | "Hydro Pumped Storage" => ResourceCategory::Hydro,
            "Biomass" => ResourceCategory::Biomass,
            "Geothermal" => ResourceCategory::Geothermal,
            "Marine" => ResourceCategory::Marine,
            "Other renewable" => ResourceCategory::OtherRenewable,
            "Nuclear" => ResourceCategory::Nuclear,
            "Coal"
            | "Gas"
            | "Oil"
            | "Fossil Brown coal/Lignite"
            | "Fossil Coal-derived gas"
            | "Fossil Gas"
            | "Fossil Hard coal"
            | "Fossil Oil"
            | "Fossil Oil shale"
            | "Fossil Peat" => ResourceCategory::Fossil,
            "Energy storage" => ResourceCategory::Storage,
            "Waste" => ResourceCategory::Waste,
            _ => ResourceCategory::Other,
        }
    }

    /// Classify under a mode
    ///
    /// In keyword mode the category agrees with the keyword verdict: a label
    /// the keywords accept gets the category of the first matching keyword,
    /// and a label they reject is never given a renewable category.
    ///
    /// # Examples
    ///
    /// ```
    /// # use energy_resilience_stats::classification::*;
    /// assert_eq!(
    ///     ResourceCategory::classify_with("Windfall", ClassificationMode::Keyword),
    ///     ResourceCategory::Wind
    /// );
    /// assert_eq!(
    ///     ResourceCategory::classify_with("Marine", ClassificationMode::Keyword),
    ///     ResourceCategory::Other
    /// );
    /// ```
    pub fn classify_with(resource_type: &str, mode: ClassificationMode) -> Self {
        let category = ResourceCategory::classify(resource_type);
        if mode == ClassificationMode::Enumerated {
            return category;
        }

        let keyword = RENEWABLE_KEYWORDS
            .iter()
            .find(|keyword| resource_type.contains(*keyword));

        match (keyword, category.is_renewable()) {
            (Some(_), true) | (None, false) => category,
            (Some(keyword), false) => ResourceCategory::classify(keyword),
            (None, true) => ResourceCategory::Other,
        }
    }

    /// Whether output of this category counts towards the renewable share
    pub fn is_renewable(self) -> bool {
        matches!(
            self,
            ResourceCategory::Wind
                | ResourceCategory::Solar
                | ResourceCategory::Hydro
                | ResourceCategory::Biomass
                | ResourceCategory::Geothermal
                | ResourceCategory::Marine
                | ResourceCategory::OtherRenewable
        )
    }

    /// Human-readable name
    pub fn label(self) -> &'static str {
        match self {
            ResourceCategory::Wind => "Wind",
            ResourceCategory::Solar => "Solar",
            ResourceCategory::Hydro => "Hydro",
            ResourceCategory::Biomass => "Biomass",
            ResourceCategory::Geothermal => "Geothermal",
            ResourceCategory::Marine => "Marine",
            ResourceCategory::OtherRenewable => "Other renewable",
            ResourceCategory::Nuclear => "Nuclear",
            ResourceCategory::Fossil => "Fossil",
            ResourceCategory::Storage => "Storage",
            ResourceCategory::Waste => "Waste",
            ResourceCategory::Other => "Other",
        }
    }
}

/// Legacy keyword test: does the label contain any renewable keyword?
pub fn matches_renewable_keyword(resource_type: &str) -> bool {
    RENEWABLE_KEYWORDS
        .iter()
        .any(|keyword| resource_type.contains(keyword))
}

/// Decide whether a resource type label is renewable under the given mode
pub fn is_renewable(resource_type: &str, mode: ClassificationMode) -> bool {
    ResourceCategory::classify_with(resource_type, mode).is_renewable()
}
