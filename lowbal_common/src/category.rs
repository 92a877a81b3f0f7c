//! Listing categories shared between client and server.
//!
//! A category names the class of goods being negotiated and selects the
//! discount range used for counter-offers. The set is open-ended: any
//! non-empty label that is not one of the known categories maps to
//! [`Category::General`].

use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Set of listing categories with dedicated negotiation behaviour.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    EnumIter,
    Hash,
    Eq,
    PartialEq,
)]
#[serde(from = "String", into = "String")]
#[value(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Category {
    /// Houses, apartments, land.
    RealEstate,
    /// Vehicles, trucks, SUVs.
    Cars,
    /// Bikes, scooters, ATVs.
    Motorcycles,
    /// Computers, TVs, audio.
    Electronics,
    /// Phones, tablets, watches.
    Gadgets,
    /// Chairs, tables, decor.
    Furniture,
    /// Any label without dedicated behaviour.
    General,
}

impl Category {
    /// Resolves a free-text label.
    ///
    /// Empty or whitespace-only labels mean "no category" and yield `None`;
    /// unknown labels fall back to [`Category::General`].
    pub fn from_label(label: &str) -> Option<Category> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(trimmed.parse().unwrap_or(Category::General))
    }

    /// Human-readable name, e.g. `Real Estate`.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::RealEstate => "Real Estate",
            Category::Cars => "Cars",
            Category::Motorcycles => "Motorcycles",
            Category::Electronics => "Electronics",
            Category::Gadgets => "Gadgets",
            Category::Furniture => "Furniture",
            Category::General => "General",
        }
    }

    /// Short description of what the category covers.
    pub fn description(&self) -> &'static str {
        match self {
            Category::RealEstate => "Houses, apartments, land",
            Category::Cars => "Vehicles, trucks, SUVs",
            Category::Motorcycles => "Bikes, scooters, ATVs",
            Category::Electronics => "Computers, TVs, audio",
            Category::Gadgets => "Phones, tablets, watches",
            Category::Furniture => "Chairs, tables, decor",
            Category::General => "Everything else",
        }
    }
}

/// Deserializes an optional category label through [`Category::from_label`].
///
/// A missing field, `null` and an empty label all yield `None`.
pub fn deserialize_label<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<String>::deserialize(deserializer)?;
    Ok(label.as_deref().and_then(Category::from_label))
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Category::from_label(&label).unwrap_or(Category::General)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_known_labels_round_trip_through_display() {
        for category in Category::iter() {
            let label = category.to_string();
            assert_eq!(Category::from_label(&label), Some(category));
        }
        assert_eq!(Category::RealEstate.to_string(), "real-estate");
    }

    #[test]
    fn test_labels_are_case_insensitive_and_trimmed() {
        assert_eq!(Category::from_label("  Cars "), Some(Category::Cars));
        assert_eq!(Category::from_label("REAL-ESTATE"), Some(Category::RealEstate));
    }

    #[test]
    fn test_unknown_label_falls_back_to_general() {
        assert_eq!(Category::from_label("boats"), Some(Category::General));
    }

    #[derive(Debug, Deserialize)]
    struct Labelled {
        #[serde(default, deserialize_with = "deserialize_label")]
        category: Option<Category>,
    }

    #[test]
    fn test_deserialize_label_maps_empty_to_none() {
        let parse = |json: &str| serde_json::from_str::<Labelled>(json).unwrap().category;
        assert_eq!(parse(r#"{"category":""}"#), None);
        assert_eq!(parse(r#"{"category":"  "}"#), None);
        assert_eq!(parse(r#"{"category":null}"#), None);
        assert_eq!(parse("{}"), None);
        assert_eq!(parse(r#"{"category":"Cars"}"#), Some(Category::Cars));
        assert_eq!(parse(r#"{"category":"boats"}"#), Some(Category::General));
    }

    #[test]
    fn test_empty_label_means_no_category() {
        assert_eq!(Category::from_label(""), None);
        assert_eq!(Category::from_label("   "), None);
    }

    #[test]
    fn test_serde_uses_kebab_case_labels() {
        let json = serde_json::to_string(&Category::RealEstate).unwrap();
        assert_eq!(json, "\"real-estate\"");
        let parsed: Category = serde_json::from_str("\"sailboats\"").unwrap();
        assert_eq!(parsed, Category::General);
    }
}
