use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::common::SettlementSource;

/// Template for recurring events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub ticker: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "fee_type")]
    pub fee_type: Option<String>,
    #[serde(default, alias = "fee_multiplier")]
    pub fee_multiplier: Option<f64>,
    #[serde(default, alias = "contract_terms_url")]
    pub contract_terms_url: Option<String>,
    #[serde(default, alias = "contract_url")]
    pub contract_url: Option<String>,
    #[serde(default, alias = "additional_prohibitions")]
    pub additional_prohibitions: Vec<String>,
    #[serde(default, alias = "settlement_sources")]
    pub settlement_sources: Vec<SettlementSource>,
    #[serde(default, alias = "product_metadata")]
    pub product_metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SeriesBody {
    #[serde(default)]
    pub series: Vec<Series>,
}

/// Tags grouped by category name
pub type CategoryTags = HashMap<String, Vec<String>>;

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TagsByCategoriesBody {
    #[serde(default, rename = "tagsByCategories", alias = "tags_by_categories")]
    pub tags_by_categories: HashMap<String, Option<Vec<String>>>,
}

impl TagsByCategoriesBody {
    /// Categories without tags map to an empty list
    pub fn into_tags(self) -> CategoryTags {
        self.tags_by_categories
            .into_iter()
            .map(|(category, tags)| (category, tags.unwrap_or_default()))
            .collect()
    }
}

/// Scopes available for one competition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitionScopes {
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Filtering options for one sport
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SportFilter {
    #[serde(default)]
    pub scopes: Option<Vec<String>>,
    #[serde(default)]
    pub competitions: Option<HashMap<String, CompetitionScopes>>,
}

/// Sports filters keyed by sport, plus the display ordering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportsFilters {
    #[serde(default, alias = "filters_by_sports")]
    pub filters_by_sports: HashMap<String, SportFilter>,
    #[serde(default, alias = "sport_ordering")]
    pub sport_ordering: Vec<String>,
}

impl SportsFilters {
    /// Filters in display order; sports missing from the map are skipped
    pub fn ordered(&self) -> impl Iterator<Item = (&str, &SportFilter)> {
        self.sport_ordering.iter().filter_map(|sport| {
            self.filters_by_sports
                .get(sport)
                .map(|filter| (sport.as_str(), filter))
        })
    }
}
