//! Types for availability snapshots, requests and ranked candidates.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::lenient::{count_from_any, u64_from_any};

/// Identifier of an area or block.
pub type SubUnitId = u64;

/// Locale used for category and area names when none is configured.
pub const DEFAULT_LOCALE: &str = "de";

/// A name translated into several locales (`{"de": "...", "en": "..."}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedName(pub HashMap<String, String>);

impl LocalizedName {
    /// Name with a single translation.
    pub fn single(locale: impl Into<String>, text: impl Into<String>) -> Self {
        let mut names = HashMap::new();
        names.insert(locale.into(), text.into());
        Self(names)
    }

    /// Translation for `locale`, if present.
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }
}

/// Kind of sub-unit a category sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubUnitKind {
    /// Unreserved standing capacity.
    Area,
    /// Container of individually numbered seats.
    Block,
}

impl SubUnitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubUnitKind::Area => "area",
            SubUnitKind::Block => "block",
        }
    }
}

/// An area or block reference inside a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubUnit {
    #[serde(deserialize_with = "u64_from_any")]
    pub id: SubUnitId,
}

/// Free-unit counts for one sub-unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubUnitAvailability {
    /// Units sold directly by the organiser.
    #[serde(default, deserialize_with = "count_from_any")]
    pub availability: Option<u64>,
    /// Units offered on the resale market.
    #[serde(default, deserialize_with = "count_from_any")]
    pub availability_resale: Option<u64>,
}

impl SubUnitAvailability {
    /// Total units usable for a request; missing counts are zero.
    pub fn total(&self, consider_resale: bool) -> u64 {
        let direct = self.availability.unwrap_or(0);
        let resale = if consider_resale {
            self.availability_resale.unwrap_or(0)
        } else {
            0
        };
        direct.saturating_add(resale)
    }
}

/// One price range / seat category of a performance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeCategory {
    #[serde(default, deserialize_with = "u64_from_any")]
    pub id: u64,
    #[serde(default)]
    pub name: LocalizedName,
    #[serde(default)]
    pub areas: Vec<SubUnit>,
    #[serde(default)]
    pub blocks: Vec<SubUnit>,
    /// Free-unit counts keyed by sub-unit id (as a string).
    #[serde(default)]
    pub area_blocks_availability: HashMap<String, SubUnitAvailability>,
}

impl PriceRangeCategory {
    /// A category with areas and no blocks sells standing capacity.
    pub fn kind(&self) -> SubUnitKind {
        if !self.areas.is_empty() && self.blocks.is_empty() {
            SubUnitKind::Area
        } else {
            SubUnitKind::Block
        }
    }

    /// Sub-units of the given kind.
    pub fn sub_units(&self, kind: SubUnitKind) -> &[SubUnit] {
        match kind {
            SubUnitKind::Area => &self.areas,
            SubUnitKind::Block => &self.blocks,
        }
    }

    /// Total free units of a sub-unit (zero when it has no availability entry).
    pub fn total_for(&self, id: SubUnitId, consider_resale: bool) -> u64 {
        self.area_blocks_availability
            .get(&id.to_string())
            .map(|a| a.total(consider_resale))
            .unwrap_or(0)
    }
}

/// Immutable availability document for one performance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySnapshot {
    #[serde(default)]
    pub price_range_categories: Vec<PriceRangeCategory>,
}

impl AvailabilitySnapshot {
    /// Build a snapshot from an arbitrary JSON document.
    ///
    /// A missing or non-list category collection yields an empty snapshot,
    /// and individual categories that fail to parse are skipped.
    pub fn from_value(value: &Value) -> Self {
        let Some(raw_categories) = value.get("priceRangeCategories").and_then(Value::as_array)
        else {
            warn!("Availability snapshot has no priceRangeCategories list");
            return Self::default();
        };

        let price_range_categories = raw_categories
            .iter()
            .filter_map(|raw| match PriceRangeCategory::deserialize(raw) {
                Ok(category) => Some(category),
                Err(e) => {
                    debug!(error = %e, "Skipping malformed price range category");
                    None
                }
            })
            .collect();

        Self {
            price_range_categories,
        }
    }

    /// Parse a snapshot from JSON text; unparseable text yields an empty snapshot.
    pub fn from_json_str(json: &str) -> Self {
        match serde_json::from_str::<Value>(json) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                warn!(error = %e, "Availability snapshot is not valid JSON");
                Self::default()
            }
        }
    }

    /// First category whose name in `locale` equals `name` exactly.
    pub fn find_category(&self, name: &str, locale: &str) -> Option<&PriceRangeCategory> {
        self.price_range_categories
            .iter()
            .find(|c| c.name.get(locale) == Some(name))
    }
}

/// What the caller wants: a quantity of tickets in a named category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRequest {
    /// Category name, matched case-sensitively against the localized name.
    pub category: String,
    /// Number of tickets wanted. Zero never matches.
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tribune: Option<String>,
    /// Display name of the event or request.
    #[serde(default)]
    pub name: String,
}

impl SelectionRequest {
    pub fn new(category: impl Into<String>, quantity: u32) -> Self {
        Self {
            category: category.into(),
            quantity,
            tribune: None,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_tribune(mut self, tribune: impl Into<String>) -> Self {
        self.tribune = Some(tribune.into());
        self
    }
}

/// A request that can be served, with its feasible sub-units in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub category: String,
    pub name: String,
    pub quantity: u32,
    /// Tribune label, empty when the request had none.
    pub tribune: String,
    /// Id of the owning price range category.
    pub seat_category_id: u64,
    pub kind: SubUnitKind,
    /// Feasible sub-unit ids, most available first.
    pub sub_unit_ids: Vec<SubUnitId>,
}

/// Ranking options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankOptions {
    /// Count resale availability on top of direct availability.
    pub consider_resale: bool,
    /// Locale used to match category names.
    pub locale: String,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            consider_resale: false,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl RankOptions {
    pub fn with_resale(mut self, consider_resale: bool) -> Self {
        self.consider_resale = consider_resale;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}
