//! Seat records and the seat-detail wire formats they are read from.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::inventory::{LocalizedName, SubUnitId};
use crate::lenient::{as_i64, i64_from_any, u64_from_any};

/// Identifier of an individual seat.
pub type SeatId = u64;

/// One individually addressable seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRecord {
    #[serde(deserialize_with = "u64_from_any")]
    pub id: SeatId,
    #[serde(deserialize_with = "i64_from_any")]
    pub row: i64,
    /// Sequence number of the seat within its row.
    #[serde(deserialize_with = "i64_from_any")]
    pub number: i64,
    /// Seat category name.
    pub category: String,
    /// Name of the owning area.
    pub area: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<SubUnitId>,
}

impl SeatRecord {
    pub fn new(id: SeatId, row: i64, number: i64, category: &str, area: &str) -> Self {
        Self {
            id,
            row,
            number,
            category: category.to_string(),
            area: area.to_string(),
            block_id: None,
        }
    }

    pub fn with_block(mut self, block_id: SubUnitId) -> Self {
        self.block_id = Some(block_id);
        self
    }
}

/// Adjacency-linked seats of one area, in discovery order.
pub type Chain = Vec<SeatRecord>;

/// Ids of a chain's seats, in order.
pub fn chain_ids(chain: &[SeatRecord]) -> Vec<SeatId> {
    chain.iter().map(|seat| seat.id).collect()
}

/// Read seats from a seat-detail document.
///
/// Accepts a feature collection (`{"features": [...]}`), a bare array of
/// features, or a bare array of flat seat records. Area names of features are
/// read in `locale`. Entries without a numeric id, row or number are skipped;
/// anything that is not one of the shapes above yields no seats.
pub fn parse_seats(document: &Value, locale: &str) -> Vec<SeatRecord> {
    let entries = match document {
        Value::Array(entries) => entries,
        Value::Object(map) => match map.get("features").and_then(Value::as_array) {
            Some(features) => features,
            None => {
                warn!("Seat document has no features list");
                return Vec::new();
            }
        },
        _ => {
            warn!("Seat document is neither a list nor a feature collection");
            return Vec::new();
        }
    };

    let seats: Vec<SeatRecord> = entries
        .iter()
        .filter_map(|entry| parse_entry(entry, locale))
        .collect();

    if seats.len() < entries.len() {
        debug!(
            skipped = entries.len() - seats.len(),
            kept = seats.len(),
            "Skipped unusable seat entries"
        );
    }

    seats
}

fn parse_entry(entry: &Value, locale: &str) -> Option<SeatRecord> {
    if entry.get("properties").is_some() {
        let feature = SeatFeature::deserialize(entry).ok()?;
        feature.into_record(locale)
    } else {
        SeatRecord::deserialize(entry).ok()
    }
}

/// A seat as delivered by the ticketing backend's seat map.
#[derive(Debug, Clone, Deserialize)]
pub struct SeatFeature {
    pub id: Value,
    pub properties: SeatProperties,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatProperties {
    #[serde(default)]
    pub row: Value,
    #[serde(default)]
    pub number: Value,
    pub seat_category: String,
    pub area: NamedRef,
    #[serde(default)]
    pub block: Option<IdRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub name: LocalizedName,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdRef {
    #[serde(default)]
    pub id: Value,
}

impl SeatFeature {
    /// Flatten into a [`SeatRecord`]; `None` when id, row or number is not numeric.
    pub fn into_record(self, locale: &str) -> Option<SeatRecord> {
        let id = as_i64(&self.id).and_then(|v| u64::try_from(v).ok())?;
        let row = as_i64(&self.properties.row)?;
        let number = as_i64(&self.properties.number)?;
        let area = self
            .properties
            .area
            .name
            .get(locale)
            .unwrap_or_default()
            .to_string();
        let block_id = self
            .properties
            .block
            .as_ref()
            .and_then(|b| as_i64(&b.id))
            .and_then(|v| u64::try_from(v).ok());

        Some(SeatRecord {
            id,
            row,
            number,
            category: self.properties.seat_category,
            area,
            block_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(id: serde_json::Value, row: serde_json::Value, number: serde_json::Value) -> Value {
        json!({
            "type": "Feature",
            "id": id,
            "properties": {
                "row": row,
                "number": number,
                "seatCategory": "Kategorie 1",
                "area": {"name": {"de": "Unterrang Nord", "en": "Lower North"}},
                "block": {"id": 17}
            }
        })
    }

    #[test]
    fn test_parse_feature_collection() {
        let document = json!({
            "type": "FeatureCollection",
            "features": [
                feature(json!(1), json!("10"), json!(1)),
                feature(json!("2"), json!(10), json!("3")),
            ]
        });

        let seats = parse_seats(&document, "de");
        assert_eq!(seats.len(), 2);
        assert_eq!(seats[0].id, 1);
        assert_eq!(seats[0].row, 10);
        assert_eq!(seats[1].id, 2);
        assert_eq!(seats[1].number, 3);
        assert_eq!(seats[1].area, "Unterrang Nord");
        assert_eq!(seats[1].block_id, Some(17));
    }

    #[test]
    fn test_parse_features_uses_locale() {
        let document = json!([feature(json!(1), json!(1), json!(1))]);
        let seats = parse_seats(&document, "en");
        assert_eq!(seats[0].area, "Lower North");
    }

    #[test]
    fn test_parse_skips_non_numeric_rows() {
        let document = json!({
            "features": [
                feature(json!(1), json!("A"), json!(1)),
                feature(json!(2), json!(3), json!(null)),
                feature(json!(3), json!(3), json!(4)),
            ]
        });

        let seats = parse_seats(&document, "de");
        assert_eq!(chain_ids(&seats), vec![3]);
    }

    #[test]
    fn test_parse_flat_records() {
        let document = json!([
            {"id": 1, "row": "9", "number": 2, "category": "Kat", "area": "Ost"},
            {"id": 2, "row": 9, "number": 3, "category": "Kat", "area": "Ost", "block_id": 4},
            {"id": 3, "row": "x", "number": 3, "category": "Kat", "area": "Ost"}
        ]);

        let seats = parse_seats(&document, "de");
        assert_eq!(seats.len(), 2);
        assert_eq!(seats[0].row, 9);
        assert_eq!(seats[0].block_id, None);
        assert_eq!(seats[1].block_id, Some(4));
    }

    #[test]
    fn test_parse_unrecognised_document() {
        assert!(parse_seats(&json!({"seats": []}), "de").is_empty());
        assert!(parse_seats(&json!("nope"), "de").is_empty());
    }
}
