//! Ranking of sub-units against selection requests.

use tracing::debug;

use super::types::{
    AvailabilitySnapshot, Candidate, RankOptions, SelectionRequest, SubUnitId,
};
use crate::metrics::{CANDIDATE_SUB_UNITS, RANK_OUTCOMES};

/// Rank the snapshot's sub-units for every request.
///
/// Each request yields at most one candidate listing the sub-units of the
/// matching category whose total availability covers the requested quantity,
/// ordered by total availability (descending) and then by id (ascending).
/// Requests that cannot be served are left out; the output keeps the input
/// order of the requests that remain.
pub fn rank(
    snapshot: &AvailabilitySnapshot,
    requests: &[SelectionRequest],
    options: &RankOptions,
) -> Vec<Candidate> {
    requests
        .iter()
        .filter_map(|request| rank_request(snapshot, request, options))
        .collect()
}

fn rank_request(
    snapshot: &AvailabilitySnapshot,
    request: &SelectionRequest,
    options: &RankOptions,
) -> Option<Candidate> {
    if request.quantity == 0 {
        debug!(category = %request.category, "Ignoring request with zero quantity");
        RANK_OUTCOMES.with_label_values(&["invalid_quantity"]).inc();
        return None;
    }

    let Some(category) = snapshot.find_category(&request.category, &options.locale) else {
        debug!(category = %request.category, locale = %options.locale, "No matching category");
        RANK_OUTCOMES.with_label_values(&["no_category"]).inc();
        return None;
    };

    let kind = category.kind();
    let quantity = u64::from(request.quantity);

    let mut ranked: Vec<(SubUnitId, u64)> = category
        .sub_units(kind)
        .iter()
        .map(|unit| (unit.id, category.total_for(unit.id, options.consider_resale)))
        .filter(|(_, total)| *total >= quantity)
        .collect();

    if ranked.is_empty() {
        debug!(
            category = %request.category,
            kind = kind.as_str(),
            quantity,
            "No sub-unit has enough availability"
        );
        RANK_OUTCOMES.with_label_values(&["no_capacity"]).inc();
        return None;
    }

    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    RANK_OUTCOMES.with_label_values(&["matched"]).inc();
    CANDIDATE_SUB_UNITS
        .with_label_values(&[kind.as_str()])
        .observe(ranked.len() as f64);

    Some(Candidate {
        category: request.category.clone(),
        name: request.name.clone(),
        quantity: request.quantity,
        tribune: request.tribune.clone().unwrap_or_default(),
        seat_category_id: category.id,
        kind,
        sub_unit_ids: ranked.into_iter().map(|(id, _)| id).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{SubUnitKind, PriceRangeCategory};
    use proptest::prelude::*;
    use serde_json::json;

    fn snapshot(value: serde_json::Value) -> AvailabilitySnapshot {
        AvailabilitySnapshot::from_value(&value)
    }

    fn block_snapshot() -> AvailabilitySnapshot {
        snapshot(json!({
            "priceRangeCategories": [{
                "id": 11,
                "name": {"de": "Kategorie 1"},
                "blocks": [{"id": 5}, {"id": 9}, {"id": 3}, {"id": 7}],
                "areaBlocksAvailability": {
                    "5": {"availability": 2},
                    "9": {"availability": 4},
                    "3": {"availability": 4, "availabilityResale": 3},
                    "7": {"availability": 1, "availabilityResale": 7}
                }
            }]
        }))
    }

    #[test]
    fn test_rank_single_block_with_enough_availability() {
        let snap = snapshot(json!({
            "priceRangeCategories": [{
                "id": 1,
                "name": {"de": "Kategorie 2"},
                "blocks": [{"id": 17}],
                "areaBlocksAvailability": {"17": {"availability": 5}}
            }]
        }));

        let candidates = rank(
            &snap,
            &[SelectionRequest::new("Kategorie 2", 3)],
            &RankOptions::default(),
        );

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind, SubUnitKind::Block);
        assert_eq!(candidates[0].sub_unit_ids, vec![17]);
        assert_eq!(candidates[0].seat_category_id, 1);
    }

    #[test]
    fn test_rank_drops_blocks_below_quantity() {
        let snap = snapshot(json!({
            "priceRangeCategories": [{
                "id": 1,
                "name": {"de": "Kategorie 1"},
                "blocks": [{"id": 5}, {"id": 9}],
                "areaBlocksAvailability": {
                    "5": {"availability": 2},
                    "9": {"availability": 4}
                }
            }]
        }));

        let candidates = rank(
            &snap,
            &[SelectionRequest::new("Kategorie 1", 3)],
            &RankOptions::default(),
        );

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].sub_unit_ids, vec![9]);
    }

    #[test]
    fn test_rank_orders_by_total_then_id() {
        let candidates = rank(
            &block_snapshot(),
            &[SelectionRequest::new("Kategorie 1", 1)],
            &RankOptions::default(),
        );

        // 3 and 9 both have 4 direct; the smaller id wins the tie
        assert_eq!(candidates[0].sub_unit_ids, vec![3, 9, 5, 7]);
    }

    #[test]
    fn test_rank_with_resale() {
        let candidates = rank(
            &block_snapshot(),
            &[SelectionRequest::new("Kategorie 1", 5)],
            &RankOptions::default().with_resale(true),
        );

        assert_eq!(candidates[0].sub_unit_ids, vec![7, 3]);
    }

    #[test]
    fn test_rank_area_kind() {
        let snap = snapshot(json!({
            "priceRangeCategories": [{
                "id": 42,
                "name": {"de": "Stehplatz"},
                "areas": [{"id": 100}, {"id": 101}],
                "areaBlocksAvailability": {
                    "100": {"availability": 30},
                    "101": {"availability": 80}
                }
            }]
        }));

        let candidates = rank(
            &snap,
            &[SelectionRequest::new("Stehplatz", 2).with_name("Home vs Away")],
            &RankOptions::default(),
        );

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind, SubUnitKind::Area);
        assert_eq!(candidates[0].sub_unit_ids, vec![101, 100]);
        assert_eq!(candidates[0].name, "Home vs Away");
    }

    #[test]
    fn test_rank_mixed_category_ranks_blocks() {
        let snap = snapshot(json!({
            "priceRangeCategories": [{
                "id": 1,
                "name": {"de": "Gemischt"},
                "areas": [{"id": 1}],
                "blocks": [{"id": 2}],
                "areaBlocksAvailability": {
                    "1": {"availability": 50},
                    "2": {"availability": 3}
                }
            }]
        }));

        let candidates = rank(
            &snap,
            &[SelectionRequest::new("Gemischt", 2)],
            &RankOptions::default(),
        );
        assert_eq!(candidates[0].kind, SubUnitKind::Block);
        assert_eq!(candidates[0].sub_unit_ids, vec![2]);
    }

    #[test]
    fn test_rank_preserves_request_order_and_drops_unmatched() {
        let requests = vec![
            SelectionRequest::new("Unknown", 1),
            SelectionRequest::new("Kategorie 1", 4).with_tribune("Nord"),
            SelectionRequest::new("Kategorie 1", 100),
            SelectionRequest::new("Kategorie 1", 1).with_name("second"),
        ];

        let candidates = rank(&block_snapshot(), &requests, &RankOptions::default());

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].quantity, 4);
        assert_eq!(candidates[0].tribune, "Nord");
        assert_eq!(candidates[1].name, "second");
        assert_eq!(candidates[1].tribune, "");
    }

    #[test]
    fn test_rank_zero_quantity_is_no_match() {
        let candidates = rank(
            &block_snapshot(),
            &[SelectionRequest::new("Kategorie 1", 0)],
            &RankOptions::default(),
        );
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_rank_category_name_is_case_sensitive() {
        let candidates = rank(
            &block_snapshot(),
            &[SelectionRequest::new("kategorie 1", 1)],
            &RankOptions::default(),
        );
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_rank_uses_configured_locale() {
        let snap = snapshot(json!({
            "priceRangeCategories": [{
                "id": 1,
                "name": {"de": "Kategorie 1", "en": "Category 1"},
                "blocks": [{"id": 2}],
                "areaBlocksAvailability": {"2": {"availability": 3}}
            }]
        }));

        let english = RankOptions::default().with_locale("en");
        assert_eq!(
            rank(&snap, &[SelectionRequest::new("Category 1", 1)], &english).len(),
            1
        );
        assert!(rank(
            &snap,
            &[SelectionRequest::new("Category 1", 1)],
            &RankOptions::default()
        )
        .is_empty());
    }

    #[test]
    fn test_rank_malformed_snapshot_is_empty() {
        let snap = snapshot(json!({"priceRangeCategories": "broken"}));
        let candidates = rank(
            &snap,
            &[SelectionRequest::new("Kategorie 1", 1)],
            &RankOptions::default(),
        );
        assert!(candidates.is_empty());
    }

    fn arb_category() -> impl Strategy<Value = PriceRangeCategory> {
        proptest::collection::vec((0u64..40, 0u64..10, 0u64..10), 0..12).prop_map(|units| {
            let mut value = json!({
                "id": 1,
                "name": {"de": "Kat"},
                "blocks": [],
                "areaBlocksAvailability": {}
            });
            for (id, direct, resale) in units {
                value["blocks"].as_array_mut().unwrap().push(json!({"id": id}));
                value["areaBlocksAvailability"][id.to_string()] =
                    json!({"availability": direct, "availabilityResale": resale});
            }
            serde_json::from_value(value).unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_rank_respects_quantity_and_order(
            category in arb_category(),
            quantity in 1u32..12,
            consider_resale in any::<bool>(),
        ) {
            let snap = AvailabilitySnapshot { price_range_categories: vec![category.clone()] };
            let options = RankOptions::default().with_resale(consider_resale);
            let candidates = rank(&snap, &[SelectionRequest::new("Kat", quantity)], &options);

            for candidate in &candidates {
                let totals: Vec<(u64, u64)> = candidate
                    .sub_unit_ids
                    .iter()
                    .map(|id| (*id, category.total_for(*id, consider_resale)))
                    .collect();

                for (_, total) in &totals {
                    prop_assert!(*total >= u64::from(quantity));
                }
                for pair in totals.windows(2) {
                    let (a_id, a_total) = pair[0];
                    let (b_id, b_total) = pair[1];
                    prop_assert!(a_total > b_total || (a_total == b_total && a_id <= b_id));
                }
            }
        }
    }
}
