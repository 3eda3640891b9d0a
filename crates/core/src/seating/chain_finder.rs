//! Discovery of adjacent seat chains.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::types::{Chain, SeatId, SeatRecord};
use crate::metrics::CHAINS_FOUND;

/// Largest seat-number gap still considered adjacent within one row.
pub const SAME_ROW_MAX_GAP: u64 = 2;

/// Whether `next` may follow `last` in a chain.
///
/// Same row with seat numbers at most two apart, or neighbouring rows with
/// seat numbers exactly one apart.
pub fn is_adjacent(last: &SeatRecord, next: &SeatRecord) -> bool {
    let number_gap = last.number.abs_diff(next.number);
    if last.row == next.row {
        return number_gap <= SAME_ROW_MAX_GAP;
    }
    last.row.abs_diff(next.row) == 1 && number_gap == 1
}

/// Find chains of adjacent seats.
///
/// Seats are filtered by category (case-insensitive) and the exclusion set,
/// grouped by area name, and each area is scanned in row-descending,
/// number-ascending order. Every unused seat starts a chain that greedily
/// absorbs later seats adjacent to its current last member. Chains shorter
/// than `min_length` are discarded. Areas are reported in the order they
/// first appear in `seats`.
pub fn find_chains(
    seats: &[SeatRecord],
    min_length: usize,
    category: &str,
    excluded: &HashSet<SeatId>,
) -> Vec<Chain> {
    let wanted = category.to_lowercase();

    let mut areas: Vec<Vec<&SeatRecord>> = Vec::new();
    let mut area_index: HashMap<&str, usize> = HashMap::new();

    for seat in seats
        .iter()
        .filter(|s| !excluded.contains(&s.id) && s.category.to_lowercase() == wanted)
    {
        let slot = *area_index.entry(seat.area.as_str()).or_insert_with(|| {
            areas.push(Vec::new());
            areas.len() - 1
        });
        areas[slot].push(seat);
    }

    let chains: Vec<Chain> = areas
        .into_iter()
        .flat_map(|area_seats| chains_in_area(area_seats, min_length))
        .collect();

    debug!(
        seats = seats.len(),
        areas = area_index.len(),
        chains = chains.len(),
        min_length,
        "Chain discovery finished"
    );
    CHAINS_FOUND.observe(chains.len() as f64);

    chains
}

fn chains_in_area(mut seats: Vec<&SeatRecord>, min_length: usize) -> Vec<Chain> {
    seats.sort_by(|a, b| b.row.cmp(&a.row).then(a.number.cmp(&b.number)));

    let mut used = vec![false; seats.len()];
    let mut chains = Vec::new();

    for start in 0..seats.len() {
        if used[start] {
            continue;
        }
        used[start] = true;

        let mut chain: Vec<&SeatRecord> = vec![seats[start]];
        for next in (start + 1)..seats.len() {
            if used[next] {
                continue;
            }
            let last = chain[chain.len() - 1];
            if is_adjacent(last, seats[next]) {
                chain.push(seats[next]);
                used[next] = true;
            }
        }

        if chain.len() >= min_length {
            chains.push(chain.into_iter().cloned().collect());
        }
    }

    chains
}
