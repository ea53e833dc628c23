use crate::models::RankedOption;
use std::cmp::Ordering;

/// Best-value records: lowest profit_score first. The sort is stable, so
/// equal scores keep their traversal order. Fewer than `count` records in
/// means all of them come back, still sorted.
pub fn rank_top(mut records: Vec<RankedOption>, count: usize) -> Vec<RankedOption> {
    records.sort_by(|a, b| {
        a.profit_score
            .partial_cmp(&b.profit_score)
            .unwrap_or(Ordering::Equal)
    });
    records.truncate(count);
    records
}
