use std::cmp::Ordering;
use tracing::debug;

use crate::similarity::cosine_similarity;
use crate::types::{Entry, RankedEntry};

/// Rank `candidates` by descending cosine similarity to `query`
///
/// The query heads the result regardless of its self-similarity. Equal scores
/// keep their input order, and a candidate sharing the query's id is skipped.
pub fn rank(query: &Entry, candidates: &[Entry]) -> Vec<RankedEntry> {
    let mut scored: Vec<RankedEntry> = candidates
        .iter()
        .filter(|c| c.id != query.id)
        .map(|c| RankedEntry::scored(c, cosine_similarity(&query.embedding, &c.embedding)))
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| descending(a.score.unwrap_or(0.0), b.score.unwrap_or(0.0)));

    debug!("Ranked {} candidates against entry {}", scored.len(), query.id);

    let mut ranked = Vec::with_capacity(scored.len() + 1);
    ranked.push(RankedEntry::anchor(query));
    ranked.extend(scored);
    ranked
}

/// Higher scores first; NaN sorts after every number
fn descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Rank chronologically ordered `entries` against the newest one
pub fn rank_latest(entries: &[Entry]) -> Vec<RankedEntry> {
    match entries.split_last() {
        Some((newest, previous)) => rank(newest, previous),
        None => Vec::new(),
    }
}

/// Rank `entries` against the entry with `id`, or `None` if it is absent
pub fn rank_by_id(entries: &[Entry], id: i64) -> Option<Vec<RankedEntry>> {
    let query = entries.iter().find(|e| e.id == id)?;
    Some(rank(query, entries))
}
