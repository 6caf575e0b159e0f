//! SemSort vector math
//!
//! Entry data model, cosine similarity and similarity ranking

mod rank;
mod similarity;
mod types;

pub use rank::{rank, rank_by_id, rank_latest};
pub use similarity::{cosine_similarity, EPSILON};
pub use types::{Entry, NewEntry, RankedEntry};
