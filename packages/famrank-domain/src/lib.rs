pub mod profile;
pub mod query;
pub mod scoring;

pub use profile::{UserProfile, dedup_by_uid};
pub use query::{QueryRejection, SearchQuery};
pub use scoring::{Relevance, Scored, ScoredUser, rank_candidates, score_candidate};
