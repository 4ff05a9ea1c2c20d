use serde::{Deserialize, Serialize};

use crate::UserProfile;

pub const EXACT_SCORE: i32 = 100;
pub const PREFIX_SCORE: i32 = 80;
pub const PARTIAL_SCORE: i32 = 60;
pub const FUZZY_SCORE: i32 = 40;
pub const AVATAR_BOOST: i32 = 5;
pub const BIO_BOOST: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relevance {
	Exact,
	Prefix,
	Partial,
	/// No local string relationship. Only index-sourced candidates can land here, since the
	/// datastore fallback returns names that start with or contain the query.
	Fuzzy,
}
impl Relevance {
	pub fn base_score(self) -> i32 {
		match self {
			Self::Exact => EXACT_SCORE,
			Self::Prefix => PREFIX_SCORE,
			Self::Partial => PARTIAL_SCORE,
			Self::Fuzzy => FUZZY_SCORE,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Exact => "exact",
			Self::Prefix => "prefix",
			Self::Partial => "partial",
			Self::Fuzzy => "fuzzy",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scored {
	pub relevance: Relevance,
	pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredUser {
	#[serde(flatten)]
	pub profile: UserProfile,
	pub relevance: Relevance,
	pub score: i32,
}

pub fn score_candidate(query: &str, profile: &UserProfile) -> Scored {
	let name = profile.display_name.to_lowercase();
	let query = query.to_lowercase();
	let relevance = if name == query {
		Relevance::Exact
	} else if name.starts_with(&query) {
		Relevance::Prefix
	} else if name.contains(&query) {
		Relevance::Partial
	} else {
		Relevance::Fuzzy
	};
	let mut score = relevance.base_score();

	if profile.has_avatar() {
		score += AVATAR_BOOST;
	}
	if profile.has_bio() {
		score += BIO_BOOST;
	}

	Scored { relevance, score }
}

/// Scores every candidate and orders by descending score. Equal scores keep input order.
pub fn rank_candidates(query: &str, profiles: Vec<UserProfile>) -> Vec<ScoredUser> {
	let mut scored = profiles
		.into_iter()
		.map(|profile| {
			let Scored { relevance, score } = score_candidate(query, &profile);

			ScoredUser { profile, relevance, score }
		})
		.collect::<Vec<_>>();

	// `sort_by` is stable.
	scored.sort_by(|a, b| b.score.cmp(&a.score));

	scored
}
