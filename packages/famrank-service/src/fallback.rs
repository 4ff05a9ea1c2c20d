//! Datastore resolution used while the search index is unavailable.

use crate::UserStore;
use famrank_domain::{UserProfile, dedup_by_uid};

/// Substring matches are only collected for queries longer than this many characters.
pub const SUBSTRING_MIN_CHARS: usize = 2;

/// Prefix-range lookup on `display_name_lower`, topped up with substring matches from a bounded
/// scan when the prefix lookup comes back short.
pub async fn resolve(
	store: &dyn UserStore,
	query_lower: &str,
	limit: u32,
	scan_limit: u32,
) -> famrank_storage::Result<Vec<UserProfile>> {
	if limit == 0 {
		return Ok(Vec::new());
	}

	let prefix = store.users_by_name_prefix(query_lower, limit).await?;
	let limit = limit as usize;
	let mut supplement = Vec::new();

	if prefix.len() < limit && query_lower.chars().count() > SUBSTRING_MIN_CHARS {
		let scan = store.users_ordered_by_name(scan_limit).await?;

		supplement = substring_matches(scan, query_lower, limit - prefix.len());
	}

	Ok(merge_results(prefix, supplement, limit))
}

/// Rows whose name contains the query somewhere after the first character.
pub fn substring_matches(
	scan: Vec<UserProfile>,
	query_lower: &str,
	cap: usize,
) -> Vec<UserProfile> {
	scan.into_iter()
		.filter(|profile| {
			let name = profile.search_name();

			name.contains(query_lower) && !name.starts_with(query_lower)
		})
		.take(cap)
		.collect()
}

pub fn merge_results(
	prefix: Vec<UserProfile>,
	supplement: Vec<UserProfile>,
	limit: usize,
) -> Vec<UserProfile> {
	let mut merged = dedup_by_uid(prefix.into_iter().chain(supplement).collect());

	merged.truncate(limit);

	merged
}
