use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{Error, FamRankService, Result, ResultSource, fallback};
use famrank_domain::{UserProfile, dedup_by_uid};
use famrank_providers::index::IndexHit;

pub const DEFAULT_LOOKUP_LIMIT: u32 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupRequest {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResponse {
	pub users: Vec<UserProfile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestRequest {
	pub prefix: String,
	#[serde(default)]
	pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestResponse {
	pub suggestions: Vec<String>,
}

/// Users resolved for a name, tagged with the backend that produced them.
#[derive(Debug, Clone)]
pub struct Resolved {
	pub source: ResultSource,
	pub users: Vec<UserProfile>,
}

impl FamRankService {
	pub async fn get_user_profile(&self, uid: &str) -> Result<Option<UserProfile>> {
		if uid.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "uid must be non-empty.".to_string() });
		}

		Ok(self.backends.store.get_user(uid).await?)
	}

	pub async fn get_users_by_name(&self, term: &str, limit: u32) -> Result<Vec<UserProfile>> {
		Ok(self.resolve_by_name(term, limit).await?.users)
	}

	/// Asks the index first and falls back to the datastore when the index is disabled, unhealthy,
	/// or failing. Index trouble is logged, never returned.
	pub async fn resolve_by_name(&self, term: &str, limit: u32) -> Result<Resolved> {
		let term = term.trim();

		if term.is_empty() || limit == 0 {
			return Ok(Resolved { source: ResultSource::Datastore, users: Vec::new() });
		}

		if self.index_available().await {
			match self.backends.index.search_users(&self.cfg.index, term, limit).await {
				Ok(mut hits) => {
					sort_by_index_score(&mut hits);

					let mut users = dedup_by_uid(hits.into_iter().map(|hit| hit.content).collect());

					users.truncate(limit as usize);

					return Ok(Resolved { source: ResultSource::Index, users });
				},
				Err(err) => {
					tracing::warn!(error = %err, "Search index query failed. Falling back to the datastore.");
				},
			}
		}

		let users = fallback::resolve(
			self.backends.store.as_ref(),
			&term.to_lowercase(),
			limit,
			self.cfg.search.substring_scan_limit,
		)
		.await?;

		tracing::debug!(count = users.len(), "Resolved users from the datastore.");

		Ok(Resolved { source: ResultSource::Datastore, users })
	}

	pub async fn search_users(&self, req: LookupRequest) -> Result<LookupResponse> {
		let limit = req.limit.unwrap_or(DEFAULT_LOOKUP_LIMIT);
		let name = req.name.as_deref().map(str::trim).filter(|value| !value.is_empty());
		let email = req.email.as_deref().map(str::trim).filter(|value| !value.is_empty());
		let users = match (name, email) {
			(None, None) => Vec::new(),
			(Some(name), Some(email)) => self
				.get_users_by_name(name, limit)
				.await?
				.into_iter()
				.filter(|user| user.email.as_deref() == Some(email))
				.collect(),
			(Some(name), None) => self.get_users_by_name(name, limit).await?,
			(None, Some(email)) => self.backends.store.users_by_email(email, limit).await?,
		};

		Ok(LookupResponse { users })
	}

	/// Display-name completions. The index answers first; the datastore prefix and substring
	/// lookup covers for it when it is disabled, unhealthy, or failing.
	pub async fn suggest_users(&self, req: SuggestRequest) -> Result<SuggestResponse> {
		let prefix = req.prefix.trim();
		let limit = req.limit.unwrap_or(self.cfg.search.suggest_limit);

		if prefix.is_empty() || limit == 0 {
			return Ok(SuggestResponse { suggestions: Vec::new() });
		}

		if self.index_available().await {
			match self.backends.index.search_users(&self.cfg.index, prefix, limit).await {
				Ok(mut hits) => {
					sort_by_index_score(&mut hits);

					let users = hits.into_iter().map(|hit| hit.content);

					return Ok(SuggestResponse { suggestions: display_names(users, limit) });
				},
				Err(err) => {
					tracing::warn!(
						error = %err,
						"Search index suggestion query failed. Falling back to the datastore."
					);
				},
			}
		}

		let users = fallback::resolve(
			self.backends.store.as_ref(),
			&prefix.to_lowercase(),
			limit,
			self.cfg.search.substring_scan_limit,
		)
		.await?;

		Ok(SuggestResponse { suggestions: display_names(users, limit) })
	}

	pub(crate) async fn index_available(&self) -> bool {
		if !self.cfg.index.enabled {
			return false;
		}

		match self.backends.index.health_check(&self.cfg.index).await {
			Ok(true) => true,
			Ok(false) => {
				tracing::warn!("Search index reported unhealthy. Using the datastore.");

				false
			},
			Err(err) => {
				tracing::warn!(error = %err, "Search index health check failed. Using the datastore.");

				false
			},
		}
	}
}

fn display_names<I>(users: I, limit: u32) -> Vec<String>
where
	I: IntoIterator<Item = UserProfile>,
{
	let mut names = Vec::new();

	for user in users {
		if !user.display_name.is_empty() && !names.contains(&user.display_name) {
			names.push(user.display_name);
		}
	}

	names.truncate(limit as usize);

	names
}

/// Highest provider score first. Unscored hits go last; ties keep the order the index returned.
fn sort_by_index_score(hits: &mut [IndexHit]) {
	hits.sort_by(|a, b| match (a.score, b.score) {
		(Some(a), Some(b)) => b.total_cmp(&a),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	});
}
