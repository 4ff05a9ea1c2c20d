use serde::{Deserialize, Serialize};

use crate::{Error, FamRankService, Result};
use famrank_domain::UserProfile;

pub const BACKFILL_BATCH_SIZE: u32 = 500;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReindexReport {
	/// Rows that received a `display_name_lower` value.
	pub updated: u64,
	/// Whether the touched profiles were pushed to the search index.
	pub indexed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReindexUserResponse {
	pub updated: bool,
}

impl FamRankService {
	/// Writes a profile with its search name derived from `display_name`, then mirrors it into
	/// the index when the index is reachable.
	pub async fn update_user_profile(&self, mut profile: UserProfile) -> Result<UserProfile> {
		profile.uid = profile.uid.trim().to_string();

		if profile.uid.is_empty() {
			return Err(Error::InvalidRequest { message: "uid must be non-empty.".to_string() });
		}
		if profile.display_name.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "displayName must be non-empty.".to_string(),
			});
		}

		profile.display_name_lower = Some(profile.search_name());

		self.backends.store.upsert_user(&profile).await?;

		tracing::info!(uid = %profile.uid, "Updated user profile.");

		self.push_to_index(std::slice::from_ref(&profile)).await;

		Ok(profile)
	}

	pub async fn update_user_for_search(&self, uid: &str) -> Result<ReindexUserResponse> {
		let Some(mut profile) = self.get_user_profile(uid).await? else {
			return Err(Error::NotFound { message: format!("User {uid:?} does not exist.") });
		};

		if profile.display_name_lower.as_deref().is_some_and(|value| !value.is_empty()) {
			return Ok(ReindexUserResponse { updated: false });
		}

		let lower = profile.search_name();
		let updated = self.backends.store.set_display_name_lower(uid, &lower).await?;

		if updated {
			tracing::info!(uid, "Filled search name for user.");

			profile.display_name_lower = Some(lower);

			self.push_to_index(&[profile]).await;
		}

		Ok(ReindexUserResponse { updated })
	}

	/// Backfills every row missing `display_name_lower`, batch by batch, then mirrors the touched
	/// profiles into the index when it is reachable.
	pub async fn update_all_users_for_search(&self) -> Result<ReindexReport> {
		let mut touched = Vec::new();

		loop {
			let batch = self.backends.store.backfill_display_name_lower(BACKFILL_BATCH_SIZE).await?;
			let count = batch.len();

			if count == 0 {
				break;
			}

			tracing::info!(count, "Backfilled search names.");

			touched.extend(batch);

			if count < BACKFILL_BATCH_SIZE as usize {
				break;
			}
		}

		let indexed = self.push_to_index(&touched).await;

		Ok(ReindexReport { updated: touched.len() as u64, indexed })
	}

	async fn push_to_index(&self, users: &[UserProfile]) -> bool {
		if users.is_empty() || !self.index_available().await {
			return false;
		}

		match self.backends.index.upsert_users(&self.cfg.index, users).await {
			Ok(()) => true,
			Err(err) => {
				tracing::warn!(error = %err, count = users.len(), "Failed to push users to the search index.");

				false
			},
		}
	}
}
