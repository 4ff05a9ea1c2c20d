use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A user profile as returned by either search backend.
///
/// Field names follow the camelCase layout of the stored profile documents so index payloads
/// deserialize without a mapping layer. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
	pub uid: String,
	#[serde(default)]
	pub email: Option<String>,
	pub display_name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub display_name_lower: Option<String>,
	#[serde(default)]
	pub bio: Option<String>,
	#[serde(default, rename = "photoURL")]
	pub photo_url: Option<String>,
	#[serde(default)]
	pub favorite_genres: Vec<String>,
}
impl UserProfile {
	pub fn new(uid: impl Into<String>, display_name: impl Into<String>) -> Self {
		Self {
			uid: uid.into(),
			email: None,
			display_name: display_name.into(),
			display_name_lower: None,
			bio: None,
			photo_url: None,
			favorite_genres: Vec::new(),
		}
	}

	pub fn has_avatar(&self) -> bool {
		self.photo_url.as_deref().is_some_and(|url| !url.is_empty())
	}

	pub fn has_bio(&self) -> bool {
		self.bio.as_deref().is_some_and(|bio| !bio.is_empty())
	}

	/// The value stored in the lower-cased name column used by prefix queries.
	pub fn search_name(&self) -> String {
		self.display_name.to_lowercase()
	}
}

/// Drops later duplicates of a `uid`, keeping the first occurrence and the input order.
pub fn dedup_by_uid(profiles: Vec<UserProfile>) -> Vec<UserProfile> {
	let mut seen = HashSet::with_capacity(profiles.len());

	profiles.into_iter().filter(|profile| seen.insert(profile.uid.clone())).collect()
}
