use time::OffsetDateTime;

use famrank_domain::UserProfile;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
	pub uid: String,
	pub email: Option<String>,
	pub display_name: String,
	pub display_name_lower: Option<String>,
	pub bio: Option<String>,
	pub photo_url: Option<String>,
	pub favorite_genres: Vec<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
impl From<UserRow> for UserProfile {
	fn from(row: UserRow) -> Self {
		Self {
			uid: row.uid,
			email: row.email,
			display_name: row.display_name,
			display_name_lower: row.display_name_lower,
			bio: row.bio,
			photo_url: row.photo_url,
			favorite_genres: row.favorite_genres,
		}
	}
}
