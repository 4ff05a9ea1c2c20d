use time::OffsetDateTime;

use crate::{Error, Result, db::Db, models::UserRow};
use famrank_domain::UserProfile;

/// Appended to a prefix to form the exclusive upper bound of a prefix range scan.
pub const PREFIX_RANGE_SENTINEL: char = '\u{f8ff}';

const USER_COLUMNS: &str = "\
uid,
	email,
	display_name,
	display_name_lower,
	bio,
	photo_url,
	favorite_genres,
	created_at,
	updated_at";

pub fn prefix_upper_bound(prefix: &str) -> String {
	let mut bound = String::with_capacity(prefix.len() + PREFIX_RANGE_SENTINEL.len_utf8());

	bound.push_str(prefix);
	bound.push(PREFIX_RANGE_SENTINEL);

	bound
}

pub async fn get_user(db: &Db, uid: &str) -> Result<Option<UserRow>> {
	let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE uid = $1");
	let row = sqlx::query_as::<_, UserRow>(&sql).bind(uid).fetch_optional(&db.pool).await?;

	Ok(row)
}

/// Inserts or replaces a profile. `display_name_lower` is written as given, so rows created
/// before the search column existed can be reproduced with `None`.
pub async fn upsert_user(db: &Db, profile: &UserProfile, now: OffsetDateTime) -> Result<()> {
	if profile.uid.trim().is_empty() {
		return Err(Error::InvalidArgument("uid must be non-empty.".to_string()));
	}

	sqlx::query(
		"\
INSERT INTO users (
	uid,
	email,
	display_name,
	display_name_lower,
	bio,
	photo_url,
	favorite_genres,
	created_at,
	updated_at
)
VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$8)
ON CONFLICT (uid) DO UPDATE
SET
	email = EXCLUDED.email,
	display_name = EXCLUDED.display_name,
	display_name_lower = EXCLUDED.display_name_lower,
	bio = EXCLUDED.bio,
	photo_url = EXCLUDED.photo_url,
	favorite_genres = EXCLUDED.favorite_genres,
	updated_at = EXCLUDED.updated_at",
	)
	.bind(profile.uid.as_str())
	.bind(profile.email.as_deref())
	.bind(profile.display_name.as_str())
	.bind(profile.display_name_lower.as_deref())
	.bind(profile.bio.as_deref())
	.bind(profile.photo_url.as_deref())
	.bind(&profile.favorite_genres)
	.bind(now)
	.execute(&db.pool)
	.await?;

	Ok(())
}

/// Rows whose lower-cased name falls in `[prefix, prefix + U+F8FF)`, ascending.
///
/// The column uses the `C` collation, so the range and the ordering are byte-wise.
pub async fn users_by_name_prefix(db: &Db, prefix_lower: &str, limit: u32) -> Result<Vec<UserRow>> {
	let sql = format!(
		"\
SELECT {USER_COLUMNS}
FROM users
WHERE display_name_lower >= $1
	AND display_name_lower < $2
ORDER BY display_name_lower ASC
LIMIT $3"
	);
	let rows = sqlx::query_as::<_, UserRow>(&sql)
		.bind(prefix_lower)
		.bind(prefix_upper_bound(prefix_lower))
		.bind(i64::from(limit))
		.fetch_all(&db.pool)
		.await?;

	Ok(rows)
}

/// The first `limit` indexed rows by lower-cased name. Rows without the column are skipped.
pub async fn users_ordered_by_name(db: &Db, limit: u32) -> Result<Vec<UserRow>> {
	let sql = format!(
		"\
SELECT {USER_COLUMNS}
FROM users
WHERE display_name_lower IS NOT NULL AND display_name_lower <> ''
ORDER BY display_name_lower ASC
LIMIT $1"
	);
	let rows =
		sqlx::query_as::<_, UserRow>(&sql).bind(i64::from(limit)).fetch_all(&db.pool).await?;

	Ok(rows)
}

pub async fn users_by_email(db: &Db, email: &str, limit: u32) -> Result<Vec<UserRow>> {
	let sql = format!(
		"\
SELECT {USER_COLUMNS}
FROM users
WHERE email = $1
ORDER BY created_at DESC
LIMIT $2"
	);
	let rows = sqlx::query_as::<_, UserRow>(&sql)
		.bind(email)
		.bind(i64::from(limit))
		.fetch_all(&db.pool)
		.await?;

	Ok(rows)
}

/// Fills the search column for one user. Returns `false` when it was already set.
///
/// Empty values count as missing.
pub async fn set_display_name_lower(
	db: &Db,
	uid: &str,
	display_name_lower: &str,
	now: OffsetDateTime,
) -> Result<bool> {
	let result = sqlx::query(
		"\
UPDATE users
SET display_name_lower = $1, updated_at = $2
WHERE uid = $3 AND (display_name_lower IS NULL OR display_name_lower = '')",
	)
	.bind(display_name_lower)
	.bind(now)
	.bind(uid)
	.execute(&db.pool)
	.await?;

	Ok(result.rows_affected() > 0)
}

/// Fills the search column for up to `batch_size` rows missing it and returns the updated rows.
///
/// Rows with an empty display name are left alone so repeated batches terminate.
pub async fn backfill_display_name_lower(
	db: &Db,
	batch_size: u32,
	now: OffsetDateTime,
) -> Result<Vec<UserRow>> {
	let sql = format!(
		"\
SELECT {USER_COLUMNS}
FROM users
WHERE (display_name_lower IS NULL OR display_name_lower = '') AND display_name <> ''
ORDER BY created_at ASC
LIMIT $1
FOR UPDATE SKIP LOCKED"
	);
	let mut tx = db.pool.begin().await?;
	let mut rows =
		sqlx::query_as::<_, UserRow>(&sql).bind(i64::from(batch_size)).fetch_all(&mut *tx).await?;

	for row in &mut rows {
		let lower = row.display_name.to_lowercase();

		sqlx::query(
			"\
UPDATE users
SET display_name_lower = $1, updated_at = $2
WHERE uid = $3",
		)
		.bind(lower.as_str())
		.bind(now)
		.bind(row.uid.as_str())
		.execute(&mut *tx)
		.await?;

		row.display_name_lower = Some(lower);
		row.updated_at = now;
	}

	tx.commit().await?;

	Ok(rows)
}
