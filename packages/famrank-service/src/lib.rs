pub mod directory;
pub mod fallback;
pub mod reindex;
pub mod search;
pub mod session;

mod error;

pub use directory::{LookupRequest, LookupResponse, Resolved, SuggestRequest, SuggestResponse};
pub use error::{Error, Result};
pub use reindex::{BACKFILL_BATCH_SIZE, ReindexReport, ReindexUserResponse};
pub use search::{SearchRequest, SearchResponse};
pub use session::{SearchEvent, SearchSession, SearchState};

use std::{future::Future, pin::Pin, sync::Arc};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use famrank_config::{Config, Index};
use famrank_domain::UserProfile;
use famrank_providers::index::{self, IndexHit};
use famrank_storage::{db::Db, queries};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The hosted full-text index that normally answers user searches.
pub trait SearchIndex
where
	Self: Send + Sync,
{
	fn health_check<'a>(
		&'a self,
		cfg: &'a Index,
	) -> BoxFuture<'a, famrank_providers::Result<bool>>;

	fn search_users<'a>(
		&'a self,
		cfg: &'a Index,
		query: &'a str,
		limit: u32,
	) -> BoxFuture<'a, famrank_providers::Result<Vec<IndexHit>>>;

	fn upsert_users<'a>(
		&'a self,
		cfg: &'a Index,
		users: &'a [UserProfile],
	) -> BoxFuture<'a, famrank_providers::Result<()>>;
}

/// The user datastore. Name lookups only see rows with `display_name_lower` set.
pub trait UserStore
where
	Self: Send + Sync,
{
	fn get_user<'a>(
		&'a self,
		uid: &'a str,
	) -> BoxFuture<'a, famrank_storage::Result<Option<UserProfile>>>;

	fn users_by_name_prefix<'a>(
		&'a self,
		prefix_lower: &'a str,
		limit: u32,
	) -> BoxFuture<'a, famrank_storage::Result<Vec<UserProfile>>>;

	fn users_ordered_by_name<'a>(
		&'a self,
		limit: u32,
	) -> BoxFuture<'a, famrank_storage::Result<Vec<UserProfile>>>;

	fn users_by_email<'a>(
		&'a self,
		email: &'a str,
		limit: u32,
	) -> BoxFuture<'a, famrank_storage::Result<Vec<UserProfile>>>;

	fn upsert_user<'a>(
		&'a self,
		profile: &'a UserProfile,
	) -> BoxFuture<'a, famrank_storage::Result<()>>;

	fn set_display_name_lower<'a>(
		&'a self,
		uid: &'a str,
		display_name_lower: &'a str,
	) -> BoxFuture<'a, famrank_storage::Result<bool>>;

	fn backfill_display_name_lower<'a>(
		&'a self,
		batch_size: u32,
	) -> BoxFuture<'a, famrank_storage::Result<Vec<UserProfile>>>;
}

/// Which backend produced a set of users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
	Index,
	Datastore,
}

#[derive(Clone)]
pub struct Backends {
	pub index: Arc<dyn SearchIndex>,
	pub store: Arc<dyn UserStore>,
}
impl Backends {
	pub fn new(index: Arc<dyn SearchIndex>, store: Arc<dyn UserStore>) -> Self {
		Self { index, store }
	}

	pub fn postgres(db: Db) -> Self {
		Self { index: Arc::new(HttpSearchIndex), store: Arc::new(PgUserStore::new(db)) }
	}
}

pub struct FamRankService {
	pub cfg: Config,
	pub backends: Backends,
}
impl FamRankService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, backends: Backends::postgres(db) }
	}

	pub fn with_backends(cfg: Config, backends: Backends) -> Self {
		Self { cfg, backends }
	}
}

pub struct HttpSearchIndex;
impl SearchIndex for HttpSearchIndex {
	fn health_check<'a>(
		&'a self,
		cfg: &'a Index,
	) -> BoxFuture<'a, famrank_providers::Result<bool>> {
		Box::pin(index::health_check(cfg))
	}

	fn search_users<'a>(
		&'a self,
		cfg: &'a Index,
		query: &'a str,
		limit: u32,
	) -> BoxFuture<'a, famrank_providers::Result<Vec<IndexHit>>> {
		Box::pin(index::search_users(cfg, query, limit))
	}

	fn upsert_users<'a>(
		&'a self,
		cfg: &'a Index,
		users: &'a [UserProfile],
	) -> BoxFuture<'a, famrank_providers::Result<()>> {
		Box::pin(index::upsert_users(cfg, users))
	}
}

pub struct PgUserStore {
	db: Db,
}
impl PgUserStore {
	pub fn new(db: Db) -> Self {
		Self { db }
	}
}
impl UserStore for PgUserStore {
	fn get_user<'a>(
		&'a self,
		uid: &'a str,
	) -> BoxFuture<'a, famrank_storage::Result<Option<UserProfile>>> {
		Box::pin(async move { Ok(queries::get_user(&self.db, uid).await?.map(UserProfile::from)) })
	}

	fn users_by_name_prefix<'a>(
		&'a self,
		prefix_lower: &'a str,
		limit: u32,
	) -> BoxFuture<'a, famrank_storage::Result<Vec<UserProfile>>> {
		Box::pin(async move {
			let rows = queries::users_by_name_prefix(&self.db, prefix_lower, limit).await?;

			Ok(rows.into_iter().map(UserProfile::from).collect())
		})
	}

	fn users_ordered_by_name<'a>(
		&'a self,
		limit: u32,
	) -> BoxFuture<'a, famrank_storage::Result<Vec<UserProfile>>> {
		Box::pin(async move {
			let rows = queries::users_ordered_by_name(&self.db, limit).await?;

			Ok(rows.into_iter().map(UserProfile::from).collect())
		})
	}

	fn users_by_email<'a>(
		&'a self,
		email: &'a str,
		limit: u32,
	) -> BoxFuture<'a, famrank_storage::Result<Vec<UserProfile>>> {
		Box::pin(async move {
			let rows = queries::users_by_email(&self.db, email, limit).await?;

			Ok(rows.into_iter().map(UserProfile::from).collect())
		})
	}

	fn upsert_user<'a>(
		&'a self,
		profile: &'a UserProfile,
	) -> BoxFuture<'a, famrank_storage::Result<()>> {
		Box::pin(queries::upsert_user(&self.db, profile, OffsetDateTime::now_utc()))
	}

	fn set_display_name_lower<'a>(
		&'a self,
		uid: &'a str,
		display_name_lower: &'a str,
	) -> BoxFuture<'a, famrank_storage::Result<bool>> {
		Box::pin(queries::set_display_name_lower(
			&self.db,
			uid,
			display_name_lower,
			OffsetDateTime::now_utc(),
		))
	}

	fn backfill_display_name_lower<'a>(
		&'a self,
		batch_size: u32,
	) -> BoxFuture<'a, famrank_storage::Result<Vec<UserProfile>>> {
		Box::pin(async move {
			let rows = queries::backfill_display_name_lower(
				&self.db,
				batch_size,
				OffsetDateTime::now_utc(),
			)
			.await?;

			Ok(rows.into_iter().map(UserProfile::from).collect())
		})
	}
}
