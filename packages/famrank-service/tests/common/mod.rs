#![allow(dead_code)]

use std::{
	sync::{
		Arc, Mutex,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};

use famrank_config::{Config, Index, Postgres, Search, Security, Service, Storage};
use famrank_domain::UserProfile;
use famrank_providers::index::IndexHit;
use famrank_service::{Backends, BoxFuture, FamRankService, SearchIndex, UserStore};
use famrank_storage::queries::PREFIX_RANGE_SENTINEL;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Health {
	Healthy,
	Unhealthy,
	Unreachable,
}

pub struct FakeIndex {
	pub health: Health,
	pub hits: Vec<IndexHit>,
	pub fail_search: bool,
	pub health_calls: AtomicUsize,
	pub search_calls: AtomicUsize,
	pub upserted: Mutex<Vec<UserProfile>>,
}
impl FakeIndex {
	pub fn new(health: Health, hits: Vec<IndexHit>) -> Self {
		Self {
			health,
			hits,
			fail_search: false,
			health_calls: AtomicUsize::new(0),
			search_calls: AtomicUsize::new(0),
			upserted: Mutex::new(Vec::new()),
		}
	}

	pub fn failing_search() -> Self {
		Self { fail_search: true, ..Self::new(Health::Healthy, Vec::new()) }
	}

	pub fn health_calls(&self) -> usize {
		self.health_calls.load(Ordering::SeqCst)
	}

	pub fn search_calls(&self) -> usize {
		self.search_calls.load(Ordering::SeqCst)
	}

	pub fn upserted(&self) -> Vec<UserProfile> {
		self.upserted.lock().expect("Upsert log poisoned.").clone()
	}
}
impl SearchIndex for FakeIndex {
	fn health_check<'a>(
		&'a self,
		_cfg: &'a Index,
	) -> BoxFuture<'a, famrank_providers::Result<bool>> {
		self.health_calls.fetch_add(1, Ordering::SeqCst);

		let health = self.health;

		Box::pin(async move {
			match health {
				Health::Healthy => Ok(true),
				Health::Unhealthy => Ok(false),
				Health::Unreachable => Err(famrank_providers::Error::InvalidResponse {
					message: "connection refused".to_string(),
				}),
			}
		})
	}

	fn search_users<'a>(
		&'a self,
		_cfg: &'a Index,
		_query: &'a str,
		limit: u32,
	) -> BoxFuture<'a, famrank_providers::Result<Vec<IndexHit>>> {
		self.search_calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			if self.fail_search {
				return Err(famrank_providers::Error::InvalidResponse {
					message: "index returned 500".to_string(),
				});
			}

			Ok(self.hits.iter().take(limit as usize).cloned().collect())
		})
	}

	fn upsert_users<'a>(
		&'a self,
		_cfg: &'a Index,
		users: &'a [UserProfile],
	) -> BoxFuture<'a, famrank_providers::Result<()>> {
		Box::pin(async move {
			self.upserted.lock().expect("Upsert log poisoned.").extend(users.iter().cloned());

			Ok(())
		})
	}
}

/// In-memory datastore with the same visibility rules as the Postgres queries.
#[derive(Default)]
pub struct MemoryStore {
	pub users: Mutex<Vec<UserProfile>>,
	pub fail: bool,
	pub delay: Duration,
	pub calls: AtomicUsize,
	pub prefix_queries: Mutex<Vec<String>>,
	pub scan_calls: AtomicUsize,
}
impl MemoryStore {
	pub fn with_users(users: Vec<UserProfile>) -> Self {
		Self { users: Mutex::new(users), ..Self::default() }
	}

	pub fn failing() -> Self {
		Self { fail: true, ..Self::default() }
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn scan_calls(&self) -> usize {
		self.scan_calls.load(Ordering::SeqCst)
	}

	pub fn prefix_queries(&self) -> Vec<String> {
		self.prefix_queries.lock().expect("Query log poisoned.").clone()
	}

	pub fn user(&self, uid: &str) -> Option<UserProfile> {
		self.users.lock().expect("Store poisoned.").iter().find(|user| user.uid == uid).cloned()
	}

	fn check(&self) -> famrank_storage::Result<()> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		if self.fail {
			return Err(famrank_storage::Error::Sqlx(sqlx::Error::PoolTimedOut));
		}

		Ok(())
	}

	fn indexed_sorted(&self) -> Vec<UserProfile> {
		let mut users = self
			.users
			.lock()
			.expect("Store poisoned.")
			.iter()
			.filter(|user| user.display_name_lower.as_deref().is_some_and(|v| !v.is_empty()))
			.cloned()
			.collect::<Vec<_>>();

		users.sort_by(|a, b| a.display_name_lower.cmp(&b.display_name_lower));

		users
	}
}
impl UserStore for MemoryStore {
	fn get_user<'a>(
		&'a self,
		uid: &'a str,
	) -> BoxFuture<'a, famrank_storage::Result<Option<UserProfile>>> {
		Box::pin(async move {
			self.check()?;

			Ok(self.user(uid))
		})
	}

	fn users_by_name_prefix<'a>(
		&'a self,
		prefix_lower: &'a str,
		limit: u32,
	) -> BoxFuture<'a, famrank_storage::Result<Vec<UserProfile>>> {
		Box::pin(async move {
			self.check()?;
			self.prefix_queries.lock().expect("Query log poisoned.").push(prefix_lower.to_string());

			if !self.delay.is_zero() {
				tokio::time::sleep(self.delay).await;
			}

			let upper = format!("{prefix_lower}{PREFIX_RANGE_SENTINEL}");

			Ok(self
				.indexed_sorted()
				.into_iter()
				.filter(|user| {
					let lower = user.display_name_lower.as_deref().unwrap_or_default();

					lower >= prefix_lower && lower < upper.as_str()
				})
				.take(limit as usize)
				.collect())
		})
	}

	fn users_ordered_by_name<'a>(
		&'a self,
		limit: u32,
	) -> BoxFuture<'a, famrank_storage::Result<Vec<UserProfile>>> {
		Box::pin(async move {
			self.check()?;
			self.scan_calls.fetch_add(1, Ordering::SeqCst);

			Ok(self.indexed_sorted().into_iter().take(limit as usize).collect())
		})
	}

	fn users_by_email<'a>(
		&'a self,
		email: &'a str,
		limit: u32,
	) -> BoxFuture<'a, famrank_storage::Result<Vec<UserProfile>>> {
		Box::pin(async move {
			self.check()?;

			// Later inserts count as newer.
			Ok(self
				.users
				.lock()
				.expect("Store poisoned.")
				.iter()
				.rev()
				.filter(|user| user.email.as_deref() == Some(email))
				.take(limit as usize)
				.cloned()
				.collect())
		})
	}

	fn upsert_user<'a>(
		&'a self,
		profile: &'a UserProfile,
	) -> BoxFuture<'a, famrank_storage::Result<()>> {
		Box::pin(async move {
			self.check()?;

			let mut users = self.users.lock().expect("Store poisoned.");

			match users.iter_mut().find(|user| user.uid == profile.uid) {
				Some(user) => *user = profile.clone(),
				None => users.push(profile.clone()),
			}

			Ok(())
		})
	}

	fn set_display_name_lower<'a>(
		&'a self,
		uid: &'a str,
		display_name_lower: &'a str,
	) -> BoxFuture<'a, famrank_storage::Result<bool>> {
		Box::pin(async move {
			self.check()?;

			let mut users = self.users.lock().expect("Store poisoned.");
			let Some(user) = users.iter_mut().find(|user| user.uid == uid) else {
				return Ok(false);
			};

			if user.display_name_lower.as_deref().is_some_and(|v| !v.is_empty()) {
				return Ok(false);
			}

			user.display_name_lower = Some(display_name_lower.to_string());

			Ok(true)
		})
	}

	fn backfill_display_name_lower<'a>(
		&'a self,
		batch_size: u32,
	) -> BoxFuture<'a, famrank_storage::Result<Vec<UserProfile>>> {
		Box::pin(async move {
			self.check()?;

			let mut users = self.users.lock().expect("Store poisoned.");
			let mut touched = Vec::new();

			for user in users.iter_mut() {
				if touched.len() == batch_size as usize {
					break;
				}
				if user.display_name.is_empty()
					|| user.display_name_lower.as_deref().is_some_and(|v| !v.is_empty())
				{
					continue;
				}

				user.display_name_lower = Some(user.display_name.to_lowercase());

				touched.push(user.clone());
			}

			Ok(touched)
		})
	}
}

pub fn test_config(index_enabled: bool) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			admin_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage {
			postgres: Postgres {
				dsn: "postgres://postgres@127.0.0.1/famrank".to_string(),
				pool_max_conns: 1,
			},
		},
		index: Index {
			enabled: index_enabled,
			api_base: "http://index.invalid".to_string(),
			api_key: "test-key".to_string(),
			..Index::default()
		},
		search: Search::default(),
		security: Security::default(),
	}
}

/// A profile that is visible to datastore name lookups.
pub fn user(uid: &str, name: &str) -> UserProfile {
	let mut profile = UserProfile::new(uid, name);

	profile.display_name_lower = Some(name.to_lowercase());

	profile
}

pub fn hit(profile: UserProfile) -> IndexHit {
	IndexHit { id: profile.uid.clone(), score: None, content: profile }
}

pub fn service(
	index_enabled: bool,
	index: Arc<FakeIndex>,
	store: Arc<MemoryStore>,
) -> FamRankService {
	FamRankService::with_backends(test_config(index_enabled), Backends::new(index, store))
}

pub fn names(users: &[UserProfile]) -> Vec<&str> {
	users.iter().map(|user| user.display_name.as_str()).collect()
}
