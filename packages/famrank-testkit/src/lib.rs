//! Scratch Postgres databases for the FamRank storage tests.
//!
//! Tests call [`TestDatabase::from_env`] and skip themselves when `FAMRANK_PG_DSN` is unset.

mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

use famrank_config::Postgres;

use error::DSN_ENV;

const NAME_PREFIX: &str = "famrank_test_";

/// A uniquely named database created on the server behind `FAMRANK_PG_DSN`. It is dropped by
/// [`TestDatabase::cleanup`], or on drop if the test panicked first.
pub struct TestDatabase {
	name: String,
	dsn: String,
	admin: PgConnectOptions,
	dropped: bool,
}
impl TestDatabase {
	/// `Ok(None)` when `FAMRANK_PG_DSN` is unset.
	pub async fn from_env() -> Result<Option<Self>> {
		match env::var(DSN_ENV) {
			Ok(dsn) => Ok(Some(Self::create(&dsn).await?)),
			Err(_) => Ok(None),
		}
	}

	pub async fn create(server_dsn: &str) -> Result<Self> {
		let server =
			PgConnectOptions::from_str(server_dsn).map_err(|source| Error::InvalidDsn { source })?;
		let (admin, mut conn) = admin_connection(&server).await?;
		let name = scratch_name();

		conn.execute(format!(r#"CREATE DATABASE "{name}""#).as_str())
			.await
			.map_err(|source| Error::Create { name: name.clone(), source })?;

		let dsn = server.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, admin, dropped: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	/// Storage settings pointing at this database.
	pub fn postgres_config(&self, pool_max_conns: u32) -> Postgres {
		Postgres { dsn: self.dsn.clone(), pool_max_conns }
	}

	pub async fn cleanup(mut self) -> Result<()> {
		drop_database(&self.admin, &self.name).await?;

		self.dropped = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		let name = self.name.clone();
		let admin = self.admin.clone();
		// The test runtime may be shutting down, so the drop runs on its own thread.
		let handle = thread::spawn(move || {
			let result = Builder::new_current_thread()
				.enable_all()
				.build()
				.map_err(|err| err.to_string())
				.and_then(|rt| {
					rt.block_on(drop_database(&admin, &name)).map_err(|err| err.to_string())
				});

			if let Err(err) = result {
				eprintln!("Leaked scratch database {name}: {err}");
			}
		});
		let _ = handle.join();
	}
}

fn scratch_name() -> String {
	format!("{NAME_PREFIX}{}", Uuid::new_v4().simple())
}

async fn admin_connection(server: &PgConnectOptions) -> Result<(PgConnectOptions, PgConnection)> {
	let postgres = server.clone().database("postgres");

	match PgConnection::connect_with(&postgres).await {
		Ok(conn) => Ok((postgres, conn)),
		Err(_) => {
			let template = server.clone().database("template1");
			let conn = PgConnection::connect_with(&template)
				.await
				.map_err(|source| Error::AdminUnreachable { source })?;

			Ok((template, conn))
		},
	}
}

async fn drop_database(admin: &PgConnectOptions, name: &str) -> Result<()> {
	let to_error = |source| Error::Drop { name: name.to_string(), source };
	let mut conn = PgConnection::connect_with(admin).await.map_err(to_error)?;

	conn.execute(format!(r#"DROP DATABASE IF EXISTS "{name}" WITH (FORCE)"#).as_str())
		.await
		.map_err(to_error)?;

	Ok(())
}
