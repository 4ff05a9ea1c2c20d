pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("FAMRANK_PG_DSN is not a valid Postgres DSN: {source}.")]
	InvalidDsn { source: sqlx::Error },

	#[error("No admin database (postgres or template1) accepted a connection: {source}.")]
	AdminUnreachable { source: sqlx::Error },

	#[error("Failed to create scratch database {name}: {source}.")]
	Create { name: String, source: sqlx::Error },

	#[error("Failed to drop scratch database {name}: {source}.")]
	Drop { name: String, source: sqlx::Error },
}

pub(crate) const DSN_ENV: &str = "FAMRANK_PG_DSN";
