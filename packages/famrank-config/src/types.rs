use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub index: Index,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// External full-text index holding user profile documents.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Index {
	pub enabled: bool,
	pub api_base: String,
	pub api_key: String,
	pub health_path: String,
	pub search_path: String,
	pub upsert_path: String,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}
impl Default for Index {
	fn default() -> Self {
		Self {
			enabled: false,
			api_base: String::new(),
			api_key: String::new(),
			health_path: "/api/search".to_string(),
			search_path: "/api/search".to_string(),
			upsert_path: "/api/search/upsert".to_string(),
			timeout_ms: 5_000,
			default_headers: Map::new(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Search {
	pub debounce_ms: u64,
	pub min_search_length: u32,
	pub max_results: u32,
	/// Rows scanned by the substring supplement of the datastore fallback.
	pub substring_scan_limit: u32,
	pub suggest_limit: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			debounce_ms: 300,
			min_search_length: 2,
			max_results: 10,
			substring_scan_limit: 25,
			suggest_limit: 5,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Security {
	pub bind_localhost_only: bool,
}
impl Default for Security {
	fn default() -> Self {
		Self { bind_localhost_only: true }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}
