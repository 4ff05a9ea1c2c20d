use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use famrank_config::Error;

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_with(section: &str, key: &str, value: Value) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let table = root
		.as_table_mut()
		.and_then(|root| root.get_mut(section))
		.and_then(Value::as_table_mut)
		.expect("Template config must include the requested section.");

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render template config.")
}

fn write_temp_config(payload: &str) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now().duration_since(UNIX_EPOCH).expect("Clock is before epoch.");
	let path = env::temp_dir().join(format!(
		"famrank_config_{}_{}_{}.toml",
		std::process::id(),
		nanos.as_nanos(),
		COUNTER.fetch_add(1, Ordering::Relaxed),
	));

	fs::write(&path, payload).expect("Failed to write temp config.");

	path
}

fn validation_message(err: Error) -> String {
	match err {
		Error::Validation { message } => message,
		other => panic!("Expected a validation error, got {other:?}."),
	}
}

#[test]
fn loads_sample_config_from_disk() {
	let path = write_temp_config(SAMPLE_CONFIG_TEMPLATE_TOML);
	let cfg = famrank_config::load(&path).expect("Sample config must load.");

	fs::remove_file(&path).expect("Failed to remove temp config.");

	assert!(cfg.index.enabled);
	assert_eq!(cfg.index.api_base, "https://search.example.com");
	assert_eq!(cfg.search.debounce_ms, 300);
	assert_eq!(cfg.search.min_search_length, 2);
	assert_eq!(cfg.search.max_results, 10);
	assert_eq!(cfg.storage.postgres.pool_max_conns, 5);
}

#[test]
fn search_section_defaults_when_omitted() {
	let raw = r#"
[service]
http_bind = "127.0.0.1:8080"
admin_bind = "127.0.0.1:8081"

[storage.postgres]
dsn = "postgres://localhost/famrank"
pool_max_conns = 1
"#;
	let cfg = famrank_config::parse(raw).expect("Minimal config must parse.");

	assert_eq!(cfg.service.log_level, "info");
	assert_eq!(cfg.search.debounce_ms, 300);
	assert_eq!(cfg.search.min_search_length, 2);
	assert_eq!(cfg.search.max_results, 10);
	assert_eq!(cfg.search.substring_scan_limit, 25);
	assert_eq!(cfg.search.suggest_limit, 5);
	assert!(!cfg.index.enabled);
	assert!(cfg.security.bind_localhost_only);
}

#[test]
fn blank_api_key_disables_the_index() {
	let raw = sample_with("index", "api_key", Value::String("  ".to_string()));
	let cfg = famrank_config::parse(&raw).expect("Config must parse.");

	assert!(!cfg.index.enabled);
}

#[test]
fn rejects_zero_max_results() {
	let raw = sample_with("search", "max_results", Value::Integer(0));
	let err = famrank_config::parse(&raw).expect_err("Zero max_results must be rejected.");

	assert_eq!(validation_message(err), "search.max_results must be greater than zero.");
}

#[test]
fn rejects_zero_min_search_length() {
	let raw = sample_with("search", "min_search_length", Value::Integer(0));
	let err = famrank_config::parse(&raw).expect_err("Zero min_search_length must be rejected.");

	assert_eq!(validation_message(err), "search.min_search_length must be greater than zero.");
}

#[test]
fn rejects_excessive_debounce() {
	let raw = sample_with("search", "debounce_ms", Value::Integer(60_000));
	let err = famrank_config::parse(&raw).expect_err("Long debounce must be rejected.");

	assert_eq!(validation_message(err), "search.debounce_ms must be 10000 or less.");
}

#[test]
fn rejects_enabled_index_without_api_base() {
	let raw = sample_with("index", "api_base", Value::String(String::new()));
	let err = famrank_config::parse(&raw).expect_err("Missing api_base must be rejected.");

	assert_eq!(
		validation_message(err),
		"index.api_base must be non-empty when the index is enabled."
	);
}

#[test]
fn rejects_relative_index_paths() {
	let raw = sample_with("index", "search_path", Value::String("api/search".to_string()));
	let err = famrank_config::parse(&raw).expect_err("Relative path must be rejected.");

	assert!(validation_message(err).contains("must start with '/'"));
}

#[test]
fn rejects_blank_http_bind() {
	let raw = sample_with("service", "http_bind", Value::String(" ".to_string()));
	let err = famrank_config::parse(&raw).expect_err("Blank bind must be rejected.");

	assert_eq!(validation_message(err), "service.http_bind must be non-empty.");
}

#[test]
fn reports_missing_file() {
	let path = env::temp_dir().join("famrank_config_missing_file.toml");
	let err = famrank_config::load(&path).expect_err("Missing file must fail.");

	assert!(matches!(err, Error::ReadConfig { .. }));
}
