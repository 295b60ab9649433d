use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use wikisearch_config::Error;

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

fn write_temp_config(contents: &str) -> PathBuf {
	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("Clock before epoch.")
		.as_nanos();
	let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
	let path = env::temp_dir().join(format!("wikisearch_config_{nanos}_{counter}.toml"));

	fs::write(&path, contents).expect("Failed to write temp config.");

	path
}

fn sample_value() -> Value {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.")
}

fn with_entry(mut value: Value, table: &str, key: &str, entry: Value) -> String {
	let root = value.as_table_mut().expect("Template config must be a table.");
	let target = root
		.get_mut(table)
		.and_then(Value::as_table_mut)
		.unwrap_or_else(|| panic!("Template config must include [{table}]."));

	target.insert(key.to_string(), entry);

	toml::to_string(&value).expect("Failed to render template config.")
}

fn load(contents: &str) -> Result<wikisearch_config::Config, Error> {
	let path = write_temp_config(contents);
	let result = wikisearch_config::load(&path);

	fs::remove_file(&path).ok();

	result
}

#[test]
fn template_config_loads() {
	let cfg = load(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Template config must validate.");

	assert_eq!(cfg.sphinx.index, "wiki");
	assert_eq!(cfg.weights.title, 100);
	assert_eq!(cfg.search.per_page, 20);
}

#[test]
fn defaults_fill_optional_sections() {
	let minimal = "\
[service]
log_level = \"info\"

[sphinx]

[store]
dsn = \"mysql://localhost/wiki\"
pool_max_conns = 2
";
	let cfg = load(minimal).expect("Minimal config must validate.");

	assert_eq!(cfg.sphinx.port, 9306);
	assert_eq!(cfg.weights.body, 1);
	assert_eq!(cfg.excerpts.limit, 200);
	assert_eq!(cfg.search.display_pages, 30);
}

#[test]
fn rejects_zero_per_page() {
	let contents = with_entry(sample_value(), "search", "per_page", Value::Integer(0));

	assert!(matches!(load(&contents), Err(Error::Validation { .. })));
}

#[test]
fn rejects_zero_port_without_socket() {
	let contents = with_entry(sample_value(), "sphinx", "port", Value::Integer(0));

	assert!(matches!(load(&contents), Err(Error::Validation { .. })));
}

#[test]
fn socket_endpoint_allows_zero_port() {
	let with_socket = with_entry(
		sample_value(),
		"sphinx",
		"socket",
		Value::String("/run/searchd/searchd.sock".to_string()),
	);
	let value: Value = toml::from_str(&with_socket).expect("Rendered config must parse.");
	let contents = with_entry(value, "sphinx", "port", Value::Integer(0));

	load(&contents).expect("Socket endpoint must not require a port.");
}

#[test]
fn empty_socket_string_is_normalized_away() {
	let contents = with_entry(sample_value(), "sphinx", "socket", Value::String(String::new()));
	let cfg = load(&contents).expect("Empty socket must normalize to None.");

	assert!(cfg.sphinx.socket.is_none());
}

#[test]
fn rejects_non_identifier_index() {
	let contents =
		with_entry(sample_value(), "sphinx", "index", Value::String("wiki; DROP".to_string()));

	assert!(matches!(load(&contents), Err(Error::Validation { .. })));
}

#[test]
fn rejects_all_zero_weights() {
	let mut value = sample_value();
	let root = value.as_table_mut().expect("Template config must be a table.");
	let weights = root
		.get_mut("weights")
		.and_then(Value::as_table_mut)
		.expect("Template config must include [weights].");

	weights.insert("title".to_string(), Value::Integer(0));
	weights.insert("body".to_string(), Value::Integer(0));
	weights.insert("category".to_string(), Value::Integer(0));

	let contents = toml::to_string(&value).expect("Failed to render template config.");

	assert!(matches!(load(&contents), Err(Error::Validation { .. })));
}

#[test]
fn rejects_max_limit_below_per_page() {
	let contents = with_entry(sample_value(), "search", "max_limit", Value::Integer(5));

	assert!(matches!(load(&contents), Err(Error::Validation { .. })));
}

#[test]
fn rejects_non_positive_recency_half_life() {
	let contents =
		with_entry(sample_value(), "ranking", "recency_half_life_days", Value::Float(0.0));

	assert!(matches!(load(&contents), Err(Error::Validation { .. })));
}
