use redline_config::{Config, Error};

fn parse(raw: &str) -> Config {
	toml::from_str(raw).expect("expected config to parse")
}

#[test]
fn minimal_config_gets_defaults() {
	let cfg = parse("[service]\nlog_level = \"info\"\n");

	assert_eq!(cfg.search.context_window, 40);
	assert_eq!(cfg.limits.max_query_chars, 256);
	assert!(redline_config::validate(&cfg).is_ok());
}

#[test]
fn explicit_values_override_defaults() {
	let cfg = parse(
		"\
[service]
log_level = \"debug\"

[search]
context_window = 12

[limits]
max_query_chars = 64
",
	);

	assert_eq!(cfg.search.context_window, 12);
	assert_eq!(cfg.limits.max_query_chars, 64);
}

#[test]
fn zero_context_window_is_rejected() {
	let cfg = parse("[service]\nlog_level = \"info\"\n\n[search]\ncontext_window = 0\n");
	let err = redline_config::validate(&cfg).expect_err("expected validation error");

	match err {
		Error::Validation { message } => assert!(message.contains("search.context_window")),
		_ => panic!("expected a validation error"),
	}
}

#[test]
fn zero_max_query_chars_is_rejected() {
	let cfg = parse("[service]\nlog_level = \"info\"\n\n[limits]\nmax_query_chars = 0\n");
	let err = redline_config::validate(&cfg).expect_err("expected validation error");

	match err {
		Error::Validation { message } => assert!(message.contains("limits.max_query_chars")),
		_ => panic!("expected a validation error"),
	}
}

#[test]
fn empty_log_level_is_rejected() {
	let cfg = parse("[service]\nlog_level = \"\"\n");
	let err = redline_config::validate(&cfg).expect_err("expected validation error");

	match err {
		Error::Validation { message } => assert!(message.contains("service.log_level")),
		_ => panic!("expected a validation error"),
	}
}
