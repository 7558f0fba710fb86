// Monitor config validation, CLI parsing and optional TOML settings

use agent_stats::cli::Cli;
use agent_stats::config::{AppConfig, MonitorConfig};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_interval_of_one_is_accepted() {
    let config = MonitorConfig::new(1, "http://tc", "token", None).expect("valid");
    assert_eq!(config.interval_secs, 1);
    assert_eq!(config.interval(), std::time::Duration::from_secs(1));
}

#[test]
fn test_zero_and_negative_intervals_are_rejected() {
    for interval in [0, -1, -60] {
        let err = MonitorConfig::new(interval, "http://tc", "token", None).unwrap_err();
        assert_eq!(err.kind(), "config");
        assert!(err.is_fatal());
        assert!(err.to_string().contains("positive"));
    }
}

#[test]
fn test_non_integer_interval_is_rejected() {
    for raw in ["abc", "1.5", ""] {
        let err = MonitorConfig::from_args(raw, "http://tc", "token", None).unwrap_err();
        assert_eq!(err.kind(), "config");
        assert!(err.to_string().contains("valid integer"), "{raw:?}");
    }
}

#[test]
fn test_trailing_slash_is_removed() {
    let config = MonitorConfig::new(5, "https://tc.example.com/", "token", None).unwrap();
    assert_eq!(config.server_url, "https://tc.example.com");
}

#[test]
fn test_empty_url_and_token_are_rejected() {
    let err = MonitorConfig::new(5, "", "token", None).unwrap_err();
    assert!(err.to_string().contains("server URL"));
    let err = MonitorConfig::new(5, "http://tc", "", None).unwrap_err();
    assert!(err.to_string().contains("auth token"));
}

#[test]
fn test_auth_header_is_bearer() {
    let config = MonitorConfig::new(5, "http://tc", "s3cr3t", None).unwrap();
    assert_eq!(config.auth_header(), "Bearer s3cr3t");
}

#[test]
fn test_cli_three_arguments() {
    let cli = Cli::try_parse_from(["agent-stats", "10", "http://tc/", "tok"]).unwrap();
    let config = cli.into_config().unwrap();
    assert_eq!(config.interval_secs, 10);
    assert_eq!(config.server_url, "http://tc");
    assert_eq!(config.auth_token, "tok");
    assert_eq!(config.output_file, None);
}

#[test]
fn test_cli_four_arguments() {
    let cli = Cli::try_parse_from(["agent-stats", "10", "http://tc", "tok", "out/stats.csv"]).unwrap();
    let config = cli.into_config().unwrap();
    assert_eq!(config.output_file, Some(PathBuf::from("out/stats.csv")));
}

#[test]
fn test_cli_rejects_wrong_argument_count() {
    assert!(Cli::try_parse_from(["agent-stats", "10", "http://tc"]).is_err());
    assert!(Cli::try_parse_from(["agent-stats", "10", "http://tc", "tok", "f", "extra"]).is_err());
}

#[test]
fn test_cli_negative_interval_reaches_validation() {
    let cli = Cli::try_parse_from(["agent-stats", "-5", "http://tc", "tok"]).unwrap();
    let err = cli.into_config().unwrap_err();
    assert!(err.to_string().contains("positive"));
}

#[test]
fn test_app_config_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.http.request_timeout_secs, 30);
    assert_eq!(config.http.connect_timeout_secs, 10);
    assert!(config.http.user_agent.starts_with("agent-stats/"));
}

#[test]
fn test_app_config_loads_from_str() {
    let config = AppConfig::load_from_str(
        r#"
[http]
request_timeout_secs = 5
connect_timeout_secs = 2
user_agent = "stats-probe"
"#,
    )
    .expect("load_from_str");
    assert_eq!(config.http.request_timeout_secs, 5);
    assert_eq!(config.http.connect_timeout_secs, 2);
    assert_eq!(config.http.user_agent, "stats-probe");
}

#[test]
fn test_app_config_partial_section_uses_defaults() {
    let config = AppConfig::load_from_str("[http]\nrequest_timeout_secs = 7\n").unwrap();
    assert_eq!(config.http.request_timeout_secs, 7);
    assert_eq!(config.http.connect_timeout_secs, 10);

    let empty = AppConfig::load_from_str("").unwrap();
    assert_eq!(empty.http.request_timeout_secs, 30);
}

#[test]
fn test_app_config_rejects_zero_timeouts() {
    let err = AppConfig::load_from_str("[http]\nrequest_timeout_secs = 0\n").unwrap_err();
    assert!(err.to_string().contains("request_timeout_secs"));
    let err = AppConfig::load_from_str("[http]\nconnect_timeout_secs = 0\n").unwrap_err();
    assert!(err.to_string().contains("connect_timeout_secs"));
}

#[test]
fn test_app_config_rejects_empty_user_agent() {
    let err = AppConfig::load_from_str("[http]\nuser_agent = \"\"\n").unwrap_err();
    assert!(err.to_string().contains("user_agent"));
}

#[test]
fn test_app_config_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_app_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("agent-stats.toml");
    std::fs::write(&path, "[http]\nrequest_timeout_secs = 3\n").unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.http.request_timeout_secs, 3);
}
