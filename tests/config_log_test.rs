use dogstatsd_validator::config::get_config;
use dogstatsd_validator::config::log_level::LogLevel;
use dogstatsd_validator::logger;
use std::path::Path;

mod common;

use common::Capture;

#[test]
fn test_invalid_log_level_fallback_is_logged() {
    let capture = Capture::default();
    let writer = capture.clone();

    figment::Jail::expect_with(|jail| {
        jail.clear_env();
        jail.set_env("DD_LOG_LEVEL", "chatty");
        let config = tracing::subscriber::with_default(
            logger::subscriber(LogLevel::default(), move || writer.clone()),
            || get_config(Path::new("")),
        )
        .expect("should parse config");
        assert_eq!(config.log_level, LogLevel::Warn);
        Ok(())
    });

    let logs = capture.contents();
    assert!(
        logs.contains("DD_DOGSTATSD | ERROR | Invalid log level: 'chatty'"),
        "{logs}"
    );
}

#[test]
fn test_non_string_log_level_fallback_is_logged() {
    let capture = Capture::default();
    let writer = capture.clone();

    figment::Jail::expect_with(|jail| {
        jail.clear_env();
        jail.create_file("datadog.yaml", "log_level: 3")?;
        let config = tracing::subscriber::with_default(
            logger::subscriber(LogLevel::default(), move || writer.clone()),
            || get_config(Path::new("")),
        )
        .expect("should parse config");
        assert_eq!(config.log_level, LogLevel::Warn);
        Ok(())
    });

    let logs = capture.contents();
    assert!(
        logs.contains("DD_DOGSTATSD | ERROR | Expected a string for log level"),
        "{logs}"
    );
}
