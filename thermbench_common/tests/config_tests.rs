//! Integration tests for `ConsoleConfig` file loading.

use std::io::Write;

use tempfile::NamedTempFile;
use thermbench_common::config::{ConfigError, ConsoleConfig};

#[test]
fn load_full_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
port = "/dev/ttyACM0"
baud_rate = 9600
default_setpoint = 70.0
max_setpoint = 85.0
high_setpoint_threshold = 80.0
warning_threshold = 100.0
critical_threshold = 115.0
warning_timeout_s = 5.0
poll_interval_ms = 100
export_path = "run1.csv"
export_every = 10
"#
    )
    .unwrap();

    let config = ConsoleConfig::load(file.path()).unwrap();
    assert_eq!(config.port, "/dev/ttyACM0");
    assert_eq!(config.default_setpoint, 70.0);
    assert_eq!(config.export_path, "run1.csv");
}

#[test]
fn missing_file_is_io_error() {
    let err = ConsoleConfig::load(std::path::Path::new("/nonexistent/console.toml"));
    assert!(matches!(err, Err(ConfigError::IoError(_))));
}

#[test]
fn invalid_file_reports_validation_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "default_setpoint = 90.0\n").unwrap();

    let err = ConsoleConfig::load(file.path());
    assert!(matches!(err, Err(ConfigError::ValidationError(_))));
}
