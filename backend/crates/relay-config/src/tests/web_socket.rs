use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, err, ok};
use serial_test::serial;

// =========================================================================
// Validation Tests - WebSocket
// =========================================================================

#[test]
#[serial]
fn given_timeout_less_than_interval_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _interval = EnvGuard::set("RELAY_WS_HEARTBEAT_INTERVAL_SECS", "60");
    let _timeout = EnvGuard::set("RELAY_WS_HEARTBEAT_TIMEOUT_SECS", "30");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_zero_send_buffer_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _buffer = EnvGuard::set("RELAY_WS_SEND_BUFFER_SIZE", "0");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_send_timeout_over_limit_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _send = EnvGuard::set("RELAY_WS_SEND_TIMEOUT_SECS", "3600");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_tuned_websocket_values_when_validate_then_ok() {
    // Given
    let _temp = setup_config_dir();
    let _buffer = EnvGuard::set("RELAY_WS_SEND_BUFFER_SIZE", "500");
    let _send = EnvGuard::set("RELAY_WS_SEND_TIMEOUT_SECS", "2");
    let _interval = EnvGuard::set("RELAY_WS_HEARTBEAT_INTERVAL_SECS", "10");
    let _timeout = EnvGuard::set("RELAY_WS_HEARTBEAT_TIMEOUT_SECS", "25");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}
