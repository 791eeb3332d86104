//! Unit tests for error handling and recovery

use crate::common::{MockError, create_mock_driver};
use vcnl4010::Error;
use vcnl4010::hw::reg::{ambient_result, command, high_threshold, ir_led_current};

#[test]
fn test_read_failure_basic() {
    let (mut driver, interface) = create_mock_driver();

    interface.fail_next_read();

    let result = driver.read(&command::ALS_EN);
    assert_eq!(result, Err(Error::Bus(MockError::Nack)));
}

#[test]
fn test_read_failure_is_not_a_zero_reading() {
    let (mut driver, interface) = create_mock_driver();

    interface.fail_next_read();
    let failed = driver.read(&ambient_result::AMBIENT_RESULT);

    let ok = driver.read(&ambient_result::AMBIENT_RESULT);

    assert!(failed.is_err(), "Read should fail when error is injected");
    assert_eq!(ok, Ok(0));
    assert_ne!(failed, ok);
}

#[test]
fn test_read_failure_recovery() {
    let (mut driver, interface) = create_mock_driver();

    interface.fail_next_read();
    assert!(driver.read(&ir_led_current::IR_LED_CURRENT).is_err());

    // Subsequent read should succeed (error was only for one operation)
    assert_eq!(driver.read(&ir_led_current::IR_LED_CURRENT), Ok(2));
}

#[test]
fn test_write_failure_during_read_step() {
    let (mut driver, interface) = create_mock_driver();
    interface.clear_operations();

    interface.fail_next_read();

    let result = driver.write(&command::PROX_EN, 1);
    assert_eq!(result, Err(Error::Bus(MockError::Nack)));

    // Nothing was written
    assert!(interface.byte_writes().is_empty());
    assert_eq!(interface.register(0x80), 0x80);
}

#[test]
fn test_write_failure_during_write_step() {
    let (mut driver, interface) = create_mock_driver();

    interface.fail_next_write();

    let result = driver.write(&high_threshold::HIGH_THRES, 0x0100);
    assert_eq!(result, Err(Error::Bus(MockError::Nack)));
    assert_eq!(interface.word_register(0x8C), 0xFFFF);

    // No automatic retry: the next write goes through on its own
    driver.write(&high_threshold::HIGH_THRES, 0x0100).unwrap();
    assert_eq!(interface.word_register(0x8C), 0x0100);
}

#[test]
fn test_multiple_read_failures() {
    let (mut driver, interface) = create_mock_driver();

    for i in 0..3 {
        interface.fail_next_read();
        let result = driver.read(&command::CONFIG_LOCK);
        assert!(
            result.is_err(),
            "Read {} should fail when error is injected",
            i
        );
    }

    assert_eq!(driver.read(&command::CONFIG_LOCK), Ok(1));
}

#[test]
fn test_format_failure() {
    let (mut driver, interface) = create_mock_driver();

    interface.fail_next_read();

    assert_eq!(
        driver.format(&command::ALS_EN),
        Err(Error::Bus(MockError::Nack))
    );
}

#[test]
fn test_verify_device_failure() {
    let (mut driver, interface) = create_mock_driver();

    interface.fail_next_read();

    assert_eq!(driver.verify_device(), Err(Error::Bus(MockError::Nack)));
}

#[test]
fn test_unknown_field_name() {
    let (driver, _interface) = create_mock_driver();

    assert_eq!(driver.field("ALS_EN"), Ok(&command::ALS_EN));
    assert_eq!(driver.field("als_en"), Err(Error::UnknownField));
}
