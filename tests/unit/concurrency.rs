//! Unit tests for sharing one driver between threads

use std::sync::{Arc, Mutex};
use std::thread;

use crate::common::create_mock_driver;
use vcnl4010::hw::reg::ambient_parameter;

#[test]
fn test_shared_driver_keeps_both_updates() {
    let (driver, interface) = create_mock_driver();
    let driver = Arc::new(Mutex::new(driver));

    let averaging = {
        let driver = Arc::clone(&driver);
        thread::spawn(move || {
            for value in 0..=7 {
                let mut driver = driver.lock().unwrap();
                driver
                    .write(&ambient_parameter::AMBIENT_AVERAGING, value)
                    .unwrap();
            }
        })
    };
    let rate = {
        let driver = Arc::clone(&driver);
        thread::spawn(move || {
            for value in 0..=6 {
                let mut driver = driver.lock().unwrap();
                driver
                    .write(&ambient_parameter::AMBIENT_ALS_RATE, value)
                    .unwrap();
            }
        })
    };

    averaging.join().unwrap();
    rate.join().unwrap();

    let mut driver = driver.lock().unwrap();
    assert_eq!(driver.read(&ambient_parameter::AMBIENT_AVERAGING), Ok(7));
    assert_eq!(driver.read(&ambient_parameter::AMBIENT_ALS_RATE), Ok(6));
    assert_eq!(
        driver.read(&ambient_parameter::AMBIENT_AUTO_OFFSET_COMP),
        Ok(1)
    );
    // 0b0110_1111: continuous mode off, rate 6, auto offset on, averaging 7
    assert_eq!(interface.register(0x84), 0x6F);
}

#[test]
fn test_shared_driver_reads_between_writes() {
    let (driver, _interface) = create_mock_driver();
    let driver = Arc::new(Mutex::new(driver));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let driver = Arc::clone(&driver);
            thread::spawn(move || {
                for _ in 0..16 {
                    let mut driver = driver.lock().unwrap();
                    let value = driver.read(&ambient_parameter::AMBIENT_AVERAGING).unwrap();
                    driver
                        .write(&ambient_parameter::AMBIENT_AVERAGING, (value + 1) & 0x07)
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // 64 increments modulo 8 bring the field back to its reset value
    let mut driver = driver.lock().unwrap();
    assert_eq!(driver.read(&ambient_parameter::AMBIENT_AVERAGING), Ok(5));
    assert!(driver.check_default_values().unwrap().is_empty());
}
