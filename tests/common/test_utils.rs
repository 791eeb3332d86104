//! Test utilities and helper functions

use crate::common::mock_transport::MockTransport;
use vcnl4010::{REGISTRY, Registry, Vcnl4010};

/// Interrupt status register address
pub const INT_STATUS: u8 = 0x8E;

/// Load the reset value of every field of `registry` into the mock
pub fn load_reset_values(mock: &MockTransport, registry: &Registry) {
    for field in registry.iter() {
        if field.is_word() {
            let current = mock.word_register(field.address);
            mock.set_word_register(field.address, field.insert(current, field.reset));
        } else {
            let current = u16::from(mock.register(field.address));
            mock.set_register(field.address, field.insert(current, field.reset) as u8);
        }
    }
}

/// Create a mock in the device's power-on state
///
/// The interrupt status register clears bits written with 1, like the device.
pub fn create_mock_transport() -> MockTransport {
    let mock = MockTransport::new();
    load_reset_values(&mock, &REGISTRY);
    mock.set_write_one_to_clear(INT_STATUS, 0x0F);
    mock
}

/// Create a mock driver for testing
/// Returns (driver, transport) where transport is a clone that shares state with the driver
pub fn create_mock_driver() -> (Vcnl4010<MockTransport>, MockTransport) {
    let transport = create_mock_transport();
    let transport_clone = transport.clone();
    (Vcnl4010::new(transport), transport_clone)
}
