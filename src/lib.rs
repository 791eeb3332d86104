#![deny(unsafe_code)]
#![no_std]
#![warn(missing_docs)]

//! Register-level driver for the Vishay VCNL4010 proximity and ambient light sensor
//!
//! Every register of the device is described as a set of named bit-fields in
//! [`hw::reg`]. The [`Vcnl4010`] engine reads, writes, diffs and restores
//! those fields over any [`Transport`]; [`I2cTransport`] provides one on top
//! of `embedded-hal`.
//!
//! ```ignore
//! use vcnl4010::{I2cTransport, Vcnl4010, hw::reg::command};
//!
//! let mut sensor = Vcnl4010::new(I2cTransport::default(i2c));
//! sensor.verify_device()?;
//! sensor.write_label(&command::SELFTIMED_EN, "ENABLE")?;
//! sensor.write_label(&command::ALS_EN, "ENABLE")?;
//!
//! // From the interrupt pin handler
//! for flag in sensor.read_flags()?.iter() {
//!     // react to flag.name
//! }
//! ```
//!
//! Sequencing measurements, waiting for them and watching the interrupt pin
//! are left to the caller.

pub mod device;
pub mod hw;
pub mod rutil;
pub mod transport;

// Re-export main types
#[cfg(feature = "async")]
pub use device::AsyncVcnl4010;
pub use device::{Formatted, Reading, Vcnl4010};
pub use hw::reg::{FIELDS, REGISTRY, STATUS_FLAGS};
pub use hw::{FieldSet, Registry};
pub use rutil::{Access, BitField, DescriptorError, Register, ValueTable};
#[cfg(feature = "async")]
pub use transport::AsyncTransport;
pub use transport::{I2cTransport, Transport};

/// VCNL4010 I2C address (fixed)
pub const I2C_ADDRESS: u8 = 0x13;

/// Expected value of the `PRODUCT_ID` field
pub const PRODUCT_ID: u8 = 0x02;

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    Bus(E),
    /// No field of the register map carries the requested name
    UnknownField,
    /// The field's value table has no such label
    UnknownLabel,
    /// Attempt to write a read-only field
    ReadOnly,
    /// Unexpected `PRODUCT_ID` value (contains the actual value read)
    InvalidDevice(u8),
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
