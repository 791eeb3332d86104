//! Register transport for the VCNL4010
//!
//! The register access engine only needs byte and word sized get/set
//! operations on a register address. [`Transport`] captures that capability;
//! [`I2cTransport`] provides it over an `embedded-hal` I2C bus using SMBus
//! style transfers.
//!
//! Word transfers are little-endian as seen by the transport, matching SMBus
//! word reads and writes. The device sends its 16-bit registers most
//! significant byte first, so the engine byte-swaps words on both paths.

use crate::I2C_ADDRESS;
#[cfg(any(feature = "blocking", feature = "async"))]
use crate::rutil::{FromBytes, ToBytes};

/// Byte and word access to device registers
pub trait Transport {
    /// Communication error reported by the bus
    type Error;

    /// Read one byte from `register`
    fn get_byte(&mut self, register: u8) -> Result<u8, Self::Error>;

    /// Write one byte to `register`
    fn set_byte(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;

    /// Read two bytes starting at `register`, first byte in the low half
    fn get_word(&mut self, register: u8) -> Result<u16, Self::Error>;

    /// Write two bytes starting at `register`, low half first
    fn set_word(&mut self, register: u8, value: u16) -> Result<(), Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn get_byte(&mut self, register: u8) -> Result<u8, Self::Error> {
        (**self).get_byte(register)
    }

    fn set_byte(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        (**self).set_byte(register, value)
    }

    fn get_word(&mut self, register: u8) -> Result<u16, Self::Error> {
        (**self).get_word(register)
    }

    fn set_word(&mut self, register: u8, value: u16) -> Result<(), Self::Error> {
        (**self).set_word(register, value)
    }
}

/// Async flavour of [`Transport`]
#[cfg(feature = "async")]
#[allow(async_fn_in_trait)]
pub trait AsyncTransport {
    /// Communication error reported by the bus
    type Error;

    /// Read one byte from `register`
    async fn get_byte(&mut self, register: u8) -> Result<u8, Self::Error>;

    /// Write one byte to `register`
    async fn set_byte(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;

    /// Read two bytes starting at `register`, first byte in the low half
    async fn get_word(&mut self, register: u8) -> Result<u16, Self::Error>;

    /// Write two bytes starting at `register`, low half first
    async fn set_word(&mut self, register: u8, value: u16) -> Result<(), Self::Error>;
}

/// I2C transport for the VCNL4010
#[derive(Debug)]
pub struct I2cTransport<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cTransport<I2C> {
    /// Create a new I2C transport with the fixed device address (0x13)
    ///
    /// # Example
    /// ```ignore
    /// let transport = I2cTransport::default(i2c);
    /// let mut sensor = Vcnl4010::new(transport);
    /// ```
    pub const fn default(i2c: I2C) -> Self {
        Self {
            i2c,
            address: I2C_ADDRESS,
        }
    }

    /// Create a new I2C transport with a custom 7-bit device address
    ///
    /// Useful behind address translators or multiplexers. For a directly
    /// connected sensor prefer [`default()`](Self::default).
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// The 7-bit device address used for every transfer
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Consume the transport and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

#[cfg(feature = "blocking")]
impl<I2C, E> Transport for I2cTransport<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;

    fn get_byte(&mut self, register: u8) -> Result<u8, Self::Error> {
        let mut data = [0u8];
        self.i2c.write_read(self.address, &[register], &mut data)?;
        Ok(data[0])
    }

    fn set_byte(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[register, value])
    }

    fn get_word(&mut self, register: u8) -> Result<u16, Self::Error> {
        let mut data = [0u8; 2];
        self.i2c.write_read(self.address, &[register], &mut data)?;
        Ok(u16::from_bytes(&data))
    }

    fn set_word(&mut self, register: u8, value: u16) -> Result<(), Self::Error> {
        let [low, high] = value.to_bytes();
        self.i2c.write(self.address, &[register, low, high])
    }
}

#[cfg(feature = "async")]
impl<I2C, E> AsyncTransport for I2cTransport<I2C>
where
    I2C: embedded_hal_async::i2c::I2c<Error = E>,
{
    type Error = E;

    async fn get_byte(&mut self, register: u8) -> Result<u8, Self::Error> {
        let mut data = [0u8];
        self.i2c
            .write_read(self.address, &[register], &mut data)
            .await?;
        Ok(data[0])
    }

    async fn set_byte(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[register, value]).await
    }

    async fn get_word(&mut self, register: u8) -> Result<u16, Self::Error> {
        let mut data = [0u8; 2];
        self.i2c
            .write_read(self.address, &[register], &mut data)
            .await?;
        Ok(u16::from_bytes(&data))
    }

    async fn set_word(&mut self, register: u8, value: u16) -> Result<(), Self::Error> {
        let [low, high] = value.to_bytes();
        self.i2c.write(self.address, &[register, low, high]).await
    }
}
