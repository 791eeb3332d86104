//! Unit tests for the I2C transport

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use vcnl4010::hw::reg::{ambient_result, command, high_threshold};
use vcnl4010::{Error, I2C_ADDRESS, I2cTransport, Transport, Vcnl4010};

/// Simulated I2C bus with a single device that auto-increments its register pointer
struct MockI2c {
    memory: [u8; 256],
    pointer: u8,
    /// (device address, bytes written) for every write
    writes: Vec<(u8, Vec<u8>)>,
    /// Device addresses of every transaction
    addresses: Vec<u8>,
    nack: bool,
}

impl MockI2c {
    fn new() -> Self {
        Self {
            memory: [0; 256],
            pointer: 0,
            writes: Vec::new(),
            addresses: Vec::new(),
            nack: false,
        }
    }
}

impl ErrorType for MockI2c {
    type Error = ErrorKind;
}

impl I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.addresses.push(address);
        if self.nack {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    self.writes.push((address, bytes.to_vec()));
                    if let Some((&register, data)) = bytes.split_first() {
                        self.pointer = register;
                        for &byte in data {
                            self.memory[self.pointer as usize] = byte;
                            self.pointer = self.pointer.wrapping_add(1);
                        }
                    }
                }
                Operation::Read(buffer) => {
                    for byte in buffer.iter_mut() {
                        *byte = self.memory[self.pointer as usize];
                        self.pointer = self.pointer.wrapping_add(1);
                    }
                }
            }
        }
        Ok(())
    }
}

#[test]
fn test_default_address() {
    let transport = I2cTransport::default(MockI2c::new());
    assert_eq!(transport.address(), I2C_ADDRESS);
    assert_eq!(I2C_ADDRESS, 0x13);

    let transport = I2cTransport::new(MockI2c::new(), 0x42);
    assert_eq!(transport.address(), 0x42);
}

#[test]
fn test_byte_access() {
    let mut transport = I2cTransport::default(MockI2c::new());

    transport.set_byte(0x83, 0x14).unwrap();
    assert_eq!(transport.get_byte(0x83).unwrap(), 0x14);

    let i2c = transport.release();
    assert_eq!(i2c.writes[0], (0x13, vec![0x83, 0x14]));
    assert!(i2c.addresses.iter().all(|&a| a == 0x13));
}

#[test]
fn test_word_access_is_little_endian() {
    let mut i2c = MockI2c::new();
    i2c.memory[0x85] = 0x12;
    i2c.memory[0x86] = 0x34;
    let mut transport = I2cTransport::default(i2c);

    assert_eq!(transport.get_word(0x85).unwrap(), 0x3412);

    transport.set_word(0x8C, 0xBBAA).unwrap();
    let i2c = transport.release();
    assert_eq!(i2c.writes.last(), Some(&(0x13, vec![0x8C, 0xAA, 0xBB])));
}

#[test]
fn test_driver_over_i2c_reads_msb_first() {
    let mut i2c = MockI2c::new();
    i2c.memory[0x85] = 0x12;
    i2c.memory[0x86] = 0x34;
    let mut driver = Vcnl4010::new(I2cTransport::default(i2c));

    assert_eq!(driver.read(&ambient_result::AMBIENT_RESULT), Ok(0x1234));
}

#[test]
fn test_driver_over_i2c_writes_msb_first() {
    let mut driver = Vcnl4010::new(I2cTransport::default(MockI2c::new()));

    driver.write(&high_threshold::HIGH_THRES, 0x1234).unwrap();
    driver.write(&command::ALS_EN, 1).unwrap();

    let i2c = driver.release().release();
    assert_eq!(i2c.memory[0x8C], 0x12);
    assert_eq!(i2c.memory[0x8D], 0x34);
    assert_eq!(i2c.memory[0x80], 0x04);
}

#[test]
fn test_nack_is_reported() {
    let mut i2c = MockI2c::new();
    i2c.nack = true;
    let mut driver = Vcnl4010::new(I2cTransport::default(i2c));

    assert_eq!(
        driver.read(&command::ALS_EN),
        Err(Error::Bus(ErrorKind::NoAcknowledge(
            NoAcknowledgeSource::Address
        )))
    );
    assert!(driver.verify_device().is_err());
}

#[test]
fn test_driver_over_borrowed_transport() {
    let mut transport = I2cTransport::default(MockI2c::new());

    {
        let mut driver = Vcnl4010::new(&mut transport);
        driver.write(&command::PROX_EN, 1).unwrap();
    }

    assert_eq!(transport.get_byte(0x80).unwrap(), 0x02);
}
