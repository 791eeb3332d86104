//! Register access engine
//!
//! [`Vcnl4010`] interprets [`BitField`] descriptors against a [`Transport`].
//! Every field access reads the whole containing register; writes are
//! read-modify-write so neighbouring fields keep their values.
//!
//! The driver owns its transport and every operation takes `&mut self`, so a
//! complete read-modify-write span can never interleave with another access
//! through the same driver. To share one sensor between tasks or threads,
//! put the whole driver behind a mutex rather than the bare bus.

use core::fmt;

#[cfg(feature = "async")]
use crate::transport::AsyncTransport;
use crate::{
    Error, PRODUCT_ID,
    hw::{FieldSet, Registry, reg},
    rutil::{BitField, Register},
    transport::Transport,
};

/// Value of a field interpreted through its value table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reading {
    /// The first label whose value matches the reading
    Label(&'static str),
    /// Measurement field without a value table
    Raw(u16),
    /// The field has a value table but no label matches the reading
    Unrecognized(u16),
}

impl Reading {
    fn of(field: &BitField, value: u16) -> Self {
        if field.table.is_empty() {
            Self::Raw(value)
        } else {
            field
                .table
                .label(value)
                .map_or(Self::Unrecognized(value), Self::Label)
        }
    }

    /// The matched label, if any
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Label(label) => Some(*label),
            _ => None,
        }
    }
}

/// A field together with its interpreted reading, ready for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Formatted {
    /// The field that was read
    pub field: &'static BitField,
    /// What it read as
    pub reading: Reading,
}

impl fmt::Display for Formatted {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.reading {
            Reading::Label(label) => write!(f, "Bit Field {} is {}", self.field.name, label),
            Reading::Raw(value) => {
                write!(f, "Bit Field {} has value 0x{:04x}", self.field.name, value)
            }
            Reading::Unrecognized(value) => write!(
                f,
                "Bit Field {} has unrecognized value 0x{:04x}",
                self.field.name, value
            ),
        }
    }
}

/// Register value to write back when updating `field` inside `current`
///
/// Other write-1-to-clear flags of the same register are written as 0 so the
/// update cannot acknowledge them.
fn merge(registry: &Registry, field: &BitField, current: u16, value: u16) -> u16 {
    let current = current & !registry.status_mask(field.address);
    field.insert(current, value)
}

/// Driver for the VCNL4010 proximity and ambient light sensor
#[derive(Debug)]
pub struct Vcnl4010<T> {
    transport: T,
    registry: &'static Registry,
}

impl<T> Vcnl4010<T> {
    /// Create a driver for the device register map
    pub fn new(transport: T) -> Self {
        Self::with_registry(transport, &reg::REGISTRY)
    }

    /// Create a driver that works from a custom register map
    pub fn with_registry(transport: T, registry: &'static Registry) -> Self {
        Self {
            transport,
            registry,
        }
    }

    /// The register map this driver works from
    pub fn registry(&self) -> &'static Registry {
        self.registry
    }

    /// Direct access to the transport
    pub fn transport(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the driver and return the transport
    pub fn release(self) -> T {
        self.transport
    }
}

impl<T: Transport> Vcnl4010<T> {
    /// Look up a field of the register map by name
    ///
    /// # Errors
    /// Returns [`Error::UnknownField`] if no field carries that name.
    pub fn field(&self, name: &str) -> Result<&'static BitField, Error<T::Error>> {
        self.registry.by_name(name).ok_or(Error::UnknownField)
    }

    fn get(&mut self, address: u8, word: bool) -> Result<u16, T::Error> {
        if word {
            Ok(self.transport.get_word(address)?.swap_bytes())
        } else {
            Ok(u16::from(self.transport.get_byte(address)?))
        }
    }

    fn put(&mut self, address: u8, word: bool, value: u16) -> Result<(), T::Error> {
        if word {
            self.transport.set_word(address, value.swap_bytes())
        } else {
            // Byte fields never reach past bit 7
            self.transport.set_byte(address, value as u8)
        }
    }

    /// Read the current value of a field
    ///
    /// # Errors
    /// Returns [`Error::Bus`] if the register cannot be read.
    pub fn read(&mut self, field: &BitField) -> Result<u16, Error<T::Error>> {
        let raw = self.get(field.address, field.is_word())?;
        let value = field.extract(raw);

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "read {=str} @ {=u8:#x}: raw {=u16:#x} -> {=u16:#x}",
            field.name,
            field.address,
            raw,
            value
        );

        Ok(value)
    }

    /// Update a field, leaving the rest of its register untouched
    ///
    /// Bits of `value` beyond the field width are dropped. The register is
    /// read, modified and written back; if the write fails after the read
    /// succeeded the device state is unknown.
    ///
    /// # Errors
    /// Returns [`Error::ReadOnly`] for read-only fields and [`Error::Bus`] if
    /// either bus transfer fails.
    pub fn write(&mut self, field: &BitField, value: u16) -> Result<(), Error<T::Error>> {
        if !field.is_writable() {
            return Err(Error::ReadOnly);
        }

        let current = self.get(field.address, field.is_word())?;
        let updated = merge(self.registry, field, current, value);

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "write {=str} @ {=u8:#x}: {=u16:#x} -> {=u16:#x}",
            field.name,
            field.address,
            current,
            updated
        );

        self.put(field.address, field.is_word(), updated)?;
        Ok(())
    }

    /// Write the value a label of the field's value table stands for
    ///
    /// # Errors
    /// Returns [`Error::UnknownLabel`] if the table has no such label, otherwise
    /// as [`write`](Self::write).
    pub fn write_label(&mut self, field: &BitField, label: &str) -> Result<(), Error<T::Error>> {
        let value = field.table.value(label).ok_or(Error::UnknownLabel)?;
        self.write(field, value)
    }

    /// [`read`](Self::read) a field given its name
    ///
    /// # Errors
    /// Returns [`Error::UnknownField`] for unknown names, otherwise as [`read`](Self::read).
    pub fn read_by_name(&mut self, name: &str) -> Result<u16, Error<T::Error>> {
        let field = self.field(name)?;
        self.read(field)
    }

    /// [`write`](Self::write) a field given its name
    ///
    /// # Errors
    /// Returns [`Error::UnknownField`] for unknown names, otherwise as [`write`](Self::write).
    pub fn write_by_name(&mut self, name: &str, value: u16) -> Result<(), Error<T::Error>> {
        let field = self.field(name)?;
        self.write(field, value)
    }

    /// Read a whole register, with two-byte registers in device order
    ///
    /// # Errors
    /// Returns [`Error::Bus`] if the register cannot be read.
    pub fn read_register<R: Register>(&mut self) -> Result<u16, Error<T::Error>> {
        Ok(self.get(R::ID, R::LEN > 1)?)
    }

    /// Check the product ID of the device
    ///
    /// # Errors
    /// Returns [`Error::InvalidDevice`] with the ID read if it is not the
    /// VCNL4010's, or [`Error::Bus`] if the device does not answer.
    pub fn verify_device(&mut self) -> Result<(), Error<T::Error>> {
        let id = self.read(&reg::product_id_revision::PRODUCT_ID)? as u8;
        if id != PRODUCT_ID {
            #[cfg(feature = "defmt")]
            defmt::warn!("unexpected product id {=u8}", id);
            return Err(Error::InvalidDevice(id));
        }
        Ok(())
    }

    /// Collect and acknowledge the interrupt status flags that are set
    ///
    /// Each flag is read and, if set, cleared right away by writing 1 to it.
    /// A flag raised after it was polled stays set until the next call.
    ///
    /// # Errors
    /// Returns [`Error::Bus`] on the first failing transfer; flags cleared
    /// before the failure stay cleared.
    pub fn read_flags(&mut self) -> Result<FieldSet, Error<T::Error>> {
        let flags = self.registry.interrupt_status();
        let mut raised = FieldSet::empty(flags);

        for (index, flag) in flags.iter().enumerate() {
            if self.read(flag)? == 1 {
                raised.insert(index);
                self.write(flag, 1)?;
            }
        }

        #[cfg(feature = "defmt")]
        if !raised.is_empty() {
            defmt::debug!("interrupt flags {}", raised);
        }

        Ok(raised)
    }

    /// Fields whose current value differs from their reset value
    ///
    /// # Errors
    /// Returns [`Error::Bus`] on the first failing read.
    pub fn check_default_values(&mut self) -> Result<FieldSet, Error<T::Error>> {
        let fields = self.registry.fields();
        let mut changed = FieldSet::empty(fields);

        for (index, field) in fields.iter().enumerate() {
            if self.read(field)? != field.reset {
                #[cfg(feature = "defmt")]
                defmt::debug!("{=str} differs from its reset value", field.name);
                changed.insert(index);
            }
        }

        Ok(changed)
    }

    /// Write the reset value to every writable field
    ///
    /// Read-only fields are skipped. Interrupt status flags only return to
    /// their reset value by being acknowledged, so a pending flag is cleared
    /// by writing 1 to it.
    ///
    /// # Errors
    /// Returns [`Error::Bus`] on the first failing transfer; fields before it
    /// have been restored.
    pub fn restore_default_values(&mut self) -> Result<(), Error<T::Error>> {
        for field in self.registry.iter().filter(|field| field.is_writable()) {
            if self.registry.is_status(field) {
                if self.read(field)? != field.reset {
                    self.write(field, 1)?;
                }
            } else {
                self.write(field, field.reset)?;
            }
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("restored reset values");

        Ok(())
    }

    /// Read a field and interpret it through its value table
    ///
    /// A reading without a matching label is reported as
    /// [`Reading::Unrecognized`], not as an error.
    ///
    /// # Errors
    /// Returns [`Error::Bus`] if the register cannot be read.
    pub fn format(&mut self, field: &'static BitField) -> Result<Formatted, Error<T::Error>> {
        let value = self.read(field)?;
        Ok(Formatted {
            field,
            reading: Reading::of(field, value),
        })
    }
}

/// Async driver for the VCNL4010 proximity and ambient light sensor
///
/// Offers the same operations as [`Vcnl4010`] over an [`AsyncTransport`].
#[cfg(feature = "async")]
#[derive(Debug)]
pub struct AsyncVcnl4010<T> {
    transport: T,
    registry: &'static Registry,
}

#[cfg(feature = "async")]
impl<T> AsyncVcnl4010<T> {
    /// Create a driver for the device register map
    pub fn new(transport: T) -> Self {
        Self::with_registry(transport, &reg::REGISTRY)
    }

    /// Create a driver that works from a custom register map
    pub fn with_registry(transport: T, registry: &'static Registry) -> Self {
        Self {
            transport,
            registry,
        }
    }

    /// The register map this driver works from
    pub fn registry(&self) -> &'static Registry {
        self.registry
    }

    /// Direct access to the transport
    pub fn transport(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the driver and return the transport
    pub fn release(self) -> T {
        self.transport
    }
}

#[cfg(feature = "async")]
impl<T: AsyncTransport> AsyncVcnl4010<T> {
    /// Look up a field of the register map by name
    ///
    /// # Errors
    /// Returns [`Error::UnknownField`] if no field carries that name.
    pub fn field(&self, name: &str) -> Result<&'static BitField, Error<T::Error>> {
        self.registry.by_name(name).ok_or(Error::UnknownField)
    }

    async fn get(&mut self, address: u8, word: bool) -> Result<u16, T::Error> {
        if word {
            Ok(self.transport.get_word(address).await?.swap_bytes())
        } else {
            Ok(u16::from(self.transport.get_byte(address).await?))
        }
    }

    async fn put(&mut self, address: u8, word: bool, value: u16) -> Result<(), T::Error> {
        if word {
            self.transport.set_word(address, value.swap_bytes()).await
        } else {
            self.transport.set_byte(address, value as u8).await
        }
    }

    /// Read the current value of a field
    ///
    /// # Errors
    /// Returns [`Error::Bus`] if the register cannot be read.
    pub async fn read(&mut self, field: &BitField) -> Result<u16, Error<T::Error>> {
        let raw = self.get(field.address, field.is_word()).await?;
        let value = field.extract(raw);

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "read {=str} @ {=u8:#x}: raw {=u16:#x} -> {=u16:#x}",
            field.name,
            field.address,
            raw,
            value
        );

        Ok(value)
    }

    /// Update a field, leaving the rest of its register untouched
    ///
    /// # Errors
    /// Returns [`Error::ReadOnly`] for read-only fields and [`Error::Bus`] if
    /// either bus transfer fails.
    pub async fn write(&mut self, field: &BitField, value: u16) -> Result<(), Error<T::Error>> {
        if !field.is_writable() {
            return Err(Error::ReadOnly);
        }

        let current = self.get(field.address, field.is_word()).await?;
        let updated = merge(self.registry, field, current, value);

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "write {=str} @ {=u8:#x}: {=u16:#x} -> {=u16:#x}",
            field.name,
            field.address,
            current,
            updated
        );

        self.put(field.address, field.is_word(), updated).await?;
        Ok(())
    }

    /// Write the value a label of the field's value table stands for
    ///
    /// # Errors
    /// Returns [`Error::UnknownLabel`] if the table has no such label, otherwise
    /// as [`write`](Self::write).
    pub async fn write_label(
        &mut self,
        field: &BitField,
        label: &str,
    ) -> Result<(), Error<T::Error>> {
        let value = field.table.value(label).ok_or(Error::UnknownLabel)?;
        self.write(field, value).await
    }

    /// [`read`](Self::read) a field given its name
    ///
    /// # Errors
    /// Returns [`Error::UnknownField`] for unknown names, otherwise as [`read`](Self::read).
    pub async fn read_by_name(&mut self, name: &str) -> Result<u16, Error<T::Error>> {
        let field = self.field(name)?;
        self.read(field).await
    }

    /// [`write`](Self::write) a field given its name
    ///
    /// # Errors
    /// Returns [`Error::UnknownField`] for unknown names, otherwise as [`write`](Self::write).
    pub async fn write_by_name(&mut self, name: &str, value: u16) -> Result<(), Error<T::Error>> {
        let field = self.field(name)?;
        self.write(field, value).await
    }

    /// Read a whole register, with two-byte registers in device order
    ///
    /// # Errors
    /// Returns [`Error::Bus`] if the register cannot be read.
    pub async fn read_register<R: Register>(&mut self) -> Result<u16, Error<T::Error>> {
        Ok(self.get(R::ID, R::LEN > 1).await?)
    }

    /// Check the product ID of the device
    ///
    /// # Errors
    /// Returns [`Error::InvalidDevice`] with the ID read if it is not the
    /// VCNL4010's, or [`Error::Bus`] if the device does not answer.
    pub async fn verify_device(&mut self) -> Result<(), Error<T::Error>> {
        let id = self.read(&reg::product_id_revision::PRODUCT_ID).await? as u8;
        if id != PRODUCT_ID {
            #[cfg(feature = "defmt")]
            defmt::warn!("unexpected product id {=u8}", id);
            return Err(Error::InvalidDevice(id));
        }
        Ok(())
    }

    /// Collect and acknowledge the interrupt status flags that are set
    ///
    /// # Errors
    /// Returns [`Error::Bus`] on the first failing transfer; flags cleared
    /// before the failure stay cleared.
    pub async fn read_flags(&mut self) -> Result<FieldSet, Error<T::Error>> {
        let flags = self.registry.interrupt_status();
        let mut raised = FieldSet::empty(flags);

        for (index, flag) in flags.iter().enumerate() {
            if self.read(flag).await? == 1 {
                raised.insert(index);
                self.write(flag, 1).await?;
            }
        }

        #[cfg(feature = "defmt")]
        if !raised.is_empty() {
            defmt::debug!("interrupt flags {}", raised);
        }

        Ok(raised)
    }

    /// Fields whose current value differs from their reset value
    ///
    /// # Errors
    /// Returns [`Error::Bus`] on the first failing read.
    pub async fn check_default_values(&mut self) -> Result<FieldSet, Error<T::Error>> {
        let fields = self.registry.fields();
        let mut changed = FieldSet::empty(fields);

        for (index, field) in fields.iter().enumerate() {
            if self.read(field).await? != field.reset {
                #[cfg(feature = "defmt")]
                defmt::debug!("{=str} differs from its reset value", field.name);
                changed.insert(index);
            }
        }

        Ok(changed)
    }

    /// Write the reset value to every writable field
    ///
    /// Pending interrupt status flags are acknowledged.
    ///
    /// # Errors
    /// Returns [`Error::Bus`] on the first failing transfer; fields before it
    /// have been restored.
    pub async fn restore_default_values(&mut self) -> Result<(), Error<T::Error>> {
        for field in self.registry.iter().filter(|field| field.is_writable()) {
            if self.registry.is_status(field) {
                if self.read(field).await? != field.reset {
                    self.write(field, 1).await?;
                }
            } else {
                self.write(field, field.reset).await?;
            }
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("restored reset values");

        Ok(())
    }

    /// Read a field and interpret it through its value table
    ///
    /// # Errors
    /// Returns [`Error::Bus`] if the register cannot be read.
    pub async fn format(&mut self, field: &'static BitField) -> Result<Formatted, Error<T::Error>> {
        let value = self.read(field).await?;
        Ok(Formatted {
            field,
            reading: Reading::of(field, value),
        })
    }
}
