//! Register map of the device and the immutable registry built from it

pub mod reg;

use core::fmt;

use crate::rutil::{BitField, DescriptorError};

/// Ordered, immutable catalog of bit-field descriptors
///
/// A registry is built once in a `static` and handed to the engine by
/// reference. [`Registry::new`] validates the whole map, so a `static`
/// registry with overlapping or out-of-range fields fails to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registry {
    fields: &'static [&'static BitField],
    interrupt_status: &'static [&'static BitField],
}

impl Registry {
    /// Build a registry from every field of the map and its write-1-to-clear status flags
    ///
    /// # Panics
    /// Panics if [`Registry::check`] fails.
    pub const fn new(
        fields: &'static [&'static BitField],
        interrupt_status: &'static [&'static BitField],
    ) -> Self {
        match Self::check(fields, interrupt_status) {
            Ok(()) => Self {
                fields,
                interrupt_status,
            },
            Err(e) => panic!("{}", e.message()),
        }
    }

    /// Validate a register map without panicking
    pub const fn check(
        fields: &'static [&'static BitField],
        interrupt_status: &'static [&'static BitField],
    ) -> Result<(), DescriptorError> {
        if fields.len() > FieldSet::CAPACITY || interrupt_status.len() > FieldSet::CAPACITY {
            return Err(DescriptorError::TooManyFields);
        }

        let mut i = 0;
        while i < fields.len() {
            if let Err(e) = fields[i].check() {
                return Err(e);
            }
            let mut j = i + 1;
            while j < fields.len() {
                if overlaps(fields[i], fields[j]) {
                    return Err(DescriptorError::Overlap);
                }
                j += 1;
            }
            i += 1;
        }

        let mut i = 0;
        while i < interrupt_status.len() {
            if let Err(e) = interrupt_status[i].check() {
                return Err(e);
            }
            if interrupt_status[i].address != interrupt_status[0].address {
                return Err(DescriptorError::SplitStatusRegister);
            }
            i += 1;
        }

        Ok(())
    }

    /// All descriptors in register order
    pub const fn fields(&self) -> &'static [&'static BitField] {
        self.fields
    }

    /// The write-1-to-clear interrupt status flags
    pub const fn interrupt_status(&self) -> &'static [&'static BitField] {
        self.interrupt_status
    }

    /// Number of descriptors
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    /// `true` if the registry holds no descriptors
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over all descriptors in register order
    pub fn iter(&self) -> impl Iterator<Item = &'static BitField> + use<> {
        let fields = self.fields;
        fields.iter().copied()
    }

    /// Resolve a symbolic name
    pub fn by_name(&self, name: &str) -> Option<&'static BitField> {
        self.iter().find(|field| field.name == name)
    }

    /// Descriptors carrying the given group tag
    pub fn group<'a>(&self, tag: &'a str) -> impl Iterator<Item = &'static BitField> + use<'a> {
        let fields = self.fields;
        fields
            .iter()
            .copied()
            .filter(move |field| field.group == Some(tag))
    }

    /// Descriptors living in the register at `address`
    pub fn register(&self, address: u8) -> impl Iterator<Item = &'static BitField> + use<> {
        let fields = self.fields;
        fields
            .iter()
            .copied()
            .filter(move |field| field.address == address)
    }

    /// `true` if `field` is one of the write-1-to-clear status flags
    pub fn is_status(&self, field: &BitField) -> bool {
        self.status_mask(field.address) & field.mask() != 0
    }

    /// Bits of the register at `address` that hold write-1-to-clear flags
    pub fn status_mask(&self, address: u8) -> u16 {
        self.interrupt_status
            .iter()
            .filter(|flag| flag.address == address)
            .fold(0, |mask, flag| mask | flag.mask())
    }
}

const fn overlaps(a: &BitField, b: &BitField) -> bool {
    let a = a.footprint();
    let b = b.footprint();
    let mut i = 0;
    while i < a.len() {
        let mut j = 0;
        while j < b.len() {
            if a[i].0 == b[j].0 && a[i].1 & b[j].1 != 0 {
                return true;
            }
            j += 1;
        }
        i += 1;
    }
    false
}

/// A selection of descriptors out of one registry slice
///
/// Returned by the bulk operations of the engine. Iteration follows the order
/// of the underlying slice, which is registry order.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FieldSet {
    fields: &'static [&'static BitField],
    bits: u64,
}

impl FieldSet {
    /// Maximum number of descriptors a set can select from
    pub const CAPACITY: usize = u64::BITS as usize;

    pub(crate) const fn empty(fields: &'static [&'static BitField]) -> Self {
        Self { fields, bits: 0 }
    }

    pub(crate) fn insert(&mut self, index: usize) {
        debug_assert!(index < self.fields.len());
        self.bits |= 1u64 << index;
    }

    /// Number of selected descriptors
    pub const fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// `true` if nothing is selected
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// `true` if a descriptor with this name is selected
    pub fn contains(&self, name: &str) -> bool {
        self.iter().any(|field| field.name == name)
    }

    /// Selected descriptors in registry order
    pub fn iter(&self) -> impl Iterator<Item = &'static BitField> + use<> {
        let (fields, bits) = (self.fields, self.bits);
        fields
            .iter()
            .enumerate()
            .filter(move |(i, _)| bits & (1u64 << *i) != 0)
            .map(|(_, field)| *field)
    }

    /// Names of the selected descriptors in registry order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + use<> {
        self.iter().map(|field| field.name)
    }
}

impl fmt::Debug for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FieldSet {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "[");
        for (i, name) in self.names().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{=str}", name);
        }
        defmt::write!(f, "]");
    }
}
