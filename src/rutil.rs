//! Bit-field descriptors and the declarative register macro
//!
//! Every register of the device is described as a set of [`BitField`]s. A
//! descriptor is plain data: where the field lives, how wide it is, what it
//! holds after reset, whether it may be written and which symbolic values it
//! accepts. The register access engine in [`crate::device`] interprets these
//! descriptors against a [`crate::transport::Transport`].

use core::fmt;
pub use paste::paste;

/// Access rights of a bit-field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    /// The field can only be read
    ReadOnly,
    /// The field can be read and written
    ReadWrite,
}

/// Reasons a bit-field or a register map is rejected at definition time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DescriptorError {
    /// The field has no bits
    EmptyWidth,
    /// `first_bit..=last_bit` is reversed or reaches past bit 15
    BitRange,
    /// A field of at most 8 bits is accessed as a byte and must stay in bits 0..=7
    ByteFieldCrossesByte,
    /// The reset value does not fit in the field
    ResetOutOfRange,
    /// A value table entry does not fit in the field
    TableValueOutOfRange,
    /// Two fields claim the same bit of the same register
    Overlap,
    /// A [`FieldSet`](crate::hw::FieldSet) can track at most 64 fields
    TooManyFields,
    /// The interrupt status fields do not share a single register
    SplitStatusRegister,
}

impl DescriptorError {
    /// Human readable description, also used as the const-evaluation panic message
    pub const fn message(self) -> &'static str {
        match self {
            Self::EmptyWidth => "bit-field has zero width",
            Self::BitRange => "bit-field range must satisfy first_bit <= last_bit <= 15",
            Self::ByteFieldCrossesByte => "bit-field of 8 bits or less must lie within bits 0..=7",
            Self::ResetOutOfRange => "bit-field reset value does not fit in its width",
            Self::TableValueOutOfRange => "bit-field value table entry does not fit in its width",
            Self::Overlap => "two bit-fields overlap within one register",
            Self::TooManyFields => "register map holds more than 64 bit-fields",
            Self::SplitStatusRegister => "interrupt status bit-fields must share one register",
        }
    }
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Symbolic names for the legal values of a bit-field
///
/// Entries keep their declaration order. Several labels may map to the same
/// value, in which case the first declared label is the one reported by
/// [`label`](Self::label).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ValueTable(&'static [(&'static str, u16)]);

impl ValueTable {
    /// A table without entries, used by raw numeric fields
    pub const EMPTY: Self = Self(&[]);

    /// Wrap a list of `(label, value)` pairs
    pub const fn new(entries: &'static [(&'static str, u16)]) -> Self {
        Self(entries)
    }

    /// `true` for raw numeric fields
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of labels
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// First label that maps to `value`
    pub fn label(&self, value: u16) -> Option<&'static str> {
        self.0
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(label, _)| *label)
    }

    /// Value a label maps to
    pub fn value(&self, label: &str) -> Option<u16> {
        self.0.iter().find(|(l, _)| *l == label).map(|(_, v)| *v)
    }

    /// All `(label, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u16)> + use<> {
        let entries = self.0;
        entries.iter().copied()
    }
}

/// Describes one named slice of a device register
///
/// Values are always expressed in the field's own units, i.e. already shifted
/// down by [`offset`](Self::offset). Fields wider than 8 bits live in a
/// two-byte register that the device transfers most significant byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitField {
    /// Unique symbolic name
    pub name: &'static str,
    /// Address of the containing register
    pub address: u8,
    /// Value after a hardware reset
    pub reset: u16,
    /// Number of bits, 1..=16
    pub width: u8,
    /// Position of the least significant bit within the register
    pub offset: u8,
    /// Access rights
    pub access: Access,
    /// Symbolic values, empty for measurement fields
    pub table: ValueTable,
    /// Optional free-text group, e.g. `INT_STATUS`
    pub group: Option<&'static str>,
}

impl BitField {
    /// Define a bit-field covering bits `first_bit..=last_bit` of the register at `address`
    ///
    /// # Panics
    /// Panics if the definition is invalid (see [`DescriptorError`]). Used in a
    /// `const` or `static` initializer this turns into a build error.
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        name: &'static str,
        address: u8,
        reset: u16,
        first_bit: u8,
        last_bit: u8,
        access: Access,
        table: &'static [(&'static str, u16)],
        group: Option<&'static str>,
    ) -> Self {
        let field = Self {
            name,
            address,
            reset,
            width: last_bit.wrapping_sub(first_bit).wrapping_add(1),
            offset: first_bit,
            access,
            table: ValueTable::new(table),
            group,
        };
        match field.check() {
            Ok(()) => field,
            Err(e) => panic!("{}", e.message()),
        }
    }

    /// Validate the descriptor without panicking
    pub const fn check(&self) -> Result<(), DescriptorError> {
        if self.width == 0 {
            return Err(DescriptorError::EmptyWidth);
        }
        if self.offset as u32 + self.width as u32 > 16 {
            return Err(DescriptorError::BitRange);
        }
        if !self.is_word() && self.offset + self.width > 8 {
            return Err(DescriptorError::ByteFieldCrossesByte);
        }
        if self.reset > self.max_value() {
            return Err(DescriptorError::ResetOutOfRange);
        }
        let mut i = 0;
        while i < self.table.0.len() {
            if self.table.0[i].1 > self.max_value() {
                return Err(DescriptorError::TableValueOutOfRange);
            }
            i += 1;
        }
        Ok(())
    }

    /// Largest value the field can hold
    pub const fn max_value(&self) -> u16 {
        if self.width >= 16 {
            u16::MAX
        } else {
            (1 << self.width) - 1
        }
    }

    /// Bits of the register covered by this field
    pub const fn mask(&self) -> u16 {
        self.max_value() << self.offset
    }

    /// `true` if the containing register is two bytes wide
    pub const fn is_word(&self) -> bool {
        self.width > 8
    }

    /// `true` if the field accepts writes
    pub const fn is_writable(&self) -> bool {
        matches!(self.access, Access::ReadWrite)
    }

    /// Isolate this field from a whole register value
    pub const fn extract(&self, register: u16) -> u16 {
        (register & self.mask()) >> self.offset
    }

    /// Replace this field inside a whole register value, leaving other bits untouched
    ///
    /// Bits of `value` beyond the field width are dropped.
    pub const fn insert(&self, register: u16, value: u16) -> u16 {
        (register & !self.mask()) | ((value << self.offset) & self.mask())
    }

    /// Register footprint as `(address, bits)` pairs, one per byte touched
    pub(crate) const fn footprint(&self) -> [(u8, u8); 2] {
        let mask = self.mask();
        if self.is_word() {
            // MSB first on the wire
            [
                (self.address, (mask >> 8) as u8),
                (self.address.wrapping_add(1), mask as u8),
            ]
        } else {
            [(self.address, mask as u8), (self.address, 0)]
        }
    }
}

/// Implemented by the marker type generated for every register
pub trait Register {
    /// The register address
    const ID: u8;

    /// The length of the register in bytes
    const LEN: usize;

    /// The bit-fields of this register, from least significant bit upwards
    const FIELDS: &'static [&'static BitField];
}

/// Generates the bit-field descriptors of a register map
///
/// ```ignore
/// impl_register! {
///     0x80, 1, COMMAND {/// Command register
///         /// Enables self timed measurements
///         SELFTIMED_EN, 0, 0, RW, 0x00, ["DISABLE" => 0, "ENABLE" => 1];
///     }
/// }
/// ```
///
/// Each register becomes a marker type implementing [`Register`] and a
/// lower-case module holding one `const` [`BitField`] per field. A `FIELDS`
/// constant lists every field of the map in declaration order. A trailing
/// identifier after the value table sets the field's group.
#[macro_export]
macro_rules! impl_register {
    (
        $(
            $id:expr,
            $len:expr,
            $name:ident {
            #[$doc:meta]
            $(
                $(#[$field_doc:meta])*
                $field:ident,
                $first_bit:expr,
                $last_bit:expr,
                $rw:tt,
                $reset:expr,
                [$($label:literal => $value:expr),* $(,)?]
                $(, $group:ident)?;
            )*
            }
        )*
    ) => {
        $crate::rutil::paste! {
            $(
                #[$doc]
                #[allow(non_camel_case_types)]
                #[derive(Debug, Clone, Copy, PartialEq, Eq)]
                pub struct $name;

                impl $crate::rutil::Register for $name {
                    const ID:     u8    = $id;
                    const LEN:    usize = $len;
                    const FIELDS: &'static [&'static $crate::rutil::BitField] = &[
                        $(&[<$name:lower>]::$field,)*
                    ];
                }

                #[$doc]
                pub mod [<$name:lower>] {
                    use $crate::rutil::BitField;

                    $(
                        $(#[$field_doc])*
                        pub const $field: BitField = BitField::new(
                            stringify!($field),
                            $id,
                            $reset,
                            $first_bit,
                            $last_bit,
                            $crate::access_mode!($rw),
                            &[$(($label, $value)),*],
                            $crate::field_group!($($group)?),
                        );
                    )*
                }
            )*

            /// Every bit-field of the register map, in register order
            pub const FIELDS: &[&$crate::rutil::BitField] = &[
                $($(&[<$name:lower>]::$field,)*)*
            ];
        }
    }
}

// Helper macro, used internally by `impl_register!`
#[doc(hidden)]
#[macro_export]
macro_rules! access_mode {
    (RO) => {
        $crate::rutil::Access::ReadOnly
    };
    (RW) => {
        $crate::rutil::Access::ReadWrite
    };
}

// Helper macro, used internally by `impl_register!`
#[doc(hidden)]
#[macro_export]
macro_rules! field_group {
    () => {
        None
    };
    ($group:ident) => {
        Some(stringify!($group))
    };
}

/// Decode an integer from little-endian bytes
pub trait FromBytes {
    /// Build the value from `bytes`, least significant byte first
    fn from_bytes(bytes: &[u8]) -> Self;
}

/// Encode an integer as little-endian bytes
pub trait ToBytes {
    /// Byte array holding the encoded value
    type Bytes;
    /// Split the value into bytes, least significant byte first
    fn to_bytes(self) -> Self::Bytes;
}

/// Internal macro used to implement `FromBytes`/`ToBytes`
///
/// Both directions are little-endian, the native order of SMBus word transfers.
macro_rules! impl_bytes {
    ($($ty:ty,)*) => {
        $(
            impl FromBytes for $ty {
                fn from_bytes(bytes: &[u8]) -> Self {
                    let mut val = 0;

                    for (i, &b) in bytes.iter().enumerate() {
                        val |= (b as $ty) << (i * 8);
                    }

                    val
                }
            }

            impl ToBytes for $ty {
                type Bytes = [u8; ::core::mem::size_of::<$ty>()];

                fn to_bytes(self) -> Self::Bytes {
                    let mut bytes = [0; ::core::mem::size_of::<$ty>()];

                    for (i, b) in bytes.iter_mut().enumerate() {
                        let shift = 8 * i;
                        let mask  = 0xff << shift;

                        *b = ((self & mask) >> shift) as u8;
                    }

                    bytes
                }
            }
        )*
    }
}

impl_bytes! {
    u8,
    u16,
}
