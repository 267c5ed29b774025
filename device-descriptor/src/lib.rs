#![cfg_attr(not(test), no_std)]

use core::marker::PhantomData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ByteOrder {
    MsbFirst,
    LsbFirst,
}

impl ByteOrder {
    /// Assembles a register value from its bus representation.
    ///
    /// ```rust
    /// # use device_descriptor::ByteOrder;
    /// assert_eq!(ByteOrder::MsbFirst.decode(&[0x12, 0x34]), 0x1234);
    /// assert_eq!(ByteOrder::LsbFirst.decode(&[0x12, 0x34]), 0x3412);
    /// ```
    pub fn decode(self, bytes: &[u8]) -> u32 {
        let accumulate = |acc: u32, byte: &u8| (acc << 8) | *byte as u32;
        match self {
            ByteOrder::MsbFirst => bytes.iter().fold(0, accumulate),
            ByteOrder::LsbFirst => bytes.iter().rev().fold(0, accumulate),
        }
    }

    /// Splits a register value into its bus representation.
    ///
    /// ```rust
    /// # use device_descriptor::ByteOrder;
    /// let mut bytes = [0; 2];
    /// ByteOrder::MsbFirst.encode(0x5400, &mut bytes);
    /// assert_eq!(bytes, [0x54, 0x00]);
    /// ByteOrder::LsbFirst.encode(0x5400, &mut bytes);
    /// assert_eq!(bytes, [0x00, 0x54]);
    /// ```
    pub fn encode(self, value: u32, bytes: &mut [u8]) {
        let len = bytes.len();
        for (i, byte) in bytes.iter_mut().enumerate() {
            let shift = match self {
                ByteOrder::MsbFirst => (len - 1 - i) * 8,
                ByteOrder::LsbFirst => i * 8,
            };
            *byte = (value >> shift) as u8;
        }
    }
}

pub trait RegisterWidthType: Copy {
    const WIDTH: u8;
    const BYTES: usize = Self::WIDTH as usize / 8;

    fn from_32(data: u32) -> Self;
    fn to_32(self) -> u32;
}

impl RegisterWidthType for u8 {
    const WIDTH: u8 = 8;

    fn from_32(data: u32) -> Self {
        debug_assert!(data <= u8::MAX as u32);
        data as u8
    }

    fn to_32(self) -> u32 {
        self as u32
    }
}
impl RegisterWidthType for u16 {
    const WIDTH: u8 = 16;

    fn from_32(data: u32) -> Self {
        debug_assert!(data <= u16::MAX as u32);
        data as u16
    }

    fn to_32(self) -> u32 {
        self as u32
    }
}

pub trait Proxy: Copy {
    type RegisterWidth: RegisterWidthType;

    fn bits(&self) -> Self::RegisterWidth;
    fn from_bits(bits: Self::RegisterWidth) -> Self;
}

pub trait ReadOnlyRegister: Proxy {
    const ADDRESS: u8;
    const NAME: &'static str;
    const BYTE_ORDER: ByteOrder = ByteOrder::MsbFirst;
}

pub trait Register: ReadOnlyRegister {
    const DEFAULT_VALUE: Self::RegisterWidth;

    #[inline(always)]
    fn new(f: impl FnOnce(Self) -> Self) -> Self {
        f(Self::from_bits(Self::DEFAULT_VALUE))
    }

    #[inline(always)]
    fn modify(self, f: impl FnOnce(Self) -> Self) -> Self {
        f(self)
    }
}

/// Values that can be stored in a bit field.
pub trait FieldType: Sized {
    fn from_field_bits(bits: u32) -> Self;
    fn into_field_bits(self) -> u32;
}

impl FieldType for bool {
    fn from_field_bits(bits: u32) -> Self {
        bits != 0
    }

    fn into_field_bits(self) -> u32 {
        self as u32
    }
}

impl FieldType for u8 {
    fn from_field_bits(bits: u32) -> Self {
        bits as u8
    }

    fn into_field_bits(self) -> u32 {
        self as u32
    }
}

impl FieldType for u16 {
    fn from_field_bits(bits: u32) -> Self {
        bits as u16
    }

    fn into_field_bits(self) -> u32 {
        self as u32
    }
}

pub struct Field<const POS: u8, const WIDTH: u8, DataType, P> {
    _marker: PhantomData<DataType>,
    reg: P,
}

impl<const POS: u8, const WIDTH: u8, DataType, P> Field<POS, WIDTH, DataType, P>
where
    DataType: FieldType,
    P: Proxy,
{
    const _CONST_CHECK: () =
        assert!(WIDTH > 0 && POS + WIDTH <= <P::RegisterWidth as RegisterWidthType>::WIDTH);

    const MASK: u32 = (1 << WIDTH as u32) - 1;

    #[inline(always)]
    pub const fn new(reg: P) -> Self {
        let () = Self::_CONST_CHECK;

        Field {
            _marker: PhantomData,
            reg,
        }
    }

    #[inline(always)]
    pub fn read_field_bits(&self) -> u32 {
        (self.reg.bits().to_32() >> POS as u32) & Self::MASK
    }

    #[inline(always)]
    pub fn read(&self) -> DataType {
        DataType::from_field_bits(self.read_field_bits())
    }

    #[inline(always)]
    fn write_field(data: u32, value: u32) -> u32 {
        // make sure value fits into field
        debug_assert!(value <= Self::MASK);

        let shifted_mask = Self::MASK << POS as u32;
        let masked_field = data & !shifted_mask;

        masked_field | ((value & Self::MASK) << POS as u32)
    }

    #[inline(always)]
    #[must_use]
    pub fn write(self, value: DataType) -> P {
        let bits = self.reg.bits().to_32();

        P::from_bits(<P::RegisterWidth as RegisterWidthType>::from_32(
            Self::write_field(bits, value.into_field_bits()),
        ))
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! field_width {
    ($pos:literal) => {
        1
    };
    ($pos:literal, $end:literal) => {
        $end - $pos
    };
}

#[macro_export]
macro_rules! impl_fields {
    ($reg:ident {}) => {};

    ($reg:ident {
        $( $(#[$field_meta:meta])* $field:ident @ $pos:literal $(.. $end:literal)? => $type:ty ),+ $(,)?
    }) => {
        impl $reg {
            $(
                $(#[$field_meta])*
                #[inline(always)]
                #[allow(non_snake_case)]
                pub fn $field(self) -> $crate::Field<$pos, { $crate::field_width!($pos $(, $end)?) }, $type, Self> {
                    $crate::Field::new(self)
                }
            )+
        }
    };
}

#[macro_export]
macro_rules! register {
    ($(#[$meta:meta])* $reg:ident ($rwt:ident @ $addr:literal, default = $default:literal) {
        $($fields:tt)*
    }) => {
        $crate::register!($(#[$meta])* $reg($rwt @ $addr) { $($fields)* });

        impl $crate::Register for $reg {
            const DEFAULT_VALUE: $rwt = $default;
        }

        impl Default for $reg {
            #[inline(always)]
            fn default() -> Self {
                <Self as $crate::Proxy>::from_bits($default)
            }
        }
    };

    ($(#[$meta:meta])* $reg:ident ($rwt:ident @ $addr:literal) {
        $($fields:tt)*
    }) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq)]
        #[must_use]
        #[allow(non_camel_case_types)]
        pub struct $reg {
            value: $rwt,
        }

        impl $crate::Proxy for $reg {
            type RegisterWidth = $rwt;

            #[inline(always)]
            fn from_bits(bits: $rwt) -> Self {
                Self { value: bits }
            }

            #[inline(always)]
            fn bits(&self) -> $rwt {
                self.value
            }
        }

        impl $crate::ReadOnlyRegister for $reg {
            const ADDRESS: u8 = $addr;
            const NAME: &'static str = stringify!($reg);
        }

        $crate::impl_fields!($reg { $($fields)* });
    };
}

#[macro_export]
macro_rules! device {
    (
        $( $(#[$meta:meta])* $reg:ident $proto:tt {
            $($fields:tt)*
        } )+
    ) => {
        $(
            $crate::register!($(#[$meta])* $reg $proto { $($fields)* });
        )+
    };
}
