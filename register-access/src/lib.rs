#![cfg_attr(not(test), no_std)]

pub use device_descriptor::ByteOrder;
use device_descriptor::{ReadOnlyRegister, Register, RegisterWidthType};

const MAX_REGISTER_BYTES: usize = 4;

pub trait RegisterReader: Sized {
    fn read<E>(iface: &mut impl RegisterAccess<Error = E>) -> Result<Self, E>;
}

pub trait RegisterWriter {
    fn write<E>(self, iface: &mut impl RegisterAccess<Error = E>) -> Result<(), E>;
}

impl<T> RegisterReader for T
where
    T: ReadOnlyRegister,
{
    fn read<E>(iface: &mut impl RegisterAccess<Error = E>) -> Result<Self, E> {
        iface.read_register()
    }
}

impl<T: Register> RegisterWriter for T {
    fn write<E>(self, iface: &mut impl RegisterAccess<Error = E>) -> Result<(), E> {
        iface.write_register(self)
    }
}

pub trait RegisterAccess {
    type Error;

    /// Reads `buffer.len()` bytes starting at register `address`.
    fn read_bytes(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error>;

    /// Writes `bytes` starting at register `address`.
    fn write_bytes(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;

    fn read_raw<W>(&mut self, address: u8, order: ByteOrder) -> Result<W, Self::Error>
    where
        W: RegisterWidthType,
    {
        let mut buffer = [0; MAX_REGISTER_BYTES];
        let bytes = &mut buffer[..W::BYTES];

        self.read_bytes(address, bytes)?;

        Ok(W::from_32(order.decode(bytes)))
    }

    fn write_raw<W>(&mut self, address: u8, order: ByteOrder, value: W) -> Result<(), Self::Error>
    where
        W: RegisterWidthType,
    {
        let mut buffer = [0; MAX_REGISTER_BYTES];
        let bytes = &mut buffer[..W::BYTES];

        order.encode(value.to_32(), bytes);

        self.write_bytes(address, bytes)
    }

    fn read_register<R>(&mut self) -> Result<R, Self::Error>
    where
        R: ReadOnlyRegister,
    {
        self.read_raw(R::ADDRESS, R::BYTE_ORDER).map(R::from_bits)
    }

    fn write_register<R>(&mut self, reg: R) -> Result<(), Self::Error>
    where
        R: Register,
    {
        self.write_raw(R::ADDRESS, R::BYTE_ORDER, reg.bits())
    }

    /// Reads the register, applies `f` and writes the result back.
    ///
    /// Nothing is written if the read fails.
    fn modify_register<R>(&mut self, f: impl FnOnce(R) -> R) -> Result<(), Self::Error>
    where
        R: Register,
    {
        let reg = self.read_register::<R>()?;
        self.write_register(reg.modify(f))
    }
}
