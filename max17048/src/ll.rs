use embedded_hal::i2c::I2c;
use register_access::RegisterAccess;

// Register address plus the widest register.
const MAX_WRITE_LEN: usize = 5;

pub struct Max17048I2cInterface<I> {
    pub i2c: I,
}

impl<I> Max17048I2cInterface<I> {
    pub const DEVICE_ADDR: u8 = 0x36;
}

impl<I> Max17048I2cInterface<I>
where
    I: I2c,
{
    /// Addresses the device without transferring data. Fails if nothing acknowledges.
    pub fn check_presence(&mut self) -> Result<(), I::Error> {
        self.i2c.write(Self::DEVICE_ADDR, &[])
    }
}

impl<I> RegisterAccess for Max17048I2cInterface<I>
where
    I: I2c,
{
    type Error = I::Error;

    fn read_bytes(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.write_read(Self::DEVICE_ADDR, &[address], buffer)
    }

    fn write_bytes(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        debug_assert!(bytes.len() < MAX_WRITE_LEN);

        let mut buffer = [0; MAX_WRITE_LEN];
        buffer[0] = address;
        buffer[1..=bytes.len()].copy_from_slice(bytes);

        self.i2c.write(Self::DEVICE_ADDR, &buffer[..=bytes.len()])
    }
}
