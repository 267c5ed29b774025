#![allow(dead_code)]

use battery_fuel::PresetControl;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

pub const DEVICE_ADDR: u8 = 0x36;

pub const VCELL: u8 = 0x02;
pub const SOC: u8 = 0x04;
pub const MODE: u8 = 0x06;
pub const VERSION: u8 = 0x08;
pub const HIBRT: u8 = 0x0A;
pub const CONFIG: u8 = 0x0C;
pub const VALRT_MIN: u8 = 0x14;
pub const VALRT_MAX: u8 = 0x15;
pub const CRATE: u8 = 0x16;
pub const STATUS: u8 = 0x1A;
pub const CMD: u8 = 0xFE;

const RESET_COMMAND: [u8; 2] = [0x54, 0x00];

/// Register file behaving like a freshly powered MAX17048.
pub struct Max17048Sim {
    pub registers: [u8; 256],
    pub present: bool,
    /// Acknowledge the reset command, like a misbehaving part would.
    pub acknowledge_reset: bool,
    pub transactions: usize,
    pub resets: usize,
    pointer: u8,
}

impl Max17048Sim {
    pub fn new() -> Self {
        let mut sim = Self {
            registers: [0; 256],
            present: true,
            acknowledge_reset: false,
            transactions: 0,
            resets: 0,
            pointer: 0,
        };
        sim.power_on();
        sim
    }

    /// Restores the power-on register values. Measurements are kept.
    pub fn power_on(&mut self) {
        self.set_word(VERSION, 0x0012);
        self.set_word(CONFIG, 0x971C);
        self.registers[MODE as usize] = 0x00;
        self.registers[HIBRT as usize] = 0x80;
        self.registers[HIBRT as usize + 1] = 0x30;
        self.registers[VALRT_MIN as usize] = 0x00;
        self.registers[VALRT_MAX as usize] = 0xFF;
        self.registers[0x18] = 0x96;
        self.registers[0x19] = 0x42;
        self.registers[STATUS as usize] = 0x01;
    }

    pub fn word(&self, register: u8) -> u16 {
        let i = register as usize;
        u16::from_be_bytes([self.registers[i], self.registers[i + 1]])
    }

    pub fn set_word(&mut self, register: u8, value: u16) {
        let i = register as usize;
        self.registers[i..i + 2].copy_from_slice(&value.to_be_bytes());
    }

    pub fn byte(&self, register: u8) -> u8 {
        self.registers[register as usize]
    }

    pub fn set_byte(&mut self, register: u8, value: u8) {
        self.registers[register as usize] = value;
    }

    pub fn set_hibernating(&mut self, hibernating: bool) {
        let mode = &mut self.registers[MODE as usize];
        if hibernating {
            *mode |= 0x10;
        } else {
            *mode &= !0x10;
        }
    }

    fn handle_write(&mut self, bytes: &[u8]) -> Result<(), ErrorKind> {
        let Some((&register, data)) = bytes.split_first() else {
            return Ok(());
        };

        if register == CMD && data == RESET_COMMAND {
            self.resets += 1;
            self.power_on();
            return if self.acknowledge_reset {
                Ok(())
            } else {
                Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data))
            };
        }

        self.pointer = register;
        for &byte in data {
            self.registers[self.pointer as usize] = byte;
            self.pointer = self.pointer.wrapping_add(1);
        }

        // Quick start clears itself.
        self.registers[MODE as usize] &= !0x40;

        Ok(())
    }
}

impl ErrorType for Max17048Sim {
    type Error = ErrorKind;
}

impl I2c for Max17048Sim {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.transactions += 1;

        if address != DEVICE_ADDR || !self.present {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        for operation in operations {
            match operation {
                Operation::Write(bytes) => self.handle_write(bytes)?,
                Operation::Read(buffer) => {
                    for byte in buffer.iter_mut() {
                        *byte = self.registers[self.pointer as usize];
                        self.pointer = self.pointer.wrapping_add(1);
                    }
                }
            }
        }

        Ok(())
    }
}

pub struct Presets {
    pub current: u8,
    pub applied: Vec<u8>,
}

impl Presets {
    pub fn new(current: u8) -> Self {
        Self {
            current,
            applied: Vec::new(),
        }
    }
}

impl PresetControl for Presets {
    fn current_preset(&self) -> u8 {
        self.current
    }

    fn apply_preset(&mut self, preset: u8) {
        self.current = preset;
        self.applied.push(preset);
    }
}
