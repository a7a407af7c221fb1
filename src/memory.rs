use std::io;

use crate::error::{Fault, LoadError};

// NB. addresses are u16 as on the chip-8 itself; lengths are usize to stop
//     endless casting

/// how much RAM we have
pub const MEM_SIZE: usize = 4096;

/// where programs are loaded
pub const PROGRAM_ADDR: u16 = 0x200;

/// where the hex font lives; Fx29 computes glyph offsets from zero
pub const FONT_ADDR: u16 = 0x000;

/// bytes per font glyph
pub const GLYPH_LEN: u16 = 5;

/// call stack capacity, in return addresses
pub const STACK_DEPTH: usize = 16;

/// The machine's 4K of RAM. Everything below 0x200 belongs to the
/// interpreter (font glyphs at the bottom); programs own the rest. Every
/// accessor is bounds-checked and reports a `Fault` instead of panicking,
/// because a stray address is a halt reason, not a crash.
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes: Box<[u8]> = Box::new([0u8; MEM_SIZE]);
        let font = FONT_ADDR as usize;
        bytes[font..font + CHIP8_FONT.len()].copy_from_slice(&CHIP8_FONT);
        Memory { bytes }
    }

    /// start index for a span of `len` bytes at `addr`, or a fault
    fn span(&self, addr: u16, len: usize) -> Result<usize, Fault> {
        let start = addr as usize;
        if start + len > MEM_SIZE {
            return Err(Fault::InvalidMemoryAccess { addr });
        }
        Ok(start)
    }

    pub fn read(&self, addr: u16, len: usize) -> Result<&[u8], Fault> {
        let start = self.span(addr, len)?;
        Ok(&self.bytes[start..start + len])
    }

    pub fn write(&mut self, addr: u16, data: &[u8]) -> Result<(), Fault> {
        let start = self.span(addr, data.len())?;
        self.bytes[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    pub fn read_byte(&self, addr: u16) -> Result<u8, Fault> {
        Ok(self.read(addr, 1)?[0])
    }

    pub fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), Fault> {
        self.write(addr, &[value])
    }

    /// get a two-byte word, big-endian (instruction fetch)
    pub fn read_word(&self, addr: u16) -> Result<u16, Fault> {
        let word = self.read(addr, 2)?;
        Ok(((word[0] as u16) << 8) + word[1] as u16)
    }

    /// load a program image at `PROGRAM_ADDR`, returning the last loaded
    /// address. the image must leave the final RAM byte free
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<u16, LoadError> {
        let mut image = Vec::new();
        reader.read_to_end(&mut image)?;
        if image.is_empty() {
            return Err(LoadError::Empty);
        }
        let base = PROGRAM_ADDR as usize;
        if base + image.len() >= MEM_SIZE {
            return Err(LoadError::TooLarge {
                size: image.len(),
                base: PROGRAM_ADDR,
            });
        }
        self.bytes[base..base + image.len()].copy_from_slice(&image);
        Ok(PROGRAM_ADDR + image.len() as u16 - 1)
    }
}

/// Return-address stack, fixed at `STACK_DEPTH` frames. Push/pop report
/// full/empty outcomes and leave the fault construction to the caller,
/// which knows the violating instruction address.
pub struct CallStack {
    frames: [u16; STACK_DEPTH],
    depth: usize,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack {
            frames: [0; STACK_DEPTH],
            depth: 0,
        }
    }

    /// push a return address; false when every frame is in use
    pub fn push(&mut self, addr: u16) -> bool {
        if self.depth == STACK_DEPTH {
            return false;
        }
        self.frames[self.depth] = addr;
        self.depth += 1;
        true
    }

    pub fn pop(&mut self) -> Option<u16> {
        if self.depth == 0 {
            return None;
        }
        self.depth -= 1;
        Some(self.frames[self.depth])
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
