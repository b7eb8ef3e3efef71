use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Serialize, Serializer};
use std::fmt;

/// Address field of a memory-reference instruction (bits 11..0).
pub const ADDR_MASK: u16 = 0x0FFF;

/// Addressing-mode bit of an opcode nibble (bit 15 of the word).
pub const INDIRECT: u8 = 0b1000;

/// Bits 14..12 of an instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Opcode {
    And = 0,
    Add = 1,
    Lda = 2,
    Sta = 3,
    Bun = 4,
    Bsa = 5,
    Isz = 6,
    // Register-reference when I = 0, input-output when I = 1
    Reg = 7,
}

/// One 16-bit memory word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Word(pub u16);

impl Word {
    /// Two's-complement encoding of a signed literal.
    ///
    /// Values in `-32768..=65535` are accepted so that both `DEC -1` and
    /// `HEX FFFF` name the same word. Anything else does not fit in 16 bits.
    pub fn from_signed(value: i64) -> Option<Word> {
        match value {
            0..=0xFFFF => Some(Word(value as u16)),
            -0x8000..=-1 => Some(Word((0x1_0000 + value) as u16)),
            _ => None,
        }
    }

    /// Memory-reference instruction from a 4-bit opcode nibble (I bit included)
    /// and a 12-bit address.
    pub fn mri(nibble: u8, addr: u16) -> Word {
        Word((((nibble & 0xF) as u16) << 12) | (addr & ADDR_MASK))
    }

    pub fn as_signed(self) -> i16 {
        self.0 as i16
    }

    pub fn is_indirect(self) -> bool {
        self.0 & 0x8000 != 0
    }

    pub fn opcode(self) -> Opcode {
        // 3 bits always land in 0..=7
        Opcode::try_from(((self.0 >> 12) & 0x7) as u8).unwrap_or(Opcode::Reg)
    }

    pub fn addr(self) -> u16 {
        self.0 & ADDR_MASK
    }

    pub fn to_bin(self) -> String {
        format!("{:016b}", self.0)
    }

    pub fn to_hex(self) -> String {
        format!("{:04X}", self.0)
    }
}

/// Fits a location counter value into the 12-bit address field.
pub fn addr12(addr: usize) -> Option<u16> {
    if addr <= ADDR_MASK as usize {
        Some(addr as u16)
    } else {
        None
    }
}

impl Opcode {
    pub fn nibble(self, indirect: bool) -> u8 {
        let op: u8 = self.into();
        if indirect {
            op | INDIRECT
        } else {
            op
        }
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016b}", self.0)
    }
}

impl fmt::UpperHex for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

impl fmt::Binary for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(&self.0, f)
    }
}

// Reports carry words the way the assembler prints them
impl Serialize for Word {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_bin())
    }
}
