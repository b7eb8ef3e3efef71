use color_print::cformat;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::word::{Opcode, Word};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Category {
    MemoryReference,
    RegisterReference,
    InputOutput,
    Pseudo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, Display)]
pub enum Mnemonic {
    // Memory-reference
    AND,
    ADD,
    LDA,
    STA,
    BUN,
    BSA,
    ISZ,

    // Register-reference
    CLA,
    CLE,
    CMA,
    CME,
    CIR,
    CIL,
    INC,
    SPA,
    SNA,
    SZA,
    SZE,
    HLT,

    // Input-output
    INP,
    OUT,
    SKI,
    SKO,
    ION,
    IOF,

    // Pseudo
    ORG,
    END,
    DEC,
    HEX,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// 4-bit opcode nibbles, followed by a 12-bit address.
    Memory { direct: u8, indirect: u8 },
    /// Complete instruction word, operands are ignored.
    Fixed(Word),
    /// Interpreted by the assembler, never emitted.
    Pseudo,
}

impl Encoding {
    fn memory(op: Opcode) -> Self {
        Encoding::Memory {
            direct: op.nibble(false),
            indirect: op.nibble(true),
        }
    }
}

impl Mnemonic {
    pub fn encoding(self) -> Encoding {
        use Mnemonic::*;
        match self {
            AND => Encoding::memory(Opcode::And),
            ADD => Encoding::memory(Opcode::Add),
            LDA => Encoding::memory(Opcode::Lda),
            STA => Encoding::memory(Opcode::Sta),
            BUN => Encoding::memory(Opcode::Bun),
            BSA => Encoding::memory(Opcode::Bsa),
            ISZ => Encoding::memory(Opcode::Isz),

            CLA => Encoding::Fixed(Word(0x7800)),
            CLE => Encoding::Fixed(Word(0x7400)),
            CMA => Encoding::Fixed(Word(0x7200)),
            CME => Encoding::Fixed(Word(0x7100)),
            CIR => Encoding::Fixed(Word(0x7080)),
            CIL => Encoding::Fixed(Word(0x7040)),
            INC => Encoding::Fixed(Word(0x7020)),
            SPA => Encoding::Fixed(Word(0x7010)),
            SNA => Encoding::Fixed(Word(0x7008)),
            SZA => Encoding::Fixed(Word(0x7004)),
            SZE => Encoding::Fixed(Word(0x7002)),
            HLT => Encoding::Fixed(Word(0x7001)),

            INP => Encoding::Fixed(Word(0xF800)),
            OUT => Encoding::Fixed(Word(0xF400)),
            SKI => Encoding::Fixed(Word(0xF200)),
            SKO => Encoding::Fixed(Word(0xF100)),
            ION => Encoding::Fixed(Word(0xF080)),
            IOF => Encoding::Fixed(Word(0xF040)),

            ORG | END | DEC | HEX => Encoding::Pseudo,
        }
    }

    pub fn category(self) -> Category {
        match self.encoding() {
            Encoding::Memory { .. } => Category::MemoryReference,
            Encoding::Fixed(word) if word.is_indirect() => Category::InputOutput,
            Encoding::Fixed(_) => Category::RegisterReference,
            Encoding::Pseudo => Category::Pseudo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub mnemonic: Mnemonic,
    pub category: Category,
    pub encoding: Encoding,
}

impl Descriptor {
    fn new(mnemonic: Mnemonic) -> Self {
        Descriptor {
            mnemonic,
            category: mnemonic.category(),
            encoding: mnemonic.encoding(),
        }
    }

    pub fn cformat(&self) -> String {
        let name = self.mnemonic.to_string();
        match self.encoding {
            Encoding::Memory { direct, indirect } => cformat!(
                "<red>{:<4}</><blue>{:04b} / {:04b}</>",
                name,
                direct,
                indirect
            ),
            Encoding::Fixed(word) => cformat!("<red>{:<4}</><yellow>{}</>", name, word),
            Encoding::Pseudo => cformat!("<green>{:<4}</>", name),
        }
    }
}

static TABLE: Lazy<InstTable> = Lazy::new(InstTable::build);

/// Mnemonic lookup, built once and shared by both passes.
#[derive(Debug)]
pub struct InstTable(IndexMap<String, Descriptor>);

impl InstTable {
    pub fn get() -> &'static InstTable {
        &TABLE
    }

    fn build() -> Self {
        InstTable(
            Mnemonic::iter()
                .map(|m| (m.to_string(), Descriptor::new(m)))
                .collect(),
        )
    }

    pub fn lookup(&self, mnemonic: &str) -> Option<&Descriptor> {
        self.0.get(mnemonic)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.0.values()
    }
}
