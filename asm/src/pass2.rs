//! Pass two: re-walk the source and emit one word per address.

use std::collections::BTreeMap;

use arch::{
    inst::{Encoding, InstTable, Mnemonic},
    word::{addr12, Word},
};
use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    error::Error,
    msg::{Msg, Msgs, Warn},
    pass1::{literal, literal_radix},
    symbol::SymbolTable,
    token::{is_org, Line, INDIRECT_MARK},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub word: Word,
    /// Index of the source line the word came from
    #[serde(skip)]
    pub line: usize,
}

/// Address to word, iterated in ascending address order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MachineCode(BTreeMap<usize, Entry>);

impl MachineCode {
    pub fn new() -> Self {
        MachineCode(BTreeMap::new())
    }

    pub fn insert(&mut self, addr: usize, entry: Entry) -> Option<Entry> {
        self.0.insert(addr, entry)
    }

    pub fn get(&self, addr: usize) -> Option<Word> {
        self.0.get(&addr).map(|e| e.word)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Entry)> {
        self.0.iter().map(|(addr, entry)| (*addr, entry))
    }

    pub fn words(&self) -> impl Iterator<Item = (usize, Word)> + '_ {
        self.iter().map(|(addr, entry)| (addr, entry.word))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug)]
pub struct SecondPass {
    pub code: MachineCode,
    pub msgs: Msgs,
}

enum Action {
    /// The word, with a warning about how it was read
    Emit(Word, Option<Warn>),
    Ignore(Warn),
    Stop,
}

fn translate(table: &InstTable, symbols: &SymbolTable, line: &Line) -> Result<Action, Error> {
    if let Some(name) = line.label {
        // A labeled DEC/HEX line holds its own literal, not an opcode
        if let Some((mnemonic, radix)) = line.mnemonic.and_then(|m| Some((m, literal_radix(m)?))) {
            let text = line
                .operand(0)
                .ok_or_else(|| Error::MissingOperand(mnemonic.to_string()))?;
            return Ok(Action::Emit(literal(text, radix)?, None));
        }
        if let Some(value) = symbols.value(name) {
            return Ok(Action::Emit(value, None));
        }
    }

    let Some(mnemonic) = line.mnemonic else {
        return Err(Error::MissingMnemonic(
            line.label.unwrap_or_default().to_string(),
        ));
    };
    let desc = table
        .lookup(mnemonic)
        .ok_or_else(|| Error::UnknownMnemonic(mnemonic.to_string()))?;

    match desc.encoding {
        Encoding::Memory { direct, indirect } => {
            let name = line
                .operand(0)
                .ok_or_else(|| Error::MissingOperand(mnemonic.to_string()))?;
            let symbol = symbols
                .get(name)
                .ok_or_else(|| Error::UnresolvedSymbol(name.to_string()))?;
            if line.is_indirect() {
                let value = symbol
                    .value
                    .ok_or_else(|| Error::NoStoredValue(name.to_string()))?;
                Ok(Action::Emit(Word::mri(indirect, value.addr()), None))
            } else {
                let addr = addr12(symbol.address)
                    .ok_or_else(|| Error::AddressOutOfRange(name.to_string(), symbol.address))?;
                let mode = line
                    .operand(1)
                    .filter(|mode| *mode != INDIRECT_MARK)
                    .map(|mode| Warn::UnknownAddressingMode(mode.to_string()));
                Ok(Action::Emit(Word::mri(direct, addr), mode))
            }
        }
        Encoding::Fixed(word) => Ok(Action::Emit(word, None)),
        Encoding::Pseudo if desc.mnemonic == Mnemonic::END => Ok(Action::Stop),
        Encoding::Pseudo => Ok(Action::Ignore(Warn::IgnoredDirective(
            mnemonic.to_string(),
        ))),
    }
}

pub fn run<S: AsRef<str>>(
    table: &InstTable,
    symbols: &SymbolTable,
    lines: &[S],
    origin: usize,
) -> SecondPass {
    let skip = match lines.first() {
        Some(first) if is_org(first.as_ref()) => 1,
        _ => 0,
    };
    let mut lc = origin;
    let mut code = MachineCode::new();
    let mut msgs = Msgs::new();

    debug!(origin, "starting pass 2");

    for (idx, raw) in lines.iter().enumerate().skip(skip) {
        let raw = raw.as_ref();
        let action = Line::parse(raw).and_then(|line| translate(table, symbols, &line));
        match action {
            Ok(Action::Emit(word, warn)) => {
                trace!(address = lc, word = %word, raw, "emit");
                code.insert(lc, Entry { word, line: idx });
                if let Some(warn) = warn {
                    msgs.push(idx, Msg::Warn(warn));
                }
            }
            Ok(Action::Ignore(warn)) => msgs.push(idx, Msg::Warn(warn)),
            Ok(Action::Stop) => {
                debug!(address = lc, "reached END");
                break;
            }
            Err(err) => {
                trace!(address = lc, %err, "skip");
                msgs.push(idx, Msg::Error(err));
            }
        }
        lc = lc.saturating_add(1);
    }

    debug!(words = code.len(), "pass 2 done");
    SecondPass { code, msgs }
}
