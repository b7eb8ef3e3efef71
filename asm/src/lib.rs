pub mod error;
pub mod msg;
pub mod output;
pub mod pass1;
pub mod pass2;
pub mod source;
pub mod symbol;
pub mod token;

use arch::inst::InstTable;

use crate::{error::Aborted, msg::Msgs, pass2::MachineCode, symbol::SymbolTable};

#[derive(Debug)]
pub struct Assembly {
    pub origin: usize,
    pub symbols: SymbolTable,
    pub code: MachineCode,
    pub msgs: Msgs,
}

impl Assembly {
    pub fn has_errors(&self) -> bool {
        self.msgs.has_errors()
    }
}

/// Runs both passes over trimmed, non-empty source lines.
///
/// Pass one must succeed before pass two starts: labels may be used before
/// the line that defines them. Errors in pass one abort the assembly and keep
/// the warnings raised before them, errors in pass two are collected per line
/// into [`Assembly::msgs`].
pub fn assemble<S: AsRef<str>>(lines: &[S]) -> Result<Assembly, Aborted> {
    let first = pass1::run(lines)?;
    let second = pass2::run(InstTable::get(), &first.symbols, lines, first.origin);

    let mut msgs = first.msgs;
    msgs.extend(second.msgs);
    Ok(Assembly {
        origin: first.origin,
        symbols: first.symbols,
        code: second.code,
        msgs,
    })
}
