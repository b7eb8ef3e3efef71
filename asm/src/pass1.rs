//! Pass one: walk the source once, assign addresses and collect labels.

use arch::{
    inst::Mnemonic,
    word::{addr12, Word},
};
use tracing::{debug, trace};

use crate::{
    error::{Aborted, Error, LineError},
    msg::{Msg, Msgs, Warn},
    symbol::{Symbol, SymbolTable},
    token::{fields, has_label, is_org, Line},
};

#[derive(Debug)]
pub struct FirstPass {
    /// Address of the first statement after `ORG` (0 without one)
    pub origin: usize,
    pub symbols: SymbolTable,
    pub msgs: Msgs,
}

/// Starting address given by a leading `ORG <decimal>`, within 12 bits.
pub fn origin<S: AsRef<str>>(lines: &[S]) -> Result<Option<usize>, LineError> {
    let Some(first) = lines.first().map(AsRef::as_ref) else {
        return Ok(None);
    };
    if !is_org(first) {
        return Ok(None);
    }
    let text = fields(first)
        .get(1)
        .copied()
        .ok_or_else(|| LineError::new(0, Error::MissingOperand("ORG".to_string())))?;
    let addr = text.parse::<usize>().map_err(|_| {
        LineError::new(
            0,
            Error::InvalidLiteral(text.to_string(), "a decimal address".to_string()),
        )
    })?;
    match addr12(addr) {
        Some(_) => Ok(Some(addr)),
        None => Err(LineError::new(
            0,
            Error::AddressOutOfRange("ORG".to_string(), addr),
        )),
    }
}

/// Value of a `DEC`/`HEX` operand.
pub fn literal(text: &str, radix: u32) -> Result<Word, Error> {
    let kind = match radix {
        16 => "a hexadecimal literal",
        _ => "a decimal literal",
    };
    let invalid = || Error::InvalidLiteral(text.to_string(), kind.to_string());
    let value = i64::from_str_radix(text, radix).map_err(|_| invalid())?;
    Word::from_signed(value).ok_or_else(invalid)
}

/// Radix of a literal directive: 10 for `DEC`, 16 for `HEX`.
pub fn literal_radix(mnemonic: &str) -> Option<u32> {
    match mnemonic.parse::<Mnemonic>() {
        Ok(Mnemonic::DEC) => Some(10),
        Ok(Mnemonic::HEX) => Some(16),
        _ => None,
    }
}

/// On a fatal error the warnings raised so far travel with it in [`Aborted`].
pub fn run<S: AsRef<str>>(lines: &[S]) -> Result<FirstPass, Aborted> {
    let mut msgs = Msgs::new();
    match collect(lines, &mut msgs) {
        Ok((origin, symbols)) => Ok(FirstPass {
            origin,
            symbols,
            msgs,
        }),
        Err(cause) => Err(Aborted { cause, msgs }),
    }
}

fn collect<S: AsRef<str>>(
    lines: &[S],
    msgs: &mut Msgs,
) -> Result<(usize, SymbolTable), LineError> {
    let org = origin(lines)?;
    let skip = if org.is_some() { 1 } else { 0 };
    let mut lc = org.unwrap_or(0);
    let mut symbols = SymbolTable::new();

    debug!(origin = lc, "starting pass 1");

    for (idx, raw) in lines.iter().enumerate().skip(skip) {
        let raw = raw.as_ref();
        if !has_label(raw) {
            lc += 1;
            continue;
        }

        let line = Line::parse(raw).map_err(|e| LineError::new(idx, e))?;
        let name = line.label.unwrap_or_default();

        let value = match line.mnemonic.and_then(|m| Some((m, literal_radix(m)?))) {
            Some((mnemonic, radix)) => {
                let text = line.operand(0).ok_or_else(|| {
                    LineError::new(idx, Error::MissingOperand(mnemonic.to_string()))
                })?;
                Some(literal(text, radix).map_err(|e| LineError::new(idx, e))?)
            }
            None => None,
        };

        trace!(label = name, address = lc, ?value, "define");
        let symbol = Symbol {
            address: lc,
            value,
            line: idx,
        };
        if let Some(prev) = symbols.insert(name.to_string(), symbol) {
            msgs.push(
                idx,
                Msg::Warn(Warn::RedefinedLabel(name.to_string(), prev.line)),
            );
        }
        lc += 1;
    }

    debug!(symbols = symbols.len(), "pass 1 done");
    Ok((org.unwrap_or(0), symbols))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn org_sets_origin() {
        let pass = run(&["ORG 100", "LDA X", "HLT", "X, DEC 5"]).unwrap();
        assert_eq!(pass.origin, 100);
        let x = pass.symbols.get("X").unwrap();
        assert_eq!(x.address, 102);
        assert_eq!(x.value.unwrap().to_bin(), "0000000000000101");
        assert_eq!(x.line, 3);
    }

    #[test]
    fn no_org_starts_at_zero() {
        let pass = run(&["LDA X", "X, DEC 1"]).unwrap();
        assert_eq!(pass.origin, 0);
        assert_eq!(pass.symbols.address("X"), Some(1));
    }

    #[test]
    fn labels_on_instructions_have_no_value() {
        let pass = run(&["LOOP, ISZ CNT", "BUN LOOP", "CNT, DEC -3"]).unwrap();
        assert_eq!(pass.symbols.address("LOOP"), Some(0));
        assert_eq!(pass.symbols.value("LOOP"), None);
        assert_eq!(pass.symbols.value("CNT"), Some(Word(0xFFFD)));
    }

    #[test]
    fn hex_literals() {
        let pass = run(&["A, HEX 1F", "B, HEX -1", "C, HEX FFFF"]).unwrap();
        assert_eq!(pass.symbols.value("A"), Some(Word(0x001F)));
        assert_eq!(pass.symbols.value("B"), Some(Word(0xFFFF)));
        assert_eq!(pass.symbols.value("C"), Some(Word(0xFFFF)));
    }

    #[test]
    fn invalid_literal_is_fatal() {
        let err = run(&["ORG 0", "HLT", "X, DEC 5Z"]).unwrap_err().cause;
        assert_eq!(err.line, 2);
        assert!(matches!(err.error, Error::InvalidLiteral(ref t, _) if t == "5Z"));

        let err = run(&["X, HEX G"]).unwrap_err().cause;
        assert!(matches!(err.error, Error::InvalidLiteral(..)));

        let err = run(&["X, DEC 70000"]).unwrap_err().cause;
        assert!(matches!(err.error, Error::InvalidLiteral(..)));
    }

    #[test]
    fn missing_literal() {
        let err = run(&["X, DEC"]).unwrap_err().cause;
        assert!(matches!(err.error, Error::MissingOperand(ref m) if m == "DEC"));
    }

    #[test]
    fn bad_org() {
        let err = run(&["ORG"]).unwrap_err().cause;
        assert!(matches!(err.error, Error::MissingOperand(_)));
        let err = run(&["ORG ten"]).unwrap_err().cause;
        assert!(matches!(err.error, Error::InvalidLiteral(..)));
        let err = run(&["ORG -1"]).unwrap_err().cause;
        assert!(matches!(err.error, Error::InvalidLiteral(..)));
    }

    #[test]
    fn org_beyond_memory() {
        let err = run(&["ORG 18446744073709551615", "HLT"]).unwrap_err().cause;
        assert_eq!(err.line, 0);
        assert!(matches!(
            err.error,
            Error::AddressOutOfRange(ref m, _) if m == "ORG"
        ));

        let err = run(&["ORG 4096", "HLT"]).unwrap_err().cause;
        assert!(matches!(err.error, Error::AddressOutOfRange(_, 4096)));

        let pass = run(&["ORG 4095", "X, DEC 1"]).unwrap();
        assert_eq!(pass.symbols.address("X"), Some(4095));
    }

    #[test]
    fn redefinition_warns_and_overwrites() {
        let pass = run(&["X, DEC 1", "HLT", "X, DEC 2"]).unwrap();
        assert_eq!(pass.symbols.len(), 1);
        assert_eq!(pass.symbols.address("X"), Some(2));
        assert_eq!(pass.symbols.value("X"), Some(Word(2)));

        let warns: Vec<_> = pass.msgs.warnings().collect();
        assert_eq!(warns.len(), 1);
        assert_eq!(warns[0].0, 2);
        assert_eq!(warns[0].1, &Warn::RedefinedLabel("X".to_string(), 0));
    }

    #[test]
    fn warnings_survive_fatal_error() {
        let err = run(&["X, DEC 1", "X, DEC 2", "Y, DEC bad"]).unwrap_err();
        assert_eq!(err.cause.line, 2);
        let warns: Vec<_> = err.msgs.warnings().collect();
        assert_eq!(warns, vec![(1, &Warn::RedefinedLabel("X".to_string(), 0))]);
    }

    #[test]
    fn empty_source() {
        let lines: [&str; 0] = [];
        let pass = run(&lines).unwrap();
        assert_eq!(pass.origin, 0);
        assert!(pass.symbols.is_empty());
    }
}
