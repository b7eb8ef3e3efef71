use std::collections::HashMap;

use arch::word::Word;
use color_print::cformat;
use serde::Serialize;

use crate::{error::Error, pass2::MachineCode, source::Source, symbol::SymbolTable, Assembly};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// `addr: 0101...` per word
    Bin,
    /// `addr: 7001` per word
    Hex,
    /// Symbols and code as YAML
    Yaml,
}

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub origin: usize,
    pub symbols: &'a SymbolTable,
    pub code: &'a MachineCode,
}

impl<'a> Report<'a> {
    pub fn new(asm: &'a Assembly) -> Self {
        Report {
            origin: asm.origin,
            symbols: &asm.symbols,
            code: &asm.code,
        }
    }
}

pub fn render(asm: &Assembly, format: Format) -> Result<String, Error> {
    let line = |f: fn(Word) -> String| {
        asm.code
            .words()
            .map(|(addr, word)| format!("{:>4}: {}\n", addr, f(word)))
            .collect::<String>()
    };
    match format {
        Format::Bin => Ok(line(Word::to_bin)),
        Format::Hex => Ok(line(Word::to_hex)),
        Format::Yaml => Ok(serde_yaml::to_string(&Report::new(asm))?),
    }
}

/// Labels sorted by address.
pub fn symbols_by_address(symbols: &SymbolTable) -> Vec<(&str, usize)> {
    let mut list: Vec<_> = symbols
        .iter()
        .map(|(name, sym)| (name, sym.address))
        .collect();
    list.sort_by_key(|(_, addr)| *addr);
    list
}

pub fn print_symbols(symbols: &SymbolTable) {
    println!("+--------+------+------------------+");
    println!("| label  | addr | value            |");
    println!("+--------+------+------------------+");
    for (name, addr) in symbols_by_address(symbols) {
        let value = symbols
            .value(name)
            .map(|w| w.to_bin())
            .unwrap_or_default();
        println!(
            "| {} | {} | {:<16} |",
            cformat!("<g>{:<6}</>", name),
            cformat!("<c>{:>4}</>", addr),
            value
        );
    }
    println!("+--------+------+------------------+");
}

/// Every source line with the address and word it produced.
pub fn listing(asm: &Assembly, source: &Source) -> Vec<String> {
    let by_line: HashMap<usize, (usize, Word)> = asm
        .code
        .iter()
        .map(|(addr, entry)| (entry.line, (addr, entry.word)))
        .collect();

    let mut rows = vec![];
    let rule = "+------+------+------------------+------------------------------+";
    rows.push(rule.to_string());
    rows.push(format!("| {:<62} |", source.path));
    rows.push(rule.to_string());
    for (idx, line) in source.lines.iter().enumerate() {
        let (addr, word) = match by_line.get(&idx) {
            Some((addr, word)) => (cformat!("<green>{:>4}</>", addr), word.to_bin()),
            None => (" ".repeat(4), " ".repeat(16)),
        };
        let text = if asm.msgs.iter().any(|(l, m)| *l == idx && m.is_error()) {
            cformat!("<r,u>{}</>", line.text)
        } else {
            line.text.clone()
        };
        rows.push(format!("| {:>4} | {} | {} | {}", line.no, addr, word, text));
    }
    rows.push(rule.to_string());
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble;

    #[test]
    fn numeric_order() {
        // 9 < 10 < 100, not "10" < "100" < "9"
        let asm = assemble(&["ORG 9", "CLA", "BUN L", "L, HEX 64"]).unwrap();
        let addrs: Vec<_> = asm.code.words().map(|(a, _)| a).collect();
        assert_eq!(addrs, vec![9, 10, 11]);

        let text = render(&asm, Format::Hex).unwrap();
        assert_eq!(text, "   9: 7800\n  10: 400B\n  11: 0064\n");
    }

    #[test]
    fn binary_rendering() {
        let asm = assemble(&["HLT"]).unwrap();
        assert_eq!(render(&asm, Format::Bin).unwrap(), "   0: 0111000000000001\n");
    }

    #[test]
    fn yaml_report() {
        let asm = assemble(&["ORG 100", "LDA X", "HLT", "X, DEC 5"]).unwrap();
        let yaml = render(&asm, Format::Yaml).unwrap();
        assert!(yaml.contains("origin: 100"));
        assert!(yaml.contains("address: 102"));
        assert!(yaml.contains("0000000000000101"));
        assert!(yaml.contains("0111000000000001"));
        assert!(!yaml.contains("line"));
    }

    #[test]
    fn symbols_sorted() {
        let asm = assemble(&["B, DEC 1", "A, DEC 2"]).unwrap();
        assert_eq!(symbols_by_address(&asm.symbols), vec![("B", 0), ("A", 1)]);
    }

    #[test]
    fn listing_rows() {
        let source = Source::parse("t.asm", "ORG 100\nCLA / clear\nHLT\n");
        let asm = assemble(&source.texts()).unwrap();
        let rows = listing(&asm, &source);
        // rule, path, rule, three lines, rule
        assert_eq!(rows.len(), 7);
        assert!(rows[3].contains("ORG 100"));
        assert!(rows[4].contains("0111100000000000"));
        assert!(rows[5].contains("0111000000000001"));
    }
}
