use crate::error::Error;

/// Marks the end of a label: `NAME,`
pub const LABEL_MARK: char = ',';

/// Addressing-mode operand selecting indirect addressing.
pub const INDIRECT_MARK: &str = "I";

/// Splits wherever `delim` matches, collapsing runs and dropping leading and
/// trailing delimiters so no token is ever empty.
pub fn tokenize(line: &str, delim: impl Fn(char) -> bool) -> Vec<&str> {
    line.split(delim).filter(|s| !s.is_empty()).collect()
}

/// Fields of a statement: separated by spaces or tabs.
pub fn fields(line: &str) -> Vec<&str> {
    tokenize(line, char::is_whitespace)
}

/// A label comma must come before the end of the first token.
pub fn has_label(line: &str) -> bool {
    match line.find(LABEL_MARK) {
        Some(pos) => !line[..pos].trim().contains(char::is_whitespace),
        None => false,
    }
}

pub fn is_org(line: &str) -> bool {
    fields(line).first() == Some(&"ORG")
}

/// One statement, split into its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    pub label: Option<&'a str>,
    pub mnemonic: Option<&'a str>,
    pub operands: Vec<&'a str>,
}

impl<'a> Line<'a> {
    pub fn parse(raw: &'a str) -> Result<Self, Error> {
        let (label, body) = match raw.split_once(LABEL_MARK) {
            Some((label, body)) if has_label(raw) => {
                let label = label.trim();
                if label.is_empty() {
                    return Err(Error::InvalidLabel(raw.to_string()));
                }
                (Some(label), body)
            }
            _ => (None, raw),
        };

        let mut words = fields(body).into_iter();
        Ok(Line {
            label,
            mnemonic: words.next(),
            operands: words.collect(),
        })
    }

    pub fn operand(&self, idx: usize) -> Option<&'a str> {
        self.operands.get(idx).copied()
    }

    pub fn is_indirect(&self) -> bool {
        self.operand(1) == Some(INDIRECT_MARK)
    }
}
