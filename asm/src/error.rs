use thiserror::Error;

use crate::msg::Msgs;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown mnemonic: `{0}`")]
    UnknownMnemonic(String),

    #[error("`{0}` requires an operand")]
    MissingOperand(String),

    #[error("Label `{0}` is not followed by an instruction")]
    MissingMnemonic(String),

    #[error("Cannot parse `{0}` as {1}")]
    InvalidLiteral(String, String),

    #[error("Invalid label: `{0}`")]
    InvalidLabel(String),

    #[error("Undefined label: `{0}`")]
    UnresolvedSymbol(String),

    #[error("Label `{0}` holds no DEC/HEX value to address indirectly")]
    NoStoredValue(String),

    #[error("Address of `{0}` ({1}) does not fit in 12 bits")]
    AddressOutOfRange(String, usize),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read line: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error("Failed to serialize report")]
    Yaml(#[from] serde_yaml::Error),
}

/// An error pinned to the index of the source line that raised it.
#[derive(Error, Debug)]
#[error("line {}: {error}", .line + 1)]
pub struct LineError {
    pub line: usize,
    pub error: Error,
}

impl LineError {
    pub fn new(line: usize, error: Error) -> Self {
        LineError { line, error }
    }
}

/// A fatal error, along with the diagnostics collected before it.
#[derive(Error, Debug)]
#[error("{cause}")]
pub struct Aborted {
    pub cause: LineError,
    pub msgs: Msgs,
}
