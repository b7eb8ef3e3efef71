use color_print::cprintln;
use thiserror::Error;

use crate::{error::Error, source::Source};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warn {
    /// Name and line index of the definition that was replaced.
    #[error("Re-defined label: `{0}`")]
    RedefinedLabel(String, usize),

    #[error("`{0}` has no effect here")]
    IgnoredDirective(String),

    #[error("Unknown addressing mode `{0}`, assembled as direct")]
    UnknownAddressingMode(String),
}

#[derive(Debug)]
pub enum Msg {
    Error(Error),
    Warn(Warn),
    Note(String),
}

impl Msg {
    pub fn is_error(&self) -> bool {
        matches!(self, Msg::Error(_))
    }

    pub fn print(&self, info: (&str, usize, &str)) {
        let (file, line, raw) = info;
        match self {
            Msg::Error(msg) => cprintln!("<red,bold>error</>: {}", msg),
            Msg::Warn(msg) => cprintln!("<yellow,bold>warn</>: {}", msg),
            Msg::Note(msg) => cprintln!("<green,bold>note</>: {}", msg),
        }
        cprintln!("     <blue>--></> <underline>{}:{}</>", file, line);
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", line, raw);
        cprintln!("      <blue>|</>");
    }
}

/// Messages collected during assembly, keyed by source line index.
#[derive(Debug, Default)]
pub struct Msgs(Vec<(usize, Msg)>);

impl Msgs {
    pub fn new() -> Self {
        Msgs(vec![])
    }

    pub fn push(&mut self, line: usize, msg: Msg) {
        self.0.push((line, msg));
    }

    pub fn extend(&mut self, other: Msgs) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &(usize, Msg)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = (usize, &Error)> {
        self.0.iter().filter_map(|(line, msg)| match msg {
            Msg::Error(err) => Some((*line, err)),
            _ => None,
        })
    }

    pub fn warnings(&self) -> impl Iterator<Item = (usize, &Warn)> {
        self.0.iter().filter_map(|(line, msg)| match msg {
            Msg::Warn(warn) => Some((*line, warn)),
            _ => None,
        })
    }

    pub fn has_errors(&self) -> bool {
        self.0.iter().any(|(_, msg)| msg.is_error())
    }

    pub fn print(&self, source: &Source) {
        for (line, msg) in &self.0 {
            msg.print(source.info(*line));
            if let Msg::Warn(Warn::RedefinedLabel(_, prev)) = msg {
                Msg::Note(
                    "Already defined here. The value has been overridden. If this is not intentional, rename one of the labels."
                        .to_string(),
                )
                .print(source.info(*prev));
            }
        }
    }
}
