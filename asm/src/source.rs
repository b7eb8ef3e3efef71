use std::{
    fs::File,
    io::{BufRead, BufReader},
};

use crate::error::Error;

/// Everything after this marker is a comment.
pub const COMMENT_MARK: char = '/';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number in the file
    pub no: usize,
    pub text: String,
}

/// A source file reduced to its trimmed, non-empty statements.
#[derive(Debug, Clone)]
pub struct Source {
    pub path: String,
    pub lines: Vec<SourceLine>,
}

impl Source {
    pub fn load(path: &str) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| Error::FileOpen(path.to_string(), e))?;
        let raws = BufReader::new(file)
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| Error::FileRead(path.to_string(), e))?;
        Ok(Self::from_lines(path, raws.iter().map(String::as_str)))
    }

    pub fn parse(path: &str, text: &str) -> Self {
        Self::from_lines(path, text.lines())
    }

    fn from_lines<'a>(path: &str, raws: impl Iterator<Item = &'a str>) -> Self {
        let lines = raws
            .enumerate()
            .filter_map(|(idx, raw)| {
                clean(raw).map(|text| SourceLine {
                    no: idx + 1,
                    text: text.to_string(),
                })
            })
            .collect();
        Source {
            path: path.to_string(),
            lines,
        }
    }

    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    /// (file, line number, text) of a statement, for diagnostics.
    pub fn info(&self, idx: usize) -> (&str, usize, &str) {
        match self.lines.get(idx) {
            Some(line) => (self.path.as_str(), line.no, line.text.as_str()),
            None => (self.path.as_str(), 0, ""),
        }
    }
}

fn clean(raw: &str) -> Option<&str> {
    let code = match raw.split_once(COMMENT_MARK) {
        Some((code, _)) => code,
        None => raw,
    };
    let code = code.trim();
    if code.is_empty() {
        None
    } else {
        Some(code)
    }
}
