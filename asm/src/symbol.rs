use arch::word::Word;
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub address: usize,
    /// Literal of a `DEC`/`HEX` declaration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Word>,
    #[serde(skip)]
    pub line: usize,
}

/// Labels in definition order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolTable(IndexMap<String, Symbol>);

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable(IndexMap::new())
    }

    /// Last definition wins; the replaced one is handed back.
    pub fn insert(&mut self, name: String, symbol: Symbol) -> Option<Symbol> {
        self.0.insert(name, symbol)
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.0.get(name)
    }

    pub fn address(&self, name: &str) -> Option<usize> {
        self.0.get(name).map(|sym| sym.address)
    }

    pub fn value(&self, name: &str) -> Option<Word> {
        self.0.get(name).and_then(|sym| sym.value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.0.iter().map(|(name, sym)| (name.as_str(), sym))
    }
}
