pub mod inst;
pub mod word;
