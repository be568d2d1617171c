//! JSON: формат обмена (экспорт и импорт), массив движений с отступом в 2 пробела.

use crate::{
    error::{LedgerError, Result},
    model::Movement,
    traits::WriteFormat,
    validate,
};
use serde_json::Value;
use std::io::Write;

pub struct Json;

impl WriteFormat for Json {
    fn write<W: Write>(mut w: W, ledger: &[Movement]) -> Result<()> {
        serde_json::to_writer_pretty(&mut w, ledger)?;
        w.flush()?;
        Ok(())
    }
}

/// Result of reading an import file.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// `null` or no content at all: the user asks for an empty ledger.
    Empty,
    Ledger(Vec<Movement>),
}

impl Json {
    /// Parses and validates import text. Malformed JSON is [`LedgerError::Parse`],
    /// wrong shape is [`LedgerError::Schema`].
    pub fn parse(text: &str) -> Result<Parsed> {
        let text = text.trim_start_matches('\u{feff}');
        if text.trim().is_empty() {
            return Ok(Parsed::Empty);
        }
        let value: Value = serde_json::from_str(text).map_err(|e| LedgerError::Parse(e.to_string()))?;
        if value.is_null() {
            return Ok(Parsed::Empty);
        }
        validate::parse_ledger(value).map(Parsed::Ledger)
    }
}
