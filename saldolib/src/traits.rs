//! Трэйты на границах: хранилище «ключ → значение» и пользовательский интерфейс.

use crate::{error::Result, model::Movement};
use std::io::Write;

/// Durable key-value storage with whole-value reads and writes.
///
/// A `set` replaces the previous value entirely; readers observe either the
/// old value or the new one, never a mix.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Interactive primitives the workflows need from whatever drives them.
pub trait Ui {
    /// Yes/no question.
    fn confirm(&mut self, message: &str) -> bool;

    /// Message display.
    fn notify(&mut self, message: &str);

    /// Optional text input; `None` means the user cancelled.
    fn prompt(&mut self, message: &str, default: &str) -> Option<String>;

    /// Called after every mutation with the ledger as now stored.
    fn render(&mut self, _ledger: &[Movement]) {}
}

/// Serializes a ledger into an export artifact.
pub trait WriteFormat {
    fn write<W: Write>(w: W, ledger: &[Movement]) -> Result<()>;
}
