//! Журнал движений: чтение и запись всей коллекции под одним ключом.

use crate::{
    error::{LedgerError, Result},
    model::Movement,
    traits::KeyValueStore,
    validate,
};
use serde_json::Value;
use tracing::debug;

pub const LEDGER_KEY: &str = "movimientos";

/// Whole-collection access to the ledger.
///
/// There is no locking: two stores over the same backend that load, mutate
/// and save concurrently resolve as last writer wins.
#[derive(Debug, Clone)]
pub struct LedgerStore<S> {
    kv: S,
}

impl<S: KeyValueStore> LedgerStore<S> {
    pub fn new(kv: S) -> Self {
        LedgerStore { kv }
    }

    /// Absent key or stored `null` is an empty ledger. Anything that is not a
    /// well-formed ledger fails with [`LedgerError::Corrupted`].
    pub fn load(&self) -> Result<Vec<Movement>> {
        let Some(raw) = self.kv.get(LEDGER_KEY)? else {
            debug!("ledger key absent, starting empty");
            return Ok(Vec::new());
        };

        let value: Value = serde_json::from_str(&raw).map_err(|e| corrupted(e.to_string()))?;
        if value.is_null() {
            debug!("ledger key holds null, starting empty");
            return Ok(Vec::new());
        }

        let ledger = validate::parse_ledger(value).map_err(|e| corrupted(e.to_string()))?;
        debug!(records = ledger.len(), "loaded ledger");
        Ok(ledger)
    }

    /// Replaces the stored collection; no merge.
    pub fn save(&self, ledger: &[Movement]) -> Result<()> {
        let raw = serde_json::to_string(ledger)?;
        self.kv.set(LEDGER_KEY, &raw)?;
        debug!(records = ledger.len(), "saved ledger");
        Ok(())
    }
}

fn corrupted(reason: String) -> LedgerError {
    LedgerError::Corrupted {
        key: LEDGER_KEY,
        reason,
    }
}
