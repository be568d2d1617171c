//! Счётчик идентификаторов: хранится отдельно от журнала и никогда не уменьшается.

use crate::{
    error::{LedgerError, Result},
    model::Movement,
    traits::KeyValueStore,
};
use serde_json::Value;
use tracing::{debug, warn};

pub const COUNTER_KEY: &str = "ultimoId";

#[derive(Debug, Clone)]
pub struct IdAllocator<S> {
    kv: S,
}

impl<S: KeyValueStore> IdAllocator<S> {
    pub fn new(kv: S) -> Self {
        IdAllocator { kv }
    }

    /// Last issued id, `None` if nothing was ever issued.
    pub fn peek(&self) -> Result<Option<u64>> {
        match self.kv.get(COUNTER_KEY)? {
            None => Ok(None),
            Some(raw) => parse_counter(&raw),
        }
    }

    /// Issues the next id and persists it as the new counter.
    pub fn next_id(&self) -> Result<u64> {
        let id = match self.peek()? {
            None => 1,
            Some(last) => last.checked_add(1).ok_or_else(|| LedgerError::Corrupted {
                key: COUNTER_KEY,
                reason: format!("counter {last} cannot be advanced"),
            })?,
        };
        self.store(id)?;
        debug!(id, "issued id");
        Ok(id)
    }

    /// Raises the counter to at least `floor`; never lowers it.
    pub fn ensure_at_least(&self, floor: u64) -> Result<u64> {
        match self.peek()? {
            Some(cur) if cur >= floor => Ok(cur),
            None if floor == 0 => Ok(0),
            _ => {
                self.store(floor)?;
                debug!(counter = floor, "raised id counter");
                Ok(floor)
            }
        }
    }

    /// Rebuilds the counter from the ledger. Unlike the other calls this
    /// tolerates an unreadable counter, treating it as zero.
    pub fn reseed(&self, ledger: &[Movement]) -> Result<u64> {
        let current = match self.peek() {
            Ok(v) => v.unwrap_or(0),
            Err(LedgerError::Corrupted { reason, .. }) => {
                warn!(%reason, "discarding unreadable id counter");
                0
            }
            Err(e) => return Err(e),
        };
        let max_id = ledger.iter().map(|m| m.id).max().unwrap_or(0);
        let value = current.max(max_id);
        self.store(value)?;
        Ok(value)
    }

    fn store(&self, value: u64) -> Result<()> {
        self.kv.set(COUNTER_KEY, &value.to_string())
    }
}

/// Accepts `7`, `"7"` (JSON-quoted) and `null`.
fn parse_counter(raw: &str) -> Result<Option<u64>> {
    let corrupted = || LedgerError::Corrupted {
        key: COUNTER_KEY,
        reason: format!("not a non-negative integer: {raw:?}"),
    };
    match serde_json::from_str::<Value>(raw.trim()) {
        Ok(Value::Null) => Ok(None),
        Ok(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(corrupted),
        Ok(Value::String(s)) => s.trim().parse::<u64>().map(Some).map_err(|_| corrupted()),
        _ => Err(corrupted()),
    }
}
