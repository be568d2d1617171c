//! Операции над журналом: создать, прочитать, изменить, удалить.
//!
//! Каждая операция целиком читает коллекцию, меняет её в памяти и целиком
//! записывает обратно.

use crate::{
    error::{LedgerError, Result},
    ids::IdAllocator,
    model::{Movement, MovementInput},
    store::LedgerStore,
    traits::KeyValueStore,
};
use tracing::{info, warn};

pub struct Ledger<S> {
    store: LedgerStore<S>,
    ids: IdAllocator<S>,
}

impl<S: KeyValueStore + Clone> Ledger<S> {
    pub fn new(kv: S) -> Self {
        Ledger {
            store: LedgerStore::new(kv.clone()),
            ids: IdAllocator::new(kv),
        }
    }
}

impl<S: KeyValueStore> Ledger<S> {
    pub fn store(&self) -> &LedgerStore<S> {
        &self.store
    }

    /// Appends a new movement with a fresh id and returns it.
    pub fn create(&self, input: MovementInput) -> Result<Movement> {
        let mut ledger = self.store.load()?;
        let id = self.ids.next_id()?;
        let movement = Movement::new(id, input);
        ledger.push(movement.clone());
        self.store.save(&ledger)?;
        info!(id, "created movement");
        Ok(movement)
    }

    pub fn list(&self) -> Result<Vec<Movement>> {
        self.store.load()
    }

    pub fn find(&self, id: u64) -> Result<Option<Movement>> {
        Ok(self.store.load()?.into_iter().find(|m| m.id == id))
    }

    /// Replaces every field except the id, keeping the record's position.
    pub fn update(&self, id: u64, input: MovementInput) -> Result<Movement> {
        let mut ledger = self.store.load()?;
        let Some(slot) = ledger.iter_mut().find(|m| m.id == id) else {
            warn!(id, "update target not found");
            return Err(LedgerError::NotFound(id));
        };
        *slot = Movement::new(id, input);
        let updated = slot.clone();
        self.store.save(&ledger)?;
        info!(id, "updated movement");
        Ok(updated)
    }

    /// Removes every record carrying `id` and returns how many went away.
    /// Nothing is written when there was no match.
    pub fn delete(&self, id: u64) -> Result<usize> {
        let mut ledger = self.store.load()?;
        let before = ledger.len();
        ledger.retain(|m| m.id != id);
        let removed = before - ledger.len();
        if removed == 0 {
            warn!(id, "delete target not found");
            return Ok(0);
        }
        if removed > 1 {
            warn!(id, removed, "removed duplicated id");
        }
        self.store.save(&ledger)?;
        info!(id, "deleted movement");
        Ok(removed)
    }

    pub fn balance(&self) -> Result<f64> {
        Ok(compute_balance(&self.store.load()?))
    }

    /// Empties the ledger. The id counter is left as is.
    pub fn clear(&self) -> Result<()> {
        self.store.save(&[])?;
        info!("ledger cleared");
        Ok(())
    }

    /// Replaces the whole ledger and keeps the counter above every stored id.
    ///
    /// The counter goes first: an unreadable counter fails the call before
    /// the ledger is touched, and a raised counter alone is harmless.
    pub fn replace(&self, ledger: &[Movement]) -> Result<()> {
        if let Some(max_id) = ledger.iter().map(|m| m.id).max() {
            self.ids.ensure_at_least(max_id)?;
        }
        self.store.save(ledger)?;
        info!(records = ledger.len(), "ledger replaced");
        Ok(())
    }

    /// Rebuilds the id counter from the stored ledger.
    pub fn repair_counter(&self) -> Result<u64> {
        let ledger = self.store.load()?;
        let counter = self.ids.reseed(&ledger)?;
        info!(counter, "id counter reseeded");
        Ok(counter)
    }
}

pub fn compute_balance(ledger: &[Movement]) -> f64 {
    ledger.iter().map(|m| m.amount).sum()
}

/// The final `n` records in original order, or fewer if the ledger is shorter.
pub fn last_n(ledger: &[Movement], n: usize) -> &[Movement] {
    &ledger[ledger.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::Kind, storage::memory::MemoryStore};

    fn input(amount: f64, purpose: &str) -> MovementInput {
        MovementInput {
            amount,
            purpose: purpose.into(),
            date: "2024-01-01".into(),
            kind: if amount < 0.0 { Kind::Debito } else { Kind::Credito },
        }
    }

    #[test]
    fn last_n_is_a_suffix() {
        let l = Ledger::new(MemoryStore::new());
        for i in 0..5 {
            l.create(input(i as f64, &format!("m{i}"))).unwrap();
        }
        let all = l.list().unwrap();
        let ids: Vec<u64> = last_n(&all, 3).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
        assert_eq!(last_n(&all, 10).len(), 5);
        assert!(last_n(&all, 0).is_empty());
        assert!(last_n(&[], 3).is_empty());
    }

    #[test]
    fn update_keeps_id_and_position() {
        let l = Ledger::new(MemoryStore::new());
        l.create(input(1.0, "a")).unwrap();
        l.create(input(2.0, "b")).unwrap();
        l.create(input(3.0, "c")).unwrap();

        let new = input(-9.5, "changed");
        let got = l.update(2, new.clone()).unwrap();
        assert_eq!(got.id, 2);

        let all = l.list().unwrap();
        assert_eq!(all[1].id, 2);
        assert_eq!(all[1].amount, new.amount);
        assert_eq!(all[1].purpose, new.purpose);
        assert_eq!(all[1].date, new.date);
        assert_eq!(all[1].kind, new.kind);
    }

    #[test]
    fn update_missing_is_not_found() {
        let l = Ledger::new(MemoryStore::new());
        l.create(input(1.0, "a")).unwrap();
        assert!(matches!(l.update(99, input(0.0, "x")), Err(LedgerError::NotFound(99))));
    }

    #[test]
    fn balance_sums_amounts() {
        let l = Ledger::new(MemoryStore::new());
        assert_eq!(l.balance().unwrap(), 0.0);
        l.create(input(100.0, "salario")).unwrap();
        l.create(input(-50.0, "renta")).unwrap();
        assert_eq!(l.balance().unwrap(), 50.0);
    }

    #[test]
    fn clear_keeps_counter() {
        let l = Ledger::new(MemoryStore::new());
        l.create(input(1.0, "a")).unwrap();
        l.clear().unwrap();
        assert!(l.list().unwrap().is_empty());
        assert_eq!(l.create(input(1.0, "b")).unwrap().id, 2);
    }
}
