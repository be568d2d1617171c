//! saldolib — журнал личных движений денег: хранилище, проверка, импорт/экспорт JSON.

pub mod config;
pub mod error;
pub mod ids;
pub mod ledger;
pub mod model;
pub mod store;
pub mod traits;
pub mod transfer;
pub mod validate;

pub mod formats {
    pub mod csv;
    pub mod json;
}

pub mod storage {
    pub mod file;
    pub mod memory;
}

pub use error::{LedgerError, Result};
pub use ledger::Ledger;
pub use model::{Kind, Movement, MovementInput};
