//! Доменные модели: движение (movement), его тип и вход для создания/правки.

use crate::error::{LedgerError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Debito,
    Credito,
}

impl Kind {
    pub const ALL: [&'static str; 2] = ["debito", "credito"];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Debito => "debito",
            Kind::Credito => "credito",
        }
    }
}

impl FromStr for Kind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "debito" => Ok(Kind::Debito),
            "credito" => Ok(Kind::Credito),
            other => Err(LedgerError::InvalidKind(other.to_string())),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded monetary event, stored with its wire field names.
///
/// Fields outside the known five are carried in `extra` untouched, so a file
/// that passed validation is exported back with them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movement {
    pub id: u64,
    #[serde(rename = "monto")]
    pub amount: f64,
    #[serde(rename = "intencion")]
    pub purpose: String,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "tipo")]
    pub kind: Kind,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Movement {
    pub fn new(id: u64, input: MovementInput) -> Self {
        Movement {
            id,
            amount: input.amount,
            purpose: input.purpose,
            date: input.date,
            kind: input.kind,
            extra: Map::new(),
        }
    }
}

/// Caller-supplied fields for Create and Update.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementInput {
    pub amount: f64,
    pub purpose: String,
    pub date: String,
    pub kind: Kind,
}

impl MovementInput {
    /// Builds an input from raw form text, rejecting a non-numeric amount.
    pub fn parse(amount: &str, purpose: &str, date: &str, kind: &str) -> Result<Self> {
        Ok(MovementInput {
            amount: parse_amount(amount)?,
            purpose: purpose.to_string(),
            date: date.to_string(),
            kind: kind.parse()?,
        })
    }
}

pub fn parse_amount(text: &str) -> Result<f64> {
    let t = text.trim();
    if t.is_empty() {
        return Err(LedgerError::InvalidAmount(text.to_string()));
    }
    match t.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(LedgerError::InvalidAmount(text.to_string())),
    }
}

/// Amount formatted with two decimals, rounding the exact binary value half
/// away from zero (`1.005` is stored as 1.00499... and shows `1.00`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Money(pub f64);

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Decimal::from_f64_retain(self.0) {
            Some(d) => {
                let d = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                write!(f, "{d:.2}")
            }
            None => write!(f, "{:.2}", self.0),
        }
    }
}
