//! Проверка структуры произвольного JSON перед заменой журнала.
//!
//! Проверяются только наличие и типы обязательных полей; лишние поля
//! допускаются и сохраняются.

use crate::{
    error::{LedgerError, Result},
    model::{Kind, Movement},
};
use serde_json::Value;
use std::collections::HashSet;

pub fn is_valid_ledger(value: &Value) -> bool {
    check_ledger(value).is_ok()
}

/// Same check as [`is_valid_ledger`], reporting the first offending element.
pub fn check_ledger(value: &Value) -> Result<()> {
    let items = value
        .as_array()
        .ok_or_else(|| LedgerError::Schema(format!("expected an array, got {}", type_name(value))))?;

    for (i, item) in items.iter().enumerate() {
        check_movement(item).map_err(|reason| LedgerError::Schema(format!("element {i}: {reason}")))?;
    }
    Ok(())
}

fn check_movement(item: &Value) -> std::result::Result<(), String> {
    let obj = item
        .as_object()
        .ok_or_else(|| format!("expected an object, got {}", type_name(item)))?;

    let field = |name: &str| obj.get(name).ok_or_else(|| format!("missing field {name:?}"));

    let id = field("id")?;
    if id.as_u64().is_none() {
        return Err(format!("\"id\" must be a non-negative integer, got {id}"));
    }
    let amount = field("monto")?;
    if !amount.is_number() {
        return Err(format!("\"monto\" must be a number, got {}", type_name(amount)));
    }
    for name in ["intencion", "fecha"] {
        let v = field(name)?;
        if !v.is_string() {
            return Err(format!("{name:?} must be a string, got {}", type_name(v)));
        }
    }
    match field("tipo")?.as_str() {
        Some(t) if Kind::ALL.contains(&t) => Ok(()),
        Some(t) => Err(format!("\"tipo\" must be one of {:?}, got {t:?}", Kind::ALL)),
        None => Err("\"tipo\" must be a string".to_string()),
    }
}

/// Validates and converts in one step.
pub fn parse_ledger(value: Value) -> Result<Vec<Movement>> {
    check_ledger(&value)?;
    Ok(serde_json::from_value(value)?)
}

/// Ids that occur more than once, in first-repeat order.
pub fn duplicate_ids(ledger: &[Movement]) -> Vec<u64> {
    let mut seen = HashSet::new();
    let mut dups = Vec::new();
    for m in ledger {
        if !seen.insert(m.id) && !dups.contains(&m.id) {
            dups.push(m.id);
        }
    }
    dups
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn good() -> Value {
        json!({"id": 1, "monto": 100, "intencion": "salario", "fecha": "2024-01-01", "tipo": "credito"})
    }

    #[test]
    fn empty_array_is_valid() {
        assert!(is_valid_ledger(&json!([])));
    }

    #[test]
    fn non_arrays_are_rejected() {
        for v in [json!(null), json!({}), json!("[]"), json!(3), json!(true)] {
            assert!(!is_valid_ledger(&v), "{v}");
        }
    }

    #[test]
    fn every_required_field_is_checked() {
        for name in ["id", "monto", "intencion", "fecha", "tipo"] {
            let mut m = good();
            m.as_object_mut().unwrap().remove(name);
            assert!(!is_valid_ledger(&json!([m])), "missing {name}");
        }
    }

    #[test]
    fn wrong_types_are_rejected() {
        let cases = [
            ("id", json!("1")),
            ("id", json!(-1)),
            ("id", json!(1.5)),
            ("monto", json!("abc")),
            ("monto", json!(null)),
            ("intencion", json!(5)),
            ("fecha", json!(20240101)),
            ("tipo", json!("transferencia")),
            ("tipo", json!("CREDITO")),
            ("tipo", json!(1)),
        ];
        for (name, bad) in cases {
            let mut m = good();
            m[name] = bad.clone();
            assert!(!is_valid_ledger(&json!([m])), "{name} = {bad}");
        }
    }

    #[test]
    fn null_element_is_rejected() {
        assert!(!is_valid_ledger(&json!([good(), null])));
    }

    #[test]
    fn extra_fields_are_allowed() {
        let mut m = good();
        m["categoria"] = json!("trabajo");
        assert!(is_valid_ledger(&json!([m.clone()])));
        let parsed = parse_ledger(json!([m])).unwrap();
        assert_eq!(parsed[0].extra["categoria"], json!("trabajo"));
    }

    #[test]
    fn schema_error_names_the_element() {
        let err = check_ledger(&json!([good(), {"id": 2}])).unwrap_err();
        assert!(err.to_string().contains("element 1"), "{err}");
    }

    #[test]
    fn finds_duplicates() {
        let l = parse_ledger(json!([good(), good(), good()])).unwrap();
        assert_eq!(duplicate_ids(&l), vec![1]);
    }
}
