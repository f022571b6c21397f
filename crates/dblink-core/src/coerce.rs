//! Row type coercion
//!
//! Backends hand every column back in its textual wire form. This module
//! converts a fetched row into typed values based on each column's declared
//! type name, validating that the column count matches the value count.

use std::collections::HashMap;

use crate::error::CoerceError;
use crate::value::{CoercionKind, Column, Value};

/// Coerce one fetched row into typed values.
///
/// An empty `values` slice means "no more rows" and returns an empty vector.
/// A length mismatch between `values` and `columns` is a
/// [`CoerceError::SchemaMismatch`] naming the duplicated columns that caused
/// the collapse; coercion cannot proceed without a reliable type-to-value
/// correspondence.
pub fn coerce_row(
    values: &[Option<String>],
    columns: &[Column],
) -> Result<Vec<Value>, CoerceError> {
    if values.is_empty() {
        return Ok(Vec::new());
    }

    if values.len() != columns.len() {
        return Err(CoerceError::SchemaMismatch {
            declared: columns.len(),
            received: values.len(),
            duplicated: duplicated_names(columns),
        });
    }

    Ok(values
        .iter()
        .zip(columns)
        .map(|(value, column)| coerce_value(value.as_deref(), column))
        .collect())
}

fn coerce_value(value: Option<&str>, column: &Column) -> Value {
    let Some(text) = value else {
        return Value::Null;
    };

    match column.coercion_kind() {
        Some(CoercionKind::Integer) => Value::Int(parse_int(text)),
        Some(CoercionKind::Float) => Value::Float(text.trim().parse().unwrap_or(0.0)),
        None => Value::Text(text.to_string()),
    }
}

/// Base-10 integer parse with the database's own cast semantics:
/// a fractional tail truncates instead of rejecting the value.
fn parse_int(text: &str) -> i64 {
    let text = text.trim();
    if let Ok(n) = text.parse::<i64>() {
        return n;
    }
    text.parse::<f64>().map(|f| f as i64).unwrap_or(0)
}

/// Column names appearing more than once in the declared list,
/// in first-appearance order.
fn duplicated_names(columns: &[Column]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for column in columns {
        *counts.entry(column.name.as_str()).or_default() += 1;
    }

    let mut duplicated: Vec<String> = Vec::new();
    for column in columns {
        if counts[column.name.as_str()] > 1 && !duplicated.contains(&column.name) {
            duplicated.push(column.name.clone());
        }
    }
    duplicated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str, type_name: &str) -> Column {
        Column::new(name, type_name)
    }

    fn row(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn test_integer_columns_coerce_to_int() {
        let columns = vec![col("id", "int4"), col("total", "bigint")];
        let coerced = coerce_row(&row(&["42", "9000000000"]), &columns).unwrap();
        assert_eq!(coerced, vec![Value::Int(42), Value::Int(9_000_000_000)]);
    }

    #[test]
    fn test_float_columns_coerce_to_float() {
        let columns = vec![col("price", "numeric"), col("ratio", "float8")];
        let coerced = coerce_row(&row(&["19.99", "0.5"]), &columns).unwrap();
        assert_eq!(coerced, vec![Value::Float(19.99), Value::Float(0.5)]);
    }

    #[test]
    fn test_unmapped_columns_pass_through() {
        let columns = vec![col("name", "varchar"), col("active", "bool")];
        let coerced = coerce_row(&row(&["alice", "t"]), &columns).unwrap();
        assert_eq!(
            coerced,
            vec![
                Value::Text("alice".to_string()),
                Value::Text("t".to_string())
            ]
        );
    }

    #[test]
    fn test_empty_row_is_not_an_error() {
        assert_eq!(coerce_row(&[], &[]), Ok(Vec::new()));
        // A drained result still reports its columns; an empty row is fine.
        assert_eq!(coerce_row(&[], &[col("id", "int4")]), Ok(Vec::new()));
    }

    #[test]
    fn test_null_values_stay_null() {
        let columns = vec![col("id", "int4"), col("note", "text")];
        let coerced = coerce_row(&[None, None], &columns).unwrap();
        assert_eq!(coerced, vec![Value::Null, Value::Null]);
    }

    #[test]
    fn test_length_mismatch_is_schema_mismatch() {
        let columns = vec![col("id", "int4")];
        let err = coerce_row(&row(&["1", "2"]), &columns).unwrap_err();
        assert_eq!(
            err,
            CoerceError::SchemaMismatch {
                declared: 1,
                received: 2,
                duplicated: vec![],
            }
        );
    }

    #[test]
    fn test_mismatch_names_duplicated_columns() {
        // Two columns sharing an output name collapse to one value when
        // fetched associatively; the error payload must name them.
        let columns = vec![col("id", "int4"), col("id", "int8"), col("name", "text")];
        let err = coerce_row(&row(&["1", "alice"]), &columns).unwrap_err();
        assert_eq!(
            err,
            CoerceError::SchemaMismatch {
                declared: 3,
                received: 2,
                duplicated: vec!["id".to_string()],
            }
        );
        assert!(err.to_string().contains("id"));
    }

    #[test]
    fn test_integer_parse_truncates_fraction() {
        let columns = vec![col("n", "int4")];
        let coerced = coerce_row(&row(&["3.7"]), &columns).unwrap();
        assert_eq!(coerced, vec![Value::Int(3)]);
    }

    #[test]
    fn test_negative_numbers() {
        let columns = vec![col("n", "int8"), col("x", "real")];
        let coerced = coerce_row(&row(&["-12", "-0.25"]), &columns).unwrap();
        assert_eq!(coerced, vec![Value::Int(-12), Value::Float(-0.25)]);
    }

    #[test]
    fn test_coercion_is_idempotent() {
        let columns = vec![col("n", "int4"), col("x", "numeric")];
        let first = coerce_row(&row(&["10", "2.5"]), &columns).unwrap();

        let rendered: Vec<Option<String>> =
            first.iter().map(|v| Some(v.to_string())).collect();
        let second = coerce_row(&rendered, &columns).unwrap();
        assert_eq!(first, second);
    }
}
