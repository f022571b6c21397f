//! Database backend trait and result sets

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;

use crate::coerce::coerce_row;
use crate::error::{CoerceError, DriverError};
use crate::value::{Column, Value};

/// Capability set every database backend implements
///
/// Backends are independent implementations of this trait; there is no
/// shared base driver. Statement text is passed through verbatim, with
/// [`escape`](SqlBackend::escape) covering literal quoting.
#[async_trait]
pub trait SqlBackend: Send + Sync {
    /// Establish the connection.
    async fn connect(&self) -> Result<(), DriverError>;

    /// Drop the connection. Safe to call when not connected.
    async fn disconnect(&self) -> Result<(), DriverError>;

    /// Run a statement and collect its full result set.
    async fn query(&self, sql: &str) -> Result<ResultSet, DriverError>;

    /// Run a statement, returning the number of affected rows.
    async fn execute(&self, sql: &str) -> Result<u64, DriverError>;

    /// Quote a value as a SQL literal. `None` renders as `NULL`.
    fn escape(&self, value: Option<&str>) -> String;

    /// Message of the most recent backend error, if any.
    fn last_error(&self) -> Option<String>;

    async fn begin(&self) -> Result<(), DriverError> {
        self.execute("BEGIN").await.map(|_| ())
    }

    async fn commit(&self) -> Result<(), DriverError> {
        self.execute("COMMIT").await.map(|_| ())
    }

    async fn rollback(&self) -> Result<(), DriverError> {
        self.execute("ROLLBACK").await.map(|_| ())
    }
}

/// A fully collected query result
///
/// Rows are kept in their textual wire form and coerced per fetch, using
/// the per-column declared types captured once for the whole set.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    columns: Vec<Column>,
    rows: VecDeque<Vec<Option<String>>>,
    affected: u64,
}

impl ResultSet {
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Option<String>>>, affected: u64) -> Self {
        Self {
            columns,
            rows: rows.into(),
            affected,
        }
    }

    /// Declared result columns, in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Declared type names, one per column.
    pub fn column_types(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.type_name.as_str()).collect()
    }

    /// Rows remaining to fetch.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Rows affected by INSERT, UPDATE and DELETE statements.
    pub fn affected_rows(&self) -> u64 {
        self.affected
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Next row as raw text values, or `None` when the set is drained.
    pub fn fetch_row(&mut self) -> Option<Vec<Option<String>>> {
        self.rows.pop_front()
    }

    /// Next row with column types applied.
    pub fn fetch_typed(&mut self) -> Result<Option<Vec<Value>>, CoerceError> {
        match self.fetch_row() {
            Some(row) => coerce_row(&row, &self.columns).map(Some),
            None => Ok(None),
        }
    }

    /// Next row as a name-to-value map.
    ///
    /// Coercion runs on the positional row first, so duplicate column names
    /// are caught as a mismatch instead of silently shrinking the map.
    pub fn fetch_assoc(&mut self) -> Result<Option<HashMap<String, Value>>, CoerceError> {
        let Some(values) = self.fetch_typed()? else {
            return Ok(None);
        };
        Ok(Some(
            self.columns
                .iter()
                .map(|c| c.name.clone())
                .zip(values)
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultSet {
        ResultSet::new(
            vec![
                Column::new("id", "int4"),
                Column::new("name", "text"),
                Column::new("score", "numeric"),
            ],
            vec![
                vec![
                    Some("1".to_string()),
                    Some("alice".to_string()),
                    Some("9.5".to_string()),
                ],
                vec![Some("2".to_string()), None, Some("7".to_string())],
            ],
            0,
        )
    }

    #[test]
    fn test_fetch_row_drains_in_order() {
        let mut result = sample();
        assert_eq!(result.num_rows(), 2);

        let first = result.fetch_row().unwrap();
        assert_eq!(first[0].as_deref(), Some("1"));
        assert_eq!(result.num_rows(), 1);

        let second = result.fetch_row().unwrap();
        assert_eq!(second[1], None);
        assert!(result.fetch_row().is_none());
    }

    #[test]
    fn test_fetch_typed_applies_column_types() {
        let mut result = sample();
        let row = result.fetch_typed().unwrap().unwrap();
        assert_eq!(
            row,
            vec![
                Value::Int(1),
                Value::Text("alice".to_string()),
                Value::Float(9.5)
            ]
        );

        let row = result.fetch_typed().unwrap().unwrap();
        assert_eq!(row[1], Value::Null);
        assert_eq!(row[2], Value::Float(7.0));

        assert_eq!(result.fetch_typed(), Ok(None));
    }

    #[test]
    fn test_fetch_assoc_keys_by_column_name() {
        let mut result = sample();
        let row = result.fetch_assoc().unwrap().unwrap();
        assert_eq!(row["id"], Value::Int(1));
        assert_eq!(row["name"], Value::Text("alice".to_string()));
        assert_eq!(row["score"], Value::Float(9.5));
    }

    #[test]
    fn test_fetch_typed_reports_short_row() {
        let mut result = ResultSet::new(
            vec![Column::new("id", "int4"), Column::new("id", "int8")],
            vec![vec![Some("1".to_string())]],
            0,
        );
        let err = result.fetch_typed().unwrap_err();
        let CoerceError::SchemaMismatch { duplicated, .. } = err;
        assert_eq!(duplicated, vec!["id".to_string()]);
    }

    #[test]
    fn test_column_metadata() {
        let result = sample();
        assert_eq!(result.column_types(), vec!["int4", "text", "numeric"]);
        assert_eq!(result.columns()[1].name, "name");
        assert_eq!(result.affected_rows(), 0);
    }

    #[test]
    fn test_affected_rows_without_rows() {
        let mut result = ResultSet::new(Vec::new(), Vec::new(), 3);
        assert!(result.is_empty());
        assert_eq!(result.affected_rows(), 3);
        assert_eq!(result.fetch_typed(), Ok(None));
    }
}
