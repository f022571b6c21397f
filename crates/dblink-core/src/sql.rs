//! Statement compilation helpers
//!
//! Pure string templating over pre-escaped values. Callers are expected to
//! run every value through [`SqlBackend::escape`](crate::SqlBackend::escape)
//! before compiling a statement.

/// Compile an INSERT statement.
///
/// `values` must already be escaped literals. `returning` appends a
/// `RETURNING` clause when present.
pub fn compile_insert(
    table: &str,
    columns: &[&str],
    values: &[String],
    returning: Option<&str>,
) -> String {
    let mut statement = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        values.join(", ")
    );
    if let Some(returning) = returning {
        statement.push_str(" RETURNING ");
        statement.push_str(returning);
    }
    statement
}

/// Compile an UPDATE statement from column/escaped-value assignments.
pub fn compile_update(
    table: &str,
    assignments: &[(&str, String)],
    where_clause: Option<&str>,
    returning: Option<&str>,
) -> String {
    let assignments: Vec<String> = assignments
        .iter()
        .map(|(column, value)| format!("{} = {}", column, value))
        .collect();

    let mut statement = format!("UPDATE {} SET {}", table, assignments.join(", "));
    if let Some(where_clause) = where_clause {
        statement.push_str(" WHERE ");
        statement.push_str(where_clause);
    }
    if let Some(returning) = returning {
        statement.push_str(" RETURNING ");
        statement.push_str(returning);
    }
    statement
}
