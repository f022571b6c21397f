//! SQL literal quoting

/// Quote a value as a PostgreSQL string literal.
///
/// `None` renders as `NULL`. Single quotes are doubled; input containing
/// backslashes switches to the `E''` form with the backslashes doubled,
/// which is safe regardless of the server's `standard_conforming_strings`
/// setting.
pub fn escape_literal(value: Option<&str>) -> String {
    let Some(value) = value else {
        return "NULL".to_string();
    };

    if value.contains('\\') {
        format!("E'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
    } else {
        format!("'{}'", value.replace('\'', "''"))
    }
}
