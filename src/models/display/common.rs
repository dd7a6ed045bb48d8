//! Common display helpers

/// Join a list for a table cell, or `--` when empty.
pub fn list_cell(items: &[String]) -> String {
    if items.is_empty() {
        "--".to_string()
    } else {
        items.join(", ")
    }
}

/// Optional value for a table cell.
pub fn opt_cell(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("--").to_string()
}
