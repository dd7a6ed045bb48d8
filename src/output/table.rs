//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Format rows as a rounded table
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No results found.".to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Tabled)]
    struct MemberRow {
        #[tabled(rename = "NAME")]
        name: String,
        #[tabled(rename = "EMAIL")]
        email: String,
    }

    #[test]
    fn test_format_table_empty() {
        let rows: Vec<MemberRow> = vec![];
        assert_eq!(format_table(&rows), "No results found.");
    }

    #[test]
    fn test_format_table_rows_and_style() {
        let rows = vec![
            MemberRow {
                name: "Ada".to_string(),
                email: "ada@corp.example".to_string(),
            },
            MemberRow {
                name: "Lin".to_string(),
                email: "lin@corp.example".to_string(),
            },
        ];

        let result = format_table(&rows);
        assert!(result.contains("EMAIL"));
        assert!(result.contains("lin@corp.example"));
        // Rounded corners
        assert!(result.contains("╭"));
        assert!(result.contains("╰"));
    }
}
