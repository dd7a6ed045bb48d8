//! JSON output formatting

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Wrapper for JSON output with metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T> {
    pub data: T,
    pub meta: Metadata,
}

/// Metadata included in JSON output
#[derive(Debug, Serialize, Deserialize)]
pub struct Metadata {
    /// RFC 3339 time the output was produced
    pub timestamp: String,

    /// CLI version
    pub version: String,

    /// Whether API writes were skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
}

impl<T> JsonOutput<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: Metadata {
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                dry_run: None,
            },
        }
    }

    /// Mark the envelope with the run mode of a command that can write.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.meta.dry_run = Some(dry_run);
        self
    }
}

/// Format data as pretty-printed JSON
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonOutput::new(data))
}

/// Format data from a write-capable command
pub fn format_json_run<T: Serialize + ?Sized>(
    data: &T,
    dry_run: bool,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonOutput::new(data).with_dry_run(dry_run))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize)]
    struct Mapping {
        group: String,
        role: String,
    }

    #[test]
    fn test_json_output_new() {
        let output = JsonOutput::new(vec!["Azure", "GCP"]);
        assert_eq!(output.data, vec!["Azure", "GCP"]);
        assert_eq!(output.meta.version, env!("CARGO_PKG_VERSION"));
        assert!(output.meta.dry_run.is_none());
    }

    #[test]
    fn test_format_json_envelope() {
        let items = vec![Mapping {
            group: "admins".to_string(),
            role: "GLOBAL_ADMIN".to_string(),
        }];

        let result = format_json(&items).unwrap();
        assert!(result.contains("\"data\""));
        assert!(result.contains("\"timestamp\""));
        assert!(result.contains("\"role\": \"GLOBAL_ADMIN\""));
        assert!(!result.contains("dry_run"));
    }

    #[test]
    fn test_format_json_run_marks_mode() {
        let items: Vec<Mapping> = vec![];
        let result = format_json_run(&items, true).unwrap();
        assert!(result.contains("\"data\": []"));
        assert!(result.contains("\"dry_run\": true"));
    }
}
