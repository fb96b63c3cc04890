use std::collections::BTreeSet;

use anyhow::Result;
use clap::ValueEnum;
use serde_json::{Map, Value};
use tabled::builder::Builder;
use tabled::settings::Style;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Table,
}

pub struct OutputRenderer {
    format: OutputFormat,
}

impl OutputRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn render(&self, value: &Value) -> Result<()> {
        println!("{}", self.to_text(value)?);
        Ok(())
    }

    pub fn to_text(&self, value: &Value) -> Result<String> {
        Ok(match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
            OutputFormat::Table => match value {
                Value::Array(rows) => match rows_table(rows) {
                    Some(table) => table,
                    None => serde_json::to_string_pretty(value)?,
                },
                Value::Object(fields) => fields_table(fields),
                other => cell(other),
            },
        })
    }
}

/// Test runs and import results come back as arrays of flat-ish objects; one
/// row per object, one column per key seen anywhere.
fn rows_table(rows: &[Value]) -> Option<String> {
    let headers: BTreeSet<&str> = rows
        .iter()
        .filter_map(Value::as_object)
        .flat_map(|obj| obj.keys().map(String::as_str))
        .collect();

    if headers.is_empty() {
        return None;
    }

    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| h.to_string()));
    for row in rows.iter().filter_map(Value::as_object) {
        builder.push_record(headers.iter().map(|h| row.get(*h).map(cell).unwrap_or_default()));
    }

    Some(builder.build().with(Style::rounded()).to_string())
}

fn fields_table(fields: &Map<String, Value>) -> String {
    let mut builder = Builder::default();
    builder.push_record(["field".to_string(), "value".to_string()]);
    for (key, value) in fields {
        builder.push_record([key.clone(), cell(value)]);
    }
    builder.build().with(Style::rounded()).to_string()
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Object(obj) => obj
            .get("key")
            .or_else(|| obj.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_format_is_json() {
        assert_eq!(OutputFormat::default(), OutputFormat::Json);
        assert_eq!(OutputRenderer::new(OutputFormat::Yaml).format(), OutputFormat::Yaml);
    }

    #[test]
    fn test_json_output() {
        let renderer = OutputRenderer::new(OutputFormat::Json);
        let text = renderer.to_text(&json!([{"id": 1}])).unwrap();
        assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), json!([{"id": 1}]));
    }

    #[test]
    fn test_yaml_output() {
        let renderer = OutputRenderer::new(OutputFormat::Yaml);
        let text = renderer.to_text(&json!({"key": "EXEC-1"})).unwrap();
        assert!(text.contains("key: EXEC-1"));
    }

    #[test]
    fn test_table_of_test_runs() {
        let runs = json!([
            {"id": 1, "testKey": "TEST-1", "status": "PASS"},
            {"id": 2, "testKey": "TEST-2", "status": "FAIL", "comment": "flaky"}
        ]);
        let text = OutputRenderer::new(OutputFormat::Table).to_text(&runs).unwrap();

        for expected in ["testKey", "comment", "TEST-2", "FAIL", "flaky"] {
            assert!(text.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn test_table_of_single_object() {
        let issue = json!({"testExecIssue": {"id": "10000", "key": "EXEC-1"}});
        let text = OutputRenderer::new(OutputFormat::Table).to_text(&issue).unwrap();
        assert!(text.contains("testExecIssue"));
        assert!(text.contains("EXEC-1"));
    }

    #[test]
    fn test_table_falls_back_for_primitive_arrays() {
        let text = OutputRenderer::new(OutputFormat::Table)
            .to_text(&json!(["a", "b"]))
            .unwrap();
        assert!(text.contains("\"a\""));
    }

    #[test]
    fn test_cell_values() {
        assert_eq!(cell(&json!(null)), "");
        assert_eq!(cell(&json!(42)), "42");
        assert_eq!(cell(&json!(true)), "true");
        assert_eq!(cell(&json!({"name": "PASS"})), "PASS");
        assert_eq!(cell(&json!([1, 2])), "[1,2]");
    }
}
