pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Result fields split into scalar fields and row sets (schedules, ledgers,
/// scenario lists): arrays whose elements are objects.
pub(crate) struct ResultParts<'a> {
    pub fields: Vec<(&'a str, &'a Value)>,
    pub row_sets: Vec<(&'a str, &'a [Value])>,
}

pub(crate) fn split_result(result: &Map<String, Value>) -> ResultParts<'_> {
    let mut fields = Vec::new();
    let mut row_sets = Vec::new();
    for (key, val) in result {
        match val {
            Value::Array(rows) if rows.first().is_some_and(Value::is_object) => {
                row_sets.push((key.as_str(), rows.as_slice()));
            }
            _ => fields.push((key.as_str(), val)),
        }
    }
    ResultParts { fields, row_sets }
}

/// Render a leaf value as plain text.
pub(crate) fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
