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

/// The `result` object of an output envelope, or the value itself.
pub(crate) fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// Flatten nested objects into `parent.child` keys. Arrays of objects are
/// returned separately so they can be rendered as their own tables.
pub(crate) fn flatten(
    map: &Map<String, Value>,
) -> (Vec<(String, Value)>, Vec<(String, Vec<Value>)>) {
    let mut fields = Vec::new();
    let mut tables = Vec::new();
    flatten_into("", map, &mut fields, &mut tables);
    (fields, tables)
}

fn flatten_into(
    prefix: &str,
    map: &Map<String, Value>,
    fields: &mut Vec<(String, Value)>,
    tables: &mut Vec<(String, Vec<Value>)>,
) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => flatten_into(&name, inner, fields, tables),
            Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
                tables.push((name, items.clone()));
            }
            _ => fields.push((name, val.clone())),
        }
    }
}

pub(crate) fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
