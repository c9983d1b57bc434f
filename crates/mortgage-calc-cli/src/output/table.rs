use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{flatten, format_scalar, result_of};

/// Render the result envelope as Field/Value tables.
pub fn print_table(value: &Value) {
    let result = result_of(value);

    match result {
        Value::Object(map) => {
            let (fields, tables) = flatten(map);

            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (key, val) in &fields {
                builder.push_record([key.as_str(), &format_scalar(val)]);
            }
            println!("{}", Table::from(builder));

            for (name, rows) in &tables {
                println!("\n{}:", name);
                print_rows(rows);
            }
        }
        _ => println!("{}", format_scalar(result)),
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };
    let headers: Vec<String> = first.keys().cloned().collect();

    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(String::as_str));
    for row in rows.iter().filter_map(Value::as_object) {
        builder.push_record(
            headers
                .iter()
                .map(|h| row.get(h).map(format_scalar).unwrap_or_default()),
        );
    }
    println!("{}", Table::from(builder));
}
