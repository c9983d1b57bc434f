use serde_json::Value;
use std::io;

use super::{flatten, format_scalar, result_of};

/// Write output as CSV to stdout.
///
/// A result holding a table (e.g. schedule rows) is written as that table;
/// otherwise as two columns, field and value.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match result_of(value) {
        Value::Object(map) => {
            let (fields, tables) = flatten(map);
            if let Some((_, rows)) = tables.first() {
                write_rows(&mut wtr, rows);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in &fields {
                    let _ = wtr.write_record([key.as_str(), &format_scalar(val)]);
                }
            }
        }
        other => {
            let _ = wtr.write_record([&format_scalar(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };
    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);

    for row in rows.iter().filter_map(Value::as_object) {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(*h).map(format_scalar).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&record);
    }
}
