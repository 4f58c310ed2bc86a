use serde_json::Value;
use std::io;

use super::{plain, split_result};

/// Write output as CSV to stdout.
///
/// Results carrying a schedule (amortization periods, SIP years, ledger rows)
/// are written as that schedule, one row per entry; other results become a
/// two-column field/value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            let parts = split_result(map);
            if let Some((_, rows)) = parts.row_sets.first() {
                write_rows(&mut wtr, rows);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in parts.fields {
                    let _ = wtr.write_record([key, &plain(val)]);
                }
            }
        }
        Value::Array(rows) => write_rows(&mut wtr, rows),
        _ => {
            let _ = wtr.write_record([&plain(result)]);
        }
    }

    if let Err(e) = wtr.flush() {
        log::warn!("failed to flush CSV output: {e}");
    }
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            let _ = wtr.write_record([&plain(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(plain).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
