use serde_json::Value;

use super::plain;

/// Headline figure of each engine, in priority order.
const PRIORITY_KEYS: [&str; 11] = [
    "base_payment",
    "score",
    "eligible",
    "coverage_score",
    "corpus_gap",
    "future_value",
    "recommended_sip",
    "total_tax",
    "month_total",
    "accumulation_phase",
    "scenarios",
];

/// Print just the key answer value from the output.
///
/// Looks for the headline field of each engine, then falls back to the
/// first field in the result object. Nested summaries print their first
/// scalar (e.g. the retirement corpus).
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                println!("{}", headline(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, headline(val));
            return;
        }
    }

    println!("{}", headline(result_obj));
}

fn headline(value: &Value) -> String {
    match value {
        Value::Object(map) => map
            .iter()
            .find(|(k, _)| k.contains("corpus"))
            .or_else(|| map.iter().next())
            .map(|(_, v)| plain(v))
            .unwrap_or_default(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.get("future_value"))
            .map(plain)
            .collect::<Vec<_>>()
            .join(","),
        _ => plain(value),
    }
}
