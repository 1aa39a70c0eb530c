use serde_json::Value;

/// Print just the headline value of a result.
///
/// Looks for well-known result fields in priority order, then falls back to
/// the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = ["score", "balance", "summary", "total_pnl", "win_rate"];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

/// Insight severity counts print as `high/medium/low`.
fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Object(map) if map.contains_key("high") && map.contains_key("low") => {
            let count = |k: &str| map.get(k).and_then(Value::as_u64).unwrap_or(0);
            format!(
                "{} high / {} medium / {} low",
                count("high"),
                count("medium"),
                count("low")
            )
        }
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
