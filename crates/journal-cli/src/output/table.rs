use colored::Colorize;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Insight columns shown in the findings table, in order.
const INSIGHT_COLUMNS: [&str; 4] = ["severity", "category", "title", "action"];

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => print_result(result, map),
            None => print_fields(map),
        },
        Value::Array(arr) => print_rows(arr),
        _ => println!("{}", value),
    }
}

/// Scalars of the result as a field/value table, then one table per nested
/// section (analytics snapshot, insight list).
fn print_result(result: &Value, envelope: &Map<String, Value>) {
    let Value::Object(res_map) = result else {
        print_fields(envelope);
        return;
    };

    let (sections, scalars): (Vec<_>, Vec<_>) = res_map
        .iter()
        .partition(|(_, v)| v.is_object() || is_object_list(v));

    if !scalars.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in scalars {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    }

    for (key, val) in sections {
        println!("\n{}", key.bold());
        match val {
            Value::Array(items) if key == "insights" => print_insights(items),
            Value::Array(items) => print_rows(items),
            Value::Object(map) => print_fields(map),
            _ => {}
        }
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow().bold());
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_insights(items: &[Value]) {
    if items.is_empty() {
        println!("(none)");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(INSIGHT_COLUMNS);
    for item in items {
        let row: Vec<String> = INSIGHT_COLUMNS
            .iter()
            .map(|col| {
                let text = item.get(*col).map(format_value).unwrap_or_default();
                if *col == "severity" {
                    paint_severity(&text)
                } else {
                    text
                }
            })
            .collect();
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}

fn paint_severity(severity: &str) -> String {
    match severity {
        "high" => severity.red().bold().to_string(),
        "medium" => severity.yellow().to_string(),
        _ => severity.green().to_string(),
    }
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn is_object_list(value: &Value) -> bool {
    matches!(value, Value::Array(items) if items.first().is_some_and(Value::is_object))
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
