use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Amortization-row columns in presentation order.
const SCHEDULE_COLUMNS: [(&str, &str); 6] = [
    ("month", "Month"),
    ("due_date", "Due Date"),
    ("payment", "Payment"),
    ("interest", "Interest"),
    ("principal", "Principal"),
    ("closing_balance", "Balance"),
];

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            // Check if "result" key holds the primary data
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &serde_json::Map<String, Value>) {
    match result {
        // A disclosure run carries the box plus the schedule it came from.
        Value::Object(map) if map.contains_key("disclosure") && map.contains_key("schedule") => {
            if let Some(disclosure) = map.get("disclosure") {
                print_flat_object(disclosure);
            }
            if let Some(schedule) = map.get("schedule") {
                println!();
                print_schedule_table(schedule);
            }
        }
        Value::Object(map) if map.contains_key("periods") => {
            print_schedule_table(result);
        }
        Value::Object(_) => {
            print_flat_object(result);
        }
        _ => {
            print_flat_object(&Value::Object(envelope.clone()));
        }
    }

    // Print warnings if any
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    // Print methodology
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Amortization rows in a fixed column order, then the summary figures.
fn print_schedule_table(schedule: &Value) {
    let Value::Object(map) = schedule else {
        println!("{}", schedule);
        return;
    };

    if let Some(Value::Array(periods)) = map.get("periods") {
        let mut builder = Builder::default();
        builder.push_record(SCHEDULE_COLUMNS.map(|(_, header)| header));

        for row in periods {
            let record: Vec<String> = SCHEDULE_COLUMNS
                .iter()
                .map(|&(key, _)| row.get(key).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(record);
        }

        let table = Table::from(builder);
        println!("{}", table);
    }

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if key != "periods" {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
    }
    let table = Table::from(builder);
    println!("{}", table);
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        let table = Table::from(builder);
        println!("{}", table);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    // Collect all keys from first object for headers
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(h.as_str())
                            .map(|v| format_value(v))
                            .unwrap_or_default()
                    })
                    .collect();
                builder.push_record(row);
            }
        }

        let table = Table::from(builder);
        println!("{}", table);
    } else {
        // Simple array of values
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(|v| format_value(v)).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
