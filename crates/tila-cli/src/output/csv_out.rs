use serde_json::Value;
use std::io;

/// Amortization-row columns in CSV order.
const SCHEDULE_COLUMNS: [&str; 6] = [
    "month",
    "due_date",
    "payment",
    "interest",
    "principal",
    "closing_balance",
];

/// Write output as CSV to stdout.
///
/// Amortization rows become one record per period; other results become
/// two-column field,value records.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let result = map.get("result").unwrap_or(value);
            if let Some(periods) = find_periods(result) {
                write_schedule_csv(&mut wtr, periods);
            } else if let Value::Object(result) = result {
                // Two-column CSV: field, value
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in result {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            } else {
                let _ = wtr.write_record([&format_csv_value(result)]);
            }
        }
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

/// Locate amortization rows in either a schedule or a disclosure result.
fn find_periods(result: &Value) -> Option<&Vec<Value>> {
    let map = result.as_object()?;

    if let Some(Value::Array(periods)) = map.get("periods") {
        return Some(periods);
    }
    if let Some(Value::Array(periods)) = map.get("schedule").and_then(|s| s.get("periods")) {
        return Some(periods);
    }

    None
}

fn write_schedule_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, periods: &[Value]) {
    let _ = wtr.write_record(SCHEDULE_COLUMNS);

    for item in periods {
        if let Value::Object(map) = item {
            let row: Vec<String> = SCHEDULE_COLUMNS
                .iter()
                .map(|key| {
                    map.get(*key)
                        .map(|v| format_csv_value(v))
                        .unwrap_or_default()
                })
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    // Extract headers from first object
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(*h)
                            .map(|v| format_csv_value(v))
                            .unwrap_or_default()
                    })
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
