use serde_json::Value;
use std::io::{self, Read};

/// Read a JSON document from stdin when data is piped in.
///
/// Returns `Ok(None)` when stdin is an interactive terminal or the
/// piped input is empty, so callers can fall back to flags.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value =
        serde_json::from_str(trimmed).map_err(|e| format!("invalid JSON on stdin: {}", e))?;

    Ok(Some(value))
}
