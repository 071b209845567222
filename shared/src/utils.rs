// Lenient number handling for loosely typed feed payloads.

/// Parses a numeric cell the way browser `parseFloat` would for clean input:
/// surrounding whitespace is ignored and anything unparseable becomes `NaN`
/// instead of an error. Callers filter non-finite values afterwards.
pub fn parse_float_lenient(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Same as [`parse_float_lenient`] for a JSON value that may be a number,
/// a numeric string, or anything else.
pub fn json_float_lenient(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        serde_json::Value::String(s) => parse_float_lenient(s),
        _ => f64::NAN,
    }
}
