// Historical OHLCV ingestion: provider JSON payloads and CSV files.
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use serde_json::{Map, Value};
use shared::models::{Candle, Timestamp};
use shared::utils::{json_float_lenient, parse_float_lenient};

use crate::error::EngineError;

/// Request keyed by symbol and history period (`1mo`, `1y`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: String,
    pub period: String,
}

impl HistoryRequest {
    pub fn new(symbol: &str, period: &str) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            period: period.to_string(),
        }
    }
}

/// Anything that can deliver candle rows for a request.
pub trait HistorySource {
    fn fetch(&self, request: &HistoryRequest) -> Result<Vec<Candle>, EngineError>;
}

// Case-insensitive key lookup: "Close" and "close" name the same column.
fn get_ci<'a>(row: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    row.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
}

fn row_timestamp(row: &Map<String, Value>) -> Timestamp {
    match get_ci(row, "date") {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Timestamp::Epoch)
            .unwrap_or_else(|| Timestamp::Text(n.to_string())),
        Some(Value::String(s)) => Timestamp::Text(s.clone()),
        _ => Timestamp::Text(String::new()),
    }
}

fn row_to_candle(row: &Map<String, Value>) -> Candle {
    let field = |key: &str| get_ci(row, key).map_or(f64::NAN, json_float_lenient);
    Candle {
        timestamp: row_timestamp(row),
        open: field("open"),
        high: field("high"),
        low: field("low"),
        close: field("close"),
        volume: get_ci(row, "volume").map_or(0.0, json_float_lenient),
    }
}

/// Parses a history payload, either `{ "data": [...] }` or a bare row array.
///
/// Unparseable values come back as `NaN`; run the result through
/// [`sanitize_rows`] before handing it to a series.
pub fn parse_history_json(payload: &str) -> Result<Vec<Candle>, EngineError> {
    let value: Value = serde_json::from_str(payload)?;
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Err(EngineError::Transport(message.to_string()));
    }
    let rows = match &value {
        Value::Array(rows) => rows,
        Value::Object(obj) => match obj.get("data") {
            Some(Value::Array(rows)) => rows,
            _ => {
                return Err(EngineError::HistoryFormatError(
                    "expected a 'data' array in history payload".to_string(),
                ))
            }
        },
        _ => {
            return Err(EngineError::HistoryFormatError(
                "history payload must be an object or an array".to_string(),
            ))
        }
    };

    Ok(rows
        .iter()
        .filter_map(Value::as_object)
        .map(row_to_candle)
        .collect())
}

fn header_position(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
}

/// Loads `Date,Open,High,Low,Close,Volume` rows; header names are matched
/// case-insensitively and column order does not matter.
pub fn load_history_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Candle>, EngineError> {
    let file = File::open(path.as_ref())?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let headers = rdr.headers()?.clone();
    let date_idx = header_position(&headers, "date").ok_or_else(|| {
        EngineError::HistoryFormatError(format!(
            "Missing 'Date' column in {}",
            path.as_ref().display()
        ))
    })?;
    let columns = ["open", "high", "low", "close", "volume"].map(|name| header_position(&headers, name));

    let mut candles = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i));
        let number = |idx: Option<usize>| cell(idx).map_or(f64::NAN, parse_float_lenient);

        let date = record.get(date_idx).unwrap_or_default();
        let timestamp = match date.parse::<i64>() {
            Ok(millis) => Timestamp::Epoch(millis),
            Err(_) => Timestamp::Text(date.to_string()),
        };

        candles.push(Candle {
            timestamp,
            open: number(columns[0]),
            high: number(columns[1]),
            low: number(columns[2]),
            close: number(columns[3]),
            volume: cell(columns[4]).map_or(0.0, parse_float_lenient),
        });
    }
    Ok(candles)
}

/// Drops rows with a non-finite OHLC value and zeroes non-finite volume.
/// Returns the kept rows and how many were dropped.
pub fn sanitize_rows(rows: Vec<Candle>) -> (Vec<Candle>, usize) {
    let total = rows.len();
    let kept: Vec<Candle> = rows
        .into_iter()
        .filter(Candle::is_finite)
        .map(|mut c| {
            if !c.volume.is_finite() {
                c.volume = 0.0;
            }
            c
        })
        .collect();
    let dropped = total - kept.len();
    (kept, dropped)
}

// `<dir>/<SYMBOL>.<ext>`, or a transport error when the provider has no such symbol.
fn symbol_file(dir: &Path, request: &HistoryRequest, ext: &str) -> Result<PathBuf, EngineError> {
    let path = dir.join(format!("{}.{}", request.symbol, ext));
    if !path.exists() {
        return Err(EngineError::Transport(format!(
            "Could not fetch history for {}",
            request.symbol
        )));
    }
    Ok(path)
}

/// Reads `<dir>/<SYMBOL>.csv`. The period is ignored; the file is the whole history.
pub struct CsvHistorySource {
    dir: PathBuf,
}

impl CsvHistorySource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }
}

impl HistorySource for CsvHistorySource {
    fn fetch(&self, request: &HistoryRequest) -> Result<Vec<Candle>, EngineError> {
        let path = symbol_file(&self.dir, request, "csv")?;
        load_history_csv(&path)
    }
}

/// Reads saved provider responses, `<dir>/<SYMBOL>.json`, in the same shape
/// [`parse_history_json`] accepts. A stored `{ "error": ... }` body fails the
/// fetch like a live provider error would.
pub struct JsonHistorySource {
    dir: PathBuf,
}

impl JsonHistorySource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }
}

impl HistorySource for JsonHistorySource {
    fn fetch(&self, request: &HistoryRequest) -> Result<Vec<Candle>, EngineError> {
        let path = symbol_file(&self.dir, request, "json")?;
        let payload = std::fs::read_to_string(&path)?;
        parse_history_json(&payload)
    }
}
