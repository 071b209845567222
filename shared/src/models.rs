use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// When a candle happened. History rows carry either an epoch number or a
/// date string, so both are kept as delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Milliseconds since the Unix epoch.
    Epoch(i64),
    /// RFC 3339 or `YYYY-MM-DD` text.
    Text(String),
}

impl Timestamp {
    pub fn now() -> Self {
        Timestamp::from(Utc::now())
    }

    /// Best-effort interpretation as a UTC instant.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Epoch(millis) => DateTime::from_timestamp_millis(*millis),
            Timestamp::Text(text) => {
                let text = text.trim();
                if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
                    return Some(dt.with_timezone(&Utc));
                }
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
            }
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp::Text(dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: Timestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// True when every OHLC field is a finite number.
    pub fn is_finite(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeFrame {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "1D")]
    Day1,
    #[serde(rename = "1W")]
    Week1,
}

impl TimeFrame {
    /// How much history the chart asks for at this timeframe.
    pub fn history_period(self) -> &'static str {
        match self {
            TimeFrame::Minute1 | TimeFrame::Minute5 => "1mo",
            TimeFrame::Minute15 => "3mo",
            TimeFrame::Hour1 => "6mo",
            TimeFrame::Day1 => "1y",
            TimeFrame::Week1 => "5y",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeFrame::Minute1 => "1m",
            TimeFrame::Minute5 => "5m",
            TimeFrame::Minute15 => "15m",
            TimeFrame::Hour1 => "1h",
            TimeFrame::Day1 => "1D",
            TimeFrame::Week1 => "1W",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "1m" => Some(TimeFrame::Minute1),
            "5m" => Some(TimeFrame::Minute5),
            "15m" => Some(TimeFrame::Minute15),
            "1h" => Some(TimeFrame::Hour1),
            "1D" => Some(TimeFrame::Day1),
            "1W" => Some(TimeFrame::Week1),
            _ => None,
        }
    }
}

/// History period for an arbitrary timeframe label; unknown labels get a year.
pub fn history_period_for(label: &str) -> &'static str {
    TimeFrame::from_label(label).map_or("1y", TimeFrame::history_period)
}

/// Where a series is drawn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OverlayPane {
    Price,
    Rsi,
    Macd,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OverlayStyle {
    Line,
    Histogram,
}

/// A derived series aligned index-for-index with the candle buffer.
/// `None` marks "no value yet", which is distinct from a computed zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlaySeries {
    pub name: String,
    pub parameters: serde_json::Value,
    pub pane: OverlayPane,
    pub style: OverlayStyle,
    pub values: Vec<Option<f64>>,
}

impl OverlaySeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Most recent defined value, if any.
    pub fn last_value(&self) -> Option<f64> {
        self.values.iter().rev().find_map(|v| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    #[test]
    fn test_timestamp_deserializes_number_or_string() {
        let epoch: Timestamp = serde_json::from_str("1700000000000").unwrap();
        assert_eq!(epoch, Timestamp::Epoch(1_700_000_000_000));
        let text: Timestamp = serde_json::from_str("\"2024-01-02\"").unwrap();
        assert_eq!(text, Timestamp::Text("2024-01-02".to_string()));
    }

    #[test]
    fn test_timestamp_to_datetime() {
        let day = Timestamp::Text("2024-01-02".to_string()).to_datetime().unwrap();
        assert_eq!((day.year(), day.month(), day.day()), (2024, 1, 2));

        let instant = Utc.with_ymd_and_hms(2024, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(Timestamp::from(instant).to_datetime(), Some(instant));
        assert_eq!(
            Timestamp::Epoch(instant.timestamp_millis()).to_datetime(),
            Some(instant)
        );
        assert_eq!(Timestamp::Text("yesterday".to_string()).to_datetime(), None);
    }

    #[test]
    fn test_history_period_mapping() {
        assert_eq!(history_period_for("1m"), "1mo");
        assert_eq!(history_period_for("15m"), "3mo");
        assert_eq!(history_period_for("1W"), "5y");
        assert_eq!(history_period_for("3D"), "1y");
        assert_eq!(TimeFrame::from_label("1h"), Some(TimeFrame::Hour1));
        let tf: TimeFrame = serde_json::from_str("\"1D\"").unwrap();
        assert_eq!(tf, TimeFrame::Day1);
    }

    #[test]
    fn test_overlay_last_value_skips_gaps() {
        let overlay = OverlaySeries {
            name: "SMA(3)".to_string(),
            parameters: serde_json::json!({ "period": 3 }),
            pane: OverlayPane::Price,
            style: OverlayStyle::Line,
            values: vec![None, Some(1.0), Some(2.0), None],
        };
        assert_eq!(overlay.last_value(), Some(2.0));
        assert_eq!(overlay.len(), 4);
    }
}
