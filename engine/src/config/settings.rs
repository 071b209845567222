// Engine settings, loaded from the embedded default config or a JSON file
use std::path::{Path, PathBuf};

use serde::Deserialize;
use shared::models::TimeFrame;

use crate::data::history::{CsvHistorySource, HistorySource, JsonHistorySource};
use crate::error::EngineError;
use crate::models::{IndicatorConfig, DEFAULT_CAPACITY};

/// On-disk layout of the files under `history_dir`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HistoryFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EngineSettings {
    pub symbol: String,
    pub timeframe: TimeFrame,
    pub capacity: usize,
    pub indicators: IndicatorConfig,
    // Directory of `<SYMBOL>.csv` or `<SYMBOL>.json` history files; no backfill when absent.
    // Relative paths that do not exist from the working directory are tried
    // against the engine crate root.
    pub history_dir: Option<PathBuf>,
    pub history_format: HistoryFormat,
    pub tick_interval_ms: u64,
    pub simulated_ticks: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            symbol: "AAPL".to_string(),
            timeframe: TimeFrame::Day1,
            capacity: DEFAULT_CAPACITY,
            indicators: IndicatorConfig::default(),
            history_dir: None,
            history_format: HistoryFormat::Csv,
            tick_interval_ms: 2000,
            simulated_ticks: 30,
        }
    }
}

impl EngineSettings {
    pub fn load_default() -> Result<Self, EngineError> {
        let config_str = include_str!("../../assets/config/default.json");
        Self::from_json(config_str)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let config_str = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&config_str)
    }

    pub fn from_json(config_str: &str) -> Result<Self, EngineError> {
        let settings: EngineSettings = serde_json::from_str(config_str)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn history_path(&self) -> Option<PathBuf> {
        let dir = self.history_dir.as_ref()?;
        if dir.is_absolute() || dir.exists() {
            return Some(dir.clone());
        }
        let from_crate = Path::new(env!("CARGO_MANIFEST_DIR")).join(dir);
        if from_crate.exists() {
            Some(from_crate)
        } else {
            Some(dir.clone())
        }
    }

    /// The configured history source, if any.
    pub fn history_source(&self) -> Option<Box<dyn HistorySource>> {
        let dir = self.history_path()?;
        Some(match self.history_format {
            HistoryFormat::Csv => Box::new(CsvHistorySource::new(dir)),
            HistoryFormat::Json => Box::new(JsonHistorySource::new(dir)),
        })
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.capacity == 0 {
            return Err(EngineError::ConfigError("capacity must be greater than 0".to_string()));
        }
        if self.tick_interval_ms == 0 {
            return Err(EngineError::ConfigError(
                "tick_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.symbol.trim().is_empty() {
            return Err(EngineError::ConfigError("symbol must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MacdParams;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_embedded_default_loads() {
        let settings = EngineSettings::load_default().unwrap();
        assert_eq!(settings.capacity, 200);
        assert_eq!(settings.timeframe, TimeFrame::Day1);
        assert_eq!(settings.indicators.rsi, Some(14));
        assert_eq!(settings.indicators.macd, Some(MacdParams::default()));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = EngineSettings::from_json(r#"{ "symbol": "MSFT", "timeframe": "1h" }"#).unwrap();
        assert_eq!(settings.symbol, "MSFT");
        assert_eq!(settings.timeframe, TimeFrame::Hour1);
        assert_eq!(settings.capacity, DEFAULT_CAPACITY);
        assert_eq!(settings.indicators, IndicatorConfig::default());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let result = EngineSettings::from_json(r#"{ "capacity": 0 }"#);
        assert!(matches!(result, Err(EngineError::ConfigError(_))));
        let result = EngineSettings::from_json(r#"{ "tick_interval_ms": 0 }"#);
        assert!(matches!(result, Err(EngineError::ConfigError(_))));
        let result = EngineSettings::from_json(r#"{ "timeframe": "2h" }"#);
        assert!(matches!(result, Err(EngineError::JsonError { .. })));
    }

    #[test]
    fn test_default_history_dir_resolves_from_crate_root() {
        let settings = EngineSettings::load_default().unwrap();
        let dir = settings.history_path().unwrap();
        assert!(dir.join("AAPL.csv").exists(), "{}", dir.display());
        assert_eq!(settings.history_format, HistoryFormat::Csv);
    }

    #[test]
    fn test_history_source_follows_format() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("AAPL.json"), r#"[{"date":1,"open":1,"high":2,"low":0.5,"close":1.5}]"#).unwrap();
        let settings = EngineSettings {
            history_dir: Some(dir.path().to_path_buf()),
            history_format: HistoryFormat::Json,
            ..EngineSettings::default()
        };
        let source = settings.history_source().unwrap();
        let rows = source.fetch(&crate::data::history::HistoryRequest::new("AAPL", "1y")).unwrap();
        assert_eq!(rows.len(), 1);

        assert!(EngineSettings::default().history_source().is_none());
        let parsed = EngineSettings::from_json(r#"{ "history_format": "json" }"#).unwrap();
        assert_eq!(parsed.history_format, HistoryFormat::Json);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "indicators": {{ "sma": 5, "ema": null, "rsi": null, "macd": null }} }}"#).unwrap();
        let settings = EngineSettings::load_from_file(file.path()).unwrap();
        assert_eq!(settings.indicators.sma, Some(5));
        assert_eq!(settings.indicators.ema, None);
    }
}
