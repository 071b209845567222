use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("History data format error: {0}")]
    HistoryFormatError(String),

    // Fetch or stream failures reported by the data provider.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid tick: {0}")]
    InvalidTick(String),
}

impl EngineError {
    /// Transport and format problems are shown to the user as a chart error
    /// state; everything else is a programming or setup mistake.
    pub fn is_display_error(&self) -> bool {
        matches!(
            self,
            EngineError::Transport(_)
                | EngineError::HistoryFormatError(_)
                | EngineError::CsvSystemError { .. }
                | EngineError::IoError { .. }
                | EngineError::JsonError { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::Transport("Could not fetch history for AAPL".to_string());
        assert_eq!(err.to_string(), "Transport error: Could not fetch history for AAPL");
        assert!(err.is_display_error());

        let err = EngineError::ConfigError("capacity must be greater than 0".to_string());
        assert!(!err.is_display_error());
    }

    #[test]
    fn test_display_classification() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "AAPL.csv");
        let shown = [
            EngineError::from(io),
            EngineError::HistoryFormatError("Missing 'Date' column".to_string()),
            EngineError::Transport("timeout".to_string()),
        ];
        assert!(shown.iter().all(EngineError::is_display_error));

        let hidden = [
            EngineError::ConfigError("capacity must be greater than 0".to_string()),
            EngineError::InvalidTick("NaN".to_string()),
        ];
        assert!(!hidden.iter().any(EngineError::is_display_error));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: EngineError = json_err.into();
        assert!(matches!(err, EngineError::JsonError { .. }));
    }
}
