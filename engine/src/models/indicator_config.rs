// Which indicators a chart shows, and with what parameters.
use serde::{Deserialize, Serialize};

pub const DEFAULT_SMA_PERIOD: usize = 20;
pub const DEFAULT_EMA_PERIOD: usize = 50;
pub const DEFAULT_RSI_PERIOD: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self { fast: 12, slow: 26, signal: 9 }
    }
}

/// `None` on any field means the indicator is disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub sma: Option<usize>,
    pub ema: Option<usize>,
    pub rsi: Option<usize>,
    pub macd: Option<MacdParams>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Macd,
}

/// A single editable number on the configuration surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorParam {
    SmaPeriod,
    EmaPeriod,
    RsiPeriod,
    MacdFast,
    MacdSlow,
    MacdSignal,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma: Some(DEFAULT_SMA_PERIOD),
            ema: Some(DEFAULT_EMA_PERIOD),
            rsi: Some(DEFAULT_RSI_PERIOD),
            macd: Some(MacdParams::default()),
        }
    }
}

/// Parses a period typed by the user. Empty, non-numeric and zero input all
/// mean "off".
pub fn parse_period(input: &str) -> Option<usize> {
    input.trim().parse::<usize>().ok().filter(|p| *p > 0)
}

impl IndicatorConfig {
    pub fn disabled() -> Self {
        Self { sma: None, ema: None, rsi: None, macd: None }
    }

    pub fn is_enabled(&self, kind: IndicatorKind) -> bool {
        match kind {
            IndicatorKind::Sma => self.sma.is_some(),
            IndicatorKind::Ema => self.ema.is_some(),
            IndicatorKind::Rsi => self.rsi.is_some(),
            IndicatorKind::Macd => self.macd.is_some(),
        }
    }

    /// Flips an indicator on or off. Turning one on restores its default parameters.
    pub fn toggle(&mut self, kind: IndicatorKind) {
        match kind {
            IndicatorKind::Sma => {
                self.sma = if self.sma.is_some() { None } else { Some(DEFAULT_SMA_PERIOD) }
            }
            IndicatorKind::Ema => {
                self.ema = if self.ema.is_some() { None } else { Some(DEFAULT_EMA_PERIOD) }
            }
            IndicatorKind::Rsi => {
                self.rsi = if self.rsi.is_some() { None } else { Some(DEFAULT_RSI_PERIOD) }
            }
            IndicatorKind::Macd => {
                self.macd = if self.macd.is_some() { None } else { Some(MacdParams::default()) }
            }
        }
    }

    /// Applies a raw edit from the configuration surface. Invalid input
    /// disables the owning indicator instead of failing. Editing a MACD field
    /// while MACD is off starts from the default parameters.
    pub fn set_parameter(&mut self, param: IndicatorParam, input: &str) {
        let value = parse_period(input);
        match param {
            IndicatorParam::SmaPeriod => self.sma = value,
            IndicatorParam::EmaPeriod => self.ema = value,
            IndicatorParam::RsiPeriod => self.rsi = value,
            IndicatorParam::MacdFast | IndicatorParam::MacdSlow | IndicatorParam::MacdSignal => {
                // Bad input in any one field switches the whole oscillator
                // off; the other fields do not fall back to their defaults.
                let Some(value) = value else {
                    self.macd = None;
                    return;
                };
                let mut macd = self.macd.unwrap_or_default();
                match param {
                    IndicatorParam::MacdFast => macd.fast = value,
                    IndicatorParam::MacdSlow => macd.slow = value,
                    _ => macd.signal = value,
                }
                self.macd = Some(macd);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::IndicatorCalculator;

    #[test]
    fn test_parse_period() {
        assert_eq!(parse_period("20"), Some(20));
        assert_eq!(parse_period(" 7 "), Some(7));
        assert_eq!(parse_period(""), None);
        assert_eq!(parse_period("0"), None);
        assert_eq!(parse_period("abc"), None);
        assert_eq!(parse_period("-3"), None);
        assert_eq!(parse_period("2.5"), None);
    }

    #[test]
    fn test_toggle_restores_defaults() {
        let mut config = IndicatorConfig::disabled();
        config.toggle(IndicatorKind::Ema);
        assert_eq!(config.ema, Some(DEFAULT_EMA_PERIOD));
        config.toggle(IndicatorKind::Macd);
        assert_eq!(config.macd, Some(MacdParams { fast: 12, slow: 26, signal: 9 }));
        config.toggle(IndicatorKind::Ema);
        assert!(!config.is_enabled(IndicatorKind::Ema));
        assert!(config.is_enabled(IndicatorKind::Macd));
    }

    #[test]
    fn test_invalid_parameter_disables() {
        let mut config = IndicatorConfig::default();
        config.set_parameter(IndicatorParam::SmaPeriod, "");
        assert_eq!(config.sma, None);
        config.set_parameter(IndicatorParam::RsiPeriod, "nope");
        assert_eq!(config.rsi, None);
        config.set_parameter(IndicatorParam::MacdSlow, "0");
        assert_eq!(config.macd, None);
        assert_eq!(config.ema, Some(DEFAULT_EMA_PERIOD));
    }

    #[test]
    fn test_bad_macd_field_disables_whole_macd() {
        let mut config = IndicatorConfig::default();
        config.set_parameter(IndicatorParam::MacdFast, "8");
        config.set_parameter(IndicatorParam::MacdSignal, "x");
        assert_eq!(config.macd, None);
        assert!(config.calculators().iter().all(|c| !c.name().starts_with("MACD")));
    }

    #[test]
    fn test_macd_edit_starts_from_defaults() {
        let mut config = IndicatorConfig::disabled();
        config.set_parameter(IndicatorParam::MacdSignal, "5");
        assert_eq!(config.macd, Some(MacdParams { fast: 12, slow: 26, signal: 5 }));
        config.set_parameter(IndicatorParam::MacdFast, "8");
        assert_eq!(config.macd.map(|m| m.fast), Some(8));
    }

    #[test]
    fn test_deserialize_with_nulls() {
        let config: IndicatorConfig = serde_json::from_str(
            r#"{ "sma": 10, "ema": null, "rsi": 14, "macd": { "fast": 3, "slow": 6, "signal": 2 } }"#,
        )
        .unwrap();
        assert_eq!(config.sma, Some(10));
        assert_eq!(config.ema, None);
        assert_eq!(config.macd, Some(MacdParams { fast: 3, slow: 6, signal: 2 }));
    }
}
