// Technical indicators module
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::{ema, ema_recurrence, Ema};
pub use macd::{macd, Macd, MacdOutput};
pub use rsi::{rsi, Rsi};
pub use sma::{sma, Sma};

use crate::models::IndicatorConfig;
use serde_json::Value;
use shared::models::OverlaySeries;

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    // One or more overlays, each the same length as `closes`.
    fn calculate(&self, closes: &[f64]) -> Vec<OverlaySeries>;
}

impl IndicatorConfig {
    /// Calculators for every enabled indicator, in display order: SMA, EMA, RSI, MACD.
    pub fn calculators(&self) -> Vec<Box<dyn IndicatorCalculator>> {
        let mut calculators: Vec<Box<dyn IndicatorCalculator>> = Vec::new();
        if let Some(period) = self.sma {
            calculators.push(Box::new(Sma::new(period)));
        }
        if let Some(period) = self.ema {
            calculators.push(Box::new(Ema::new(period)));
        }
        if let Some(period) = self.rsi {
            calculators.push(Box::new(Rsi::new(period)));
        }
        if let Some(params) = self.macd {
            calculators.push(Box::new(Macd::new(params)));
        }
        calculators
    }
}
