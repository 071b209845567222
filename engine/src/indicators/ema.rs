// Exponential Moving Average (EMA) indicator implementation
use super::IndicatorCalculator;
use serde_json::Value;
use shared::models::{OverlayPane, OverlaySeries, OverlayStyle};

/// The raw recurrence, seeded with the first value:
/// `out[0] = v[0]`, `out[i] = (v[i] - out[i-1]) * k + out[i-1]`, `k = 2 / (period + 1)`.
pub fn ema_recurrence(values: &[f64], period: usize) -> Vec<f64> {
    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut results = Vec::with_capacity(values.len());
    let mut previous: Option<f64> = None;
    for &value in values {
        let ema = match previous {
            None => value,
            Some(prev) => (value - prev) * multiplier + prev,
        };
        results.push(ema);
        previous = Some(ema);
    }
    results
}

/// EMA for display. The recurrence runs over every value, then the first
/// `period - 1` outputs are blanked so the warm-up lines up with SMA. Values
/// from index `period - 1` on still carry the blanked samples' weight.
pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }
    let warm_up = (period - 1).min(values.len());
    let mut results: Vec<Option<f64>> = ema_recurrence(values, period).into_iter().map(Some).collect();
    for slot in results.iter_mut().take(warm_up) {
        *slot = None;
    }
    results
}

pub struct Ema {
    name: String,
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("EMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, closes: &[f64]) -> Vec<OverlaySeries> {
        vec![OverlaySeries {
            name: self.name.clone(),
            parameters: self.parameters(),
            pane: OverlayPane::Price,
            style: OverlayStyle::Line,
            values: ema(closes, self.period),
        }]
    }
}
