// Relative Strength Index (RSI) indicator implementation
use super::IndicatorCalculator;
use serde_json::Value;
use shared::models::{OverlayPane, OverlaySeries, OverlayStyle};

pub const DEFAULT_PERIOD: usize = 14;

// Positive part of a price change; NaN stays NaN.
fn positive_part(change: f64) -> f64 {
    if change.is_nan() {
        f64::NAN
    } else if change > 0.0 {
        change
    } else {
        0.0
    }
}

/// Wilder-smoothed RSI with the averages seeded at zero.
///
/// Smoothing starts at index 1 with no warm-up gate, so only index 0 is
/// `None`. The gain/loss accumulators live for this call only; every call
/// starts again from the first value. While the smoothed loss is zero
/// (including flat runs) the index is pinned at 100. Substituting a
/// sentinel `rs = 100` there instead would give 99.0099..., which is not
/// what a pure uptrend should show.
pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }
    let period_f = period as f64;
    let mut gains = 0.0;
    let mut losses = 0.0;

    let mut results = Vec::with_capacity(values.len());
    for (i, &value) in values.iter().enumerate() {
        if i == 0 {
            results.push(None);
            continue;
        }
        let change = value - values[i - 1];
        gains = (gains * (period_f - 1.0) + positive_part(change)) / period_f;
        losses = (losses * (period_f - 1.0) + positive_part(-change)) / period_f;

        if losses == 0.0 {
            results.push(Some(100.0));
        } else {
            let rs = gains / losses;
            results.push(Some(100.0 - (100.0 / (1.0 + rs))));
        }
    }
    results
}

pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("RSI({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Rsi {
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
            pane: OverlayPane::Rsi,
            style: OverlayStyle::Line,
            values: rsi(closes, self.period),
        }]
    }
}
