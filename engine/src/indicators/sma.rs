// Simple Moving Average (SMA) indicator implementation
use super::IndicatorCalculator;
use serde_json::Value;
use shared::models::{OverlayPane, OverlaySeries, OverlayStyle};

/// Trailing mean over `period` values; `None` until the first full window.
///
/// Each window is summed on its own rather than slid, so a `NaN` only
/// poisons the windows that actually contain it.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                None
            } else {
                let window = &values[i + 1 - period..=i];
                Some(window.iter().sum::<f64>() / period as f64)
            }
        })
        .collect()
}

pub struct Sma {
    name: String,
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("SMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Sma {
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
            values: sma(closes, self.period),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::assert_series_eq;

    #[test]
    fn test_sma_calculation() {
        let results = sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(results, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_sma_insufficient_data() {
        assert_eq!(sma(&[1.0, 2.0], 3), vec![None, None]);
    }

    #[test]
    fn test_sma_period_one() {
        // SMA(1) is just the close price
        assert_eq!(sma(&[1.0, 2.0, 3.0], 1), vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_sma_empty_data() {
        assert!(sma(&[], 3).is_empty());
    }

    #[test]
    fn test_sma_period_zero_is_all_none() {
        assert_eq!(sma(&[1.0, 2.0], 0), vec![None, None]);
    }

    #[test]
    fn test_sma_matches_trailing_mean() {
        let closes = [3.5, 7.25, 1.0, 9.0, 4.75, 6.0, 2.5];
        let period = 4;
        let results = sma(&closes, period);
        assert_eq!(results.len(), closes.len());
        let expected: Vec<Option<f64>> = (0..closes.len())
            .map(|i| {
                (i + 1 >= period)
                    .then(|| closes[i + 1 - period..=i].iter().sum::<f64>() / period as f64)
            })
            .collect();
        assert_series_eq(&results, &expected);
    }

    #[test]
    fn test_sma_nan_stays_local() {
        let results = sma(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 2);
        assert!(results[1].unwrap().is_nan());
        assert!(results[2].unwrap().is_nan());
        assert_eq!(results[3], Some(3.5));
    }

    #[test]
    fn test_sma_overlay() {
        let overlays = Sma::new(2).calculate(&[2.0, 4.0]);
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays[0].name, "SMA(2)");
        assert_eq!(overlays[0].pane, OverlayPane::Price);
        assert_eq!(overlays[0].parameters, serde_json::json!({ "period": 2 }));
        assert_eq!(overlays[0].values, vec![None, Some(3.0)]);
    }
}
