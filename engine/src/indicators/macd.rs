// Moving Average Convergence/Divergence (MACD) indicator implementation
use super::ema::ema;
use super::IndicatorCalculator;
use crate::models::MacdParams;
use serde_json::Value;
use shared::models::{OverlayPane, OverlaySeries, OverlayStyle};

#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub hist: Vec<Option<f64>>,
}

fn difference(a: &[Option<f64>], b: &[Option<f64>]) -> Vec<Option<f64>> {
    a.iter()
        .zip(b)
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some(x - y),
            _ => None,
        })
        .collect()
}

/// MACD line, signal line and histogram, all the length of `values`.
///
/// The signal EMA is fed the MACD line with its warm-up gaps read as zero,
/// so early signal values lean toward zero.
pub fn macd(values: &[f64], fast: usize, slow: usize, signal: usize) -> MacdOutput {
    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);
    let macd_line = difference(&fast_ema, &slow_ema);

    let zero_filled: Vec<f64> = macd_line.iter().map(|v| v.unwrap_or(0.0)).collect();
    let signal_line = ema(&zero_filled, signal);
    let hist = difference(&macd_line, &signal_line);

    MacdOutput {
        macd: macd_line,
        signal: signal_line,
        hist,
    }
}

pub struct Macd {
    name: String,
    params: MacdParams,
}

impl Macd {
    pub fn new(params: MacdParams) -> Self {
        Self {
            name: format!("MACD({},{},{})", params.fast, params.slow, params.signal),
            params,
        }
    }
}

impl IndicatorCalculator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "fast": self.params.fast,
            "slow": self.params.slow,
            "signal": self.params.signal,
        })
    }

    fn calculate(&self, closes: &[f64]) -> Vec<OverlaySeries> {
        let MacdOutput { macd, signal, hist } =
            macd(closes, self.params.fast, self.params.slow, self.params.signal);
        let series = |name: &str, style: OverlayStyle, values: Vec<Option<f64>>| OverlaySeries {
            name: name.to_string(),
            parameters: self.parameters(),
            pane: OverlayPane::Macd,
            style,
            values,
        };
        vec![
            series("MACD", OverlayStyle::Line, macd),
            series("Signal", OverlayStyle::Line, signal),
            series("MACD Hist", OverlayStyle::Histogram, hist),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::assert_close;

    fn sample_closes() -> Vec<f64> {
        (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.3).collect()
    }

    #[test]
    fn test_macd_line_is_ema_difference() {
        let closes = sample_closes();
        let out = macd(&closes, 12, 26, 9);
        let fast = ema(&closes, 12);
        let slow = ema(&closes, 26);
        for i in 0..closes.len() {
            match (fast[i], slow[i]) {
                (Some(f), Some(s)) => assert_close(out.macd[i].unwrap(), f - s),
                _ => assert_eq!(out.macd[i], None),
            }
        }
        // Defined once the slow EMA is past its warm-up.
        assert_eq!(out.macd[24], None);
        assert!(out.macd[25].is_some());
    }

    #[test]
    fn test_macd_signal_reads_gaps_as_zero() {
        let closes = sample_closes();
        let out = macd(&closes, 12, 26, 9);
        let zero_filled: Vec<f64> = out.macd.iter().map(|v| v.unwrap_or(0.0)).collect();
        assert_eq!(out.signal, ema(&zero_filled, 9));
        // Signal is past its own warm-up before the MACD line exists.
        assert_eq!(out.signal[8], Some(0.0));
        assert_eq!(out.hist[8], None);
    }

    #[test]
    fn test_macd_histogram() {
        let closes = sample_closes();
        let out = macd(&closes, 12, 26, 9);
        for i in 0..closes.len() {
            match (out.macd[i], out.signal[i]) {
                (Some(m), Some(s)) => assert_close(out.hist[i].unwrap(), m - s),
                _ => assert_eq!(out.hist[i], None),
            }
        }
    }

    #[test]
    fn test_macd_lengths_and_empty() {
        let out = macd(&[1.0, 2.0, 3.0], 12, 26, 9);
        assert_eq!(out.macd, vec![None; 3]);
        assert_eq!(out.signal.len(), 3);
        assert_eq!(out.hist, vec![None; 3]);

        let empty = macd(&[], 12, 26, 9);
        assert!(empty.macd.is_empty() && empty.signal.is_empty() && empty.hist.is_empty());
    }

    #[test]
    fn test_macd_overlays() {
        let overlays = Macd::new(MacdParams::default()).calculate(&sample_closes());
        let names: Vec<&str> = overlays.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["MACD", "Signal", "MACD Hist"]);
        assert!(overlays.iter().all(|o| o.pane == OverlayPane::Macd));
        assert_eq!(overlays[2].style, OverlayStyle::Histogram);
        assert_eq!(
            overlays[0].parameters,
            serde_json::json!({ "fast": 12, "slow": 26, "signal": 9 })
        );
    }
}
