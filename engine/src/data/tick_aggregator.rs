// Turns live price ticks into candles and appends them to the series.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::models::{Candle, Timestamp};

use crate::error::EngineError;
use crate::models::CandleSeries;

pub const WICK_FRACTION: f64 = 0.001;
pub const MAX_SYNTHETIC_VOLUME: f64 = 1_000_000.0;

/// Strategy for building a candle out of one price tick.
pub trait CandleSynthesizer: Send {
    fn synthesize(&mut self, price: f64) -> Candle;
}

/// One candle per tick: open and close at the price, wicks 0.1% either
/// side, random volume. A stand-in until real interval bucketing exists.
pub struct SyntheticCandles {
    rng: StdRng,
}

impl SyntheticCandles {
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for SyntheticCandles {
    fn default() -> Self {
        Self::new()
    }
}

impl CandleSynthesizer for SyntheticCandles {
    fn synthesize(&mut self, price: f64) -> Candle {
        let up = price * (1.0 + WICK_FRACTION);
        let down = price * (1.0 - WICK_FRACTION);
        Candle {
            timestamp: Timestamp::now(),
            open: price,
            // min/max keep low <= high for negative prices too
            high: up.max(down),
            low: up.min(down),
            close: price,
            volume: self.rng.gen_range(0.0..MAX_SYNTHETIC_VOLUME),
        }
    }
}

pub struct TickAggregator {
    synthesizer: Box<dyn CandleSynthesizer>,
}

impl TickAggregator {
    pub fn new(synthesizer: Box<dyn CandleSynthesizer>) -> Self {
        Self { synthesizer }
    }

    /// Synthesizes a candle for `price` and pushes it, returning whatever the
    /// push evicted. Non-finite prices are rejected and leave `series` as is.
    pub fn append(
        &mut self,
        series: &mut CandleSeries,
        price: f64,
    ) -> Result<Option<Candle>, EngineError> {
        if !price.is_finite() {
            return Err(EngineError::InvalidTick(format!(
                "price must be finite, got {}",
                price
            )));
        }
        let candle = self.synthesizer.synthesize(price);
        Ok(series.push(candle))
    }
}

impl Default for TickAggregator {
    fn default() -> Self {
        Self::new(Box::new(SyntheticCandles::new()))
    }
}
