// Bounded, chronologically ordered candle buffer backing one chart.
use std::collections::VecDeque;

use shared::models::Candle;

use crate::error::EngineError;

pub const DEFAULT_CAPACITY: usize = 200;

/// Ring buffer of candles with FIFO eviction on `push`.
///
/// `replace` stores history verbatim, even when it is longer than the
/// capacity; the capacity only bounds live growth. Once over capacity, each
/// push evicts exactly one candle from the front.
#[derive(Debug, Clone)]
pub struct CandleSeries {
    candles: VecDeque<Candle>,
    capacity: usize,
}

impl CandleSeries {
    pub fn new(capacity: usize) -> Result<Self, EngineError> {
        if capacity == 0 {
            return Err(EngineError::ConfigError(
                "Candle series capacity must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            candles: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Discards the current candles and stores `rows` as given.
    /// Empty input leaves the series untouched; returns whether anything changed.
    pub fn replace(&mut self, rows: Vec<Candle>) -> bool {
        if rows.is_empty() {
            return false;
        }
        self.candles = VecDeque::from(rows);
        true
    }

    /// Appends a candle, evicting the oldest one if the series grew past capacity.
    pub fn push(&mut self, candle: Candle) -> Option<Candle> {
        self.candles.push_back(candle);
        if self.candles.len() > self.capacity {
            self.candles.pop_front()
        } else {
            None
        }
    }

    /// Owned copy of the candles in time order.
    pub fn snapshot(&self) -> Vec<Candle> {
        self.candles.iter().cloned().collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn latest(&self) -> Option<&Candle> {
        self.candles.back()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for CandleSeries {
    fn default() -> Self {
        Self {
            candles: VecDeque::with_capacity(DEFAULT_CAPACITY),
            capacity: DEFAULT_CAPACITY,
        }
    }
}
