// Engine-owned state models. Plain candle and overlay types live in `shared`.
pub mod candle_series;
pub mod indicator_config;

pub use candle_series::{CandleSeries, DEFAULT_CAPACITY};
pub use indicator_config::{IndicatorConfig, IndicatorKind, IndicatorParam, MacdParams};
