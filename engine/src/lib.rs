// Engine library root: candle buffer, indicators, ingestion and the recompute pipeline.

pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod models;
pub mod services;

pub use error::EngineError;
