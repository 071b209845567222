// Ingestion: history rows, live ticks, and tick-to-candle synthesis
pub mod history;
pub mod live;
pub mod tick_aggregator;
