// One symbol's chart: candle buffer, indicator config and the recompute loop.
use shared::models::{Candle, TimeFrame};
use uuid::Uuid;

use super::recompute::{ChangeEvent, ChangeReason, OverlaySink, RecomputePipeline};
use crate::config::settings::EngineSettings;
use crate::data::history::{sanitize_rows, HistoryRequest, HistorySource};
use crate::data::live::parse_tick_message;
use crate::data::tick_aggregator::{CandleSynthesizer, SyntheticCandles, TickAggregator};
use crate::error::EngineError;
use crate::models::{CandleSeries, IndicatorConfig, IndicatorKind, IndicatorParam};

/// Owns the only writable copy of a symbol's candles and indicator config.
/// Every successful mutation emits exactly one [`ChangeEvent`], and the
/// pipeline publishes one frame for it before the call returns.
pub struct ChartSession<S: OverlaySink> {
    id: Uuid,
    symbol: String,
    series: CandleSeries,
    config: IndicatorConfig,
    aggregator: TickAggregator,
    pipeline: RecomputePipeline,
    sink: S,
}

impl<S: OverlaySink> ChartSession<S> {
    pub fn new(symbol: &str, settings: &EngineSettings, sink: S) -> Result<Self, EngineError> {
        Self::with_synthesizer(symbol, settings, sink, Box::new(SyntheticCandles::new()))
    }

    pub fn with_synthesizer(
        symbol: &str,
        settings: &EngineSettings,
        sink: S,
        synthesizer: Box<dyn CandleSynthesizer>,
    ) -> Result<Self, EngineError> {
        let session = Self {
            id: Uuid::new_v4(),
            symbol: symbol.to_uppercase(),
            series: CandleSeries::new(settings.capacity)?,
            config: settings.indicators.clone(),
            aggregator: TickAggregator::new(synthesizer),
            pipeline: RecomputePipeline::new(),
            sink,
        };
        tracing::info!(
            session_id = %session.id,
            symbol = %session.symbol,
            capacity = settings.capacity,
            "Chart session opened"
        );
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn series(&self) -> &CandleSeries {
        &self.series
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn notify(&mut self, reason: ChangeReason) {
        self.pipeline.on_change(
            ChangeEvent::new(reason),
            &self.symbol,
            &self.series,
            &self.config,
            &mut self.sink,
        );
    }

    /// Backfills from history rows. Rows with non-finite prices are dropped
    /// first; if nothing usable remains the series is left alone.
    pub fn load_history(&mut self, rows: Vec<Candle>) -> bool {
        let (rows, dropped) = sanitize_rows(rows);
        if dropped > 0 {
            tracing::warn!(symbol = %self.symbol, dropped, "Dropped malformed history rows");
        }
        let count = rows.len();
        if !self.series.replace(rows) {
            tracing::warn!(symbol = %self.symbol, "History load had no usable rows; keeping current candles");
            return false;
        }
        tracing::info!(symbol = %self.symbol, candles = count, "History loaded");
        self.notify(ChangeReason::DataReplaced);
        true
    }

    /// Fetches history for the session's symbol at `timeframe` and loads it.
    /// On failure the series is untouched; transport and format errors are
    /// also shown on the sink.
    pub fn fetch_history<H: HistorySource + ?Sized>(
        &mut self,
        source: &H,
        timeframe: TimeFrame,
    ) -> Result<bool, EngineError> {
        let request = HistoryRequest::new(&self.symbol, timeframe.history_period());
        match source.fetch(&request) {
            Ok(rows) => Ok(self.load_history(rows)),
            Err(e) => {
                tracing::error!(
                    symbol = %self.symbol,
                    period = %request.period,
                    error = %e,
                    "History fetch failed"
                );
                if e.is_display_error() {
                    self.sink.report_error(&format!("Failed to load chart: {}", e));
                }
                Err(e)
            }
        }
    }

    /// Appends a candle for a live price.
    pub fn on_tick(&mut self, price: f64) -> Result<(), EngineError> {
        self.aggregator.append(&mut self.series, price)?;
        self.notify(ChangeReason::DataAppended);
        Ok(())
    }

    /// Applies one raw stream message. Returns whether it produced a candle;
    /// messages without a usable price for this symbol are skipped.
    pub fn on_stream_message(&mut self, message: &str) -> bool {
        let Some(price) = parse_tick_message(message, &self.symbol) else {
            return false;
        };
        match self.on_tick(price) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(symbol = %self.symbol, error = %e, "Rejected tick");
                false
            }
        }
    }

    /// Replaces the whole config. Returns whether it differed from the current one.
    pub fn set_config(&mut self, config: IndicatorConfig) -> bool {
        if config == self.config {
            return false;
        }
        self.config = config;
        self.notify(ChangeReason::ConfigChanged);
        true
    }

    pub fn toggle(&mut self, kind: IndicatorKind) -> bool {
        let mut config = self.config.clone();
        config.toggle(kind);
        self.set_config(config)
    }

    /// Raw numeric edit; invalid input turns the indicator off.
    pub fn set_parameter(&mut self, param: IndicatorParam, input: &str) -> bool {
        let mut config = self.config.clone();
        config.set_parameter(param, input);
        self.set_config(config)
    }
}
