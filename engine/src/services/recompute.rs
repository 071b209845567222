// Keeps overlay series in step with the candle buffer and the indicator config.
use serde::Serialize;
use shared::models::{Candle, OverlaySeries};

use crate::models::{CandleSeries, IndicatorConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChangeReason {
    /// History backfill swapped the whole series.
    DataReplaced,
    /// A live tick appended a candle.
    DataAppended,
    ConfigChanged,
}

/// The single notification type the pipeline consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub reason: ChangeReason,
}

impl ChangeEvent {
    pub fn new(reason: ChangeReason) -> Self {
        Self { reason }
    }
}

/// Header figures for the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartStats {
    pub high: f64,
    pub low: f64,
    pub avg: f64,
    pub range: f64,
}

impl ChartStats {
    pub fn from_candles(candles: &[Candle]) -> Option<Self> {
        if candles.is_empty() {
            return None;
        }
        let high = candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let low = candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let avg = candles.iter().map(|c| c.close).sum::<f64>() / candles.len() as f64;
        Some(Self { high, low, avg, range: high - low })
    }
}

/// Everything the rendering surface needs after one change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub revision: u64,
    pub reason: ChangeReason,
    pub symbol: String,
    pub candles: Vec<Candle>,
    pub overlays: Vec<OverlaySeries>,
    pub stats: Option<ChartStats>,
}

impl RenderFrame {
    pub fn overlay(&self, name: &str) -> Option<&OverlaySeries> {
        self.overlays.iter().find(|o| o.name == name)
    }
}

/// The rendering surface.
pub trait OverlaySink {
    fn publish(&mut self, frame: RenderFrame);

    /// Display-level error state, e.g. a failed history fetch.
    fn report_error(&mut self, _message: &str) {}
}

/// Keeps every frame and error it is handed.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<RenderFrame>,
    pub errors: Vec<String>,
}

impl RecordingSink {
    pub fn last(&self) -> Option<&RenderFrame> {
        self.frames.last()
    }
}

impl OverlaySink for RecordingSink {
    fn publish(&mut self, frame: RenderFrame) {
        self.frames.push(frame);
    }

    fn report_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

/// Logs a one-line summary of each frame.
#[derive(Debug, Default)]
pub struct TracingSink;

impl OverlaySink for TracingSink {
    fn publish(&mut self, frame: RenderFrame) {
        let last_close = frame.candles.last().map(|c| c.close);
        tracing::info!(
            symbol = %frame.symbol,
            revision = frame.revision,
            reason = ?frame.reason,
            candles = frame.candles.len(),
            overlays = frame.overlays.len(),
            ?last_close,
            "Chart frame published"
        );
        for overlay in &frame.overlays {
            tracing::debug!(name = %overlay.name, last = ?overlay.last_value(), "Overlay");
        }
    }

    fn report_error(&mut self, message: &str) {
        tracing::error!(%message, "Chart error state");
    }
}

/// Stateless apart from the frame counter: every recompute runs each enabled
/// indicator from scratch over the current snapshot.
#[derive(Debug, Default)]
pub struct RecomputePipeline {
    revision: u64,
}

impl RecomputePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn recompute(
        &mut self,
        reason: ChangeReason,
        symbol: &str,
        series: &CandleSeries,
        config: &IndicatorConfig,
    ) -> RenderFrame {
        let candles = series.snapshot();
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let overlays: Vec<OverlaySeries> = config
            .calculators()
            .iter()
            .flat_map(|calculator| calculator.calculate(&closes))
            .collect();

        self.revision += 1;
        tracing::debug!(
            %symbol,
            revision = self.revision,
            ?reason,
            candles = candles.len(),
            overlays = overlays.len(),
            "Recomputed overlays"
        );
        RenderFrame {
            revision: self.revision,
            reason,
            symbol: symbol.to_string(),
            stats: ChartStats::from_candles(&candles),
            candles,
            overlays,
        }
    }

    /// Handles one change notification: recompute, then publish to `sink`.
    pub fn on_change<S: OverlaySink + ?Sized>(
        &mut self,
        event: ChangeEvent,
        symbol: &str,
        series: &CandleSeries,
        config: &IndicatorConfig,
        sink: &mut S,
    ) {
        let frame = self.recompute(event.reason, symbol, series, config);
        sink.publish(frame);
    }
}
