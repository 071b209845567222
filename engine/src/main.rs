// Engine main entry point: one chart session fed by history and a simulated tick stream
use std::time::Duration;

use engine::config::settings::EngineSettings;
use engine::data::live::{run_tick_stream, simulated_price_stream};
use engine::services::{ChartSession, TracingSink};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    info!("Starting chart engine...");

    // Optional path to a settings file; the embedded defaults otherwise.
    let settings = match std::env::args().nth(1) {
        Some(path) => EngineSettings::load_from_file(&path)?,
        None => EngineSettings::load_default()?,
    };
    info!(
        symbol = %settings.symbol,
        timeframe = settings.timeframe.label(),
        capacity = settings.capacity,
        "Settings loaded"
    );

    let mut session = ChartSession::new(&settings.symbol, &settings, TracingSink)?;

    if let Some(source) = settings.history_source() {
        if let Err(e) = session.fetch_history(source.as_ref(), settings.timeframe) {
            warn!(error = %e, "Continuing without history");
        }
    }

    let start_price = session.series().latest().map_or(100.0, |c| c.close);
    let (tx, rx) = mpsc::channel(16);
    let producer = tokio::spawn(simulated_price_stream(
        tx,
        session.symbol().to_string(),
        start_price,
        settings.simulated_ticks,
        Duration::from_millis(settings.tick_interval_ms),
    ));

    let applied = run_tick_stream(&mut session, ReceiverStream::new(rx)).await;
    producer.await?;

    info!(
        session_id = %session.id(),
        applied,
        candles = session.series().len(),
        "Chart engine finished"
    );
    Ok(())
}
