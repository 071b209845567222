// Live price stream: message parsing, the consumer loop, and a simulated producer.
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tokio_stream::{Stream, StreamExt};

use crate::services::{ChartSession, OverlaySink};

/// Extracts the price for `symbol` from one stream message.
///
/// Accepts a server-sent-events frame (`data: {...}` lines) or the bare JSON
/// object. Symbols match case-insensitively. A missing, `null` or
/// non-numeric price, and any payload that is not a JSON object, yield `None`.
pub fn parse_tick_message(message: &str, symbol: &str) -> Option<f64> {
    let data_lines: Vec<&str> = message
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(str::trim)
        .collect();
    let payload = if data_lines.is_empty() {
        message.trim().to_string()
    } else {
        data_lines.join("\n")
    };
    if payload.is_empty() {
        return None;
    }

    let prices: Map<String, Value> = match serde_json::from_str(&payload) {
        Ok(prices) => prices,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring unparseable tick message");
            return None;
        }
    };
    prices
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(symbol))
        .and_then(|(_, v)| v.as_f64())
}

/// Feeds every message of `stream` to `session` in arrival order until the
/// stream ends. Returns the number of ticks that became candles.
pub async fn run_tick_stream<K, S>(session: &mut ChartSession<K>, mut stream: S) -> usize
where
    K: OverlaySink,
    S: Stream<Item = String> + Unpin,
{
    let mut applied = 0;
    while let Some(message) = stream.next().await {
        if session.on_stream_message(&message) {
            applied += 1;
        }
    }
    tracing::info!(symbol = %session.symbol(), applied, "Tick stream closed");
    applied
}

/// Encodes one `{symbol: price|null}` map as an SSE frame.
pub fn sse_frame(symbol: &str, price: Option<f64>) -> String {
    let mut payload = Map::new();
    payload.insert(
        symbol.to_uppercase(),
        price.map_or(Value::Null, |p| serde_json::json!(p)),
    );
    format!("data: {}\n\n", Value::Object(payload))
}

/// Producer for demos: a random walk around `start_price`, sent as SSE frames.
/// Roughly one tick in ten carries no price, like a provider hiccup. Stops
/// after `ticks` frames or when the receiver is dropped.
pub async fn simulated_price_stream(
    tx: mpsc::Sender<String>,
    symbol: String,
    start_price: f64,
    ticks: usize,
    interval: Duration,
) {
    let mut rng = StdRng::from_entropy();
    let mut price = start_price;
    for _ in 0..ticks {
        tokio::time::sleep(interval).await;
        let frame = if rng.gen_bool(0.1) {
            sse_frame(&symbol, None)
        } else {
            price = (price * (1.0 + rng.gen_range(-0.005..0.005))).max(0.01);
            sse_frame(&symbol, Some(price))
        };
        if tx.send(frame).await.is_err() {
            tracing::debug!(%symbol, "Tick receiver dropped; stopping producer");
            break;
        }
    }
}
