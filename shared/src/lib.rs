// Plain data models shared by the chart engine and whatever renders its output.
pub mod models;
pub mod utils;

pub use models::{
    history_period_for, Candle, OverlayPane, OverlaySeries, OverlayStyle, TimeFrame, Timestamp,
};
