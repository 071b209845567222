// Orchestration: chart sessions and the overlay recompute pipeline.
pub mod chart_session;
pub mod recompute;

pub use chart_session::ChartSession;
pub use recompute::{
    ChangeEvent, ChangeReason, ChartStats, OverlaySink, RecomputePipeline, RecordingSink,
    RenderFrame, TracingSink,
};
