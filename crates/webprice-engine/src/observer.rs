//! Progress reporting for the analysis pipeline.
//!
//! The pipeline itself never logs: it hands a [`StageEvent`] to whichever
//! [`PipelineObserver`] the caller supplies.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Decode,
    Locate,
    ReadTable,
    MapColumns,
    Materialize,
    Suggest,
    Summarize,
}

impl Stage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Decode => "decode",
            Self::Locate => "locate",
            Self::ReadTable => "read_table",
            Self::MapColumns => "map_columns",
            Self::Materialize => "materialize",
            Self::Suggest => "suggest",
            Self::Summarize => "summarize",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageEvent {
    pub stage: Stage,
    pub level: EventLevel,
    pub detail: String,
}

impl StageEvent {
    #[must_use]
    pub fn info(stage: Stage, detail: impl Into<String>) -> Self {
        Self {
            stage,
            level: EventLevel::Info,
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn warning(stage: Stage, detail: impl Into<String>) -> Self {
        Self {
            stage,
            level: EventLevel::Warning,
            detail: detail.into(),
        }
    }
}

pub trait PipelineObserver {
    fn on_event(&self, event: &StageEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {
    fn on_event(&self, _event: &StageEvent) {}
}

/// Forwards events to `tracing`, warnings at `WARN` and the rest at `DEBUG`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &StageEvent) {
        match event.level {
            EventLevel::Info => {
                tracing::debug!(stage = event.stage.as_str(), detail = %event.detail, "pipeline stage");
            }
            EventLevel::Warning => {
                tracing::warn!(stage = event.stage.as_str(), detail = %event.detail, "pipeline warning");
            }
        }
    }
}
