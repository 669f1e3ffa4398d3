//! Price-adjustment analysis over ingested marketplace exports.
//!
//! [`analyze_bytes`] runs the whole flow: ingest the upload, apply the
//! adjustment rules for the configured [`webprice_core::Strategy`], then
//! summarize the result. Every stage reports to a [`PipelineObserver`]
//! instead of logging directly.

pub mod error;
pub mod importance;
pub mod observer;
pub mod overview;
pub mod pipeline;
pub mod rules;
pub mod summary;
pub mod types;

pub use error::AnalysisError;
pub use importance::feature_importance;
pub use observer::{EventLevel, NoopObserver, PipelineObserver, Stage, StageEvent, TracingObserver};
pub use overview::overview;
pub use pipeline::{analyze_bytes, ingest, Ingested};
pub use rules::{top, AdjustmentEngine, Evaluation};
pub use summary::summarize;
pub use types::{
    AnalysisReport, CompetitiveOverview, Diagnostics, EngineSettings, FeatureImportance,
    FeatureWeight, InsightsSummary, MlInsights, SellerSummary,
};
