use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use webprice_core::{AnalysisSettings, Strategy, Suggestion};
use webprice_ingest::{ColumnMapping, Encoding, Separator};

/// Rule parameters for one [`crate::AdjustmentEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub strategy: Strategy,
    pub competitive_factor: Decimal,
    pub margin_factor: Decimal,
    pub protect_factor: Decimal,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from(&AnalysisSettings::default())
    }
}

impl From<&AnalysisSettings> for EngineSettings {
    fn from(settings: &AnalysisSettings) -> Self {
        Self {
            strategy: settings.strategy,
            competitive_factor: settings.competitive_factor,
            margin_factor: settings.margin_factor,
            protect_factor: settings.protect_factor,
        }
    }
}

/// Aggregate figures over every suggestion produced by one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightsSummary {
    pub total_analyzed: usize,
    pub count_with_opportunity: usize,
    pub total_potential_gain: Decimal,
    pub average_gain_per_item: Decimal,
    pub strategy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureWeight {
    pub feature: String,
    pub importance: f64,
}

/// Advisory decision-tree diagnostic over the suggestion set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FeatureImportance {
    Trained {
        /// Distinct adjustment types seen, in sorted order.
        classes: Vec<String>,
        /// One entry per feature, in feature order; weights sum to 1 unless
        /// no split reduced impurity.
        features: Vec<FeatureWeight>,
    },
    Insufficient {
        message: String,
    },
}

/// `ml_insights` section of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MlInsights {
    Summary {
        #[serde(flatten)]
        summary: InsightsSummary,
        feature_importance: FeatureImportance,
    },
    /// No record qualified for any adjustment.
    Empty { message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SellerSummary {
    pub products: usize,
    pub winning: usize,
    pub losing: usize,
    /// Sum of listed prices across the seller's rows.
    pub listed_revenue: Decimal,
}

/// Status-level picture of the whole export, independent of the rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompetitiveOverview {
    pub total_products: usize,
    pub winning: usize,
    pub losing: usize,
    pub tied: usize,
    /// Mean of `(price - competitor) / competitor * 100` over losing rows.
    pub average_losing_gap_percent: Option<Decimal>,
    /// Same measure over winning rows; usually negative.
    pub average_winning_gap_percent: Option<Decimal>,
    pub sellers: BTreeMap<String, SellerSummary>,
    pub alerts: Vec<String>,
}

/// How the upload was read, for troubleshooting odd exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub encoding: Encoding,
    pub separator: Separator,
    pub header_row: usize,
    pub header_detected: bool,
    pub headers: Vec<String>,
    pub mapping: ColumnMapping,
    pub rows: usize,
    pub warnings: Vec<String>,
}

/// Full result of one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Highest-priority suggestions, capped at the configured top-K.
    pub data: Vec<Suggestion>,
    pub ml_insights: MlInsights,
    pub status_counts: BTreeMap<String, usize>,
    pub overview: CompetitiveOverview,
    pub diagnostics: Diagnostics,
}
