//! Analysis pipeline orchestration.

use std::collections::BTreeMap;

use webprice_core::{AnalysisSettings, CanonicalField, ProductRecord};
use webprice_ingest::{decode, locate, map_columns, materialize, read_table};

use crate::error::AnalysisError;
use crate::importance::feature_importance;
use crate::observer::{PipelineObserver, Stage, StageEvent};
use crate::overview::overview;
use crate::rules::{top, AdjustmentEngine, Evaluation};
use crate::summary::summarize;
use crate::types::{AnalysisReport, Diagnostics, EngineSettings, MlInsights};

/// Records plus a description of how they were read.
#[derive(Debug, Clone)]
pub struct Ingested {
    pub records: Vec<ProductRecord>,
    pub diagnostics: Diagnostics,
}

/// Runs every ingest stage on raw upload bytes.
///
/// A missing competitor-price column is reported as a warning event and in
/// [`Diagnostics::warnings`]; it does not fail ingestion.
///
/// # Errors
///
/// Returns [`AnalysisError::Ingest`] when the bytes cannot be decoded, no
/// table structure is found or a required column is missing.
pub fn ingest(
    bytes: &[u8],
    scan_depth: usize,
    observer: &dyn PipelineObserver,
) -> Result<Ingested, AnalysisError> {
    let decoded = decode(bytes)?;
    observer.on_event(&StageEvent::info(
        Stage::Decode,
        format!("decoded {} bytes as {}", bytes.len(), decoded.encoding),
    ));

    let structure = locate(&decoded.text, scan_depth)?;
    observer.on_event(&StageEvent::info(
        Stage::Locate,
        format!(
            "separator {} header row {} (detected: {})",
            structure.separator, structure.header_row, structure.header_detected
        ),
    ));

    let table = read_table(&decoded.text, &structure)?;
    observer.on_event(&StageEvent::info(
        Stage::ReadTable,
        format!("{} columns, {} data rows", table.headers.len(), table.rows.len()),
    ));

    let mapping = map_columns(&table.headers);
    mapping.require(&CanonicalField::REQUIRED, &table.headers)?;
    observer.on_event(&StageEvent::info(
        Stage::MapColumns,
        format!("{} of {} columns mapped", mapping.len(), table.headers.len()),
    ));

    let mut warnings = Vec::new();
    if !mapping.contains(CanonicalField::CompetitorPrice) {
        let warning =
            "no cheapest-competitor column found; competitor-based rules will skip every row"
                .to_string();
        observer.on_event(&StageEvent::warning(Stage::MapColumns, warning.clone()));
        warnings.push(warning);
    }

    let records = materialize(&table, &mapping);
    observer.on_event(&StageEvent::info(
        Stage::Materialize,
        format!("{} records", records.len()),
    ));

    let diagnostics = Diagnostics {
        encoding: decoded.encoding,
        separator: structure.separator,
        header_row: structure.header_row,
        header_detected: structure.header_detected,
        headers: table.headers,
        mapping,
        rows: records.len(),
        warnings,
    };
    Ok(Ingested {
        records,
        diagnostics,
    })
}

/// Ingests `bytes` and computes the full [`AnalysisReport`].
///
/// Runs decode, locate, read_table, map_columns, materialize, suggest and
/// summarize in order. No qualifying suggestion is not an error: the report
/// then carries an empty `data` list and an explanatory `ml_insights`
/// message.
///
/// # Errors
///
/// Returns [`AnalysisError`] if ingestion fails; see [`ingest`].
pub fn analyze_bytes(
    bytes: &[u8],
    settings: &AnalysisSettings,
    observer: &dyn PipelineObserver,
) -> Result<AnalysisReport, AnalysisError> {
    let Ingested {
        records,
        mut diagnostics,
    } = ingest(bytes, settings.header_scan_depth, observer)?;

    let engine = AdjustmentEngine::new(EngineSettings::from(settings));
    let Evaluation {
        suggestions,
        overflowed,
    } = engine.evaluate(&records);
    if !overflowed.is_empty() {
        let warning = format!(
            "{} rows skipped because their prices are too large to compute: {}",
            overflowed.len(),
            overflowed.join(", ")
        );
        observer.on_event(&StageEvent::warning(Stage::Suggest, warning.clone()));
        diagnostics.warnings.push(warning);
    }
    observer.on_event(&StageEvent::info(
        Stage::Suggest,
        format!(
            "{} suggestions from {} records ({} strategy)",
            suggestions.len(),
            records.len(),
            settings.strategy
        ),
    ));

    let ml_insights = if suggestions.is_empty() {
        MlInsights::Empty {
            message: format!(
                "no product qualified for a price adjustment under the {} strategy",
                settings.strategy
            ),
        }
    } else {
        MlInsights::Summary {
            summary: summarize(&suggestions, settings.strategy),
            feature_importance: feature_importance(&suggestions),
        }
    };

    let mut status_counts = BTreeMap::new();
    for record in &records {
        *status_counts.entry(record.status.clone()).or_insert(0) += 1;
    }

    let report = AnalysisReport {
        data: top(&suggestions, settings.top_k).to_vec(),
        ml_insights,
        status_counts,
        overview: overview(&records),
        diagnostics,
    };
    observer.on_event(&StageEvent::info(
        Stage::Summarize,
        format!("returning {} of {} suggestions", report.data.len(), suggestions.len()),
    ));
    Ok(report)
}
