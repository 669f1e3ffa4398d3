//! End-to-end analysis tests: raw export bytes in, report out.

use std::cell::RefCell;
use std::str::FromStr;

use rust_decimal::Decimal;
use webprice_core::{AdjustmentType, AnalysisSettings, CanonicalField, Strategy};
use webprice_engine::{
    analyze_bytes, AnalysisError, EventLevel, FeatureImportance, MlInsights, NoopObserver,
    PipelineObserver, Stage, StageEvent,
};
use webprice_ingest::IngestError;

/// Collects every event for later assertions.
#[derive(Default)]
struct RecordingObserver {
    events: RefCell<Vec<StageEvent>>,
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &StageEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

const EXPORT: &str = "\
Relatório de competitividade;;;;;
PRODUTO;MARCA;MAIS BARATO;STATUS;LOJISTA;PREÇO
Smart TV 50;Marca X;90,00;PERDENDO;Loja A;100,00
Fogão 4 bocas;Marca Y;100,00;GANHANDO;Loja A;80,00
Micro-ondas;Marca Z;50,00;EM ANALISE;Loja B;45,00
Geladeira;Marca X;1.000,00;PERDENDO;Loja B;0
Ventilador;Marca Y;70,00;GANHANDO;Loja B;75,00
";

fn settings() -> AnalysisSettings {
    AnalysisSettings::default()
}

// ---------------------------------------------------------------------------
// Competitive strategy
// ---------------------------------------------------------------------------

#[test]
fn competitive_report_orders_and_prices_suggestions() {
    let report = analyze_bytes(EXPORT.as_bytes(), &settings(), &NoopObserver).unwrap();

    let products: Vec<&str> = report.data.iter().map(|s| s.product.as_str()).collect();
    assert_eq!(products, vec!["Fogão 4 bocas", "Smart TV 50", "Micro-ondas"]);

    let tv = &report.data[1];
    assert_eq!(tv.suggested_price, dec("89.10"));
    assert_eq!(tv.adjustment_amount, dec("10.90"));
    assert_eq!(tv.adjustment_type, AdjustmentType::LowerForCompetitiveness);
    assert_eq!(tv.seller, "Loja A");

    let stove = &report.data[0];
    assert_eq!(stove.suggested_price, dec("99.00"));
    assert_eq!(stove.adjustment_amount, dec("20.00"));
    assert_eq!(stove.adjustment_type, AdjustmentType::OptimizeMargin);

    assert_eq!(
        report.data[2].adjustment_type,
        AdjustmentType::RaisePriceOpportunity
    );
}

#[test]
fn summary_covers_all_suggestions_even_when_capped() {
    let mut capped = settings();
    capped.top_k = 1;
    let report = analyze_bytes(EXPORT.as_bytes(), &capped, &NoopObserver).unwrap();
    assert_eq!(report.data.len(), 1);
    match &report.ml_insights {
        MlInsights::Summary { summary, .. } => {
            assert_eq!(summary.total_analyzed, 3);
            assert_eq!(summary.count_with_opportunity, 3);
            // 20.00 + 10.90 + 5.00
            assert_eq!(summary.total_potential_gain, dec("35.90"));
            assert_eq!(summary.average_gain_per_item, dec("11.97"));
        }
        other => panic!("expected summary, got {other:?}"),
    }
}

#[test]
fn status_counts_cover_every_row() {
    let report = analyze_bytes(EXPORT.as_bytes(), &settings(), &NoopObserver).unwrap();
    assert_eq!(report.status_counts["PERDENDO"], 2);
    assert_eq!(report.status_counts["GANHANDO"], 2);
    assert_eq!(report.status_counts["EM ANALISE"], 1);
    assert_eq!(report.overview.total_products, 5);
    assert_eq!(report.diagnostics.rows, 5);
    assert_eq!(report.diagnostics.header_row, 1);
}

#[test]
fn analysis_is_idempotent() {
    let first = analyze_bytes(EXPORT.as_bytes(), &settings(), &NoopObserver).unwrap();
    let second = analyze_bytes(EXPORT.as_bytes(), &settings(), &NoopObserver).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.data).unwrap(),
        serde_json::to_string(&second.data).unwrap()
    );
}

// ---------------------------------------------------------------------------
// Margin protection strategy
// ---------------------------------------------------------------------------

#[test]
fn margin_protection_uses_ranked_rival() {
    let export = "\
PRODUTO;STATUS;RANKING;LOJISTA;PREÇO;MAIS BARATO
TV;GANHANDO;1;Nossa Loja;80,00;80,00
TV;PERDENDO;2;Rival;100,00;80,00
Radio;GANHANDO;1;Nossa Loja;60,00;60,00
Radio;PERDENDO;2;Rival;61,00;60,00
";
    let mut protect = settings();
    protect.strategy = Strategy::MarginProtection;
    let report = analyze_bytes(export.as_bytes(), &protect, &NoopObserver).unwrap();

    assert_eq!(report.data.len(), 2);
    assert_eq!(report.data[0].product, "TV");
    assert_eq!(report.data[0].adjustment_type, AdjustmentType::ProtectMargin);
    assert_eq!(report.data[0].suggested_price, dec("95.00"));
    assert_eq!(report.data[1].product, "Radio");
    assert_eq!(report.data[1].adjustment_type, AdjustmentType::MaintainPrice);
}

// ---------------------------------------------------------------------------
// Empty results and degraded inputs
// ---------------------------------------------------------------------------

#[test]
fn no_qualifying_rows_is_an_informational_result() {
    let export = "PRODUTO;STATUS;PREÇO;MAIS BARATO\nTV;GANHANDO;100;90\nRadio;PERDENDO;0;10\n";
    let report = analyze_bytes(export.as_bytes(), &settings(), &NoopObserver).unwrap();
    assert!(report.data.is_empty());
    assert!(matches!(report.ml_insights, MlInsights::Empty { .. }));
    let json = serde_json::to_value(&report.ml_insights).unwrap();
    assert!(json["message"].as_str().is_some());
}

#[test]
fn missing_competitor_column_warns_and_degrades() {
    let export = "PRODUTO;STATUS;PREÇO\nTV;PERDENDO;100\nRadio;GANHANDO;50\n";
    let observer = RecordingObserver::default();
    let report = analyze_bytes(export.as_bytes(), &settings(), &observer).unwrap();

    assert!(report.data.is_empty());
    assert_eq!(report.diagnostics.warnings.len(), 1);
    let events = observer.events.borrow();
    assert!(events
        .iter()
        .any(|e| e.level == EventLevel::Warning && e.stage == Stage::MapColumns));
}

#[test]
fn observer_sees_every_stage_in_order() {
    let observer = RecordingObserver::default();
    analyze_bytes(EXPORT.as_bytes(), &settings(), &observer).unwrap();
    let stages: Vec<Stage> = observer
        .events
        .borrow()
        .iter()
        .filter(|e| e.level == EventLevel::Info)
        .map(|e| e.stage)
        .collect();
    assert_eq!(
        stages,
        vec![
            Stage::Decode,
            Stage::Locate,
            Stage::ReadTable,
            Stage::MapColumns,
            Stage::Materialize,
            Stage::Suggest,
            Stage::Summarize,
        ]
    );
}

#[test]
fn feature_importance_is_reported_when_classes_differ() {
    let report = analyze_bytes(EXPORT.as_bytes(), &settings(), &NoopObserver).unwrap();
    match report.ml_insights {
        MlInsights::Summary {
            feature_importance: FeatureImportance::Trained { classes, features },
            ..
        } => {
            assert_eq!(classes.len(), 3);
            assert_eq!(features.len(), 5);
            let total: f64 = features.iter().map(|f| f.importance).sum();
            assert!((total - 1.0).abs() < 1e-3, "weights sum to {total}");
        }
        other => panic!("expected trained importance, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn missing_status_column_fails_with_mapping_error() {
    let export = "PRODUTO;PREÇO;MAIS BARATO\nTV;100;90\n";
    let err = analyze_bytes(export.as_bytes(), &settings(), &NoopObserver).unwrap_err();
    let AnalysisError::Ingest(IngestError::Mapping { missing, .. }) = &err else {
        panic!("expected mapping error, got {err:?}");
    };
    assert_eq!(missing, &vec![CanonicalField::Status]);
    assert_eq!(err.code(), "mapping_error");
}

#[test]
fn empty_and_single_line_inputs_fail_cleanly() {
    for input in ["", "PRODUTO;STATUS;PRECO", "\n\n\n"] {
        let err = analyze_bytes(input.as_bytes(), &settings(), &NoopObserver).unwrap_err();
        assert_eq!(err.code(), "structure_error", "input {input:?}");
    }
}

#[test]
fn extreme_cells_are_skipped_with_a_warning() {
    let export = "PRODUTO;STATUS;PREÇO;MAIS BARATO\n\
                  TV;GANHANDO;0,01;79228162514264337593543950\n\
                  Radio;GANHANDO;80,00;100,00\n";
    let observer = RecordingObserver::default();
    let report = analyze_bytes(export.as_bytes(), &settings(), &observer).unwrap();

    assert_eq!(report.data.len(), 1);
    assert_eq!(report.data[0].product, "Radio");
    assert_eq!(report.diagnostics.warnings.len(), 1);
    assert!(report.diagnostics.warnings[0].contains("TV"));
    assert!(observer
        .events
        .borrow()
        .iter()
        .any(|e| e.level == EventLevel::Warning && e.stage == Stage::Suggest));
}

#[test]
fn huge_prices_saturate_totals_instead_of_panicking() {
    let export = "PRODUTO;STATUS;PREÇO;MAIS BARATO\n\
                  A;PERDENDO;50000000000000000000000000000;10\n\
                  B;PERDENDO;50000000000000000000000000000;10\n";
    let report = analyze_bytes(export.as_bytes(), &settings(), &NoopObserver).unwrap();

    assert_eq!(report.data.len(), 2);
    let MlInsights::Summary { summary, .. } = &report.ml_insights else {
        panic!("expected summary, got {:?}", report.ml_insights);
    };
    assert_eq!(summary.total_potential_gain, Decimal::MAX);
    assert_eq!(report.overview.sellers["-"].listed_revenue, Decimal::MAX);
    assert_eq!(report.overview.average_losing_gap_percent, None);
}

#[test]
fn arbitrary_bytes_never_panic() {
    let inputs: Vec<Vec<u8>> = vec![
        (0u8..=255).collect(),
        b";;;;\n;;;;\n;;;;".to_vec(),
        b"PRODUTO;STATUS;PRECO\n\"unterminated;x;y\n".to_vec(),
        vec![0xFF; 1024],
    ];
    for bytes in inputs {
        let _ = analyze_bytes(&bytes, &settings(), &NoopObserver);
    }
}
