//! Human-readable rendering of analysis reports.

use std::fmt::Write as _;

use rust_decimal::Decimal;
use webprice_core::round_money;
use webprice_engine::{AnalysisReport, FeatureImportance, MlInsights};

const PRODUCT_WIDTH: usize = 32;
const SELLER_WIDTH: usize = 16;

/// Formats `value` as Brazilian reais, e.g. `R$ 1.234,56`.
pub(crate) fn format_brl(value: Decimal) -> String {
    let rounded = round_money(value);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}R$ {},{frac_part}", group_thousands(int_part))
}

/// Formats a percentage with a decimal comma, e.g. `10,90%`.
pub(crate) fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", round_money(value)).replace('.', ",")
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Pads or truncates `s` to exactly `width` characters.
fn fit(s: &str, width: usize) -> String {
    let count = s.chars().count();
    if count <= width {
        format!("{s:<width$}")
    } else {
        let mut cut: String = s.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}

/// Renders one file's report as plain-text tables.
pub(crate) fn render_report(file: &str, report: &AnalysisReport) -> String {
    let mut out = String::new();
    let d = &report.diagnostics;
    let _ = writeln!(
        out,
        "== {file} ({}, {} separated, header row {}{}) ==",
        d.encoding,
        d.separator,
        d.header_row,
        if d.header_detected { "" } else { ", assumed" }
    );
    for warning in &d.warnings {
        let _ = writeln!(out, "warning: {warning}");
    }

    match &report.ml_insights {
        MlInsights::Empty { message } => {
            let _ = writeln!(out, "{message}");
        }
        MlInsights::Summary {
            summary,
            feature_importance,
        } => {
            let _ = writeln!(out, "strategy: {}", summary.strategy);
            let _ = writeln!(
                out,
                "{} suggestions, {} with gain, potential gain {} (avg {} per item)",
                summary.total_analyzed,
                summary.count_with_opportunity,
                format_brl(summary.total_potential_gain),
                format_brl(summary.average_gain_per_item)
            );
            out.push('\n');
            let _ = writeln!(
                out,
                "{}{}{:>14}{:>14}{:>14}{:>14}{:>9}  TYPE",
                fit("PRODUCT", PRODUCT_WIDTH + 1),
                fit("SELLER", SELLER_WIDTH + 1),
                "CURRENT",
                "COMPETITOR",
                "SUGGESTED",
                "ADJUST",
                "%"
            );
            for s in &report.data {
                let _ = writeln!(
                    out,
                    "{} {} {:>14}{:>14}{:>14}{:>14}{:>9}  {}",
                    fit(&s.product, PRODUCT_WIDTH),
                    fit(&s.seller, SELLER_WIDTH),
                    format_brl(s.current_price),
                    format_brl(s.competitor_price),
                    format_brl(s.suggested_price),
                    format_brl(s.adjustment_amount),
                    format_percent(s.adjustment_percent),
                    s.adjustment_type.label()
                );
            }
            if let FeatureImportance::Trained { features, .. } = feature_importance {
                let ranked: Vec<String> = features
                    .iter()
                    .filter(|f| f.importance > 0.0)
                    .map(|f| format!("{} {:.2}", f.feature, f.importance))
                    .collect();
                if !ranked.is_empty() {
                    let _ = writeln!(out, "\ndrivers: {}", ranked.join(", "));
                }
            }
        }
    }

    let statuses: Vec<String> = report
        .status_counts
        .iter()
        .map(|(status, count)| format!("{status} {count}"))
        .collect();
    let _ = writeln!(out, "\nstatus: {}", statuses.join(" | "));
    for alert in &report.overview.alerts {
        let _ = writeln!(out, "alert: {alert}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brl_groups_thousands_with_dots() {
        assert_eq!(format_brl(Decimal::new(123_456, 2)), "R$ 1.234,56");
        assert_eq!(format_brl(Decimal::new(100_000_000, 2)), "R$ 1.000.000,00");
        assert_eq!(format_brl(Decimal::new(999, 0)), "R$ 999,00");
    }

    #[test]
    fn brl_handles_small_and_negative_values() {
        assert_eq!(format_brl(Decimal::ZERO), "R$ 0,00");
        assert_eq!(format_brl(Decimal::new(5, 2)), "R$ 0,05");
        assert_eq!(format_brl(Decimal::new(-123_450, 2)), "-R$ 1.234,50");
    }

    #[test]
    fn brl_rounds_half_away_from_zero() {
        assert_eq!(format_brl(Decimal::new(10_005, 3)), "R$ 10,01");
    }

    #[test]
    fn percent_uses_decimal_comma() {
        assert_eq!(format_percent(Decimal::new(109, 1)), "10,90%");
    }

    #[test]
    fn fit_pads_and_truncates_by_chars() {
        assert_eq!(fit("Fogão", 7), "Fogão  ");
        assert_eq!(fit("Micro-ondas", 6), "Micro~");
    }
}
