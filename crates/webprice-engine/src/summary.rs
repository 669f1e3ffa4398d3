use rust_decimal::Decimal;
use webprice_core::{round_money, Strategy, Suggestion};

use crate::types::InsightsSummary;

/// Aggregates totals over the full, uncapped suggestion set.
///
/// The total saturates at [`Decimal::MAX`] instead of overflowing.
#[must_use]
pub fn summarize(suggestions: &[Suggestion], strategy: Strategy) -> InsightsSummary {
    let total_analyzed = suggestions.len();
    let count_with_opportunity = suggestions
        .iter()
        .filter(|s| s.adjustment_amount > Decimal::ZERO)
        .count();
    let total_potential_gain = suggestions
        .iter()
        .fold(Decimal::ZERO, |total, s| total.saturating_add(s.adjustment_amount));
    let average_gain_per_item =
        round_money(total_potential_gain / Decimal::from(total_analyzed.max(1)));

    InsightsSummary {
        total_analyzed,
        count_with_opportunity,
        total_potential_gain,
        average_gain_per_item,
        strategy: strategy.description().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webprice_core::AdjustmentType;

    fn with_amount(amount: i64) -> Suggestion {
        Suggestion {
            product: "P".to_string(),
            seller: String::new(),
            current_price: Decimal::new(100, 0),
            competitor_price: Decimal::new(90, 0),
            suggested_price: Decimal::new(100, 0),
            adjustment_amount: Decimal::new(amount, 0),
            adjustment_percent: Decimal::ZERO,
            adjustment_type: AdjustmentType::OptimizeMargin,
            priority_value: Decimal::new(amount, 0),
            original_status: "GANHANDO".to_string(),
        }
    }

    #[test]
    fn total_saturates_instead_of_overflowing() {
        let mut big = with_amount(0);
        big.adjustment_amount = Decimal::MAX;
        let summary = summarize(&[big.clone(), big], Strategy::Competitive);
        assert_eq!(summary.total_potential_gain, Decimal::MAX);
        assert_eq!(summary.count_with_opportunity, 2);
        assert!(summary.average_gain_per_item > Decimal::ZERO);
    }

    #[test]
    fn totals_over_three_suggestions() {
        let summary = summarize(
            &[with_amount(10), with_amount(0), with_amount(5)],
            Strategy::Competitive,
        );
        assert_eq!(summary.total_analyzed, 3);
        assert_eq!(summary.count_with_opportunity, 2);
        assert_eq!(summary.total_potential_gain, Decimal::new(15, 0));
        assert_eq!(summary.average_gain_per_item, Decimal::new(5, 0));
    }

    #[test]
    fn empty_set_divides_by_one() {
        let summary = summarize(&[], Strategy::MarginProtection);
        assert_eq!(summary.total_analyzed, 0);
        assert_eq!(summary.average_gain_per_item, Decimal::ZERO);
        assert_eq!(summary.strategy, Strategy::MarginProtection.description());
    }

    #[test]
    fn average_is_rounded_to_cents() {
        let summary = summarize(
            &[with_amount(10), with_amount(0), with_amount(0)],
            Strategy::Competitive,
        );
        assert_eq!(summary.average_gain_per_item, Decimal::new(333, 2));
    }
}
