//! Price-adjustment rules.
//!
//! Each record yields at most one [`Suggestion`]; which rule applies is
//! decided by the record's status and the configured [`Strategy`]:
//!
//! - `Competitive`: losing rows are lowered just under the cheapest
//!   competitor; other rows priced below it are flagged as margin
//!   opportunities.
//! - `MarginProtection`: winning rows move up towards a fixed fraction of
//!   the next competitor's price.

use std::collections::HashMap;

use rust_decimal::Decimal;
use webprice_core::{round_money, AdjustmentType, ProductRecord, Strategy, Suggestion};

use crate::types::EngineSettings;

const LOSING: &str = "PERDENDO";
const WINNING: &str = "GANHANDO";

/// Statuses whose below-competitor rows are margin optimizations rather
/// than generic price-increase opportunities.
const OPTIMIZE_STATUSES: [&str; 4] = ["GANHANDO", "EMPATANDO", "NEUTRO", "COMPETITIVO"];

/// Ranking held by the next competitor when protecting a winning price.
const NEXT_COMPETITOR_RANK: u32 = 2;

#[derive(Debug, Clone, Default)]
pub struct AdjustmentEngine {
    settings: EngineSettings,
}

impl AdjustmentEngine {
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Computes suggestions for `records`, highest priority first.
    ///
    /// The sort is stable, so equal priorities keep input order.
    #[must_use]
    pub fn suggest(&self, records: &[ProductRecord]) -> Vec<Suggestion> {
        self.evaluate(records).suggestions
    }

    /// Like [`Self::suggest`], but also names the qualifying rows whose
    /// figures overflowed decimal arithmetic and were skipped.
    #[must_use]
    pub fn evaluate(&self, records: &[ProductRecord]) -> Evaluation {
        let next_competitor = match self.settings.strategy {
            Strategy::Competitive => NextCompetitorIndex::Unranked,
            Strategy::MarginProtection => NextCompetitorIndex::build(records),
        };
        let mut out = Evaluation::default();
        for record in records {
            let outcome = match self.settings.strategy {
                Strategy::Competitive => self.competitive(record),
                Strategy::MarginProtection => self.protect(record, &next_competitor),
            };
            match outcome {
                Rule::Applied(suggestion) => out.suggestions.push(suggestion),
                Rule::Overflowed => out.overflowed.push(record.product.clone()),
                Rule::NotApplicable => {}
            }
        }
        out.suggestions
            .sort_by(|a, b| b.priority_value.cmp(&a.priority_value));
        out
    }

    fn competitive(&self, record: &ProductRecord) -> Rule {
        let price = record.price;
        let competitor = record.competitor_price;
        if price <= Decimal::ZERO {
            return Rule::NotApplicable;
        }

        if record.status == LOSING {
            if competitor <= Decimal::ZERO {
                return Rule::NotApplicable;
            }
            return Rule::from(
                competitor
                    .checked_mul(self.settings.competitive_factor)
                    .map(round_money)
                    .and_then(|suggested| {
                        let amount = round_money(price.checked_sub(suggested)?.abs());
                        let priority = record.difference.map_or(amount, |d| d.abs());
                        build(
                            record,
                            competitor,
                            suggested,
                            amount,
                            priority,
                            AdjustmentType::LowerForCompetitiveness,
                        )
                    }),
            );
        }

        if price >= competitor {
            return Rule::NotApplicable;
        }
        let kind = if OPTIMIZE_STATUSES.contains(&record.status.as_str()) {
            AdjustmentType::OptimizeMargin
        } else {
            AdjustmentType::RaisePriceOpportunity
        };
        Rule::from(
            competitor
                .checked_mul(self.settings.margin_factor)
                .map(round_money)
                .and_then(|suggested| {
                    let amount = round_money(competitor.checked_sub(price)?);
                    build(record, competitor, suggested, amount, amount, kind)
                }),
        )
    }

    fn protect(&self, record: &ProductRecord, next_competitor: &NextCompetitorIndex<'_>) -> Rule {
        let price = record.price;
        if record.status != WINNING || price <= Decimal::ZERO {
            return Rule::NotApplicable;
        }

        let Some(competitor) = next_competitor.price_for(record) else {
            return Rule::NotApplicable;
        };
        if competitor <= Decimal::ZERO {
            return Rule::NotApplicable;
        }

        let Some(target) = competitor
            .checked_mul(self.settings.protect_factor)
            .map(round_money)
        else {
            return Rule::Overflowed;
        };
        if target > price {
            Rule::from(target.checked_sub(price).and_then(|gain| {
                let amount = round_money(gain);
                build(
                    record,
                    competitor,
                    target,
                    amount,
                    amount,
                    AdjustmentType::ProtectMargin,
                )
            }))
        } else {
            Rule::from(build(
                record,
                competitor,
                price,
                Decimal::ZERO,
                Decimal::ZERO,
                AdjustmentType::MaintainPrice,
            ))
        }
    }
}

/// Suggestions plus the products skipped because their figures overflowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub suggestions: Vec<Suggestion>,
    pub overflowed: Vec<String>,
}

/// Outcome of applying the active rule to one record.
enum Rule {
    Applied(Suggestion),
    NotApplicable,
    Overflowed,
}

impl From<Option<Suggestion>> for Rule {
    fn from(value: Option<Suggestion>) -> Self {
        value.map_or(Self::Overflowed, Self::Applied)
    }
}

/// `None` when the adjustment percent overflows.
fn build(
    record: &ProductRecord,
    competitor: Decimal,
    suggested: Decimal,
    amount: Decimal,
    priority: Decimal,
    adjustment_type: AdjustmentType,
) -> Option<Suggestion> {
    let percent = amount
        .checked_div(record.price)?
        .checked_mul(Decimal::ONE_HUNDRED)?;
    Some(Suggestion {
        product: record.product.clone(),
        seller: record.seller.clone(),
        current_price: record.price,
        competitor_price: competitor,
        suggested_price: suggested,
        adjustment_amount: amount,
        adjustment_percent: round_money(percent),
        adjustment_type,
        priority_value: priority,
        original_status: record.status.clone(),
    })
}

/// Where the next competitor's price comes from in margin protection.
enum NextCompetitorIndex<'a> {
    /// The export carries rankings: use the rank-2 offer of the same product.
    Ranked(HashMap<&'a str, Decimal>),
    /// No rankings at all: fall back to each row's cheapest-competitor price.
    Unranked,
}

impl<'a> NextCompetitorIndex<'a> {
    fn build(records: &'a [ProductRecord]) -> Self {
        if records.iter().all(|r| r.ranking.is_none()) {
            return Self::Unranked;
        }
        let mut by_product = HashMap::new();
        for record in records {
            if record.ranking == Some(NEXT_COMPETITOR_RANK) {
                by_product
                    .entry(record.product.as_str())
                    .or_insert(record.price);
            }
        }
        Self::Ranked(by_product)
    }

    fn price_for(&self, record: &ProductRecord) -> Option<Decimal> {
        match self {
            Self::Ranked(by_product) => by_product.get(record.product.as_str()).copied(),
            Self::Unranked => Some(record.competitor_price),
        }
    }
}

/// The first `k` suggestions of an already-sorted list.
#[must_use]
pub fn top(suggestions: &[Suggestion], k: usize) -> &[Suggestion] {
    &suggestions[..suggestions.len().min(k)]
}

#[cfg(test)]
#[path = "rules_test.rs"]
mod tests;
