//! Status and per-seller overview of an export, independent of strategy.

use rust_decimal::Decimal;
use webprice_core::{round_money, ProductRecord};

use crate::types::CompetitiveOverview;

const WINNING_MARKER: &str = "GANHAND";
const LOSING_MARKER: &str = "PERDEND";
const TIED_MARKER: &str = "EMPAT";

/// Key used in the per-seller summary for rows without a seller.
pub const UNASSIGNED_SELLER: &str = "-";

/// Average losing gap, in percent, above which an alert is raised.
const LOSING_GAP_ALERT_PERCENT: i64 = 20;

/// Relative gap between our price and the cheapest competitor, in percent.
///
/// `None` when either price is missing or the ratio overflows.
fn gap_percent(record: &ProductRecord) -> Option<Decimal> {
    if record.price <= Decimal::ZERO || record.competitor_price <= Decimal::ZERO {
        return None;
    }
    record
        .price
        .checked_sub(record.competitor_price)?
        .checked_div(record.competitor_price)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

/// `None` for an empty slice or when the sum overflows.
fn average(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |sum, v| sum.checked_add(*v))?;
    sum.checked_div(Decimal::from(values.len())).map(round_money)
}

#[must_use]
pub fn overview(records: &[ProductRecord]) -> CompetitiveOverview {
    let mut out = CompetitiveOverview {
        total_products: records.len(),
        ..CompetitiveOverview::default()
    };
    let mut losing_gaps = Vec::new();
    let mut winning_gaps = Vec::new();

    for record in records {
        let winning = record.status.contains(WINNING_MARKER);
        let losing = !winning && record.status.contains(LOSING_MARKER);
        if winning {
            out.winning += 1;
            winning_gaps.extend(gap_percent(record));
        } else if losing {
            out.losing += 1;
            losing_gaps.extend(gap_percent(record));
        } else if record.status.contains(TIED_MARKER) {
            out.tied += 1;
        }

        let seller_key = if record.seller.is_empty() {
            UNASSIGNED_SELLER
        } else {
            record.seller.as_str()
        };
        let seller = out.sellers.entry(seller_key.to_string()).or_default();
        seller.products += 1;
        seller.listed_revenue = seller.listed_revenue.saturating_add(record.price);
        if winning {
            seller.winning += 1;
        } else if losing {
            seller.losing += 1;
        }
    }

    out.average_losing_gap_percent = average(&losing_gaps);
    out.average_winning_gap_percent = average(&winning_gaps);

    if out.losing > out.winning {
        out.alerts
            .push("more products losing than winning: review pricing".to_string());
    }
    if let Some(gap) = out.average_losing_gap_percent {
        if gap > Decimal::from(LOSING_GAP_ALERT_PERCENT) {
            out.alerts.push(format!(
                "average losing gap of {gap}% is above {LOSING_GAP_ALERT_PERCENT}%"
            ));
        }
    }
    out
}
