use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// One spreadsheet row, normalized for the adjustment engine.
///
/// Prices are always defined: cells that are blank or unparseable become
/// zero so downstream arithmetic is total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product: String,
    /// Seller (lojista) offering the product on this row.
    pub seller: String,
    pub brand: Option<String>,
    /// Trimmed, uppercased competitive status, e.g. `"GANHANDO"`.
    pub status: String,
    pub price: Decimal,
    /// Cheapest competitor price (`MAIS BARATO` column).
    pub competitor_price: Decimal,
    /// Position of this offer among sellers, 1 = cheapest.
    pub ranking: Option<u32>,
    /// Raw `DIFERENÇA` value as exported; `None` when the column or cell is blank.
    pub difference: Option<Decimal>,
    /// Raw `PERCENTUAL` value as exported; `None` when the column or cell is blank.
    pub percentage: Option<Decimal>,
}

impl ProductRecord {
    /// Convenience constructor for the fields every rule looks at.
    #[must_use]
    pub fn new(
        product: impl Into<String>,
        status: impl Into<String>,
        price: Decimal,
        competitor_price: Decimal,
    ) -> Self {
        Self {
            product: product.into(),
            seller: String::new(),
            brand: None,
            status: status.into(),
            price,
            competitor_price,
            ranking: None,
            difference: None,
            percentage: None,
        }
    }
}

/// Kind of price move a [`Suggestion`] recommends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentType {
    /// Losing row: undercut the cheapest competitor.
    LowerForCompetitiveness,
    /// Non-losing row priced below the cheapest competitor.
    OptimizeMargin,
    /// Row priced below the cheapest competitor with an unrecognized status.
    RaisePriceOpportunity,
    /// Winning row already positioned as well as the rule allows.
    MaintainPrice,
    /// Winning row that can move up while staying below the next competitor.
    ProtectMargin,
}

impl AdjustmentType {
    /// Display label in the spreadsheet's language.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::LowerForCompetitiveness => "Abaixar Preço para Competitividade",
            Self::OptimizeMargin => "Otimizar Margem para Lucratividade",
            Self::RaisePriceOpportunity => "Oportunidade de Aumento de Preço",
            Self::MaintainPrice => "Manter Preço",
            Self::ProtectMargin => "Proteção da Margem",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LowerForCompetitiveness => "lower_for_competitiveness",
            Self::OptimizeMargin => "optimize_margin",
            Self::RaisePriceOpportunity => "raise_price_opportunity",
            Self::MaintainPrice => "maintain_price",
            Self::ProtectMargin => "protect_margin",
        }
    }
}

impl std::fmt::Display for AdjustmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A price recommendation derived from one [`ProductRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub product: String,
    pub seller: String,
    pub current_price: Decimal,
    /// Competitor price the suggestion was computed against.
    pub competitor_price: Decimal,
    pub suggested_price: Decimal,
    /// Size of the move in currency, never negative.
    pub adjustment_amount: Decimal,
    pub adjustment_percent: Decimal,
    pub adjustment_type: AdjustmentType,
    /// Ordering score; higher is more urgent.
    #[serde(skip)]
    pub priority_value: Decimal,
    pub original_status: String,
}

/// Rounds a monetary value to cents, halves away from zero.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
