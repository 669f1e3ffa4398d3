use serde::{Deserialize, Serialize};

/// Normalized attribute names that noisy spreadsheet headers are mapped onto.
///
/// Declaration order is the column mapper's priority order: when a header
/// label could satisfy several fields, the earliest variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CanonicalField {
    Product,
    Brand,
    NumberOfSellers,
    CompetitorPrice,
    Status,
    ClusterCode,
    InternalCode,
    Ranking,
    Seller,
    Sellers,
    Price,
    Difference,
    Percentage,
}

impl CanonicalField {
    /// Every field, in mapping priority order.
    pub const PRIORITY: [CanonicalField; 13] = [
        CanonicalField::Product,
        CanonicalField::Brand,
        CanonicalField::NumberOfSellers,
        CanonicalField::CompetitorPrice,
        CanonicalField::Status,
        CanonicalField::ClusterCode,
        CanonicalField::InternalCode,
        CanonicalField::Ranking,
        CanonicalField::Seller,
        CanonicalField::Sellers,
        CanonicalField::Price,
        CanonicalField::Difference,
        CanonicalField::Percentage,
    ];

    /// Fields the adjustment engine cannot run without.
    pub const REQUIRED: [CanonicalField; 3] = [
        CanonicalField::Product,
        CanonicalField::Status,
        CanonicalField::Price,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::Brand => "Brand",
            Self::NumberOfSellers => "NumberOfSellers",
            Self::CompetitorPrice => "CompetitorPrice",
            Self::Status => "Status",
            Self::ClusterCode => "ClusterCode",
            Self::InternalCode => "InternalCode",
            Self::Ranking => "Ranking",
            Self::Seller => "Seller",
            Self::Sellers => "Sellers",
            Self::Price => "Price",
            Self::Difference => "Difference",
            Self::Percentage => "Percentage",
        }
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
