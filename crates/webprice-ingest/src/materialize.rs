//! Conversion from [`RawTable`] rows to [`ProductRecord`]s.
//!
//! Numeric cells go through [`crate::number`]; this module only handles
//! column lookup, trimming and length limits.

use rust_decimal::Decimal;
use webprice_core::{CanonicalField, ProductRecord};

use crate::locate::RawTable;
use crate::mapping::ColumnMapping;
use crate::number::{parse_number, parse_ranking};
use crate::text::truncate_chars;

pub const MAX_PRODUCT_CHARS: usize = 100;
pub const MAX_SELLER_CHARS: usize = 50;

struct RowView<'a> {
    cells: &'a [String],
    mapping: &'a ColumnMapping,
}

impl<'a> RowView<'a> {
    /// Trimmed cell for `field`, or `""` when the field is unmapped.
    fn cell(&self, field: CanonicalField) -> &'a str {
        self.mapping
            .index_of(field)
            .and_then(|index| self.cells.get(index))
            .map_or("", |cell| cell.trim())
    }

    /// `Some` only when the column is mapped and the cell is non-blank.
    fn optional_number(&self, field: CanonicalField) -> Option<Decimal> {
        let raw = self.cell(field);
        (!raw.is_empty()).then(|| parse_number(raw))
    }

    fn price(&self, field: CanonicalField) -> Decimal {
        parse_number(self.cell(field)).max(Decimal::ZERO)
    }
}

/// Builds one [`ProductRecord`] per non-blank data row.
///
/// Rows whose cells are all blank are skipped. Rows with an empty product
/// name are kept; the rule engine decides what to do with them.
#[must_use]
pub fn materialize(table: &RawTable, mapping: &ColumnMapping) -> Vec<ProductRecord> {
    table
        .rows
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|cells| materialize_row(&RowView { cells, mapping }))
        .collect()
}

fn materialize_row(row: &RowView<'_>) -> ProductRecord {
    let brand = row.cell(CanonicalField::Brand);
    ProductRecord {
        product: truncate_chars(row.cell(CanonicalField::Product), MAX_PRODUCT_CHARS),
        seller: truncate_chars(row.cell(CanonicalField::Seller), MAX_SELLER_CHARS),
        brand: (!brand.is_empty()).then(|| brand.to_string()),
        status: row.cell(CanonicalField::Status).to_uppercase(),
        price: row.price(CanonicalField::Price),
        competitor_price: row.price(CanonicalField::CompetitorPrice),
        ranking: parse_ranking(row.cell(CanonicalField::Ranking)),
        difference: row.optional_number(CanonicalField::Difference),
        percentage: row.optional_number(CanonicalField::Percentage),
    }
}

#[cfg(test)]
#[path = "materialize_test.rs"]
mod tests;
