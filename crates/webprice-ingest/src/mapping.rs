//! Fuzzy mapping of raw header labels onto [`CanonicalField`]s.

use std::collections::BTreeMap;

use serde::Serialize;
use webprice_core::CanonicalField;

use crate::error::IngestError;
use crate::text::normalize_label;

/// Shortest truncated label allowed to match a longer keyword, so that
/// fragments such as `"N"` or `"ID"` do not claim a field.
const MIN_REVERSE_MATCH_LEN: usize = 4;

/// Keywords, pre-normalized, recognised for each field.
fn keywords(field: CanonicalField) -> &'static [&'static str] {
    match field {
        CanonicalField::Product => &["PRODUTO", "ITEM"],
        CanonicalField::Brand => &["MARCA", "BRAND"],
        CanonicalField::NumberOfSellers => &["N° DE LOJAS", "N° LOJAS", "QTD LOJAS"],
        CanonicalField::CompetitorPrice => &["MAIS BARATO", "MAISBARATO", "MENOR PRECO"],
        CanonicalField::Status => &["STATUS", "SITUACAO"],
        CanonicalField::ClusterCode => &["CODIGO CLUSTER", "CLUSTER"],
        CanonicalField::InternalCode => &["CODIGO INTERNO"],
        CanonicalField::Ranking => &["RANKING", "POSICAO"],
        CanonicalField::Seller => &["LOJISTA", "VENDEDOR", "LOJA"],
        CanonicalField::Sellers => &["SELLERS"],
        CanonicalField::Price => &["PRECO", "PRICE"],
        CanonicalField::Difference => &["DIFERENCA"],
        CanonicalField::Percentage => &["PERCENTUAL"],
    }
}

/// Store-count labels such as `"N° LOJAS"` never name the seller, even once
/// `NumberOfSellers` is already claimed.
fn excluded(field: CanonicalField, token: &str) -> bool {
    field == CanonicalField::Seller && token.contains("N°")
}

/// The token contains the keyword, or the token is a truncated form of a
/// single-word keyword (`"PROD"` for `"PRODUTO"`).
fn token_matches(token: &str, keyword: &str) -> bool {
    token.contains(keyword)
        || (!keyword.contains(' ')
            && token.chars().count() >= MIN_REVERSE_MATCH_LEN
            && keyword.contains(token))
}

/// Header column claimed by a canonical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedColumn {
    /// Header label as it appeared in the file.
    pub label: String,
    /// Zero-based position of the column.
    pub index: usize,
}

/// At most one column per field and at most one field per column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    columns: BTreeMap<CanonicalField, MappedColumn>,
}

impl ColumnMapping {
    #[must_use]
    pub fn get(&self, field: CanonicalField) -> Option<&MappedColumn> {
        self.columns.get(&field)
    }

    #[must_use]
    pub fn index_of(&self, field: CanonicalField) -> Option<usize> {
        self.columns.get(&field).map(|c| c.index)
    }

    #[must_use]
    pub fn contains(&self, field: CanonicalField) -> bool {
        self.columns.contains_key(&field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Mapped fields in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &MappedColumn)> {
        self.columns.iter().map(|(field, column)| (*field, column))
    }

    /// Checks that every field in `required` was mapped.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Mapping`] listing the missing fields, the
    /// mapping found so far and the raw `headers`.
    pub fn require(
        &self,
        required: &[CanonicalField],
        headers: &[String],
    ) -> Result<(), IngestError> {
        let missing: Vec<CanonicalField> = required
            .iter()
            .copied()
            .filter(|field| !self.contains(*field))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        Err(IngestError::Mapping {
            missing,
            found: self
                .iter()
                .map(|(field, column)| (field, column.label.clone()))
                .collect(),
            headers: headers.to_vec(),
        })
    }
}

/// Maps each header label to the first unclaimed field whose keywords match.
///
/// Labels are compared after accent folding, uppercasing and `N°`
/// normalization. Fields are tried in [`CanonicalField::PRIORITY`] order, so
/// a label such as `"PREÇO MAIS BARATO"` is claimed by `CompetitorPrice`
/// before `Price` can see it.
#[must_use]
pub fn map_columns(headers: &[String]) -> ColumnMapping {
    let mut columns: BTreeMap<CanonicalField, MappedColumn> = BTreeMap::new();
    for (index, label) in headers.iter().enumerate() {
        let token = normalize_label(label);
        if token.is_empty() {
            continue;
        }
        let claimed = CanonicalField::PRIORITY.into_iter().find(|field| {
            !columns.contains_key(field)
                && !excluded(*field, &token)
                && keywords(*field)
                    .iter()
                    .any(|keyword| token_matches(&token, keyword))
        });
        if let Some(field) = claimed {
            columns.insert(
                field,
                MappedColumn {
                    label: label.clone(),
                    index,
                },
            );
        }
    }
    ColumnMapping { columns }
}

#[cfg(test)]
#[path = "mapping_test.rs"]
mod tests;
