//! Lenient numeric parsing for Brazilian-formatted spreadsheet cells.
//!
//! Cells mix `R$ 1.234,56`, `1234.56`, `12,5%` and plain garbage. These
//! functions never fail: anything that cannot be read as a number is zero.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Parses a price-like cell into a [`Decimal`].
///
/// Rules, applied in order:
/// 1. blank, `nan`, `null` or `none` (any case) is zero;
/// 2. currency markers (`R$`, `$`), quotes and whitespace are removed;
/// 3. `%` is removed;
/// 4. with both `.` and `,` present, `.` is a thousands separator and the
///    last `,` is the decimal point;
/// 5. with only `,` present, commas become decimal points;
/// 6. anything that is not a digit, `-` or `.` is dropped.
///
/// Strings that still do not parse are zero.
#[must_use]
pub fn parse_number(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || ["nan", "null", "none"]
            .iter()
            .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    {
        return Decimal::ZERO;
    }

    let stripped: String = trimmed
        .replace("R$", "")
        .chars()
        .filter(|c| !matches!(c, '$' | '"' | '\'' | '%') && !c.is_whitespace())
        .collect();

    let separated = match (stripped.contains('.'), stripped.rfind(',')) {
        (true, Some(last_comma)) => {
            let (int_part, frac_part) = stripped.split_at(last_comma);
            let int_part: String = int_part.chars().filter(|&c| c != '.' && c != ',').collect();
            let frac_part: String = frac_part[1..].chars().filter(|&c| c != '.').collect();
            format!("{int_part}.{frac_part}")
        }
        (false, Some(_)) => stripped.replace(',', "."),
        _ => stripped,
    };

    let digits: String = separated
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '-' | '.'))
        .collect();

    if matches!(digits.as_str(), "" | "-" | "." | "-.") {
        return Decimal::ZERO;
    }

    Decimal::from_str(&digits).unwrap_or(Decimal::ZERO)
}

/// Parses a seller ranking cell. Only positive integral values are kept.
#[must_use]
pub fn parse_ranking(raw: &str) -> Option<u32> {
    let value = parse_number(raw);
    if value <= Decimal::ZERO || value.fract() != Decimal::ZERO {
        return None;
    }
    value.to_u32()
}

/// Whether a cell reads as a plain number, used by header detection to
/// reject data rows that happen to contain keyword-like text.
pub(crate) fn looks_numeric(raw: &str) -> bool {
    let trimmed = raw.trim().trim_matches('"');
    if trimmed.is_empty() || !trimmed.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    trimmed.chars().all(|c| {
        c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+' | '%' | '$' | 'R' | ' ')
    })
}

#[cfg(test)]
#[path = "number_test.rs"]
mod tests;
