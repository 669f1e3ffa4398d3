//! Separator and header-row detection, and cell splitting.
//!
//! Exports frequently start with report titles, export timestamps or empty
//! lines before the real header, and the separator depends on the locale of
//! whoever saved the file. [`locate`] sniffs both; [`read_table`] then splits
//! the header and data lines into a rectangular [`RawTable`].

use serde::Serialize;

use crate::error::IngestError;
use crate::number::looks_numeric;
use crate::text::{clean_header, normalize_label};

/// Words whose presence marks a line as the header row.
const HEADER_KEYWORDS: [&str; 7] = [
    "PRODUTO",
    "STATUS",
    "PRECO",
    "LOJISTA",
    "RANKING",
    "MAIS BARATO",
    "MARCA",
];

/// Distinct keywords a line must contain to qualify as the header.
const MIN_HEADER_KEYWORDS: usize = 2;

/// Header position assumed when no line qualifies: exports usually carry a
/// title line above the header.
const FALLBACK_HEADER_ROW: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Separator {
    Semicolon,
    Comma,
    Tab,
    Pipe,
}

impl Separator {
    /// Candidates in tie-break order.
    pub const CANDIDATES: [Separator; 4] = [
        Separator::Semicolon,
        Separator::Comma,
        Separator::Tab,
        Separator::Pipe,
    ];

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::Semicolon => ';',
            Self::Comma => ',',
            Self::Tab => '\t',
            Self::Pipe => '|',
        }
    }

    #[must_use]
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Semicolon => b';',
            Self::Comma => b',',
            Self::Tab => b'\t',
            Self::Pipe => b'|',
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Semicolon => "semicolon",
            Self::Comma => "comma",
            Self::Tab => "tab",
            Self::Pipe => "pipe",
        }
    }
}

impl std::fmt::Display for Separator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Detected layout of a decoded export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Structure {
    pub separator: Separator,
    /// Index of the header among the non-blank lines.
    pub header_row: usize,
    /// `false` when no line qualified and the fallback row was assumed.
    pub header_detected: bool,
    /// Number of non-blank lines in the input.
    pub line_count: usize,
}

/// Header labels plus data rows, every row exactly as wide as the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Non-blank lines, splitting on `\n`, `\r\n` and a lone `\r` (classic Mac
/// exports).
fn non_blank_lines(text: &str) -> Vec<&str> {
    text.split(|c| c == '\n' || c == '\r')
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Detects the separator and header row of `text`.
///
/// Only the first `scan_depth` non-blank lines are considered for the header.
///
/// # Errors
///
/// Returns [`IngestError::Structure`] when the input has fewer than two
/// non-blank lines or when no candidate separator occurs in it.
pub fn locate(text: &str, scan_depth: usize) -> Result<Structure, IngestError> {
    let lines = non_blank_lines(text);
    if lines.len() < 2 {
        return Err(IngestError::structure(format!(
            "expected at least 2 non-blank lines, found {}",
            lines.len()
        )));
    }

    let separator = detect_separator(lines[1]).ok_or_else(|| {
        IngestError::structure("no separator (';', ',', tab or '|') found in the data")
    })?;

    let header_row = lines
        .iter()
        .take(scan_depth)
        .position(|line| is_header_line(line, separator));

    Ok(Structure {
        separator,
        header_row: header_row.unwrap_or(FALLBACK_HEADER_ROW),
        header_detected: header_row.is_some(),
        line_count: lines.len(),
    })
}

/// Picks the candidate occurring most often in `line`; ties go to the
/// earlier candidate. `None` when no candidate occurs at all.
fn detect_separator(line: &str) -> Option<Separator> {
    let mut best: Option<(Separator, usize)> = None;
    for candidate in Separator::CANDIDATES {
        let count = line.matches(candidate.as_char()).count();
        if count > best.map_or(0, |(_, n)| n) {
            best = Some((candidate, count));
        }
    }
    best.map(|(separator, _)| separator)
}

fn is_header_line(line: &str, separator: Separator) -> bool {
    let tokens: Vec<String> = split_line(line, separator)
        .into_iter()
        .filter(|t| !t.trim().is_empty())
        .collect();
    if tokens.is_empty() {
        return false;
    }

    let numeric = tokens.iter().filter(|t| looks_numeric(t)).count();
    if numeric * 2 > tokens.len() {
        return false;
    }

    let labels: Vec<String> = tokens.iter().map(|t| normalize_label(t)).collect();
    let matched = HEADER_KEYWORDS
        .iter()
        .filter(|keyword| labels.iter().any(|label| label.contains(*keyword)))
        .count();
    matched >= MIN_HEADER_KEYWORDS
}

fn reader_for(input: &str, separator: Separator) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(separator.as_byte())
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes())
}

/// Splits one line into cells, honouring quotes. Malformed lines yield
/// whatever cells could be read.
fn split_line(line: &str, separator: Separator) -> Vec<String> {
    let mut reader = reader_for(line, separator);
    reader
        .records()
        .next()
        .and_then(Result::ok)
        .map(|record| record.iter().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Splits the header and data lines of `text` into a [`RawTable`].
///
/// Lines before the detected header are ignored. Rows shorter than the
/// header are padded with empty cells and longer rows are truncated.
///
/// # Errors
///
/// Returns [`IngestError::Structure`] if the header line is missing or a
/// row cannot be read.
pub fn read_table(text: &str, structure: &Structure) -> Result<RawTable, IngestError> {
    let lines = non_blank_lines(text);
    let body = lines
        .get(structure.header_row..)
        .filter(|rest| !rest.is_empty())
        .ok_or_else(|| {
            IngestError::structure(format!(
                "header row {} is beyond the {} non-blank lines",
                structure.header_row,
                lines.len()
            ))
        })?
        .join("\n");

    let mut reader = reader_for(&body, structure.separator);
    let mut records = reader.records();

    let headers: Vec<String> = match records.next() {
        Some(Ok(record)) => record.iter().map(clean_header).collect(),
        Some(Err(e)) => return Err(IngestError::structure(format!("unreadable header: {e}"))),
        None => return Err(IngestError::structure("header line is empty")),
    };
    let width = headers.len();

    let mut rows = Vec::new();
    for record in records {
        let record =
            record.map_err(|e| IngestError::structure(format!("unreadable data row: {e}")))?;
        let mut row: Vec<String> = record.iter().take(width).map(str::to_string).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
#[path = "locate_test.rs"]
mod tests;
