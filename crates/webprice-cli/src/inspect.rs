//! `inspect` command: show how an export would be read.

use std::fmt::Write as _;
use std::path::Path;

use webprice_core::CanonicalField;
use webprice_ingest::{decode, locate, map_columns, read_table, ColumnMapping, Decoded, Structure};

/// Builds the inspection listing for raw export bytes.
///
/// Missing required columns are listed rather than treated as failures.
///
/// # Errors
///
/// Returns an error if the bytes cannot be decoded or no table structure is
/// found.
pub(crate) fn inspect_bytes(bytes: &[u8], scan_depth: usize) -> anyhow::Result<String> {
    let decoded = decode(bytes)?;
    let structure = locate(&decoded.text, scan_depth)?;
    let table = read_table(&decoded.text, &structure)?;
    let mapping = map_columns(&table.headers);
    Ok(render(&decoded, &structure, &table.headers, table.rows.len(), &mapping))
}

fn render(
    decoded: &Decoded,
    structure: &Structure,
    headers: &[String],
    rows: usize,
    mapping: &ColumnMapping,
) -> String {
    let mut out = String::new();
    let tried: Vec<&str> = decoded.failed.iter().map(|e| e.as_str()).collect();
    let _ = write!(out, "encoding:   {}", decoded.encoding);
    if !tried.is_empty() {
        let _ = write!(out, " (rejected: {})", tried.join(", "));
    }
    out.push('\n');
    let _ = writeln!(
        out,
        "separator:  {} ({:?})",
        structure.separator,
        structure.separator.as_char()
    );
    let _ = writeln!(
        out,
        "header row: {}{}",
        structure.header_row,
        if structure.header_detected {
            ""
        } else {
            " (no header detected, fallback used)"
        }
    );
    let _ = writeln!(out, "lines:      {} non-blank, {rows} data rows", structure.line_count);
    out.push_str("columns:\n");

    for (index, header) in headers.iter().enumerate() {
        let field = mapping
            .iter()
            .find(|(_, column)| column.index == index)
            .map_or_else(|| "-".to_string(), |(field, _)| field.to_string());
        let _ = writeln!(out, "  [{index:>2}] {header:<32} -> {field}");
    }

    let missing: Vec<&str> = CanonicalField::REQUIRED
        .iter()
        .filter(|field| !mapping.contains(**field))
        .map(|field| field.name())
        .collect();
    if !missing.is_empty() {
        let _ = writeln!(out, "missing required: {}", missing.join(", "));
    }
    if !mapping.contains(CanonicalField::CompetitorPrice) {
        out.push_str("no cheapest-competitor column: competitor rules will skip every row\n");
    }
    out
}

/// Prints the inspection listing for the file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its structure cannot be
/// located.
pub(crate) fn run_inspect(path: &Path, scan_depth: usize) -> anyhow::Result<()> {
    let bytes = std::fs::read(path)?;
    tracing::debug!(file = %path.display(), bytes = bytes.len(), "inspecting file");
    println!("file:       {}", path.display());
    print!("{}", inspect_bytes(&bytes, scan_depth)?);
    Ok(())
}
