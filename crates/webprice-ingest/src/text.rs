//! Internal string helpers shared by the locator and the column mapper.
//!
//! Header labels in the wild mix accents, case and ordinal signs freely, so
//! every comparison goes through [`normalize_label`] first.

/// Replaces accented Latin letters with their unaccented ASCII base.
///
/// Characters outside the Portuguese/Spanish accent set pass through
/// unchanged, including the ordinal `º` and degree `°` signs.
pub(crate) fn fold_accents(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        other => other,
    }
}

/// Folds accents, uppercases, trims and collapses internal whitespace.
///
/// `Nº` and `NUMERO` are rewritten to `N°` so that every spelling of
/// "number of stores" compares equal.
pub(crate) fn normalize_label(raw: &str) -> String {
    let folded = fold_accents(raw).to_uppercase();
    let collapsed = folded.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .replace("NUMERO", "N°")
        .replace("Nº", "N°")
        .replace("N.º", "N°")
}

/// Strips BOM characters and stray quotes a header cell may carry.
pub(crate) fn clean_header(raw: &str) -> String {
    raw.chars()
        .filter(|&c| c != '\u{FEFF}' && c != '"' && c != '\'')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Truncates `s` to at most `max` characters, never splitting a code point.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((end, _)) => s[..end].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_portuguese_accents() {
        assert_eq!(fold_accents("PREÇO"), "PRECO");
        assert_eq!(fold_accents("Situação"), "Situacao");
        assert_eq!(fold_accents("CÓDIGO"), "CODIGO");
    }

    #[test]
    fn normalize_label_unifies_number_sign() {
        assert_eq!(normalize_label("  nº de   lojas "), "N° DE LOJAS");
        assert_eq!(normalize_label("Número de Lojas"), "N° DE LOJAS");
        assert_eq!(normalize_label("N° DE LOJAS"), "N° DE LOJAS");
    }

    #[test]
    fn clean_header_drops_bom_and_quotes() {
        assert_eq!(clean_header("\u{FEFF}\"PRODUTO\""), "PRODUTO");
        assert_eq!(clean_header(" 'STATUS' "), "STATUS");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("Ações", 3), "Açõ");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 5), "");
    }
}
