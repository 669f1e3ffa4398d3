//! Byte-to-text decoding with an ordered list of fallback encodings.
//!
//! Spreadsheet exports arrive as UTF-8 (with or without a BOM) or as one of
//! the legacy Western encodings. Strategies are tried in a fixed order and
//! the first that accepts the input wins.

use serde::Serialize;

use crate::error::IngestError;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Text encodings the decoder knows how to try, in attempt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    Utf8Bom,
    Utf8,
    Windows1252,
    Latin1,
}

impl Encoding {
    pub const ORDER: [Encoding; 4] = [
        Encoding::Utf8Bom,
        Encoding::Utf8,
        Encoding::Windows1252,
        Encoding::Latin1,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Utf8Bom => "utf-8-bom",
            Self::Utf8 => "utf-8",
            Self::Windows1252 => "windows-1252",
            Self::Latin1 => "iso-8859-1",
        }
    }

    fn try_decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8Bom => {
                let rest = bytes.strip_prefix(&UTF8_BOM)?;
                std::str::from_utf8(rest).ok().map(str::to_owned)
            }
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Self::Windows1252 => encoding_rs::WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(std::borrow::Cow::into_owned),
            Self::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successfully decoded text plus the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub encoding: Encoding,
    /// Strategies tried and rejected before `encoding` succeeded.
    pub failed: Vec<Encoding>,
}

/// Decodes raw upload bytes into text.
///
/// A leading U+FEFF left in the decoded text is stripped.
///
/// # Errors
///
/// Returns [`IngestError::Decode`] if no strategy accepts the input.
pub fn decode(bytes: &[u8]) -> Result<Decoded, IngestError> {
    let mut failed = Vec::new();
    for encoding in Encoding::ORDER {
        if let Some(text) = encoding.try_decode(bytes) {
            let text = match text.strip_prefix('\u{FEFF}') {
                Some(rest) => rest.to_owned(),
                None => text,
            };
            return Ok(Decoded {
                text,
                encoding,
                failed,
            });
        }
        failed.push(encoding);
    }
    Err(IngestError::Decode {
        attempted: failed.iter().map(|e| e.as_str().to_string()).collect(),
    })
}
