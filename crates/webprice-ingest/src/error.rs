use thiserror::Error;
use webprice_core::CanonicalField;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("could not decode input with any supported encoding (tried {})", .attempted.join(", "))]
    Decode { attempted: Vec<String> },

    #[error("could not detect table structure: {reason}")]
    Structure { reason: String },

    #[error(
        "required columns missing: {}; mapped so far: {}; headers: {}",
        join_fields(.missing),
        describe_found(.found),
        .headers.join(" | ")
    )]
    Mapping {
        missing: Vec<CanonicalField>,
        /// Fields that did map, with the header label each one claimed.
        found: Vec<(CanonicalField, String)>,
        headers: Vec<String>,
    },
}

/// Coarse classification used for API error codes and CLI exit messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Decode,
    Structure,
    Mapping,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Decode => "decode_error",
            Self::Structure => "structure_error",
            Self::Mapping => "mapping_error",
        }
    }
}

impl IngestError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Structure { .. } => ErrorKind::Structure,
            Self::Mapping { .. } => ErrorKind::Mapping,
        }
    }

    pub(crate) fn structure(reason: impl Into<String>) -> Self {
        Self::Structure {
            reason: reason.into(),
        }
    }
}

fn join_fields(fields: &[CanonicalField]) -> String {
    fields
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_found(found: &[(CanonicalField, String)]) -> String {
    if found.is_empty() {
        return "none".to_string();
    }
    found
        .iter()
        .map(|(field, label)| format!("{field}={label}"))
        .collect::<Vec<_>>()
        .join(", ")
}
