use thiserror::Error;
use webprice_ingest::IngestError;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl AnalysisError {
    /// Stable machine-readable code for API responses.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Ingest(e) => e.kind().as_str(),
        }
    }
}
