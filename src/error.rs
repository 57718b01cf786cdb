//! Error handling for the ATS scorer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtsScorerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOCX extraction error: {0}")]
    DocxExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    /// JD or resume text is empty; scoring is refused rather than run on half the input.
    #[error("Input missing: {0}")]
    InputMissing(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

impl AtsScorerError {
    /// True for failures of the document-parsing collaborator.
    pub fn is_extraction_failure(&self) -> bool {
        matches!(
            self,
            AtsScorerError::PdfExtraction(_)
                | AtsScorerError::DocxExtraction(_)
                | AtsScorerError::UnsupportedFormat(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AtsScorerError>;
