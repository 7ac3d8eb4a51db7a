use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort the conversion of a single document.
///
/// The batch driver turns these into `ERROR` audit rows and moves on to the
/// next file.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("text extraction failed: {0}")]
    Extraction(String),

    #[error("OCR failed on page {page}: {message}")]
    Ocr { page: usize, message: String },

    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConvertError>;
