//! Per-document text pipeline: resolve every page (text layer or OCR),
//! normalize it into trimmed lines, detect document-wide headers/footers,
//! strip them and assemble the page-labelled artifact.

mod assemble;
mod lines;
mod repetition;
mod resolve;
#[cfg(test)]
pub(crate) mod testing;
#[cfg(test)]
mod tests;

pub use assemble::{AssembleOptions, assemble_document};
pub use resolve::{OcrEngine, OcrSettings, PageRaster, PageSource};
