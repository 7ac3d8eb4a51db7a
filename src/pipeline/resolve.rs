use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::error::Result;

/// Rasterization resolution handed to the OCR engine.
pub const OCR_DPI: u32 = 300;

/// An opened PDF: page count, embedded text layer and page rasterization.
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Embedded text of the 1-based `page`, `None` when there is no text layer.
    fn embedded_text(&self, page: usize) -> Result<Option<String>>;

    fn rasterize(&self, page: usize, dpi: u32) -> Result<PageRaster>;
}

pub trait OcrEngine {
    fn recognize(&self, raster: &PageRaster, lang: &str) -> Result<String>;
}

/// A rendered page image on disk. When it owns a scratch directory the image
/// is deleted together with the raster.
#[derive(Debug)]
pub struct PageRaster {
    page: usize,
    path: PathBuf,
    _workspace: Option<TempDir>,
}

impl PageRaster {
    pub fn in_workspace(page: usize, path: PathBuf, workspace: TempDir) -> Self {
        Self {
            page,
            path,
            _workspace: Some(workspace),
        }
    }

    #[cfg(test)]
    pub fn at(page: usize, path: PathBuf) -> Self {
        Self {
            page,
            path,
            _workspace: None,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrSettings {
    pub enabled: bool,
    pub lang: String,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            lang: "spa".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub index: usize,
    pub raw_text: Option<String>,
    pub used_ocr: bool,
}

/// Best-effort text for one page: the text layer when it has any content,
/// otherwise OCR output (when enabled) or the empty string.
pub fn resolve_page<S, E>(source: &S, engine: &E, index: usize, ocr: &OcrSettings) -> Result<Page>
where
    S: PageSource + ?Sized,
    E: OcrEngine + ?Sized,
{
    let embedded = source.embedded_text(index)?;
    let has_text_layer = embedded
        .as_deref()
        .is_some_and(|text| !text.trim().is_empty());

    if has_text_layer {
        debug!(page = index, "using embedded text layer");
        return Ok(Page {
            index,
            raw_text: embedded,
            used_ocr: false,
        });
    }

    if !ocr.enabled {
        debug!(page = index, "no text layer and OCR disabled");
        return Ok(Page {
            index,
            raw_text: Some(String::new()),
            used_ocr: false,
        });
    }

    let raster = source.rasterize(index, OCR_DPI)?;
    let text = engine.recognize(&raster, &ocr.lang)?;
    debug!(page = index, lang = %ocr.lang, chars = text.chars().count(), "recognized page with OCR");

    Ok(Page {
        index,
        raw_text: Some(text),
        used_ocr: true,
    })
}
