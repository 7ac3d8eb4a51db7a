use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use super::resolve::{OcrEngine, PageRaster, PageSource};
use crate::error::{ConvertError, Result};

/// In-memory document: one entry per page, `None` for pages without a text layer.
#[derive(Debug, Default)]
pub struct FakeDocument {
    pub pages: Vec<Option<String>>,
    pub failing_page: Option<usize>,
    pub rasterized: RefCell<Vec<(usize, u32)>>,
}

impl FakeDocument {
    pub fn with_pages(pages: &[Option<&str>]) -> Self {
        Self {
            pages: pages.iter().map(|page| page.map(ToOwned::to_owned)).collect(),
            ..Self::default()
        }
    }
}

impl PageSource for FakeDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn embedded_text(&self, page: usize) -> Result<Option<String>> {
        if self.failing_page == Some(page) {
            return Err(ConvertError::Extraction(format!("page {page} is corrupt")));
        }
        Ok(self.pages.get(page - 1).cloned().flatten())
    }

    fn rasterize(&self, page: usize, dpi: u32) -> Result<PageRaster> {
        self.rasterized.borrow_mut().push((page, dpi));
        Ok(PageRaster::at(page, PathBuf::from(format!("page-{page}.png"))))
    }
}

/// Returns canned text per page; pages without an entry fail recognition.
#[derive(Debug, Default)]
pub struct FakeOcr {
    pub outputs: HashMap<usize, String>,
    pub languages: RefCell<Vec<String>>,
}

impl FakeOcr {
    pub fn with_output(page: usize, text: &str) -> Self {
        let mut outputs = HashMap::new();
        outputs.insert(page, text.to_string());
        Self {
            outputs,
            ..Self::default()
        }
    }
}

impl OcrEngine for FakeOcr {
    fn recognize(&self, raster: &PageRaster, lang: &str) -> Result<String> {
        self.languages.borrow_mut().push(lang.to_string());
        self.outputs
            .get(&raster.page())
            .cloned()
            .ok_or_else(|| ConvertError::Ocr {
                page: raster.page(),
                message: "tesseract returned non-zero exit status".to_string(),
            })
    }
}
