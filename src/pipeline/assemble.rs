use tracing::debug;

use super::lines::NormalizedPage;
use super::repetition::{Boundary, boundary_lines, detect_repeated, strip_boundaries};
use super::resolve::{OcrEngine, OcrSettings, PageSource, resolve_page};
use crate::cli::DEFAULT_THRESHOLD;
use crate::error::Result;
use crate::model::DocumentResult;

#[derive(Debug, Clone, PartialEq)]
pub struct AssembleOptions {
    pub ocr: OcrSettings,
    pub header_threshold: f64,
    pub footer_threshold: f64,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            ocr: OcrSettings::default(),
            header_threshold: DEFAULT_THRESHOLD,
            footer_threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Build the cleaned, page-labelled text of one document.
///
/// Every page is resolved before any stripping happens: the header and footer
/// sets are computed over the whole document. The first page error aborts the
/// document and nothing is returned for it.
pub fn assemble_document<S, E>(
    source: &S,
    engine: &E,
    options: &AssembleOptions,
) -> Result<DocumentResult>
where
    S: PageSource + ?Sized,
    E: OcrEngine + ?Sized,
{
    let page_count = source.page_count();
    let mut pages = Vec::with_capacity(page_count);
    for index in 1..=page_count {
        let page = resolve_page(source, engine, index, &options.ocr)?;
        pages.push(NormalizedPage::from_page(&page));
    }
    let ocr_page_count = pages.iter().filter(|page| page.used_ocr).count();

    let headers = detect_repeated(
        &boundary_lines(&pages, Boundary::First),
        options.header_threshold,
    );
    let footers = detect_repeated(
        &boundary_lines(&pages, Boundary::Last),
        options.footer_threshold,
    );
    for (boundary, repeated) in [(Boundary::First, &headers), (Boundary::Last, &footers)] {
        if !repeated.is_empty() {
            debug!(kind = boundary.as_str(), lines = ?repeated, "detected repeated lines");
        }
    }

    let mut header_lines_removed = 0usize;
    let mut footer_lines_removed = 0usize;
    let mut blocks = Vec::with_capacity(pages.len());

    for page in &pages {
        let stripped = strip_boundaries(&page.lines, &headers, &footers);
        header_lines_removed += usize::from(stripped.header_removed);
        footer_lines_removed += usize::from(stripped.footer_removed);
        blocks.push(page_block(page.index, &stripped.body));
    }

    // Only a document with no salient text on any page, before stripping,
    // yields an empty artifact instead of a column of bare page labels.
    let has_content = pages.iter().any(|page| !page.lines.as_slice().is_empty());
    let text = if has_content {
        blocks.join("\n").trim().to_string()
    } else {
        String::new()
    };
    let char_count = text.chars().count();

    Ok(DocumentResult {
        text,
        page_count,
        ocr_page_count,
        char_count,
        header_lines_removed,
        footer_lines_removed,
    })
}

pub fn page_block(index: usize, body: &str) -> String {
    format!("--- Página {index} ---\n{body}\n")
}
