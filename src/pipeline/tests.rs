use std::collections::HashSet;

use super::assemble::{AssembleOptions, assemble_document, page_block};
use super::lines::{NormalizedPage, PageLines, normalize_text};
use super::repetition::{Boundary, boundary_lines, detect_repeated, strip_boundaries};
use super::resolve::{OCR_DPI, OcrSettings, Page, resolve_page};
use super::testing::{FakeDocument, FakeOcr};
use crate::error::ConvertError;

fn set(values: &[&str]) -> HashSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn ocr_options(lang: &str) -> AssembleOptions {
    AssembleOptions {
        ocr: OcrSettings {
            enabled: true,
            lang: lang.to_string(),
        },
        ..AssembleOptions::default()
    }
}

#[test]
fn normalize_text_trims_and_drops_blank_lines() {
    let raw = "  Title  \r\n\n\t body line \u{000C}next page\n   \n";
    assert_eq!(normalize_text(Some(raw)), "Title\nbody line\nnext page");
    assert_eq!(normalize_text(None), "");
    assert_eq!(normalize_text(Some(" \n\t\n")), "");
}

#[test]
fn normalize_text_is_idempotent() {
    let samples = ["", "a", "  a  \n\n b ", "x\r\ny\rz", "\u{2028}solo\u{2029}"];
    for sample in samples {
        let once = normalize_text(Some(sample));
        assert_eq!(normalize_text(Some(&once)), once, "sample {sample:?}");
    }
}

#[test]
fn page_lines_single_line_is_both_first_and_last() {
    let lines = PageLines::from_text(Some("  only line  "));
    assert_eq!(lines.as_slice().len(), 1);
    assert_eq!(lines.first(), Some("only line"));
    assert_eq!(lines.last(), Some("only line"));

    let empty = PageLines::from_text(Some("\n\n"));
    assert!(empty.as_slice().is_empty());
    assert_eq!(empty.first(), None);
    assert_eq!(empty.last(), None);
}

#[test]
fn detect_repeated_uses_strict_inequality() {
    // Two pages at 0.5: a line must appear on both.
    assert_eq!(detect_repeated(&["Head", "Head"], 0.5), set(&["Head"]));
    assert!(detect_repeated(&["Head", "Other"], 0.5).is_empty());

    // Four pages at 0.5: two occurrences equal the bar and do not pass it.
    assert!(detect_repeated(&["A", "A", "B", "C"], 0.5).is_empty());
    assert_eq!(detect_repeated(&["A", "A", "A", "C"], 0.5), set(&["A"]));
}

#[test]
fn detect_repeated_never_returns_empty_values() {
    assert!(detect_repeated(&["", "", "", "x"], 0.5).is_empty());
    assert_eq!(detect_repeated(&["", "", "", "x"], 0.0), set(&["x"]));
    assert!(detect_repeated(&[], 0.5).is_empty());
}

#[test]
fn boundary_lines_use_empty_string_for_blank_pages() {
    let pages = [
        NormalizedPage::from_page(&Page {
            index: 1,
            raw_text: Some("top\nmiddle\nbottom".to_string()),
            used_ocr: false,
        }),
        NormalizedPage::from_page(&Page {
            index: 2,
            raw_text: None,
            used_ocr: false,
        }),
    ];

    assert_eq!(boundary_lines(&pages, Boundary::First), vec!["top", ""]);
    assert_eq!(boundary_lines(&pages, Boundary::Last), vec!["bottom", ""]);
}

#[test]
fn strip_boundaries_removes_at_most_one_line_per_end() {
    let lines = PageLines::from_text(Some("H\nH\nbody\nF\nF"));
    let stripped = strip_boundaries(&lines, &set(&["H"]), &set(&["F"]));
    assert_eq!(stripped.body, "H\nbody\nF");
    assert!(stripped.header_removed);
    assert!(stripped.footer_removed);
}

#[test]
fn strip_boundaries_leaves_page_without_repeated_lines_unchanged() {
    let lines = PageLines::from_text(Some("first\nsecond\nthird"));
    let stripped = strip_boundaries(&lines, &set(&["other"]), &HashSet::new());
    assert_eq!(stripped.body, lines.as_slice().join("\n"));
    assert!(!stripped.header_removed);
    assert!(!stripped.footer_removed);
}

#[test]
fn strip_boundaries_checks_footer_after_header_removal() {
    let lines = PageLines::from_text(Some("Header\nFooter"));
    let stripped = strip_boundaries(&lines, &set(&["Header"]), &set(&["Footer"]));
    assert_eq!(stripped.body, "");

    let single = PageLines::from_text(Some("Footer"));
    let stripped = strip_boundaries(&single, &set(&["Header"]), &set(&["Footer"]));
    assert_eq!(stripped.body, "");
    assert!(!stripped.header_removed);
    assert!(stripped.footer_removed);
}

#[test]
fn repeated_header_is_stripped_only_where_present() {
    let document = FakeDocument::with_pages(&[
        Some("CONFIDENTIAL\nIntro text\n1"),
        Some("CONFIDENTIAL\nBody text\n2"),
        Some("Summary\nClosing\n3"),
    ]);

    let result =
        assemble_document(&document, &FakeOcr::default(), &AssembleOptions::default()).unwrap();

    assert_eq!(
        result.text,
        "--- Página 1 ---\nIntro text\n1\n\n\
         --- Página 2 ---\nBody text\n2\n\n\
         --- Página 3 ---\nSummary\nClosing\n3"
    );
    assert_eq!(result.page_count, 3);
    assert_eq!(result.ocr_page_count, 0);
    assert_eq!(result.header_lines_removed, 2);
    assert_eq!(result.footer_lines_removed, 0);
    assert_eq!(result.char_count, result.text.chars().count());
}

#[test]
fn single_line_page_is_tested_against_both_sets() {
    let document = FakeDocument::with_pages(&[
        Some("Title\nbody one\nPage end"),
        Some("Title\nbody two\nPage end"),
        Some("Page end"),
    ]);

    let result =
        assemble_document(&document, &FakeOcr::default(), &AssembleOptions::default()).unwrap();

    assert_eq!(
        result.text,
        "--- Página 1 ---\nbody one\n\n--- Página 2 ---\nbody two\n\n--- Página 3 ---"
    );
    assert_eq!(result.header_lines_removed, 2);
    assert_eq!(result.footer_lines_removed, 3);
}

#[test]
fn independent_thresholds_apply_per_boundary() {
    let document = FakeDocument::with_pages(&[
        Some("Head\nbody a\nFoot"),
        Some("Head\nbody b\nFoot"),
        Some("Other\nbody c\nEnd"),
    ]);
    let options = AssembleOptions {
        header_threshold: 0.7,
        ..AssembleOptions::default()
    };

    let result = assemble_document(&document, &FakeOcr::default(), &options).unwrap();

    // 2 > 0.7 * 3 is false for the header, 2 > 1.5 holds for the footer.
    assert_eq!(result.header_lines_removed, 0);
    assert_eq!(result.footer_lines_removed, 2);
    assert!(result.text.starts_with("--- Página 1 ---\nHead\nbody a\n\n"));
}

#[test]
fn document_without_text_and_ocr_disabled_is_empty() {
    let document = FakeDocument::with_pages(&[None, Some("  \n\t"), None]);
    let ocr = FakeOcr::default();

    let result = assemble_document(&document, &ocr, &AssembleOptions::default()).unwrap();

    assert_eq!(result.text, "");
    assert_eq!(result.char_count, 0);
    assert_eq!(result.page_count, 3);
    assert_eq!(result.ocr_page_count, 0);
    assert!(document.rasterized.borrow().is_empty());
    assert!(ocr.languages.borrow().is_empty());
}

#[test]
fn blank_pages_keep_their_labels_when_other_pages_have_text() {
    let document = FakeDocument::with_pages(&[Some("Only page with text"), None]);

    let result =
        assemble_document(&document, &FakeOcr::default(), &AssembleOptions::default()).unwrap();

    assert_eq!(
        result.text,
        "--- Página 1 ---\nOnly page with text\n\n--- Página 2 ---"
    );
    assert_eq!(result.page_count, 2);
}

#[test]
fn fully_stripped_pages_keep_their_labels() {
    let document = FakeDocument::with_pages(&[Some("HDR"), Some("HDR")]);

    let result =
        assemble_document(&document, &FakeOcr::default(), &AssembleOptions::default()).unwrap();

    assert_eq!(result.text, "--- Página 1 ---\n\n\n--- Página 2 ---");
    assert_eq!(result.header_lines_removed, 2);
    assert_eq!(result.footer_lines_removed, 0);
    assert_eq!(result.char_count, result.text.chars().count());
}

#[test]
fn ocr_page_flows_through_normalization_and_stripping() {
    let document = FakeDocument::with_pages(&[Some("Alpha\nfooter x"), None, Some("Gamma")]);
    let ocr = FakeOcr::with_output(2, "  Beta line \n\n footer x \n");

    let result = assemble_document(&document, &ocr, &ocr_options("spa+eng")).unwrap();

    assert_eq!(
        result.text,
        "--- Página 1 ---\nAlpha\n\n--- Página 2 ---\nBeta line\n\n--- Página 3 ---\nGamma"
    );
    assert_eq!(result.page_count, 3);
    assert_eq!(result.ocr_page_count, 1);
    assert_eq!(result.footer_lines_removed, 2);
    assert_eq!(*document.rasterized.borrow(), vec![(2, OCR_DPI)]);
    assert_eq!(*ocr.languages.borrow(), vec!["spa+eng".to_string()]);
}

#[test]
fn resolve_page_prefers_embedded_text_over_ocr() {
    let document = FakeDocument::with_pages(&[Some("embedded")]);
    let ocr = FakeOcr::with_output(1, "recognized");

    let page = resolve_page(&document, &ocr, 1, &ocr_options("spa").ocr).unwrap();

    assert_eq!(page.raw_text.as_deref(), Some("embedded"));
    assert!(!page.used_ocr);
    assert!(document.rasterized.borrow().is_empty());
}

#[test]
fn resolve_page_without_ocr_yields_empty_text() {
    let document = FakeDocument::with_pages(&[Some(" \n ")]);

    let page = resolve_page(&document, &FakeOcr::default(), 1, &OcrSettings::default()).unwrap();

    assert_eq!(page.raw_text.as_deref(), Some(""));
    assert!(!page.used_ocr);
}

#[test]
fn extraction_failure_aborts_document() {
    let mut document = FakeDocument::with_pages(&[Some("one"), Some("two"), Some("three")]);
    document.failing_page = Some(2);

    let error = assemble_document(&document, &FakeOcr::default(), &AssembleOptions::default())
        .unwrap_err();

    assert!(matches!(error, ConvertError::Extraction(_)));
}

#[test]
fn ocr_failure_aborts_document() {
    let document = FakeDocument::with_pages(&[Some("one"), None]);

    let error = assemble_document(&document, &FakeOcr::default(), &ocr_options("spa")).unwrap_err();

    assert!(matches!(error, ConvertError::Ocr { page: 2, .. }));
}

#[test]
fn counters_respect_document_invariants() {
    let document = FakeDocument::with_pages(&[None, Some("ñandú año\nPágina"), None, Some("x")]);
    let mut ocr = FakeOcr::with_output(1, "uno");
    ocr.outputs.insert(3, "tres".to_string());

    let result = assemble_document(&document, &ocr, &ocr_options("spa")).unwrap();

    assert_eq!(result.ocr_page_count, 2);
    assert!(result.ocr_page_count <= result.page_count);
    assert_eq!(result.char_count, result.text.chars().count());
    assert!(result.char_count < result.text.len());
}

#[test]
fn page_block_labels_page() {
    assert_eq!(page_block(7, "body"), "--- Página 7 ---\nbody\n");
    assert_eq!(page_block(1, ""), "--- Página 1 ---\n\n");
}
