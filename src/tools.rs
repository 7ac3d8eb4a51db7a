//! Poppler and Tesseract collaborators, driven as subprocesses.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{ConvertError, Result};
use crate::model::ToolVersions;
use crate::pipeline::{OcrEngine, PageRaster, PageSource};

/// A PDF opened through poppler: page count from `pdfinfo`, text layer from a
/// single `pdftotext` run split on form feeds.
#[derive(Debug)]
pub struct PopplerDocument {
    path: PathBuf,
    pages: Vec<String>,
}

impl PopplerDocument {
    pub fn open(path: &Path) -> Result<Self> {
        let info = run_tool("pdfinfo", Command::new("pdfinfo").arg(path), path)
            .map_err(ConvertError::Extraction)?;
        let Some(page_count) = parse_page_count(&String::from_utf8_lossy(&info.stdout)) else {
            return Err(ConvertError::Extraction(format!(
                "pdfinfo did not report a page count for {}",
                path.display()
            )));
        };

        let text = run_tool(
            "pdftotext",
            Command::new("pdftotext")
                .arg("-enc")
                .arg("UTF-8")
                .arg(path)
                .arg("-"),
            path,
        )
        .map_err(ConvertError::Extraction)?;

        let pages = split_text_layer(&String::from_utf8_lossy(&text.stdout), page_count);
        debug!(path = %path.display(), pages = pages.len(), "loaded text layer");

        Ok(Self {
            path: path.to_path_buf(),
            pages,
        })
    }
}

impl PageSource for PopplerDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn embedded_text(&self, page: usize) -> Result<Option<String>> {
        Ok(page
            .checked_sub(1)
            .and_then(|index| self.pages.get(index))
            .filter(|text| !text.is_empty())
            .cloned())
    }

    fn rasterize(&self, page: usize, dpi: u32) -> Result<PageRaster> {
        let ocr_error = |message: String| ConvertError::Ocr { page, message };

        let workspace = tempfile::Builder::new()
            .prefix("pdf2txt_ocr_")
            .tempdir()
            .map_err(|err| ocr_error(format!("failed to create scratch directory: {err}")))?;
        let output_root = workspace.path().join(format!("page-{page}"));
        let png_path = output_root.with_extension("png");

        run_tool(
            "pdftoppm",
            Command::new("pdftoppm")
                .arg("-f")
                .arg(page.to_string())
                .arg("-l")
                .arg(page.to_string())
                .arg("-r")
                .arg(dpi.to_string())
                .arg("-singlefile")
                .arg("-png")
                .arg(&self.path)
                .arg(&output_root),
            &self.path,
        )
        .map_err(ocr_error)?;

        if !png_path.exists() {
            return Err(ocr_error(format!(
                "pdftoppm did not produce expected image for {}",
                self.path.display()
            )));
        }

        Ok(PageRaster::in_workspace(page, png_path, workspace))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TesseractEngine;

impl OcrEngine for TesseractEngine {
    fn recognize(&self, raster: &PageRaster, lang: &str) -> Result<String> {
        let output = run_tool(
            "tesseract",
            Command::new("tesseract")
                .arg(raster.path())
                .arg("stdout")
                .arg("-l")
                .arg(lang),
            raster.path(),
        )
        .map_err(|message| ConvertError::Ocr {
            page: raster.page(),
            message,
        })?;

        Ok(String::from_utf8_lossy(&output.stdout).replace('\u{0000}', ""))
    }
}

fn run_tool(program: &str, command: &mut Command, subject: &Path) -> std::result::Result<Output, String> {
    let output = command
        .output()
        .map_err(|err| format!("failed to execute {program} for {}: {err}", subject.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "{program} returned non-zero exit status for {}: {}",
            subject.display(),
            stderr.trim()
        ));
    }

    Ok(output)
}

fn parse_page_count(info: &str) -> Option<usize> {
    let pages_regex = Regex::new(r"(?m)^Pages:\s+(\d+)\s*$").ok()?;
    pages_regex
        .captures(info)?
        .get(1)?
        .as_str()
        .parse::<usize>()
        .ok()
}

/// pdftotext ends every page with a form feed; keep exactly `page_count`
/// chunks so blank trailing pages still count.
fn split_text_layer(raw: &str, page_count: usize) -> Vec<String> {
    let mut pages = raw
        .split('\u{000C}')
        .take(page_count)
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect::<Vec<String>>();
    pages.resize(page_count, String::new());
    pages
}

/// Record tool versions and warn about anything the run will need but lacks.
pub fn preflight(ocr_enabled: bool) -> ToolVersions {
    let versions = ToolVersions {
        pdfinfo: command_version_optional("pdfinfo", &["-v"]),
        pdftotext: command_version_optional("pdftotext", &["-v"]),
        pdftoppm: command_version_optional("pdftoppm", &["-v"]),
        tesseract: command_version_optional("tesseract", &["--version"]),
    };

    let mut required = vec![("pdfinfo", &versions.pdfinfo), ("pdftotext", &versions.pdftotext)];
    if ocr_enabled {
        required.push(("pdftoppm", &versions.pdftoppm));
        required.push(("tesseract", &versions.tesseract));
    }
    for (program, version) in required {
        if version.is_none() {
            warn!(program, "required tool not found; affected documents will fail");
        }
    }

    versions
}

fn command_version_optional(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let source = if stdout.trim().is_empty() {
        stderr.trim()
    } else {
        stdout.trim()
    };

    source
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
}
