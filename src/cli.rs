use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_THRESHOLD: f64 = 0.5;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "pdf2txt",
    version,
    about = "Batch-convert PDFs to cleaned text, with OCR fallback and audit logs"
)]
pub struct Cli {
    /// Folder containing the input PDFs
    pub source_dir: PathBuf,

    /// Folder receiving one .txt per PDF
    pub destination_dir: PathBuf,

    /// Search subdirectories for PDFs
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Run OCR on pages without an embedded text layer
    #[arg(long, default_value_t = false)]
    pub ocr: bool,

    /// Tesseract language code(s), e.g. "spa", "eng" or "spa+eng"
    #[arg(long, default_value = "spa", value_parser = parse_ocr_lang)]
    pub ocr_lang: String,

    /// Base path for the audit logs, without extension (.csv and .log are appended)
    #[arg(long, default_value = "conversion_log")]
    pub log_base: PathBuf,

    /// Share of pages a first line must exceed to be stripped as a repeated header
    #[arg(long, default_value_t = DEFAULT_THRESHOLD, value_parser = parse_threshold)]
    pub header_threshold: f64,

    /// Share of pages a last line must exceed to be stripped as a repeated footer
    #[arg(long, default_value_t = DEFAULT_THRESHOLD, value_parser = parse_threshold)]
    pub footer_threshold: f64,

    /// Optional JSON summary of the whole run
    #[arg(long)]
    pub summary_path: Option<PathBuf>,
}

fn parse_threshold(raw: &str) -> Result<f64, String> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid threshold '{raw}': {err}"))?;

    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(format!("threshold must be between 0 and 1, got {raw}"));
    }

    Ok(value)
}

fn parse_ocr_lang(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("OCR language must not be empty".to_string());
    }
    Ok(trimmed.to_string())
}
