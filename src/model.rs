use serde::Serialize;

/// Outcome of converting one PDF into its paginated text artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentResult {
    pub text: String,
    pub page_count: usize,
    pub ocr_page_count: usize,
    pub char_count: usize,
    pub header_lines_removed: usize,
    pub footer_lines_removed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentStatus {
    Ok,
    Error,
}

impl DocumentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Error => "ERROR",
        }
    }
}

/// One row of the CSV audit file; field order is the column order.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub timestamp: String,
    pub pdf: String,
    pub txt: String,
    pub status: DocumentStatus,
    pub pages: usize,
    pub ocr_pages: usize,
    pub chars: usize,
    pub seconds: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolVersions {
    pub pdfinfo: Option<String>,
    pub pdftotext: Option<String>,
    pub pdftoppm: Option<String>,
    pub tesseract: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSettings {
    pub source_dir: String,
    pub destination_dir: String,
    pub recursive: bool,
    pub ocr: bool,
    pub ocr_lang: String,
    pub log_base: String,
    pub header_threshold: f64,
    pub footer_threshold: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunCounts {
    pub documents_found: usize,
    pub documents_ok: usize,
    pub documents_failed: usize,
    pub pages: usize,
    pub ocr_pages: usize,
    pub chars: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub pdf: String,
    pub txt: String,
    pub status: DocumentStatus,
    pub pages: usize,
    pub ocr_pages: usize,
    pub chars: usize,
    pub header_lines_removed: usize,
    pub footer_lines_removed: usize,
    pub seconds: f64,
    pub sha256: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub manifest_version: u32,
    pub started_at: String,
    pub finished_at: String,
    pub settings: RunSettings,
    pub tool_versions: ToolVersions,
    pub counts: RunCounts,
    pub documents: Vec<DocumentSummary>,
}
