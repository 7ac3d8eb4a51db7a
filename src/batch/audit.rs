use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::model::AuditRecord;
use crate::util::now_local_string;

pub const CSV_HEADER: [&str; 9] = [
    "timestamp",
    "pdf",
    "txt",
    "status",
    "pages",
    "ocr_pages",
    "chars",
    "seconds",
    "error",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditPaths {
    pub csv: PathBuf,
    pub log: PathBuf,
}

impl AuditPaths {
    /// `<base>.csv` and `<base>.log`; the suffix is appended, never substituted.
    pub fn from_base(base: &Path) -> Self {
        Self {
            csv: with_suffix(base, ".csv"),
            log: with_suffix(base, ".log"),
        }
    }
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut raw = OsString::from(base.as_os_str());
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Append-only CSV and line log shared by the whole batch.
pub struct AuditLog {
    csv: csv::Writer<File>,
    log: File,
    paths: AuditPaths,
}

impl AuditLog {
    /// Open both files for appending. `write_csv_header` comes from the
    /// start-up check of whether the CSV already existed.
    pub fn open(paths: &AuditPaths, write_csv_header: bool) -> Result<Self> {
        let csv_file = open_append(&paths.csv)?;
        let log = open_append(&paths.log)?;

        let mut csv = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(csv_file);
        if write_csv_header {
            csv.write_record(CSV_HEADER)
                .with_context(|| format!("failed to write header to {}", paths.csv.display()))?;
            csv.flush()
                .with_context(|| format!("failed to flush {}", paths.csv.display()))?;
        }

        Ok(Self {
            csv,
            log,
            paths: paths.clone(),
        })
    }

    pub fn paths(&self) -> &AuditPaths {
        &self.paths
    }

    /// Informational line in the `.log` file only.
    pub fn note(&mut self, message: &str) -> Result<()> {
        writeln!(self.log, "[{}] {}", now_local_string(), message)
            .and_then(|()| self.log.flush())
            .with_context(|| format!("failed to append to {}", self.paths.log.display()))
    }

    pub fn record(&mut self, record: &AuditRecord) -> Result<()> {
        self.csv
            .serialize(record)
            .with_context(|| format!("failed to append to {}", self.paths.csv.display()))?;
        self.csv
            .flush()
            .with_context(|| format!("failed to flush {}", self.paths.csv.display()))?;

        writeln!(self.log, "{}", format_log_line(record))
            .and_then(|()| self.log.flush())
            .with_context(|| format!("failed to append to {}", self.paths.log.display()))
    }
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open audit file: {}", path.display()))
}

pub fn format_log_line(record: &AuditRecord) -> String {
    format!(
        "[{}] {} {} -> {} | pages={} ocr={} chars={} sec={} err={}",
        record.timestamp,
        record.status.as_str(),
        record.pdf,
        record.txt,
        record.pages,
        record.ocr_pages,
        record.chars,
        record.seconds,
        record.error
    )
}
