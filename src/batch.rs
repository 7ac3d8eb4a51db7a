//! Batch driver: enumerate PDFs, convert each one, write its `.txt` and
//! append one row per document to the CSV and line audit logs.

mod audit;
mod discover;

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing::{info, warn};

use crate::cli::Cli;
use crate::error::ConvertError;
use crate::model::{
    AuditRecord, DocumentResult, DocumentStatus, DocumentSummary, RunCounts, RunSettings,
    RunSummary,
};
use crate::pipeline::{AssembleOptions, OcrEngine, OcrSettings, PageSource, assemble_document};
use crate::tools::{PopplerDocument, TesseractEngine, preflight};
use crate::util::{ensure_directory, format_seconds, now_local_string, sha256_file, write_json_pretty};

use audit::{AuditLog, AuditPaths};
use discover::{discover_pdfs, output_path_for};

pub fn run(args: &Cli) -> Result<RunCounts> {
    let started_at = now_local_string();

    ensure_directory(&args.destination_dir)?;
    if let Some(parent) = args
        .log_base
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        ensure_directory(parent)?;
    }

    let audit_paths = AuditPaths::from_base(&args.log_base);
    let write_csv_header = !audit_paths.csv.exists();
    let mut audit = AuditLog::open(&audit_paths, write_csv_header)?;

    info!(
        source = %args.source_dir.display(),
        destination = %args.destination_dir.display(),
        csv = %audit.paths().csv.display(),
        log = %audit.paths().log.display(),
        ocr = args.ocr,
        "starting batch conversion"
    );

    let tool_versions = preflight(args.ocr);
    let pdfs = discover_pdfs(&args.source_dir, args.recursive)?;

    let mut counts = RunCounts {
        documents_found: pdfs.len(),
        ..RunCounts::default()
    };
    let mut documents = Vec::with_capacity(pdfs.len());

    if pdfs.is_empty() {
        let message = format!("No PDFs found in {}", args.source_dir.display());
        println!("{message}");
        audit.note(&message)?;
    }

    let options = assemble_options(args);
    let engine = TesseractEngine;

    for pdf in &pdfs {
        let txt_path = output_path_for(pdf, &args.destination_dir);
        let started = Instant::now();
        let outcome = convert_pdf(pdf, &txt_path, &options, &engine);
        let seconds = started.elapsed().as_secs_f64();

        let record = audit_record(pdf, &txt_path, &outcome, seconds);
        match &outcome {
            Ok(result) => {
                counts.documents_ok += 1;
                counts.pages += result.page_count;
                counts.ocr_pages += result.ocr_page_count;
                counts.chars += result.char_count;
                println!(
                    "OK: {} -> {}  ({} pages, {} OCR, {} chars)",
                    record.pdf, record.txt, result.page_count, result.ocr_page_count, result.char_count
                );
                info!(
                    pdf = %record.pdf,
                    pages = result.page_count,
                    ocr_pages = result.ocr_page_count,
                    chars = result.char_count,
                    headers_removed = result.header_lines_removed,
                    footers_removed = result.footer_lines_removed,
                    seconds = %record.seconds,
                    "converted document"
                );
            }
            Err(_) => {
                counts.documents_failed += 1;
                println!("ERROR: {} -> {}", record.pdf, record.error);
                warn!(pdf = %record.pdf, error = %record.error, "document failed");
            }
        }

        audit.record(&record)?;

        if args.summary_path.is_some() {
            documents.push(document_summary(pdf, &record, outcome.as_ref().ok(), seconds));
        }
    }

    info!(
        found = counts.documents_found,
        ok = counts.documents_ok,
        failed = counts.documents_failed,
        "batch conversion completed"
    );

    if let Some(summary_path) = &args.summary_path {
        let summary = RunSummary {
            manifest_version: 1,
            started_at,
            finished_at: now_local_string(),
            settings: run_settings(args),
            tool_versions,
            counts: counts.clone(),
            documents,
        };
        write_json_pretty(summary_path, &summary)?;
        info!(path = %summary_path.display(), "wrote run summary");
    }

    Ok(counts)
}

fn assemble_options(args: &Cli) -> AssembleOptions {
    AssembleOptions {
        ocr: OcrSettings {
            enabled: args.ocr,
            lang: args.ocr_lang.clone(),
        },
        header_threshold: args.header_threshold,
        footer_threshold: args.footer_threshold,
    }
}

fn convert_pdf(
    pdf: &Path,
    txt_path: &Path,
    options: &AssembleOptions,
    engine: &TesseractEngine,
) -> Result<DocumentResult, ConvertError> {
    let document = PopplerDocument::open(pdf)?;
    convert_with(&document, engine, options, txt_path)
}

/// Assemble the document and write its artifact; nothing is written when
/// assembly fails.
fn convert_with<S, E>(
    source: &S,
    engine: &E,
    options: &AssembleOptions,
    txt_path: &Path,
) -> Result<DocumentResult, ConvertError>
where
    S: PageSource + ?Sized,
    E: OcrEngine + ?Sized,
{
    let result = assemble_document(source, engine, options)?;
    fs::write(txt_path, &result.text).map_err(|source| ConvertError::Io {
        path: txt_path.to_path_buf(),
        source,
    })?;
    Ok(result)
}

fn audit_record(
    pdf: &Path,
    txt_path: &Path,
    outcome: &Result<DocumentResult, ConvertError>,
    seconds: f64,
) -> AuditRecord {
    let (status, pages, ocr_pages, chars, error) = match outcome {
        Ok(result) => (
            DocumentStatus::Ok,
            result.page_count,
            result.ocr_page_count,
            result.char_count,
            String::new(),
        ),
        Err(err) => (DocumentStatus::Error, 0, 0, 0, error_message(err)),
    };

    AuditRecord {
        timestamp: now_local_string(),
        pdf: pdf.display().to_string(),
        txt: txt_path.display().to_string(),
        status,
        pages,
        ocr_pages,
        chars,
        seconds: format_seconds(seconds),
        error,
    }
}

/// Display of the error and its sources joined with `": "`, folded onto one
/// line so each document keeps a single log line.
fn error_message(err: &ConvertError) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }

    message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<&str>>()
        .join(" ")
}

fn document_summary(
    pdf: &Path,
    record: &AuditRecord,
    result: Option<&DocumentResult>,
    seconds: f64,
) -> DocumentSummary {
    DocumentSummary {
        pdf: record.pdf.clone(),
        txt: record.txt.clone(),
        status: record.status,
        pages: record.pages,
        ocr_pages: record.ocr_pages,
        chars: record.chars,
        header_lines_removed: result.map_or(0, |result| result.header_lines_removed),
        footer_lines_removed: result.map_or(0, |result| result.footer_lines_removed),
        seconds,
        sha256: sha256_file(pdf).unwrap_or_default(),
        error: (!record.error.is_empty()).then(|| record.error.clone()),
    }
}

fn run_settings(args: &Cli) -> RunSettings {
    RunSettings {
        source_dir: args.source_dir.display().to_string(),
        destination_dir: args.destination_dir.display().to_string(),
        recursive: args.recursive,
        ocr: args.ocr,
        ocr_lang: args.ocr_lang.clone(),
        log_base: args.log_base.display().to_string(),
        header_threshold: args.header_threshold,
        footer_threshold: args.footer_threshold,
    }
}
