use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use tracing::warn;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// `*.pdf` directly under `source_dir`, or `**/*.pdf` when `recursive`,
/// sorted so runs are reproducible. A missing source directory matches
/// nothing.
pub fn discover_pdfs(source_dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let pattern = search_pattern(source_dir, recursive);
    let entries = glob::glob_with(&pattern, MATCH_OPTIONS)
        .with_context(|| format!("invalid search pattern: {pattern}"))?;

    let mut pdfs = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                warn!(path = %err.path().display(), error = %err.error(), "skipping unreadable entry");
                continue;
            }
        };

        // Symlinks count when they resolve to a regular file.
        if path.is_file() && has_pdf_extension(&path) && !is_hidden_below(&path, source_dir) {
            pdfs.push(path);
        }
    }

    pdfs.sort();
    Ok(pdfs)
}

fn search_pattern(source_dir: &Path, recursive: bool) -> String {
    let root = Pattern::escape(&source_dir.to_string_lossy());
    let tail = if recursive { "**/*.pdf" } else { "*.pdf" };
    if root.is_empty() {
        tail.to_string()
    } else {
        format!("{}/{tail}", root.trim_end_matches('/'))
    }
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

// Dot-directories under the source root are skipped, as shell globs do.
fn is_hidden_below(path: &Path, source_dir: &Path) -> bool {
    path.strip_prefix(source_dir)
        .unwrap_or(path)
        .components()
        .any(|component| match component {
            Component::Normal(name) => name.to_string_lossy().starts_with('.'),
            _ => false,
        })
}

/// `<destination_dir>/<source stem>.txt`
pub fn output_path_for(pdf: &Path, destination_dir: &Path) -> PathBuf {
    let stem = pdf
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_default();
    let mut file_name = stem;
    file_name.push(".txt");
    destination_dir.join(file_name)
}
