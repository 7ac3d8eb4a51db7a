use std::collections::{HashMap, HashSet};

use super::lines::{NormalizedPage, PageLines};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    First,
    Last,
}

impl Boundary {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "header",
            Self::Last => "footer",
        }
    }
}

/// One boundary value per page, in page order; empty pages contribute `""`.
pub fn boundary_lines(pages: &[NormalizedPage], boundary: Boundary) -> Vec<&str> {
    pages
        .iter()
        .map(|page| {
            let line = match boundary {
                Boundary::First => page.lines.first(),
                Boundary::Last => page.lines.last(),
            };
            line.unwrap_or_default()
        })
        .collect()
}

/// Values occurring on strictly more than `threshold * values.len()` pages.
///
/// Blank values never qualify, whatever their count.
pub fn detect_repeated(values: &[&str], threshold: f64) -> HashSet<String> {
    let total = values.len() as f64;
    let mut counts = HashMap::<&str, usize>::new();
    for value in values {
        *counts.entry(*value).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .filter(|(value, count)| !value.trim().is_empty() && (*count as f64) > threshold * total)
        .map(|(value, _)| value.to_string())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrippedPage {
    pub body: String,
    pub header_removed: bool,
    pub footer_removed: bool,
}

/// Drop at most one repeated line from the top and one from the bottom.
///
/// The footer check runs on what is left after the header check, so a
/// single-line page can lose its only line to either set.
pub fn strip_boundaries(
    lines: &PageLines,
    headers: &HashSet<String>,
    footers: &HashSet<String>,
) -> StrippedPage {
    let mut remaining = lines.as_slice();

    let header_removed = match remaining.split_first() {
        Some((first, rest)) if headers.contains(first) => {
            remaining = rest;
            true
        }
        _ => false,
    };

    let footer_removed = match remaining.split_last() {
        Some((last, rest)) if footers.contains(last) => {
            remaining = rest;
            true
        }
        _ => false,
    };

    StrippedPage {
        body: remaining.join("\n").trim().to_string(),
        header_removed,
        footer_removed,
    }
}
