use super::resolve::Page;

/// Ordered sequence of non-empty, trimmed lines.
///
/// All "first line" / "last line" questions go through this type so empty
/// and single-line pages behave the same everywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLines {
    lines: Vec<String>,
}

impl PageLines {
    pub fn from_text(text: Option<&str>) -> Self {
        let normalized = normalize_text(text);
        let lines = normalized
            .split('\n')
            .filter(|line| !line.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        Self { lines }
    }

    pub fn first(&self) -> Option<&str> {
        self.lines.first().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.lines
    }
}

/// Trim every line, drop the blank ones and rejoin with `\n`.
pub fn normalize_text(text: Option<&str>) -> String {
    text.unwrap_or_default()
        .split(is_line_break)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<&str>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPage {
    pub index: usize,
    pub lines: PageLines,
    pub used_ocr: bool,
}

impl NormalizedPage {
    pub fn from_page(page: &Page) -> Self {
        Self {
            index: page.index,
            lines: PageLines::from_text(page.raw_text.as_deref()),
            used_ocr: page.used_ocr,
        }
    }
}

// Same separators as a universal-newline split, so form feeds and vertical
// tabs left in a text layer never glue two lines together.
fn is_line_break(character: char) -> bool {
    matches!(
        character,
        '\n' | '\r'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{001C}'
            | '\u{001D}'
            | '\u{001E}'
            | '\u{0085}'
            | '\u{2028}'
            | '\u{2029}'
    )
}
