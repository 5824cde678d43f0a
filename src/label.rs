//! The Bates label grammar: one formatter/parser pair.
//!
//! Filenames are the only persistent record of an item's assigned range, so
//! the grammar is parsed and produced in exactly one place. The shape is
//! (case-sensitive prefix, space-delimited):
//!
//! ```text
//! PREFIX SP START[-END][ SP '-' SP ORIGINAL_NAME]
//! ```
//!
//! Examples: `CF 0001`, `CF 0001-0008`, `CF 0001-0008 - Exhibit A`.
//!
//! Any label produced by [`BatesLabel::text`] must re-parse to the identical
//! `(prefix, start, end)` triple; the tests below pin that round trip.

/// A parsed or to-be-formatted Bates label.
///
/// `end` is present only when the item spans more than one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatesLabel {
    /// Alphanumeric prefix, e.g. `CF`.
    pub prefix: String,

    /// First number of the range (1-based).
    pub start: u32,

    /// Last number of the range, absent for single-page items.
    pub end: Option<u32>,

    /// Zero-padding width used when formatting.
    pub digits: usize,
}

impl BatesLabel {
    /// Label for a single Bates slot.
    pub fn single(prefix: &str, start: u32, digits: usize) -> Self {
        Self {
            prefix: prefix.to_string(),
            start,
            end: None,
            digits,
        }
    }

    /// Label for a page range. Collapses to a single label when the range
    /// covers exactly one slot.
    pub fn range(prefix: &str, start: u32, end: u32, digits: usize) -> Self {
        Self {
            prefix: prefix.to_string(),
            start,
            end: if end > start { Some(end) } else { None },
            digits,
        }
    }

    /// The label text: `CF 0001` or `CF 0001-0008`.
    pub fn text(&self) -> String {
        match self.end {
            Some(end) => format!(
                "{} {:0w$}-{:0w$}",
                self.prefix,
                self.start,
                end,
                w = self.digits
            ),
            None => format!("{} {:0w$}", self.prefix, self.start, w = self.digits),
        }
    }

    /// The single-number label stamped on page `index` (0-based) of the item.
    pub fn page_label(&self, index: usize) -> String {
        format!(
            "{} {:0w$}",
            self.prefix,
            self.start + index as u32,
            w = self.digits
        )
    }

    /// Number of pages the label claims: `end - start + 1`, or 1.
    pub fn expected_pages(&self) -> usize {
        match self.end {
            Some(end) => end.saturating_sub(self.start) as usize + 1,
            None => 1,
        }
    }

    /// Last number covered by the label.
    pub fn last(&self) -> u32 {
        self.end.unwrap_or(self.start)
    }

    /// Parse a file stem against the label grammar.
    ///
    /// Returns `None` for stems that do not match; a non-match is an
    /// informational skip for callers, never an error.
    pub fn parse(stem: &str) -> Option<Self> {
        // Prefix: leading alphanumeric run, then at least one space.
        let prefix_len = stem
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(stem.len());
        if prefix_len == 0 {
            return None;
        }
        let (prefix, rest) = stem.split_at(prefix_len);

        let after_ws = rest.trim_start_matches(' ');
        if after_ws.len() == rest.len() {
            return None;
        }

        // Start: digit run; its width is the padding we re-emit.
        let start_len = after_ws
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(after_ws.len());
        if start_len == 0 {
            return None;
        }
        let (start_str, mut rest) = after_ws.split_at(start_len);
        let start: u32 = start_str.parse().ok()?;

        // Optional -END, digits immediately after the hyphen.
        let mut end = None;
        if let Some(tail) = rest.strip_prefix('-') {
            let end_len = tail
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(tail.len());
            if end_len > 0 {
                end = Some(tail[..end_len].parse().ok()?);
                rest = &tail[end_len..];
            }
        }

        // Optional trailing original name: `\s*-\s*.+`.
        if !rest.is_empty() {
            let suffix = rest.trim_start_matches(' ').strip_prefix('-')?;
            if suffix.trim_start_matches(' ').is_empty() {
                return None;
            }
        }

        Some(Self {
            prefix: prefix.to_string(),
            start,
            end,
            digits: start_str.len(),
        })
    }
}
