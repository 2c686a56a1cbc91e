// src/domain/sections.rs

use crate::domain::logic::{record_labeled_value, LabelRule};
use crate::domain::listing::ListingDetail;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub header: String,
    pub body: String,
}

/// A header line has at least one uppercase letter and no lowercase ones,
/// e.g. "BUSINESS OVERVIEW:" or "FINANCING 2024".
pub fn is_section_header(line: &str) -> bool {
    line.chars().any(char::is_uppercase) && !line.chars().any(char::is_lowercase)
}

/// Splits a free-text block into header/body sections.
///
/// Lines are trimmed and blank ones skipped. Body lines are joined with a
/// single space. Text before the first header is dropped, as is any header
/// with no body.
pub fn split_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<&str> = None;
    let mut body: Vec<&str> = Vec::new();

    let mut flush = |header: Option<&str>, body: &mut Vec<&str>| {
        if let Some(header) = header {
            if !body.is_empty() {
                sections.push(Section {
                    header: header.to_string(),
                    body: body.join(" "),
                });
            }
        }
        body.clear();
    };

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if is_section_header(line) {
            flush(current, &mut body);
            current = Some(line);
        } else if current.is_some() {
            body.push(line);
        }
    }
    flush(current, &mut body);

    sections
}

/// Files every section of `text` into `detail` through `rules`, with the
/// same dedup as quick-facts labels.
pub fn record_sections(detail: &mut ListingDetail, rules: &[LabelRule], text: &str) {
    for section in split_sections(text) {
        record_labeled_value(detail, rules, &section.header, section.body);
    }
}
