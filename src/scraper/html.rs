// src/scraper/html.rs
use crate::scraper::ScraperError;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

pub fn selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::HtmlParse(format!("{css}: {e}")))
}

/// All text below `el`, trimmed.
pub fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

pub fn first_match<'a>(scope: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    scope.select(sel).next()
}

/// Trimmed text of the first match under `scope`, or `None` when nothing matches.
pub fn first_text(scope: ElementRef<'_>, sel: &Selector) -> Option<String> {
    first_match(scope, sel).map(element_text)
}

/// Text of the whole rendered document.
pub fn document_text(document: &Html) -> String {
    document.root_element().text().collect()
}

/// First `application/ld+json` script block, parsed.
///
/// A missing or empty block is `Ok(None)`; a block that is not valid JSON is
/// an error.
pub fn ld_json(document: &Html) -> Result<Option<Value>, ScraperError> {
    let sel = selector(r#"script[type="application/ld+json"]"#)?;

    let Some(script) = document.select(&sel).next() else {
        return Ok(None);
    };

    let text: String = script.text().collect();
    if text.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| ScraperError::JsonParse(e.to_string()))
}
