//! Plain-text extraction from HTML markup.
//!
//! Block-level boundaries (`<br>`, `<p>`, `<div>`, table rows, list items,
//! headings) become newlines so that text which starts a visual line in the
//! browser also starts a line in the extracted string.

use scraper::{ElementRef, Html, Selector};

use crate::ScrapeError;

/// Elements whose start marks a new line of text.
const LINE_BREAK_ELEMENTS: &[&str] = &[
    "br", "p", "div", "tr", "li", "h1", "h2", "h3", "h4", "h5", "h6", "pre", "blockquote",
];

/// Parses a CSS selector string, returning a [`ScrapeError`] on failure.
///
/// # Errors
///
/// Returns [`ScrapeError::Parse`] if the selector is not valid CSS.
pub fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector)
        .map_err(|e| ScrapeError::Parse(format!("invalid CSS selector '{selector}': {e}")))
}

/// Returns the text of the first element matching `selector` in `markup`.
///
/// A page without a matching element yields an empty string.
///
/// # Errors
///
/// Returns [`ScrapeError::Parse`] if `selector` is not valid CSS.
pub fn extract_text(markup: &str, selector: &str) -> Result<String, ScrapeError> {
    let sel = parse_selector(selector)?;
    let document = Html::parse_document(markup);

    let Some(container) = document.select(&sel).next() else {
        log::warn!("No element matching '{selector}' found in page");
        return Ok(String::new());
    };

    Ok(element_text(container))
}

/// Collects the text beneath `element`, breaking lines at block elements.
#[must_use]
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    push_text(element, &mut out);
    out
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    let breaks_line = LINE_BREAK_ELEMENTS.contains(&element.value().name());
    if breaks_line {
        break_line(out);
    }

    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            push_text(child, out);
        }
    }

    if breaks_line {
        break_line(out);
    }
}

fn break_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Collects the text beneath `element` with whitespace runs collapsed.
#[must_use]
pub fn inline_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
