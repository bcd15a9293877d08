//! Markup helpers shared by the renderer and the selector.

use std::borrow::Cow;

use crate::ast::FormulaId;
use crate::errors::HmlError;

/// CSS class of a clickable subformula fragment.
pub const SUBFORMULA_CLASS: &str = "hml-subformula";

/// Attribute carrying the id a click on the fragment resolves to.
pub const SUBFORMULA_ID_ATTR: &str = "data-subformula-id";

/// Attribute value of fragments that have nothing to drill into.
pub const LEAF_SELECTION: &str = "-1";

/// Escape the characters that are significant in HTML text and attributes.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Wrap already-rendered markup in a clickable span.
///
/// `target` is the node a click selects; `None` marks a leaf.
pub(crate) fn clickable(target: Option<FormulaId>, inner: &str) -> String {
    let id = match target {
        Some(id) => id.to_string(),
        None => LEAF_SELECTION.to_string(),
    };
    format!("<span class=\"{SUBFORMULA_CLASS}\" {SUBFORMULA_ID_ATTR}=\"{id}\">{inner}</span>")
}

pub(crate) fn parenthesize(inner: String, wrap: bool) -> String {
    if wrap {
        format!("({inner})")
    } else {
        inner
    }
}

/// Parse the `data-subformula-id` value of a clicked fragment.
///
/// Returns `Ok(None)` for the leaf marker.
pub fn parse_selection(raw: &str) -> Result<Option<FormulaId>, HmlError> {
    let trimmed = raw.trim();
    if trimmed == LEAF_SELECTION {
        return Ok(None);
    }
    trimmed
        .parse::<u64>()
        .map(|raw_id| Some(FormulaId::from_raw(raw_id)))
        .map_err(|_| HmlError::MalformedSelection {
            raw: raw.to_string(),
        })
}

/// All selection targets in rendered markup, in document order.
///
/// Values that do not parse are skipped.
pub fn selection_targets(markup: &str) -> Vec<Option<FormulaId>> {
    let needle = format!("{SUBFORMULA_ID_ATTR}=\"");
    let mut targets = Vec::new();
    let mut rest = markup;
    while let Some(start) = rest.find(&needle) {
        rest = &rest[start + needle.len()..];
        let Some(end) = rest.find('"') else {
            break;
        };
        if let Ok(target) = parse_selection(&rest[..end]) {
            targets.push(target);
        }
        rest = &rest[end..];
    }
    targets
}
