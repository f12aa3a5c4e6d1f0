//! Group transform resolution.
//!
//! Annotation groups may only be positioned with a single `translate(x,y)`.
//! Scaling, rotation, skew, matrices and chained transform lists are refused
//! rather than approximated.

use regex::Regex;
use std::sync::LazyLock;

use crate::model::Translation;
use crate::parse::{NodeId, SvgDocument};
use crate::precision::round3;

static TRANSLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let number = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";
    Regex::new(&format!(
        r"^\s*translate\s*\(\s*({number})\s*(?:,\s*|\s+)({number})\s*\)\s*$"
    ))
    .expect("valid translate regex")
});

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformError {
    #[error("unsupported transform `{raw}` (only a single translate(x,y) is handled)")]
    Unsupported { raw: String },
}

/// Parse a transform declaration that must be exactly `translate(A,B)`.
pub fn parse_translate(raw: &str) -> Result<Translation, TransformError> {
    let unsupported = || TransformError::Unsupported {
        raw: raw.to_string(),
    };

    let caps = TRANSLATE_RE.captures(raw).ok_or_else(unsupported)?;
    let dx = caps[1].parse::<f64>().map_err(|_| unsupported())?;
    let dy = caps[2].parse::<f64>().map_err(|_| unsupported())?;
    if !dx.is_finite() || !dy.is_finite() {
        return Err(unsupported());
    }

    Ok(Translation::new(round3(dx), round3(dy)))
}

/// Offset declared by `group` itself. Ancestors are not consulted, so a shape
/// nested two groups deep only receives the inner group's offset.
pub fn resolve_translation(doc: &SvgDocument, group: NodeId) -> Result<Translation, TransformError> {
    match doc.attr(group, "transform") {
        None => Ok(Translation::IDENTITY),
        Some(raw) if raw.trim().is_empty() => Ok(Translation::IDENTITY),
        Some(raw) => parse_translate(raw),
    }
}
