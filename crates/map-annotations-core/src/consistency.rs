//! Advisory checks that the drawing lines up with its map raster.
//!
//! The annotation tool may omit any of the checked attributes; a missing
//! attribute skips that check. Nothing here fails a parse.

use serde::Serialize;

use crate::geometry::parse_length;
use crate::metadata::MapDimensions;
use crate::parse::SvgDocument;

#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Discrepancy {
    #[error("SVG viewBox is {actual} but should be {expected}")]
    ViewBox { actual: String, expected: String },

    #[error("SVG dimensions are {width}x{height}, but the map metadata says they should be {expected}")]
    DocumentSize {
        width: String,
        height: String,
        expected: String,
    },

    #[error("image origin is ({x}, {y}) not (0, 0)")]
    ImageOrigin { x: String, y: String },

    #[error("image dimensions are {width}x{height}, but the map metadata says they should be {expected}")]
    ImageSize {
        width: String,
        height: String,
        expected: String,
    },
}

/// Compare the document's declared extent with the raster it annotates.
pub fn check_document(doc: &SvgDocument, expected: MapDimensions) -> Vec<Discrepancy> {
    let root = doc.root();
    let mut problems = Vec::new();

    if let Some(view_box) = doc.attr(root, "viewBox") {
        let wanted = [0.0, 0.0, f64::from(expected.width), f64::from(expected.height)];
        if parse_view_box(view_box) != Some(wanted) {
            problems.push(Discrepancy::ViewBox {
                actual: view_box.to_string(),
                expected: format!("0 0 {} {}", expected.width, expected.height),
            });
        }
    }

    if let Some((width, height)) =
        size_mismatch(doc.attr(root, "width"), doc.attr(root, "height"), expected)
    {
        problems.push(Discrepancy::DocumentSize {
            width,
            height,
            expected: format!("{}x{}", expected.width, expected.height),
        });
    }

    if let Some(image) = doc.find_child(root, "image") {
        let x = doc.attr(image, "x");
        let y = doc.attr(image, "y");
        if x.is_some() || y.is_some() {
            let at_zero = |v: Option<&str>| v.map_or(Some(0.0), parse_length) == Some(0.0);
            if !(at_zero(x) && at_zero(y)) {
                problems.push(Discrepancy::ImageOrigin {
                    x: x.unwrap_or("0").to_string(),
                    y: y.unwrap_or("0").to_string(),
                });
            }
        }

        if let Some((width, height)) =
            size_mismatch(doc.attr(image, "width"), doc.attr(image, "height"), expected)
        {
            problems.push(Discrepancy::ImageSize {
                width,
                height,
                expected: format!("{}x{}", expected.width, expected.height),
            });
        }
    }

    for problem in &problems {
        log::warn!("{problem}");
    }
    problems
}

fn parse_view_box(raw: &str) -> Option<[f64; 4]> {
    let values = raw
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;
    values.try_into().ok()
}

/// `Some((width, height))` as written when the pair is present and differs
/// from `expected`. Both attributes must be present for the check to run.
fn size_mismatch(
    width: Option<&str>,
    height: Option<&str>,
    expected: MapDimensions,
) -> Option<(String, String)> {
    let (width, height) = (width?, height?);
    let matches = parse_length(width) == Some(f64::from(expected.width))
        && parse_length(height) == Some(f64::from(expected.height));
    (!matches).then(|| (width.to_string(), height.to_string()))
}
