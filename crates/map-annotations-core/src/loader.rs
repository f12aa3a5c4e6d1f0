//! One-call entry point: parse, check, extract, project.

use serde::Serialize;

use crate::classify::{Extraction, extract_annotations};
use crate::consistency::{Discrepancy, check_document};
use crate::metadata::MapMetadata;
use crate::model::AnnotationDocument;
use crate::parse::{ParseResult, parse_svg};
use crate::project::{CoordinateSpace, into_space};
use crate::warning::AnnotationWarning;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedAnnotations {
    pub annotations: AnnotationDocument,
    /// Annotations that were skipped, and why.
    pub warnings: Vec<AnnotationWarning>,
    /// Mismatches between the drawing and the map raster.
    pub discrepancies: Vec<Discrepancy>,
}

/// Load the annotations of `svg`, drawn over the map described by `map`.
///
/// Only markup that cannot be parsed at all is an error. Consistency checks
/// run when `map` carries raster dimensions and are advisory either way.
pub fn load_annotations(
    svg: &str,
    map: &MapMetadata,
    space: CoordinateSpace<'_>,
) -> ParseResult<LoadedAnnotations> {
    let document = parse_svg(svg)?;

    let discrepancies = match map.dimensions() {
        Some(dimensions) => check_document(&document, dimensions),
        None => {
            log::debug!(
                "no raster dimensions for map '{}', skipping consistency checks",
                map.name
            );
            Vec::new()
        }
    };

    let Extraction {
        annotations,
        warnings,
    } = extract_annotations(&document);

    Ok(LoadedAnnotations {
        annotations: into_space(annotations, map, space),
        warnings,
        discrepancies,
    })
}
