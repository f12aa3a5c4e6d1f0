//! Pixel → world projection of extracted annotations.
//!
//! The conversion formula belongs to whoever owns the map frame; this module
//! only guarantees it is applied to every coordinate, once, in order.

use crate::metadata::MapMetadata;
use crate::model::{AnnotationDocument, Coord};

/// Converts one drawing (pixel) coordinate into the map's world frame.
pub trait CoordinateConverter {
    fn to_world(&self, pixel: Coord, map: &MapMetadata) -> Coord;
}

impl<F> CoordinateConverter for F
where
    F: Fn(Coord, &MapMetadata) -> Coord,
{
    fn to_world(&self, pixel: Coord, map: &MapMetadata) -> Coord {
        self(pixel, map)
    }
}

/// Which frame extracted coordinates are returned in.
#[derive(Clone, Copy)]
pub enum CoordinateSpace<'a> {
    /// Leave coordinates exactly as drawn.
    Pixel,
    /// Convert every coordinate with the given converter.
    World(&'a dyn CoordinateConverter),
}

impl std::fmt::Debug for CoordinateSpace<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateSpace::Pixel => f.write_str("Pixel"),
            CoordinateSpace::World(_) => f.write_str("World(..)"),
        }
    }
}

/// Convert all four collections. Names, counts, ordering and door pairing
/// are left untouched.
pub fn project<C>(
    annotations: AnnotationDocument,
    map: &MapMetadata,
    converter: &C,
) -> AnnotationDocument
where
    C: CoordinateConverter + ?Sized,
{
    annotations.map_coords(|pixel| converter.to_world(pixel, map))
}

/// Apply `space` to freshly extracted annotations.
pub fn into_space(
    annotations: AnnotationDocument,
    map: &MapMetadata,
    space: CoordinateSpace<'_>,
) -> AnnotationDocument {
    match space {
        CoordinateSpace::Pixel => annotations,
        CoordinateSpace::World(converter) => project(annotations, map, converter),
    }
}
