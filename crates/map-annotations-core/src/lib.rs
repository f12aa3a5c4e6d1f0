pub mod classify;
pub mod consistency;
pub mod geometry;
pub mod label;
pub mod loader;
pub mod metadata;
pub mod model;
pub mod parse;
pub mod precision;
pub mod project;
pub mod transform;
pub mod warning;
pub use classify::{Extraction, extract_annotations};
pub use consistency::{Discrepancy, check_document};
pub use loader::{LoadedAnnotations, load_annotations};
pub use metadata::{MapDimensions, MapMetadata, MetadataError};
pub use model::{AnnotationDocument, Coord, Door, Point, Pose, Region, Translation};
pub use parse::{ParseError, ParseResult, SvgDocument, parse_svg};
pub use project::{CoordinateConverter, CoordinateSpace, project};
pub use warning::{AnnotationKind, AnnotationWarning};
