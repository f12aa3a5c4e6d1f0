// crates/map-annotations-core/src/classify.rs
//
// Walks the document once, in order, and sorts annotation-bearing elements
// into points, poses, regions and doors.
//
// Two conventions feed the same collections:
// - Tool-tagged shapes carry a marker class (`circle_annotation`,
//   `pose_line_annotation`, `region_annotation`) and are named by a `<text>`
//   sibling. Their coordinates are used as written: the enclosing group's
//   transform is not read, not even to refuse it. Older loaders offset
//   tagged shapes by the parent's `translate(..)` as well; drawings that
//   rely on that will come out shifted.
// - Editor-drawn groups (Inkscape and friends) carry no markup and are
//   recognised by their children: path + label, circle + label, or
//   path + two circles + label for a door. The group's `translate(..)` is
//   applied to every coordinate.
//
// A shape with a marker class is never picked up by the group heuristics,
// so an annotation is counted once even when both conventions match it.
// Within each collection tool-tagged annotations come first, then the
// editor-drawn ones, each in document order.

use serde::Serialize;

use crate::geometry::{self, GeometryError, PathGeometry, parse_length};
use crate::label::{resolve_label, sibling_text};
use crate::model::{AnnotationDocument, Coord, Door, Point, Pose, Region, Translation};
use crate::parse::{NodeId, ParentMap, SvgDocument};
use crate::transform::resolve_translation;
use crate::warning::{AnnotationKind, AnnotationWarning};

pub const POINT_MARKER: &str = "circle_annotation";
pub const POSE_MARKER: &str = "pose_line_annotation";
pub const REGION_MARKER: &str = "region_annotation";

/// What an element is, as far as annotation extraction cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Circle { marked: bool },
    Line { marked: bool },
    Polygon { marked: bool },
    Path,
    Text,
    Group,
    Unknown,
}

impl ShapeKind {
    pub fn is_marked(&self) -> bool {
        matches!(
            self,
            ShapeKind::Circle { marked: true }
                | ShapeKind::Line { marked: true }
                | ShapeKind::Polygon { marked: true }
        )
    }
}

pub fn classify_element(doc: &SvgDocument, id: NodeId) -> ShapeKind {
    let el = doc.element(id);
    let marked = |marker: &str| {
        el.attr("class")
            .is_some_and(|class| class.split_whitespace().any(|c| c == marker))
    };

    match el.name.as_str() {
        "circle" => ShapeKind::Circle {
            marked: marked(POINT_MARKER),
        },
        "line" => ShapeKind::Line {
            marked: marked(POSE_MARKER),
        },
        "polygon" => ShapeKind::Polygon {
            marked: marked(REGION_MARKER),
        },
        "path" => ShapeKind::Path,
        "text" | "tspan" => ShapeKind::Text,
        "g" => ShapeKind::Group,
        _ => ShapeKind::Unknown,
    }
}

/// Structural reading of an untagged `<g>`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum GroupPattern {
    /// Two children, one of them a path.
    PathPair { path: NodeId },
    /// Two children, one of them a circle.
    PointPair { circle: NodeId },
    /// Four children including circles: threshold path, approach points, label.
    Door {
        path: Option<NodeId>,
        circles: Vec<NodeId>,
    },
    /// Consumed by the tagged convention.
    Tagged,
    NotAnnotation,
}

fn group_pattern(doc: &SvgDocument, group: NodeId) -> GroupPattern {
    let children = doc.children(group);
    let kinds: Vec<(NodeId, ShapeKind)> = children
        .iter()
        .map(|&child| (child, classify_element(doc, child)))
        .collect();

    let first_path = kinds
        .iter()
        .find(|(_, kind)| *kind == ShapeKind::Path)
        .map(|&(id, _)| id);
    let circles: Vec<NodeId> = kinds
        .iter()
        .filter(|(_, kind)| matches!(kind, ShapeKind::Circle { .. }))
        .map(|&(id, _)| id)
        .collect();

    match children.len() {
        2 => match (first_path, circles.first()) {
            (Some(path), _) => GroupPattern::PathPair { path },
            (None, Some(&circle)) if classify_element(doc, circle).is_marked() => {
                GroupPattern::Tagged
            }
            (None, Some(&circle)) => GroupPattern::PointPair { circle },
            (None, None) => GroupPattern::NotAnnotation,
        },
        4 if !circles.is_empty() => {
            if kinds.iter().any(|(_, kind)| kind.is_marked()) {
                GroupPattern::Tagged
            } else {
                GroupPattern::Door {
                    path: first_path,
                    circles,
                }
            }
        }
        _ => GroupPattern::NotAnnotation,
    }
}

/// Result of one extraction pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Extraction {
    pub annotations: AnnotationDocument,
    pub warnings: Vec<AnnotationWarning>,
}

enum Annotation {
    Point(Point),
    Pose(Pose),
    Region(Region),
    Door(Door),
}

/// Extract every annotation from `doc`, in pixel coordinates.
///
/// Annotations that cannot be read are skipped and reported in
/// [`Extraction::warnings`]; the rest of the document is still processed.
pub fn extract_annotations(doc: &SvgDocument) -> Extraction {
    let parents = ParentMap::build(doc);
    let mut tagged = AnnotationDocument::default();
    let mut drawn = AnnotationDocument::default();
    let mut warnings = Vec::new();

    for id in doc.ids() {
        let (target, outcome) = match classify_element(doc, id) {
            ShapeKind::Circle { marked: true } => {
                (&mut tagged, tagged_point(doc, &parents, id).map(Some))
            }
            ShapeKind::Line { marked: true } => {
                (&mut tagged, tagged_pose(doc, &parents, id).map(Some))
            }
            ShapeKind::Polygon { marked: true } => {
                (&mut tagged, tagged_region(doc, &parents, id).map(Some))
            }
            ShapeKind::Group => (&mut drawn, group_annotation(doc, id)),
            ShapeKind::Circle { marked: false }
            | ShapeKind::Line { marked: false }
            | ShapeKind::Polygon { marked: false }
            | ShapeKind::Path
            | ShapeKind::Text
            | ShapeKind::Unknown => continue,
        };

        match outcome {
            Ok(Some(annotation)) => annotation.push_into(target),
            Ok(None) => {}
            Err(warning) => {
                log::warn!("{warning}");
                warnings.push(warning);
            }
        }
    }

    let extraction = Extraction {
        annotations: tagged.append(drawn),
        warnings,
    };

    let a = &extraction.annotations;
    log::debug!(
        "extracted {} points, {} poses, {} regions, {} doors ({} skipped)",
        a.points.len(),
        a.poses.len(),
        a.regions.len(),
        a.doors.len(),
        extraction.warnings.len()
    );
    extraction
}

impl Annotation {
    fn push_into(self, target: &mut AnnotationDocument) {
        match self {
            Annotation::Point(p) => target.points.push(p),
            Annotation::Pose(p) => target.poses.push(p),
            Annotation::Region(r) => target.regions.push(r),
            Annotation::Door(d) => target.doors.push(d),
        }
    }
}

type Outcome<T> = Result<T, AnnotationWarning>;

fn tagged_point(doc: &SvgDocument, parents: &ParentMap, circle: NodeId) -> Outcome<Annotation> {
    let name = tagged_name(doc, parents, circle, AnnotationKind::Point)?;
    let position = coord_attrs(doc, circle, ("cx", "cy"), AnnotationKind::Point, &name)?;
    Ok(Annotation::Point(Point {
        name,
        position: position.rounded(),
    }))
}

fn tagged_pose(doc: &SvgDocument, parents: &ParentMap, line: NodeId) -> Outcome<Annotation> {
    let name = tagged_name(doc, parents, line, AnnotationKind::Pose)?;
    let start = coord_attrs(doc, line, ("x1", "y1"), AnnotationKind::Pose, &name)?;
    let end = coord_attrs(doc, line, ("x2", "y2"), AnnotationKind::Pose, &name)?;
    make_pose(name, start.rounded(), end.rounded())
}

fn tagged_region(doc: &SvgDocument, parents: &ParentMap, polygon: NodeId) -> Outcome<Annotation> {
    let name = tagged_name(doc, parents, polygon, AnnotationKind::Region)?;
    let raw = doc
        .attr(polygon, "points")
        .ok_or_else(|| invalid_attribute(AnnotationKind::Region, &name, "points"))?;
    let vertices = geometry::parse_point_list(raw)
        .map_err(|err| invalid_geometry(AnnotationKind::Region, &name, err))?;
    make_region(name, vertices)
}

fn tagged_name(
    doc: &SvgDocument,
    parents: &ParentMap,
    shape: NodeId,
    kind: AnnotationKind,
) -> Outcome<String> {
    sibling_text(doc, parents, shape).ok_or_else(|| AnnotationWarning::MissingLabel {
        kind,
        element: doc.describe(shape),
    })
}

fn group_annotation(doc: &SvgDocument, group: NodeId) -> Outcome<Option<Annotation>> {
    match group_pattern(doc, group) {
        GroupPattern::PathPair { path } => path_group(doc, group, path).map(Some),
        GroupPattern::PointPair { circle } => point_group(doc, group, circle).map(Some),
        GroupPattern::Door { path, circles } => door_group(doc, group, path, &circles).map(Some),
        GroupPattern::Tagged | GroupPattern::NotAnnotation => Ok(None),
    }
}

fn path_group(doc: &SvgDocument, group: NodeId, path: NodeId) -> Outcome<Annotation> {
    let kind = AnnotationKind::Path;
    let name = group_label(doc, group, kind)?;
    let offset = group_translation(doc, group, kind, &name)?;
    let d = doc
        .attr(path, "d")
        .ok_or_else(|| invalid_attribute(kind, &name, "d"))?;

    match geometry::extract_path_geometry(d, offset) {
        Ok(PathGeometry::Pose { start, end }) => make_pose(name, start, end),
        Ok(PathGeometry::Region { vertices }) => make_region(name, vertices),
        Err(err) => Err(invalid_geometry(kind, &name, err)),
    }
}

fn point_group(doc: &SvgDocument, group: NodeId, circle: NodeId) -> Outcome<Annotation> {
    let kind = AnnotationKind::Point;
    let name = group_label(doc, group, kind)?;
    let offset = group_translation(doc, group, kind, &name)?;
    let center = coord_attrs(doc, circle, ("cx", "cy"), kind, &name)?;
    Ok(Annotation::Point(Point {
        position: offset.apply(center),
        name,
    }))
}

fn door_group(
    doc: &SvgDocument,
    group: NodeId,
    path: Option<NodeId>,
    circles: &[NodeId],
) -> Outcome<Annotation> {
    let kind = AnnotationKind::Door;
    let name = group_label(doc, group, kind)?;
    let offset = group_translation(doc, group, kind, &name)?;

    let &[first, second] = circles else {
        return Err(AnnotationWarning::ApproachPointCount {
            name,
            count: circles.len(),
        });
    };
    let approach_points = [
        offset.apply(coord_attrs(doc, first, ("cx", "cy"), kind, &name)?),
        offset.apply(coord_attrs(doc, second, ("cx", "cy"), kind, &name)?),
    ];

    let path = path.ok_or_else(|| AnnotationWarning::InvalidGeometry {
        kind,
        name: name.clone(),
        detail: "no threshold path".into(),
    })?;
    let d = doc
        .attr(path, "d")
        .ok_or_else(|| invalid_attribute(kind, &name, "d"))?;
    let threshold =
        geometry::extract_line(d, offset).map_err(|err| invalid_geometry(kind, &name, err))?;

    Ok(Annotation::Door(Door {
        name,
        threshold,
        approach_points,
    }))
}

fn group_label(doc: &SvgDocument, group: NodeId, kind: AnnotationKind) -> Outcome<String> {
    resolve_label(doc, group).ok_or_else(|| AnnotationWarning::MissingLabel {
        kind,
        element: doc.describe(group),
    })
}

fn group_translation(
    doc: &SvgDocument,
    group: NodeId,
    kind: AnnotationKind,
    name: &str,
) -> Outcome<Translation> {
    resolve_translation(doc, group).map_err(|_| AnnotationWarning::UnsupportedTransform {
        kind,
        name: name.to_string(),
        group: doc.describe(group),
        transform: doc.attr(group, "transform").unwrap_or_default().to_string(),
    })
}

fn make_pose(name: String, start: Coord, end: Coord) -> Outcome<Annotation> {
    if start == end {
        return Err(AnnotationWarning::DegeneratePose { name });
    }
    Ok(Annotation::Pose(Pose { name, start, end }))
}

fn make_region(name: String, vertices: Vec<Coord>) -> Outcome<Annotation> {
    if vertices.len() < 3 {
        return Err(AnnotationWarning::TooFewVertices {
            name,
            count: vertices.len(),
        });
    }
    Ok(Annotation::Region(Region { name, vertices }))
}

fn coord_attrs(
    doc: &SvgDocument,
    id: NodeId,
    (x_key, y_key): (&str, &str),
    kind: AnnotationKind,
    name: &str,
) -> Outcome<Coord> {
    let read = |key: &str| {
        doc.attr(id, key)
            .and_then(parse_length)
            .ok_or_else(|| invalid_attribute(kind, name, key))
    };
    Ok(Coord::new(read(x_key)?, read(y_key)?))
}

fn invalid_attribute(kind: AnnotationKind, name: &str, attribute: &str) -> AnnotationWarning {
    AnnotationWarning::InvalidAttribute {
        kind,
        name: name.to_string(),
        attribute: attribute.to_string(),
    }
}

fn invalid_geometry(kind: AnnotationKind, name: &str, err: GeometryError) -> AnnotationWarning {
    AnnotationWarning::InvalidGeometry {
        kind,
        name: name.to_string(),
        detail: err.to_string(),
    }
}
