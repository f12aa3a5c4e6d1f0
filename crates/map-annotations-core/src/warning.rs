use serde::Serialize;
use std::fmt;

/// The four annotation collections, used to say which one a warning is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    Point,
    Pose,
    Region,
    Door,
    /// A group with a path whose geometry decides between pose and region.
    Path,
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnnotationKind::Point => "point",
            AnnotationKind::Pose => "pose",
            AnnotationKind::Region => "region",
            AnnotationKind::Door => "door",
            AnnotationKind::Path => "path",
        })
    }
}

/// Why a single annotation was skipped. Never fatal for the document.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AnnotationWarning {
    #[error("no text label found for {kind} annotation {element}")]
    MissingLabel {
        kind: AnnotationKind,
        element: String,
    },

    #[error("can't process {kind} '{name}' because group {group} has a complex transform: {transform}")]
    UnsupportedTransform {
        kind: AnnotationKind,
        name: String,
        group: String,
        transform: String,
    },

    #[error("couldn't extract geometry from {kind} '{name}': {detail}")]
    InvalidGeometry {
        kind: AnnotationKind,
        name: String,
        detail: String,
    },

    #[error("{kind} '{name}' has a missing or invalid `{attribute}` attribute")]
    InvalidAttribute {
        kind: AnnotationKind,
        name: String,
        attribute: String,
    },

    #[error("can't process door '{name}' because it had {count} approach points (2 are expected)")]
    ApproachPointCount { name: String, count: usize },

    #[error("pose '{name}' starts and ends at the same point")]
    DegeneratePose { name: String },

    #[error("region '{name}' has {count} vertices (at least 3 are needed)")]
    TooFewVertices { name: String, count: usize },
}

impl AnnotationWarning {
    /// Name of the annotation the warning is about, when it could be read.
    pub fn name(&self) -> Option<&str> {
        match self {
            AnnotationWarning::MissingLabel { .. } => None,
            AnnotationWarning::UnsupportedTransform { name, .. }
            | AnnotationWarning::InvalidGeometry { name, .. }
            | AnnotationWarning::InvalidAttribute { name, .. }
            | AnnotationWarning::ApproachPointCount { name, .. }
            | AnnotationWarning::DegeneratePose { name }
            | AnnotationWarning::TooFewVertices { name, .. } => Some(name),
        }
    }
}
