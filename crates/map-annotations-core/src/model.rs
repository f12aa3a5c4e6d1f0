use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use crate::precision::{self, round3};

/// A 2D coordinate, pixel space while extracting and world space after projection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coord {
    #[serde(
        serialize_with = "precision::ser_f64_compact",
        deserialize_with = "precision::de_f64"
    )]
    pub x: f64,

    #[serde(
        serialize_with = "precision::ser_f64_compact",
        deserialize_with = "precision::de_f64"
    )]
    pub y: f64,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Snap both components to the extraction precision.
    pub fn rounded(self) -> Self {
        Self::new(round3(self.x), round3(self.y))
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Offset applied to the shapes of an annotation group.
///
/// Only the immediate enclosing group's `translate(..)` is read; offsets of
/// outer groups are not composed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Translation {
    pub dx: f64,
    pub dy: f64,
}

impl Translation {
    pub const IDENTITY: Translation = Translation { dx: 0.0, dy: 0.0 };

    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Offset a raw shape coordinate. The input is rounded first and the sum
    /// rounded again so no float noise leaks into the result.
    pub fn apply(&self, raw: Coord) -> Coord {
        let c = raw.rounded();
        Coord::new(round3(c.x + self.dx), round3(c.y + self.dy))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub name: String,
    pub position: Coord,
}

/// A named directed segment: `start` is the position, `end - start` the heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub name: String,
    pub start: Coord,
    pub end: Coord,
}

impl Pose {
    pub fn orientation(&self) -> Coord {
        self.end - self.start
    }

    /// Heading in radians, measured in the frame the coordinates are in.
    pub fn heading(&self) -> f64 {
        let d = self.orientation();
        d.y.atan2(d.x)
    }
}

/// A named polygon. The closing edge from the last vertex back to the first
/// is implied and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub vertices: Vec<Coord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub name: String,
    pub threshold: (Coord, Coord),
    pub approach_points: [Coord; 2],
}

impl Door {
    /// Names under which the approach points are stored next to the door,
    /// in the same order as `approach_points`.
    pub fn approach_point_names(&self) -> [String; 2] {
        [
            format!("{}_approach0", self.name),
            format!("{}_approach1", self.name),
        ]
    }
}

/// Everything extracted from one drawing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnotationDocument {
    #[serde(default)]
    pub points: Vec<Point>,

    #[serde(default)]
    pub poses: Vec<Pose>,

    #[serde(default)]
    pub regions: Vec<Region>,

    #[serde(default)]
    pub doors: Vec<Door>,
}

impl AnnotationDocument {
    pub fn len(&self) -> usize {
        self.points.len() + self.poses.len() + self.regions.len() + self.doors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concatenate `other` after `self`, collection by collection.
    pub fn append(mut self, other: AnnotationDocument) -> Self {
        self.points.extend(other.points);
        self.poses.extend(other.poses);
        self.regions.extend(other.regions);
        self.doors.extend(other.doors);
        self
    }

    /// Rewrite every coordinate of every collection through `f`, keeping
    /// names, ordering and door/approach-point pairing.
    pub fn map_coords<F>(self, mut f: F) -> Self
    where
        F: FnMut(Coord) -> Coord,
    {
        let points = self
            .points
            .into_iter()
            .map(|p| Point {
                position: f(p.position),
                name: p.name,
            })
            .collect();

        let poses = self
            .poses
            .into_iter()
            .map(|p| Pose {
                start: f(p.start),
                end: f(p.end),
                name: p.name,
            })
            .collect();

        let regions = self
            .regions
            .into_iter()
            .map(|r| Region {
                vertices: r.vertices.into_iter().map(&mut f).collect(),
                name: r.name,
            })
            .collect();

        let doors = self
            .doors
            .into_iter()
            .map(|d| Door {
                threshold: (f(d.threshold.0), f(d.threshold.1)),
                approach_points: [f(d.approach_points[0]), f(d.approach_points[1])],
                name: d.name,
            })
            .collect();

        Self {
            points,
            poses,
            regions,
            doors,
        }
    }
}
