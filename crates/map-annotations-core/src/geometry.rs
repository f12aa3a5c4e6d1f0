// crates/map-annotations-core/src/geometry.rs
//
// Straight-line geometry from SVG path data and point lists.
//
// The path parser understands the whole SVG path grammar so that curves are
// recognised (and refused) instead of silently misread. Only the segment
// endpoints are kept; no curve is ever flattened or sampled.

use crate::model::{Coord, Translation};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    #[error("path data must start with a moveto command")]
    MissingMoveTo,

    #[error("unknown path command '{command}' at byte {position}")]
    UnknownCommand { command: char, position: usize },

    #[error("missing or invalid arguments for path command '{command}' at byte {position}")]
    IncompleteArguments { command: char, position: usize },

    #[error("unexpected number after closepath at byte {position}")]
    UnexpectedNumber { position: usize },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("invalid path data: {0}")]
    Path(#[from] PathError),

    #[error("path has no drawable segments")]
    Empty,

    #[error("path has {curves} curved segment(s) out of {segments}")]
    NonLinear { segments: usize, curves: usize },

    #[error("expected a single straight line, found {segments} segment(s)")]
    NotSingleLine { segments: usize },

    #[error("invalid point list `{raw}`")]
    InvalidPointList { raw: String },
}

/// One drawn piece of a path. MoveTo commands produce no segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line {
        start: Coord,
        end: Coord,
    },
    QuadraticBezier {
        start: Coord,
        control: Coord,
        end: Coord,
    },
    CubicBezier {
        start: Coord,
        control1: Coord,
        control2: Coord,
        end: Coord,
    },
    Arc {
        start: Coord,
        radius: Coord,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        end: Coord,
    },
}

impl Segment {
    pub fn start(&self) -> Coord {
        match *self {
            Segment::Line { start, .. }
            | Segment::QuadraticBezier { start, .. }
            | Segment::CubicBezier { start, .. }
            | Segment::Arc { start, .. } => start,
        }
    }

    pub fn end(&self) -> Coord {
        match *self {
            Segment::Line { end, .. }
            | Segment::QuadraticBezier { end, .. }
            | Segment::CubicBezier { end, .. }
            | Segment::Arc { end, .. } => end,
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Segment::Line { .. })
    }
}

/// How a path can be read as an annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum PathGeometry {
    /// Exactly one straight segment.
    Pose { start: Coord, end: Coord },
    /// Two or more straight segments; one vertex per segment start.
    Region { vertices: Vec<Coord> },
}

/// Classify path data as a pose or region candidate, offset by `offset`.
pub fn extract_path_geometry(d: &str, offset: Translation) -> Result<PathGeometry, GeometryError> {
    let segments = parse_path_data(d)?;
    match segments.as_slice() {
        [] => Err(GeometryError::Empty),
        [Segment::Line { start, end }] => Ok(PathGeometry::Pose {
            start: offset.apply(*start),
            end: offset.apply(*end),
        }),
        segs if segs.iter().all(Segment::is_line) => Ok(PathGeometry::Region {
            vertices: segs.iter().map(|s| offset.apply(s.start())).collect(),
        }),
        segs => Err(GeometryError::NonLinear {
            segments: segs.len(),
            curves: segs.iter().filter(|s| !s.is_line()).count(),
        }),
    }
}

/// Read path data that must be one straight line, e.g. a door threshold.
pub fn extract_line(d: &str, offset: Translation) -> Result<(Coord, Coord), GeometryError> {
    let segments = parse_path_data(d)?;
    match segments.as_slice() {
        [Segment::Line { start, end }] => Ok((offset.apply(*start), offset.apply(*end))),
        [] => Err(GeometryError::Empty),
        segs => Err(GeometryError::NotSingleLine {
            segments: segs.len(),
        }),
    }
}

/// Parse a polygon/polyline `points` attribute: `"x,y x,y ..."`.
pub fn parse_point_list(raw: &str) -> Result<Vec<Coord>, GeometryError> {
    let invalid = || GeometryError::InvalidPointList {
        raw: raw.to_string(),
    };

    let numbers = raw
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(invalid)?;

    if numbers.len() % 2 != 0 {
        return Err(invalid());
    }

    Ok(numbers
        .chunks_exact(2)
        .map(|pair| Coord::new(pair[0], pair[1]).rounded())
        .collect())
}

/// Parse a plain number attribute, tolerating a `px` unit suffix.
pub fn parse_length(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let s = s.strip_suffix("px").unwrap_or(s).trim_end();
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse SVG path data into segments.
pub fn parse_path_data(d: &str) -> Result<Vec<Segment>, PathError> {
    let mut lexer = PathLexer::new(d);
    let mut segments = Vec::new();

    let mut current = Coord::ORIGIN;
    let mut subpath_start = Coord::ORIGIN;
    let mut last_cubic_ctrl: Option<Coord> = None;
    let mut last_quad_ctrl: Option<Coord> = None;
    let mut previous: Option<char> = None;

    loop {
        lexer.skip_separators();
        if lexer.at_end() {
            break;
        }
        let position = lexer.pos;

        let command = match lexer.next_command() {
            Some(c) => c,
            // No letter: the previous command repeats with a new argument set.
            None => match previous {
                None => return Err(PathError::MissingMoveTo),
                Some('Z' | 'z') => return Err(PathError::UnexpectedNumber { position }),
                Some(c) => c,
            },
        };
        if previous.is_none() && !matches!(command, 'M' | 'm') {
            return Err(PathError::MissingMoveTo);
        }

        let relative = command.is_ascii_lowercase();
        let base = if relative { current } else { Coord::ORIGIN };
        let incomplete = || PathError::IncompleteArguments { command, position };

        match command.to_ascii_uppercase() {
            'M' => {
                let to = lexer.next_pair().ok_or_else(incomplete)? + base;
                current = to;
                subpath_start = to;
                last_cubic_ctrl = None;
                last_quad_ctrl = None;
                // Further coordinate pairs after a moveto are implicit linetos.
                previous = Some(if relative { 'l' } else { 'L' });
                continue;
            }
            'L' => {
                let to = lexer.next_pair().ok_or_else(incomplete)? + base;
                segments.push(Segment::Line {
                    start: current,
                    end: to,
                });
                current = to;
                last_cubic_ctrl = None;
                last_quad_ctrl = None;
            }
            'H' => {
                let x = lexer.next_number().ok_or_else(incomplete)?;
                let to = Coord::new(if relative { current.x + x } else { x }, current.y);
                segments.push(Segment::Line {
                    start: current,
                    end: to,
                });
                current = to;
                last_cubic_ctrl = None;
                last_quad_ctrl = None;
            }
            'V' => {
                let y = lexer.next_number().ok_or_else(incomplete)?;
                let to = Coord::new(current.x, if relative { current.y + y } else { y });
                segments.push(Segment::Line {
                    start: current,
                    end: to,
                });
                current = to;
                last_cubic_ctrl = None;
                last_quad_ctrl = None;
            }
            'C' => {
                let control1 = lexer.next_pair().ok_or_else(incomplete)? + base;
                let control2 = lexer.next_pair().ok_or_else(incomplete)? + base;
                let to = lexer.next_pair().ok_or_else(incomplete)? + base;
                segments.push(Segment::CubicBezier {
                    start: current,
                    control1,
                    control2,
                    end: to,
                });
                current = to;
                last_cubic_ctrl = Some(control2);
                last_quad_ctrl = None;
            }
            'S' => {
                let control2 = lexer.next_pair().ok_or_else(incomplete)? + base;
                let to = lexer.next_pair().ok_or_else(incomplete)? + base;
                let control1 = reflect(last_cubic_ctrl, current);
                segments.push(Segment::CubicBezier {
                    start: current,
                    control1,
                    control2,
                    end: to,
                });
                current = to;
                last_cubic_ctrl = Some(control2);
                last_quad_ctrl = None;
            }
            'Q' => {
                let control = lexer.next_pair().ok_or_else(incomplete)? + base;
                let to = lexer.next_pair().ok_or_else(incomplete)? + base;
                segments.push(Segment::QuadraticBezier {
                    start: current,
                    control,
                    end: to,
                });
                current = to;
                last_quad_ctrl = Some(control);
                last_cubic_ctrl = None;
            }
            'T' => {
                let to = lexer.next_pair().ok_or_else(incomplete)? + base;
                let control = reflect(last_quad_ctrl, current);
                segments.push(Segment::QuadraticBezier {
                    start: current,
                    control,
                    end: to,
                });
                current = to;
                last_quad_ctrl = Some(control);
                last_cubic_ctrl = None;
            }
            'A' => {
                let rx = lexer.next_number().ok_or_else(incomplete)?;
                let ry = lexer.next_number().ok_or_else(incomplete)?;
                let rotation = lexer.next_number().ok_or_else(incomplete)?;
                let large_arc = lexer.next_flag().ok_or_else(incomplete)?;
                let sweep = lexer.next_flag().ok_or_else(incomplete)?;
                let to = lexer.next_pair().ok_or_else(incomplete)? + base;
                if to != current {
                    // A zero radius arc is drawn as a straight line.
                    let segment = if rx == 0.0 || ry == 0.0 {
                        Segment::Line {
                            start: current,
                            end: to,
                        }
                    } else {
                        Segment::Arc {
                            start: current,
                            radius: Coord::new(rx.abs(), ry.abs()),
                            rotation,
                            large_arc,
                            sweep,
                            end: to,
                        }
                    };
                    segments.push(segment);
                }
                current = to;
                last_cubic_ctrl = None;
                last_quad_ctrl = None;
            }
            'Z' => {
                if current != subpath_start {
                    segments.push(Segment::Line {
                        start: current,
                        end: subpath_start,
                    });
                }
                current = subpath_start;
                last_cubic_ctrl = None;
                last_quad_ctrl = None;
            }
            _ => {
                return Err(PathError::UnknownCommand { command, position });
            }
        }

        previous = Some(command);
    }

    Ok(segments)
}

fn reflect(control: Option<Coord>, about: Coord) -> Coord {
    match control {
        Some(c) => Coord::new(2.0 * about.x - c.x, 2.0 * about.y - c.y),
        None => about,
    }
}

struct PathLexer<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> PathLexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn skip_separators(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() || b == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn next_command(&mut self) -> Option<char> {
        self.skip_separators();
        let b = *self.bytes.get(self.pos)?;
        if b.is_ascii_alphabetic() {
            self.pos += 1;
            Some(b as char)
        } else {
            None
        }
    }

    fn next_number(&mut self) -> Option<f64> {
        self.skip_separators();
        let start = self.pos;
        let mut digits = false;

        if matches!(self.bytes.get(self.pos), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        while matches!(self.bytes.get(self.pos), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
            digits = true;
        }
        if self.bytes.get(self.pos) == Some(&b'.') {
            self.pos += 1;
            while matches!(self.bytes.get(self.pos), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
                digits = true;
            }
        }
        if digits && matches!(self.bytes.get(self.pos), Some(b'e' | b'E')) {
            let mantissa_end = self.pos;
            self.pos += 1;
            if matches!(self.bytes.get(self.pos), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            let exp_start = self.pos;
            while matches!(self.bytes.get(self.pos), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
            if self.pos == exp_start {
                self.pos = mantissa_end;
            }
        }

        if !digits {
            self.pos = start;
            return None;
        }

        // Out-of-range literals such as `1e400` are not valid coordinates.
        let value = std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite());
        if value.is_none() {
            self.pos = start;
        }
        value
    }

    /// Arc flags are single `0`/`1` characters and may be written without
    /// separators (`a5 5 0 011 10 10`).
    fn next_flag(&mut self) -> Option<bool> {
        self.skip_separators();
        let flag = match self.bytes.get(self.pos)? {
            b'0' => false,
            b'1' => true,
            _ => return None,
        };
        self.pos += 1;
        Some(flag)
    }

    fn next_pair(&mut self) -> Option<Coord> {
        let x = self.next_number()?;
        let y = self.next_number()?;
        Some(Coord::new(x, y))
    }
}
