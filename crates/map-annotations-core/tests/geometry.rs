use map_annotations_core::geometry::{
    GeometryError, PathError, PathGeometry, Segment, extract_line, extract_path_geometry,
    parse_path_data, parse_point_list,
};
use map_annotations_core::{Coord, Translation};

fn c(x: f64, y: f64) -> Coord {
    Coord::new(x, y)
}

#[test]
fn single_line_is_a_pose_candidate() {
    let geom = extract_path_geometry("M 0,0 L 10,0", Translation::IDENTITY).expect("geometry");
    assert_eq!(
        geom,
        PathGeometry::Pose {
            start: c(0.0, 0.0),
            end: c(10.0, 0.0)
        }
    );
}

#[test]
fn pose_endpoints_are_offset_and_rounded() {
    let geom = extract_path_geometry("m 1.00049,2 3,4", Translation::new(0.1, 0.2)).expect("geometry");
    assert_eq!(
        geom,
        PathGeometry::Pose {
            start: c(1.1, 2.2),
            end: c(4.1, 6.2)
        }
    );
}

#[test]
fn closed_line_path_is_a_region_of_segment_starts() {
    let geom = extract_path_geometry("M0 0 L10 0 L10 10 L0 10 Z", Translation::new(5.0, -5.0))
        .expect("geometry");
    assert_eq!(
        geom,
        PathGeometry::Region {
            vertices: vec![c(5.0, -5.0), c(15.0, -5.0), c(15.0, 5.0), c(5.0, 5.0)]
        }
    );
}

#[test]
fn relative_commands_and_implicit_linetos() {
    let segments = parse_path_data("m 10,10 5,0 0,5 h -5 v -5").expect("path");
    let starts: Vec<Coord> = segments.iter().map(Segment::start).collect();
    assert_eq!(
        starts,
        vec![c(10.0, 10.0), c(15.0, 10.0), c(15.0, 15.0), c(10.0, 15.0)]
    );
    assert!(segments.iter().all(Segment::is_line));
    assert_eq!(segments.last().map(Segment::end), Some(c(10.0, 10.0)));
}

#[test]
fn closepath_adds_a_line_only_when_needed() {
    // Already back at the start: no closing segment.
    let segments = parse_path_data("M0 0 L5 0 L5 5 L0 0 Z").expect("path");
    assert_eq!(segments.len(), 3);

    let segments = parse_path_data("M0 0 L5 0 L5 5 z").expect("path");
    assert_eq!(segments.len(), 3);
    assert_eq!(
        segments[2],
        Segment::Line {
            start: c(5.0, 5.0),
            end: c(0.0, 0.0)
        }
    );
}

#[test]
fn curves_are_rejected() {
    for d in [
        "M0 0 C 1 1 2 2 3 3",
        "M0 0 L 5 0 Q 6 1 7 0",
        "M0 0 L 5 0 A 5 5 0 0 1 10 0 Z",
        "M0 0 S 1 1 2 2",
        "M0 0 T 4 4",
    ] {
        assert!(
            matches!(
                extract_path_geometry(d, Translation::IDENTITY),
                Err(GeometryError::NonLinear { .. })
            ),
            "{d}"
        );
    }
}

#[test]
fn zero_radius_arc_is_a_line() {
    let segments = parse_path_data("M0 0 A 0 5 0 0 1 10 0").expect("path");
    assert_eq!(
        segments,
        vec![Segment::Line {
            start: c(0.0, 0.0),
            end: c(10.0, 0.0)
        }]
    );
}

#[test]
fn compact_arc_flags() {
    let segments = parse_path_data("M0 0a5 5 0 0110 0").expect("path");
    assert_eq!(segments.len(), 1);
    assert!(matches!(
        segments[0],
        Segment::Arc {
            large_arc: false,
            sweep: true,
            ..
        }
    ));
    assert_eq!(segments[0].end(), c(10.0, 0.0));
}

#[test]
fn move_only_path_is_empty() {
    assert_eq!(
        extract_path_geometry("M 3 3", Translation::IDENTITY),
        Err(GeometryError::Empty)
    );
    assert_eq!(
        extract_path_geometry("", Translation::IDENTITY),
        Err(GeometryError::Empty)
    );
}

#[test]
fn malformed_path_data() {
    assert_eq!(parse_path_data("L 1 1"), Err(PathError::MissingMoveTo));
    assert_eq!(parse_path_data("10 10"), Err(PathError::MissingMoveTo));
    assert_eq!(
        parse_path_data("M 0 0 L 10"),
        Err(PathError::IncompleteArguments {
            command: 'L',
            position: 6
        })
    );
    assert_eq!(
        parse_path_data("M 0 0 X 1 1"),
        Err(PathError::UnknownCommand {
            command: 'X',
            position: 6
        })
    );
    assert_eq!(
        parse_path_data("M 0 0 L 1 1 Z 4"),
        Err(PathError::UnexpectedNumber { position: 14 })
    );
    assert_eq!(
        parse_path_data("M0 0 L1e400 0"),
        Err(PathError::IncompleteArguments {
            command: 'L',
            position: 5
        })
    );
    assert_eq!(
        parse_path_data("m -1e999,0"),
        Err(PathError::IncompleteArguments {
            command: 'm',
            position: 0
        })
    );
}

#[test]
fn numbers_without_separators() {
    let segments = parse_path_data("M-1-2L3.5.5").expect("path");
    assert_eq!(
        segments,
        vec![Segment::Line {
            start: c(-1.0, -2.0),
            end: c(3.5, 0.5)
        }]
    );

    let segments = parse_path_data("M1e1,0 L2E-1 0").expect("path");
    assert_eq!(segments[0].start(), c(10.0, 0.0));
    assert_eq!(segments[0].end(), c(0.2, 0.0));
}

#[test]
fn threshold_must_be_one_line() {
    assert_eq!(
        extract_line("M 0,0 L 0,5", Translation::new(1.0, 1.0)),
        Ok((c(1.0, 1.0), c(1.0, 6.0)))
    );
    assert_eq!(
        extract_line("M 0,0 L 0,5 L 5,5", Translation::IDENTITY),
        Err(GeometryError::NotSingleLine { segments: 2 })
    );
    assert_eq!(
        extract_line("M 0,0 Q 1,1 0,5", Translation::IDENTITY),
        Err(GeometryError::NotSingleLine { segments: 1 })
    );
}

#[test]
fn point_lists() {
    assert_eq!(
        parse_point_list("0,0 10,0 10,10 0,10"),
        Ok(vec![c(0.0, 0.0), c(10.0, 0.0), c(10.0, 10.0), c(0.0, 10.0)])
    );
    assert_eq!(
        parse_point_list(" 1.23456 2\n3 4 "),
        Ok(vec![c(1.235, 2.0), c(3.0, 4.0)])
    );
    assert!(parse_point_list("0,0 10").is_err());
    assert!(parse_point_list("0,0 a,b").is_err());
}
