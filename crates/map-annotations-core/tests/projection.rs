use approx::assert_relative_eq;
use map_annotations_core::project::into_space;
use map_annotations_core::{
    AnnotationWarning, Coord, CoordinateSpace, Discrepancy, MapDimensions, MapMetadata,
    MetadataError, extract_annotations, load_annotations, parse_svg, project,
};

const MAP_YAML: &str = "\
image: office.pgm
resolution: 0.05
origin: [-10.0, -5.0, 0.0]
negate: 0
occupied_thresh: 0.65
free_thresh: 0.196
";

const DRAWING: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 100" width="200" height="100">
  <image x="0" y="0" width="200" height="100"/>
  <g><circle class="circle_annotation" cx="10" cy="20" r="2"/><text>charger</text></g>
  <g><line class="pose_line_annotation" x1="0" y1="0" x2="10" y2="0"/><text>entry</text></g>
  <g><polygon class="region_annotation" points="0,0 10,0 10,10"/><text>kitchen</text></g>
  <g transform="translate(100,50)">
    <path d="M 0,0 L 0,5"/>
    <circle cx="-2" cy="2" r="1"/>
    <circle cx="2" cy="2" r="1"/>
    <text><tspan>door1</tspan></text>
  </g>
</svg>"#;

fn office() -> MapMetadata {
    MapMetadata::from_yaml("office", MAP_YAML).expect("valid metadata")
}

/// Standard occupancy-grid conversion: y grows upward in the world frame.
fn grid_to_world(pixel: Coord, map: &MapMetadata) -> Coord {
    let (ox, oy) = map.origin_xy();
    let height = f64::from(map.dimensions().map_or(0, |d| d.height));
    Coord::new(
        ox + pixel.x * map.resolution,
        oy + (height - pixel.y) * map.resolution,
    )
}

#[test]
fn metadata_from_yaml() {
    let map = office();

    assert_eq!(map.name, "office");
    assert_eq!(map.image, "office.pgm");
    assert_relative_eq!(map.resolution, 0.05);
    assert_eq!(map.origin_xy(), (-10.0, -5.0));
    assert_eq!(map.negate, Some(0));
    assert_eq!(map.annotations, None);
    assert_eq!(map.dimensions(), None);
}

#[test]
fn metadata_rejects_bad_values() {
    let no_resolution = MapMetadata::from_yaml("m", "image: a.pgm\nresolution: 0\norigin: [0, 0]\n");
    assert!(matches!(no_resolution, Err(MetadataError::InvalidResolution(_))));

    let short_origin = MapMetadata::from_yaml("m", "image: a.pgm\nresolution: 1\norigin: [0]\n");
    assert!(matches!(short_origin, Err(MetadataError::InvalidOrigin(1))));

    let not_yaml = MapMetadata::from_yaml("m", "image: [unterminated");
    assert!(matches!(not_yaml, Err(MetadataError::Yaml(_))));
}

#[test]
fn metadata_is_named_after_its_file() {
    let dir = std::env::temp_dir().join(format!("map-annotations-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join("warehouse.v2.yaml");
    std::fs::write(&path, MAP_YAML).expect("write metadata");

    let map = MapMetadata::load(&path).expect("load metadata");
    std::fs::remove_dir_all(&dir).ok();

    assert_eq!(map.name, "warehouse");
}

#[test]
fn pixel_space_leaves_coordinates_alone() {
    let doc = parse_svg(DRAWING).expect("parse svg");
    let extracted = extract_annotations(&doc).annotations;

    let same = into_space(extracted.clone(), &office(), CoordinateSpace::Pixel);

    assert_eq!(same, extracted);
}

#[test]
fn projection_converts_every_coordinate() {
    let map = office().with_dimensions(MapDimensions::new(200, 100));
    let doc = parse_svg(DRAWING).expect("parse svg");
    let pixels = extract_annotations(&doc).annotations;

    let world = project(pixels.clone(), &map, &grid_to_world);

    assert_eq!(world.len(), pixels.len());
    assert_eq!(world.points[0].name, "charger");
    assert_relative_eq!(world.points[0].position.x, -9.5, epsilon = 1e-9);
    assert_relative_eq!(world.points[0].position.y, -1.0, epsilon = 1e-9);

    let pose = &world.poses[0];
    assert_relative_eq!(pose.start.x, -10.0, epsilon = 1e-9);
    assert_relative_eq!(pose.start.y, 0.0, epsilon = 1e-9);
    assert_relative_eq!(pose.end.x, -9.5, epsilon = 1e-9);
    assert_relative_eq!(pose.heading(), 0.0, epsilon = 1e-9);

    assert_eq!(world.regions[0].vertices.len(), 3);

    let door = &world.doors[0];
    assert_eq!(door.name, "door1");
    assert_relative_eq!(door.threshold.0.x, -5.0, epsilon = 1e-9);
    assert_relative_eq!(door.threshold.0.y, -2.5, epsilon = 1e-9);
    assert_relative_eq!(door.threshold.1.y, -2.75, epsilon = 1e-9);
    assert_relative_eq!(door.approach_points[0].x, -5.1, epsilon = 1e-9);
    assert_relative_eq!(door.approach_points[1].x, -4.9, epsilon = 1e-9);
    assert_eq!(
        door.approach_point_names(),
        ["door1_approach0".to_string(), "door1_approach1".to_string()]
    );
}

#[test]
fn converter_can_be_a_closure() {
    let doc = parse_svg(DRAWING).expect("parse svg");
    let pixels = extract_annotations(&doc).annotations;
    let shift = |pixel: Coord, _map: &MapMetadata| Coord::new(pixel.x + 1.0, pixel.y - 1.0);

    let shifted = project(pixels, &office(), &shift);

    assert_eq!(shifted.points[0].position, Coord::new(11.0, 19.0));
    assert_eq!(shifted.poses[0].end, Coord::new(11.0, -1.0));
    assert_eq!(shifted.doors[0].approach_points[1], Coord::new(103.0, 51.0));
}

#[test]
fn load_annotations_runs_every_stage() {
    let map = office().with_dimensions(MapDimensions::new(200, 100));

    let loaded = load_annotations(DRAWING, &map, CoordinateSpace::World(&grid_to_world))
        .expect("load annotations");

    assert!(loaded.warnings.is_empty(), "{:?}", loaded.warnings);
    assert!(loaded.discrepancies.is_empty(), "{:?}", loaded.discrepancies);
    assert_eq!(loaded.annotations.len(), 4);
    assert_relative_eq!(loaded.annotations.points[0].position.x, -9.5, epsilon = 1e-9);
}

#[test]
fn load_annotations_reports_but_does_not_fail() {
    let map = office().with_dimensions(MapDimensions::new(400, 100));
    let svg = r#"<svg viewBox="0 0 200 100">
        <g><circle class="circle_annotation" cx="1" cy="1"/></g>
        <g><circle class="circle_annotation" cx="2" cy="2"/><text>ok</text></g>
      </svg>"#;

    let loaded = load_annotations(svg, &map, CoordinateSpace::Pixel).expect("load annotations");

    assert_eq!(loaded.annotations.points.len(), 1);
    assert!(matches!(
        &loaded.warnings[..],
        [AnnotationWarning::MissingLabel { .. }]
    ));
    assert!(matches!(
        &loaded.discrepancies[..],
        [Discrepancy::ViewBox { .. }]
    ));
}

#[test]
fn load_annotations_skips_checks_without_dimensions() {
    let loaded = load_annotations(r#"<svg viewBox="0 0 1 1"/>"#, &office(), CoordinateSpace::Pixel)
        .expect("load annotations");

    assert!(loaded.discrepancies.is_empty());
    assert!(loaded.annotations.is_empty());
}

#[test]
fn load_annotations_fails_on_broken_markup() {
    assert!(load_annotations("<svg><g></svg>", &office(), CoordinateSpace::Pixel).is_err());
}

#[test]
fn projected_coordinates_keep_full_precision_in_json() {
    let doc = parse_svg(DRAWING).expect("parse svg");
    let pixels = extract_annotations(&doc).annotations;
    let fine = |pixel: Coord, _map: &MapMetadata| Coord::new(pixel.x + 0.123456, pixel.y);

    let world = project(pixels, &office(), &fine);
    let json = serde_json::to_string(&world).expect("serialize");
    let back: map_annotations_core::AnnotationDocument =
        serde_json::from_str(&json).expect("deserialize");

    assert_relative_eq!(back.points[0].position.x, 10.123456, epsilon = 1e-9);
    assert_relative_eq!(back.doors[0].approach_points[0].x, 98.123456, epsilon = 1e-9);
    assert_eq!(back.points[0].position.y, 20.0);
}
