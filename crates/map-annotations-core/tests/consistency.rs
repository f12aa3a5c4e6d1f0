use map_annotations_core::{Discrepancy, MapDimensions, check_document, parse_svg};

const MAP: MapDimensions = MapDimensions::new(400, 300);

fn check(xml: &str) -> Vec<Discrepancy> {
    let doc = parse_svg(xml).expect("parse svg");
    check_document(&doc, MAP)
}

#[test]
fn matching_document_has_no_discrepancies() {
    let found = check(
        r#"<svg viewBox="0 0 400 300" width="400" height="300">
             <image x="0" y="0" width="400" height="300" href="map.png"/>
           </svg>"#,
    );

    assert!(found.is_empty(), "{found:?}");
}

#[test]
fn values_are_compared_numerically() {
    let found = check(
        r#"<svg viewBox="0,0,400.0,300" width="400px" height="300.000">
             <image x="0.0" width="400" height="300"/>
           </svg>"#,
    );

    assert!(found.is_empty(), "{found:?}");
}

#[test]
fn missing_attributes_skip_their_check() {
    assert!(check("<svg/>").is_empty());
    assert!(check(r#"<svg width="10"><image height="3"/></svg>"#).is_empty());
}

#[test]
fn view_box_mismatch() {
    let found = check(r#"<svg viewBox="0 0 800 600"/>"#);

    assert_eq!(
        found,
        vec![Discrepancy::ViewBox {
            actual: "0 0 800 600".into(),
            expected: "0 0 400 300".into(),
        }]
    );
    assert_eq!(
        found[0].to_string(),
        "SVG viewBox is 0 0 800 600 but should be 0 0 400 300"
    );
}

#[test]
fn unparseable_view_box_is_a_mismatch() {
    let found = check(r#"<svg viewBox="0 0 400"/>"#);

    assert!(matches!(&found[..], [Discrepancy::ViewBox { .. }]));
}

#[test]
fn document_size_mismatch() {
    let found = check(r#"<svg width="400" height="301"/>"#);

    assert_eq!(
        found,
        vec![Discrepancy::DocumentSize {
            width: "400".into(),
            height: "301".into(),
            expected: "400x300".into(),
        }]
    );
}

#[test]
fn image_checks() {
    let found = check(r#"<svg><image x="5" width="200" height="150"/></svg>"#);

    assert_eq!(
        found,
        vec![
            Discrepancy::ImageOrigin {
                x: "5".into(),
                y: "0".into(),
            },
            Discrepancy::ImageSize {
                width: "200".into(),
                height: "150".into(),
                expected: "400x300".into(),
            },
        ]
    );
    assert_eq!(found[0].to_string(), "image origin is (5, 0) not (0, 0)");
}

#[test]
fn only_a_top_level_image_is_checked() {
    let found = check(r#"<svg><g><image x="9" width="1" height="1"/></g></svg>"#);

    assert!(found.is_empty(), "{found:?}");
}

#[test]
fn every_mismatch_is_reported_in_order() {
    let found = check(
        r#"<svg viewBox="0 0 1 1" width="1" height="1"><image x="0" y="2" width="1" height="1"/></svg>"#,
    );

    let checks: Vec<&str> = found
        .iter()
        .map(|d| match d {
            Discrepancy::ViewBox { .. } => "view_box",
            Discrepancy::DocumentSize { .. } => "document_size",
            Discrepancy::ImageOrigin { .. } => "image_origin",
            Discrepancy::ImageSize { .. } => "image_size",
        })
        .collect();
    assert_eq!(
        checks,
        ["view_box", "document_size", "image_origin", "image_size"]
    );
}
