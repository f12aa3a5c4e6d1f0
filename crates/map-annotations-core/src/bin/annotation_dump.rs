use map_annotations_core::{
    Discrepancy, Extraction, MapDimensions, ParseError, check_document, extract_annotations,
    parse_svg,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
enum DumpError {
    #[error("{0}")]
    Usage(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct DumpReport {
    #[serde(flatten)]
    extraction: Extraction,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    discrepancies: Vec<Discrepancy>,
}

const USAGE: &str = "usage: annotation_dump <svg> [width height]";

fn parse_dimension(value: Option<String>, what: &str) -> Result<u32, DumpError> {
    let value = value.ok_or_else(|| DumpError::Usage(format!("missing {what}\n{USAGE}")))?;
    value
        .parse::<u32>()
        .map_err(|_| DumpError::Usage(format!("invalid {what}: {value}\n{USAGE}")))
}

fn run() -> Result<(), DumpError> {
    let mut args = std::env::args().skip(1);
    let svg_path = PathBuf::from(args.next().ok_or_else(|| DumpError::Usage(USAGE.into()))?);

    let dimensions = match args.next() {
        Some(width) => Some(MapDimensions::new(
            parse_dimension(Some(width), "width")?,
            parse_dimension(args.next(), "height")?,
        )),
        None => None,
    };

    let svg = std::fs::read_to_string(&svg_path)?;
    let document = parse_svg(&svg)?;
    let discrepancies = dimensions
        .map(|d| check_document(&document, d))
        .unwrap_or_default();

    let report = DumpReport {
        extraction: extract_annotations(&document),
        discrepancies,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        let code = if matches!(err, DumpError::Usage(_)) { 2 } else { 1 };
        std::process::exit(code);
    }
}
