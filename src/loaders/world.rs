use glam::Vec3;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::scene::Scene;

/// World-space scale applied to every coordinate read from a world file
pub const WORLD_SCALE: f32 = 3.0;

/// Marker token that turns a record into a comment
pub const COMMENT_TOKEN: &str = "//";

/// Number of whitespace-separated fields in a vertex record: `x y z n m`
pub const RECORD_FIELDS: usize = 5;

/// Failure while parsing world text
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: field {field} is not a finite number: {value:?}")]
    InvalidNumber {
        /// 1-based line number
        line: usize,
        /// 1-based field index within the record
        field: usize,
        value: String,
    },
}

/// Failure while loading a world file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read world file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("world loader stopped before reporting a result")]
    Disconnected,
}

/// Splits a line into a record, or `None` for comments and lines of the wrong shape
fn split_record(line: &str) -> Option<[&str; RECORD_FIELDS]> {
    let mut fields = [""; RECORD_FIELDS];
    let mut count = 0;

    for field in line.split_whitespace() {
        if count == RECORD_FIELDS {
            return None;
        }
        fields[count] = field;
        count += 1;
    }

    (count == RECORD_FIELDS && fields[0] != COMMENT_TOKEN).then_some(fields)
}

fn parse_coordinate(value: &str, line: usize, field: usize) -> Result<f32, ParseError> {
    value
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v * WORLD_SCALE)
        .ok_or_else(|| ParseError::InvalidNumber {
            line,
            field,
            value: value.to_string(),
        })
}

/// Position of a record; the two trailing fields are read but unused
fn parse_record(fields: [&str; RECORD_FIELDS], line: usize) -> Result<Vec3, ParseError> {
    let x = parse_coordinate(fields[0], line, 1)?;
    let y = parse_coordinate(fields[1], line, 2)?;
    let z = parse_coordinate(fields[2], line, 3)?;

    Ok(Vec3::new(x, y, z))
}

/// Parses world text into a scene.
///
/// Every line with exactly five whitespace-separated fields whose first field
/// is not `//` contributes one vertex; all other lines are skipped. The first
/// three fields are scaled by [`WORLD_SCALE`]. Consecutive vertex triples form
/// triangles; one or two vertices left over after the last full triangle are
/// dropped.
pub fn parse_world(text: &str) -> Result<Scene, ParseError> {
    let mut vertices = text
        .lines()
        .enumerate()
        .filter_map(|(index, line)| split_record(line).map(|fields| (index + 1, fields)))
        .map(|(line, fields)| parse_record(fields, line))
        .collect::<Result<Vec<_>, _>>()?;

    let leftover = vertices.len() % 3;
    if leftover != 0 {
        log::warn!(
            "World ends mid-triangle, dropping {} trailing vertices",
            leftover
        );
        vertices.truncate(vertices.len() - leftover);
    }

    Ok(Scene::new(vertices))
}

/// Reads and parses a world file
pub fn load_world_file(path: impl AsRef<Path>) -> Result<Scene, LoadError> {
    let path = path.as_ref();
    log::debug!("Reading world file {:?}", path);

    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_world(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_record_requires_five_fields() {
        assert!(split_record("1 2 3 0 0").is_some());
        assert!(split_record("1 2 3 0").is_none());
        assert!(split_record("1 2 3 0 0 0").is_none());
        assert!(split_record("").is_none());
        assert!(split_record("   ").is_none());
    }

    #[test]
    fn split_record_tolerates_mixed_whitespace() {
        let fields = split_record("  1\t2   3 0.5 1\r").unwrap();
        assert_eq!(fields, ["1", "2", "3", "0.5", "1"]);
    }

    #[test]
    fn split_record_skips_comment_marker() {
        assert!(split_record("// 1 2 3 0").is_none());
        // Only the exact token counts as a comment
        assert!(split_record("//1 2 3 0 0").is_some());
    }

    #[test]
    fn record_ignores_trailing_fields() {
        let fields = split_record("1 2 3 tex mat").unwrap();
        assert_eq!(parse_record(fields, 1), Ok(Vec3::new(3.0, 6.0, 9.0)));
    }

    #[test]
    fn coordinate_rejects_non_finite() {
        assert!(parse_coordinate("nan", 1, 1).is_err());
        assert!(parse_coordinate("inf", 1, 1).is_err());
        assert_eq!(parse_coordinate("-0.5", 1, 1), Ok(-1.5));
    }

    #[test]
    fn parse_error_identifies_line_and_field() {
        let err = parse_world("1 2 3 0 0\n4 x 6 0 0\n7 8 9 0 0\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber {
                line: 2,
                field: 2,
                value: "x".to_string(),
            }
        );
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn trailing_partial_triangle_is_dropped() {
        let scene = parse_world("1 2 3 0 0\n4 5 6 0 0\n7 8 9 0 0\n1 1 1 0 0\n").unwrap();
        assert_eq!(scene.vertex_count(), 3);
        assert_eq!(scene.triangle_count(), 1);
        assert_eq!(scene.vertices()[2], Vec3::new(21.0, 24.0, 27.0));

        let lone_pair = parse_world("1 2 3 0 0\n4 5 6 0 0\n").unwrap();
        assert!(lone_pair.is_empty());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_world_file("definitely/not/here/world.txt").unwrap_err();
        match err {
            LoadError::Io { path, .. } => assert!(path.ends_with("world.txt")),
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
