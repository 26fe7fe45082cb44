//! Plain-text zone payload exchanged with the remote store.
//!
//! One marker per line, three whitespace-separated numbers: `x y z`.
//! Only the first [`ZONE_POINT_COUNT`] lines are read; anything after them
//! is ignored.

use std::fmt::Write;

use thiserror::Error;

use crate::{Point3, ZONE_POINT_COUNT};

/// Malformed zone payload
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected at least {expected} lines, found {found}")]
    TooFewLines { expected: usize, found: usize },

    #[error("line {line}: expected 3 fields, found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: invalid number {value:?}")]
    InvalidNumber { line: usize, value: String },
}

/// Serialize points as `x y z` lines, each terminated by `\n`
pub fn encode_points(points: &[Point3]) -> String {
    let mut text = String::with_capacity(points.len() * 24);
    for p in points {
        // Writing into a String cannot fail
        let _ = writeln!(text, "{} {} {}", p.x, p.y, p.z);
    }
    text
}

/// Parse the first four lines of a payload into points
pub fn parse_points(text: &str) -> Result<Vec<Point3>, ParseError> {
    let lines: Vec<&str> = text.lines().take(ZONE_POINT_COUNT).collect();
    if lines.len() < ZONE_POINT_COUNT {
        return Err(ParseError::TooFewLines {
            expected: ZONE_POINT_COUNT,
            found: lines.len(),
        });
    }

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| parse_line(i + 1, line))
        .collect()
}

fn parse_line(line_no: usize, line: &str) -> Result<Point3, ParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(ParseError::FieldCount {
            line: line_no,
            found: fields.len(),
        });
    }

    let mut xyz = [0.0; 3];
    for (slot, field) in xyz.iter_mut().zip(&fields) {
        *slot = field
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ParseError::InvalidNumber {
                line: line_no,
                value: field.to_string(),
            })?;
    }
    Ok(Point3::from(xyz))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ]
    }

    #[test]
    fn test_encode_format() {
        let text = encode_points(&square());
        assert_eq!(text, "0 1 0\n1 1 0\n1 1 1\n0 1 1\n");
    }

    #[test]
    fn test_parse_square() {
        let points = parse_points("0 1 0\n1 1 0\n1 1 1\n0 1 1\n").unwrap();
        assert_eq!(points, square());
    }

    #[test]
    fn test_roundtrip_fractional_values() {
        let points = vec![
            Point3::new(0.123456, -1.25, 3.5),
            Point3::new(-2.000001, 0.5, 1e-3),
            Point3::new(7.75, -0.333333, 2.0),
            Point3::new(1.0 / 3.0, 2.0 / 3.0, -4.125),
        ];
        let parsed = parse_points(&encode_points(&points)).unwrap();
        for (a, b) in points.iter().zip(&parsed) {
            assert!(a.approx_eq(b, 1e-5), "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_parse_ignores_extra_lines() {
        let points = parse_points("0 0 0\n1 0 0\n1 0 1\n0 0 1\n9 9 9\ngarbage\n").unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[3], Point3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_parse_crlf_and_extra_spaces() {
        let points = parse_points("0  0 0\r\n1\t0 0\r\n1 0 1\r\n0 0 1").unwrap();
        assert_eq!(points[1], Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_parse_too_few_lines() {
        let err = parse_points("0 0 0\n1 0 0\n1 0 1\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::TooFewLines {
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn test_parse_empty_payload() {
        assert!(matches!(
            parse_points(""),
            Err(ParseError::TooFewLines { found: 0, .. })
        ));
    }

    #[test]
    fn test_parse_non_numeric_field() {
        let err = parse_points("0 0 0\n1 zero 0\n1 0 1\n0 0 1\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber {
                line: 2,
                value: "zero".to_string()
            }
        );
    }

    #[test]
    fn test_parse_missing_field() {
        let err = parse_points("0 0 0\n1 0 0\n1 0\n0 0 1\n").unwrap_err();
        assert_eq!(err, ParseError::FieldCount { line: 3, found: 2 });
    }

    #[test]
    fn test_parse_blank_line_inside_payload() {
        let err = parse_points("0 0 0\n\n1 0 1\n0 0 1\n").unwrap_err();
        assert_eq!(err, ParseError::FieldCount { line: 2, found: 0 });
    }

    #[test]
    fn test_parse_rejects_nan() {
        let err = parse_points("NaN 0 0\n1 0 0\n1 0 1\n0 0 1\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { line: 1, .. }));
    }
}
