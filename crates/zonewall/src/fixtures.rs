//! Canonical marker sets and payloads for tests and demos.

use shared::Point3;

// ── Marker sets ─────────────────────────────────────────────────

/// Unit square on the ground, already in counter-clockwise order.
pub fn unit_square() -> [Point3; 4] {
    [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(0.0, 0.0, 1.0),
    ]
}

/// Axis-aligned rectangle with its corner at `origin`, placed in a zigzag
/// order so the hull has to reorder it.
pub fn zigzag_rect(origin: Point3, width: f64, depth: f64) -> [Point3; 4] {
    let Point3 { x, y, z } = origin;
    [
        Point3::new(x, y, z),
        Point3::new(x + width, y, z + depth),
        Point3::new(x + width, y, z),
        Point3::new(x, y, z + depth),
    ]
}

/// Convex quadrilateral with uneven marker heights, as tapped on a slope.
pub fn sloped_quad() -> [Point3; 4] {
    [
        Point3::new(-1.2, 0.05, -0.8),
        Point3::new(1.6, 0.30, -1.1),
        Point3::new(2.1, 0.42, 1.7),
        Point3::new(-0.9, 0.12, 1.3),
    ]
}

/// Four markers on one line; no enclosed area.
pub fn collinear() -> [Point3; 4] {
    [0.0, 1.0, 2.0, 3.0].map(|x| Point3::new(x, 0.0, 0.0))
}

/// Triangle with the fourth marker inside it.
pub fn interior_point() -> [Point3; 4] {
    [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(4.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, 4.0),
        Point3::new(1.0, 0.0, 1.0),
    ]
}

// ── Payloads ────────────────────────────────────────────────────

/// Remote zone one metre up; lands at y = -0.5 after the download offset.
pub const RAISED_SQUARE_PAYLOAD: &str = "0 1 0\n1 1 0\n1 1 1\n0 1 1\n";

/// Five lines; only the first four are used.
pub const LONG_PAYLOAD: &str = "0 0 0\n2 0 0\n2 0 2\n0 0 2\n9 9 9\n";

/// Too few lines to describe a zone.
pub const SHORT_PAYLOAD: &str = "0 0 0\n1 0 0\n";

/// Second line carries a non-numeric field.
pub const MALFORMED_PAYLOAD: &str = "0 0 0\n1 zero 0\n1 0 1\n0 0 1\n";
