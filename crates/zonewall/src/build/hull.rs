//! Convex hull of the four zone markers (monotone chain).
//!
//! Points are ordered on the (x, z) ground plane; y rides along untouched.
//! For four points the chain needs at most `2n - 1` slots, so it lives in a
//! fixed 8-slot buffer and never allocates.

use std::cmp::Ordering;
use std::ops::Index;

use serde::Serialize;
use shared::{Point3, ZONE_POINT_COUNT};

use crate::error::ZoneError;

/// Scratch capacity for the lower + upper chain
const CHAIN_SLOTS: usize = 2 * ZONE_POINT_COUNT;

/// The four markers in counter-clockwise (x, z) order, closed implicitly
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hull {
    points: [Point3; ZONE_POINT_COUNT],
}

impl Hull {
    pub fn points(&self) -> &[Point3; ZONE_POINT_COUNT] {
        &self.points
    }

    /// Boundary edges `(h0,h1) (h1,h2) (h2,h3) (h3,h0)`
    pub fn edges(&self) -> impl Iterator<Item = (Point3, Point3)> + '_ {
        (0..ZONE_POINT_COUNT).map(|i| (self.points[i], self.points[(i + 1) % ZONE_POINT_COUNT]))
    }

    /// Twice the signed (x, z) area; positive for counter-clockwise order
    pub fn signed_area2(&self) -> f64 {
        self.edges().map(|(a, b)| a.x * b.z - b.x * a.z).sum()
    }

    /// Mean of the four vertices
    pub fn centroid(&self) -> Point3 {
        let n = ZONE_POINT_COUNT as f64;
        let (x, y, z) = self
            .points
            .iter()
            .fold((0.0, 0.0, 0.0), |(x, y, z), p| (x + p.x, y + p.y, z + p.z));
        Point3::new(x / n, y / n, z / n)
    }
}

#[cfg(test)]
impl Hull {
    /// Wrap points without hull checks, for winding tests
    pub(crate) fn from_points(points: [Point3; ZONE_POINT_COUNT]) -> Self {
        Self { points }
    }
}

impl Index<usize> for Hull {
    type Output = Point3;

    fn index(&self, index: usize) -> &Point3 {
        &self.points[index]
    }
}

/// Z-component of `(a - o) x (b - o)` on the (x, z) plane.
/// Positive when `o -> a -> b` turns counter-clockwise.
fn cross(o: &Point3, a: &Point3, b: &Point3) -> f64 {
    (b.z - o.z) * (a.x - o.x) - (b.x - o.x) * (a.z - o.z)
}

/// Compute the convex hull of exactly four points.
///
/// Fails with `InvalidArgument` for any other count or non-finite
/// coordinates, and with `DegenerateHull` when fewer than four distinct
/// vertices survive (collinear, coincident, or one point inside the
/// triangle of the others).
pub fn convex_hull(points: &[Point3]) -> Result<Hull, ZoneError> {
    if points.len() != ZONE_POINT_COUNT {
        return Err(ZoneError::invalid_argument(format!(
            "hull needs exactly {ZONE_POINT_COUNT} points, got {}",
            points.len()
        )));
    }
    if points
        .iter()
        .any(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
    {
        return Err(ZoneError::invalid_argument("hull points must be finite"));
    }

    let mut sorted = [Point3::default(); ZONE_POINT_COUNT];
    sorted.copy_from_slice(points);
    // Inputs are finite here; -0.0 and 0.0 compare equal and tie on z
    sorted.sort_by(|a, b| {
        let by_x = a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal);
        by_x.then(a.z.partial_cmp(&b.z).unwrap_or(Ordering::Equal))
    });

    let mut chain = [Point3::default(); CHAIN_SLOTS];
    let mut k = 0;

    // Lower chain
    for p in &sorted {
        while k >= 2 && cross(&chain[k - 2], &chain[k - 1], p) <= 0.0 {
            k -= 1;
        }
        chain[k] = *p;
        k += 1;
    }

    // Upper chain, never popping back into the lower one
    let floor = k + 1;
    for p in sorted.iter().rev().skip(1) {
        while k >= floor && cross(&chain[k - 2], &chain[k - 1], p) <= 0.0 {
            k -= 1;
        }
        chain[k] = *p;
        k += 1;
    }

    // The chain ends where it started
    let distinct = k - 1;
    tracing::debug!(distinct, "Monotone chain finished");
    if distinct != ZONE_POINT_COUNT {
        return Err(ZoneError::DegenerateHull { vertices: distinct });
    }

    let mut hull = [Point3::default(); ZONE_POINT_COUNT];
    hull.copy_from_slice(&chain[..ZONE_POINT_COUNT]);
    Ok(Hull { points: hull })
}
