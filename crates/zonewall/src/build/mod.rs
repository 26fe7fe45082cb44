//! Hull + wall mesh generation from the four zone markers.

pub mod hull;
pub mod wall;

pub use hull::{convex_hull, Hull};
pub use wall::{build_wall_mesh, WallMesh, WALL_INDEX_COUNT, WALL_VERTEX_COUNT};

use shared::{Point3, SHADOW_DROP};

use crate::error::ZoneError;

/// Compute the hull of `points` and the wall mesh around it
pub fn build_walls(points: &[Point3], wall_height: f64) -> Result<(Hull, WallMesh), ZoneError> {
    let hull = convex_hull(points)?;
    let mesh = build_wall_mesh(&hull, wall_height);
    tracing::debug!(
        area = hull.signed_area2() / 2.0,
        triangles = mesh.triangle_count(),
        "Walls generated"
    );
    Ok((hull, mesh))
}

/// Where the renderer draws the shadow of a marker placed at `marker`
pub fn shadow_position(marker: Point3) -> Point3 {
    marker.offset_y(-SHADOW_DROP)
}
