//! Open-box wall mesh around a hull.
//!
//! Vertex layout, repeated for copy B at indices 8..16:
//! `0=h0 top, 1=h1 top, 2=h1 bottom, 3=h0 bottom,
//!  4=h3 bottom, 5=h2 bottom, 6=h2 top, 7=h3 top`.
//! Top corners keep the hull heights, bottom corners take the wall height.

use glam::{DVec2, DVec3};
use serde::Serialize;
use shared::Point3;

use super::hull::Hull;

pub const WALL_VERTEX_COUNT: usize = 16;
pub const WALL_INDEX_COUNT: usize = 30;

/// Side faces on copy A, then the h0-h1 panel reversed on copy B.
///
/// For a counter-clockwise hull with the bottom rim below the top rim the
/// copy A faces wind towards the inside of the zone.
const TRIANGLES: [u32; WALL_INDEX_COUNT] = [
    0, 2, 1, // h0-h1
    0, 3, 2,
    1, 2, 5, // h1-h2
    1, 5, 6,
    0, 7, 4, // h3-h0
    0, 4, 3,
    5, 4, 7, // h2-h3
    5, 7, 6,
    8, 9, 10, // h0-h1, outside
    8, 10, 11,
];

const UVS: [[f64; 2]; WALL_VERTEX_COUNT] = [
    [0.0, 0.0],
    [1.0, 0.0],
    [1.0, 1.0],
    [0.0, 1.0],
    [1.0, 1.0],
    [0.0, 1.0],
    [0.0, 0.0],
    [1.0, 0.0],
    // Copy B, mirrored
    [1.0, 0.0],
    [0.0, 0.0],
    [0.0, 1.0],
    [1.0, 1.0],
    [0.0, 1.0],
    [1.0, 1.0],
    [1.0, 0.0],
    [0.0, 0.0],
];

/// Wall geometry handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WallMesh {
    pub vertices: [DVec3; WALL_VERTEX_COUNT],
    pub triangles: [u32; WALL_INDEX_COUNT],
    pub uvs: [DVec2; WALL_VERTEX_COUNT],
}

impl WallMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Vertex indices of each triangle
    pub fn faces(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangles.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Right-handed, unnormalized face normal
    pub fn face_normal(&self, face: [u32; 3]) -> DVec3 {
        let [a, b, c] = face.map(|i| self.vertices[i as usize]);
        (b - a).cross(c - a)
    }
}

fn top(p: Point3) -> DVec3 {
    DVec3::new(p.x, p.y, p.z)
}

fn bottom(p: Point3, wall_height: f64) -> DVec3 {
    DVec3::new(p.x, wall_height, p.z)
}

/// Build the wall mesh for `hull` with its bottom rim at y = `wall_height`.
///
/// Always 16 vertices, 30 indices and 16 UVs. Winding follows the hull
/// order as given; a clockwise hull yields flipped faces.
pub fn build_wall_mesh(hull: &Hull, wall_height: f64) -> WallMesh {
    let [h0, h1, h2, h3] = *hull.points();
    let ring = [
        top(h0),
        top(h1),
        bottom(h1, wall_height),
        bottom(h0, wall_height),
        bottom(h3, wall_height),
        bottom(h2, wall_height),
        top(h2),
        top(h3),
    ];

    let mut vertices = [DVec3::ZERO; WALL_VERTEX_COUNT];
    vertices[..8].copy_from_slice(&ring);
    vertices[8..].copy_from_slice(&ring);

    tracing::debug!(wall_height, "Wall mesh built");
    WallMesh {
        vertices,
        triangles: TRIANGLES,
        uvs: UVS.map(|[u, v]| DVec2::new(u, v)),
    }
}
