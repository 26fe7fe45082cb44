//! Wall mesh validation utilities.
//!
//! `MeshValidator` checks a `WallMesh` for the properties renderers rely on:
//! fixed buffer sizes, in-range indices, unit UVs, non-degenerate faces and
//! side faces that read from inside the zone.

use glam::DVec3;

use crate::build::{Hull, WallMesh, WALL_INDEX_COUNT, WALL_VERTEX_COUNT};

/// Side faces on copy A; the rest is the outside entry panel
const SIDE_FACE_COUNT: usize = 8;

/// Axis-aligned bounds of a wall mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: DVec3,
    pub max: DVec3,
}

impl Bounds {
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }
}

/// Validator for `WallMesh` integrity checks.
pub struct MeshValidator<'a> {
    mesh: &'a WallMesh,
}

impl<'a> MeshValidator<'a> {
    pub fn new(mesh: &'a WallMesh) -> Self {
        Self { mesh }
    }

    /// 16 vertices, 30 indices, 16 UVs
    pub fn are_counts_valid(&self) -> bool {
        self.mesh.vertices.len() == WALL_VERTEX_COUNT
            && self.mesh.triangles.len() == WALL_INDEX_COUNT
            && self.mesh.uvs.len() == WALL_VERTEX_COUNT
    }

    pub fn are_indices_in_range(&self) -> bool {
        let max_idx = self.mesh.vertices.len() as u32;
        self.mesh.triangles.iter().all(|&i| i < max_idx)
    }

    /// Every UV lies in the unit square
    pub fn are_uvs_in_unit_range(&self) -> bool {
        self.mesh
            .uvs
            .iter()
            .all(|uv| (0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y))
    }

    /// Faces with all three indices in range
    fn indexed_faces(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        let len = self.mesh.vertices.len();
        self.mesh
            .faces()
            .filter(move |face| face.iter().all(|&i| (i as usize) < len))
    }

    /// Faces whose area is below `epsilon`
    pub fn degenerate_faces(&self, epsilon: f64) -> Vec<[u32; 3]> {
        self.indexed_faces()
            .filter(|&face| self.mesh.face_normal(face).length() * 0.5 < epsilon)
            .collect()
    }

    /// Side faces whose normal points away from the hull centroid
    pub fn outward_side_faces(&self, hull: &Hull) -> Vec<[u32; 3]> {
        let c = hull.centroid();
        let mid_y = self.mesh.vertices.iter().map(|v| v.y).sum::<f64>() / WALL_VERTEX_COUNT as f64;
        let center = DVec3::new(c.x, mid_y, c.z);
        self.mesh
            .faces()
            .take(SIDE_FACE_COUNT)
            .filter(|face| face.iter().all(|&i| (i as usize) < WALL_VERTEX_COUNT))
            .filter(|&face| {
                let a = self.mesh.vertices[face[0] as usize];
                self.mesh.face_normal(face).dot(center - a) <= 0.0
            })
            .collect()
    }

    pub fn bounds(&self) -> Bounds {
        let first = self.mesh.vertices[0];
        let (min, max) = self
            .mesh
            .vertices
            .iter()
            .fold((first, first), |(min, max), v| (min.min(*v), max.max(*v)));
        Bounds { min, max }
    }

    /// Check that the bounds size matches `expected` within `tolerance`.
    pub fn dimensions_approx(&self, expected: [f64; 3], tolerance: f64) -> bool {
        let size = self.bounds().size();
        (size.x - expected[0]).abs() < tolerance
            && (size.y - expected[1]).abs() < tolerance
            && (size.z - expected[2]).abs() < tolerance
    }

    /// Run all validation checks and return a list of error messages.
    /// An empty list means the mesh is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.are_counts_valid() {
            errors.push(format!(
                "Expected {WALL_VERTEX_COUNT}/{WALL_INDEX_COUNT}/{WALL_VERTEX_COUNT} vertices/indices/uvs, got {}/{}/{}",
                self.mesh.vertices.len(),
                self.mesh.triangles.len(),
                self.mesh.uvs.len()
            ));
        }

        if !self.are_indices_in_range() {
            let out_of_range: Vec<_> = self
                .mesh
                .triangles
                .iter()
                .filter(|&&i| i as usize >= self.mesh.vertices.len())
                .collect();
            errors.push(format!("Indices out of range: {out_of_range:?}"));
        }

        if !self.are_uvs_in_unit_range() {
            errors.push("UV outside the unit square".to_string());
        }

        let degenerate = self.degenerate_faces(1e-12);
        if !degenerate.is_empty() {
            errors.push(format!("Degenerate faces: {degenerate:?}"));
        }

        errors
    }

    /// `validate_all` plus the winding check against `hull`
    pub fn validate_against(&self, hull: &Hull) -> Vec<String> {
        let mut errors = self.validate_all();
        let outward = self.outward_side_faces(hull);
        if !outward.is_empty() {
            errors.push(format!("Side faces facing outward: {outward:?}"));
        }
        errors
    }
}
