//! Mesh validation utilities.
//!
//! `MeshValidator` checks flag mesh integrity: buffer strides, index range,
//! unit normals, flatness and a single region color.

use glam::Vec3;

use crate::viewport::bounds::Aabb;
use crate::viewport::mesh::MeshData;

const STRIDE: usize = 9;

/// Validator for `MeshData` integrity checks.
pub struct MeshValidator<'a> {
    mesh: &'a MeshData,
}

impl<'a> MeshValidator<'a> {
    pub fn new(mesh: &'a MeshData) -> Self {
        Self { mesh }
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertices.len() / STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.indices.len() / 3
    }

    /// Vertex buffer length is a multiple of the 9-float stride
    pub fn is_stride_valid(&self) -> bool {
        self.mesh.vertices.len() % STRIDE == 0
    }

    pub fn is_index_stride_valid(&self) -> bool {
        self.mesh.indices.len() % 3 == 0
    }

    pub fn are_indices_in_range(&self) -> bool {
        let max_idx = self.vertex_count() as u32;
        self.mesh.indices.iter().all(|&i| i < max_idx)
    }

    fn normal(&self, i: usize) -> Vec3 {
        let base = i * STRIDE;
        Vec3::new(
            self.mesh.vertices[base + 3],
            self.mesh.vertices[base + 4],
            self.mesh.vertices[base + 5],
        )
    }

    fn color(&self, i: usize) -> [f32; 3] {
        let base = i * STRIDE;
        [
            self.mesh.vertices[base + 6],
            self.mesh.vertices[base + 7],
            self.mesh.vertices[base + 8],
        ]
    }

    pub fn are_normals_normalized(&self, epsilon: f32) -> bool {
        (0..self.vertex_count()).all(|i| (self.normal(i).length() - 1.0).abs() <= epsilon)
    }

    /// Every normal points along `dir`
    pub fn normals_face(&self, dir: Vec3, epsilon: f32) -> bool {
        (0..self.vertex_count()).all(|i| self.normal(i).dot(dir) >= 1.0 - epsilon)
    }

    /// All vertices share one z, as flag meshes do before placement
    pub fn is_flat_in_z(&self, epsilon: f32) -> bool {
        self.dimensions()[2] <= epsilon
    }

    /// All vertices carry `expected` color
    pub fn has_uniform_color(&self, expected: [f32; 3], epsilon: f32) -> bool {
        (0..self.vertex_count()).all(|i| {
            let c = self.color(i);
            (0..3).all(|k| (c[k] - expected[k]).abs() <= epsilon)
        })
    }

    /// Sum of triangle areas projected onto the xy plane
    pub fn projected_area(&self) -> f32 {
        if !self.are_indices_in_range() {
            return 0.0;
        }
        self.mesh
            .indices
            .chunks_exact(3)
            .map(|t| {
                let a = self.mesh.position(t[0] as usize);
                let b = self.mesh.position(t[1] as usize);
                let c = self.mesh.position(t[2] as usize);
                ((b - a).truncate().perp_dot((c - a).truncate()) * 0.5).abs()
            })
            .sum()
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_mesh(self.mesh)
    }

    /// Width, height and depth of the bounding box
    pub fn dimensions(&self) -> [f32; 3] {
        self.aabb().size().to_array()
    }

    pub fn assert_dimensions_approx(&self, expected: [f32; 3], tolerance: f32) -> bool {
        let dims = self.dimensions();
        (0..3).all(|k| (dims[k] - expected[k]).abs() < tolerance)
    }

    /// Run all checks and return a list of error messages.
    /// An empty list means the mesh is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.is_stride_valid() {
            errors.push(format!(
                "Vertex buffer length {} is not a multiple of {STRIDE}",
                self.mesh.vertices.len()
            ));
            return errors;
        }

        if !self.is_index_stride_valid() {
            errors.push(format!(
                "Index buffer length {} is not a multiple of 3",
                self.mesh.indices.len()
            ));
        }

        if !self.are_indices_in_range() {
            let max_idx = self.vertex_count() as u32;
            let out_of_range: Vec<_> = self
                .mesh
                .indices
                .iter()
                .filter(|&&i| i >= max_idx)
                .take(5)
                .collect();
            errors.push(format!(
                "Indices out of range (vertex_count={max_idx}): {out_of_range:?}"
            ));
        }

        if self.vertex_count() > 0 && !self.are_normals_normalized(0.1) {
            errors.push("Some normals are not unit-length (epsilon=0.1)".to_string());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::mesh::{plane, push_vert};

    fn red_triangle() -> MeshData {
        let mut m = MeshData::default();
        push_vert(&mut m.vertices, 0.0, 0.0, 0.0, Vec3::Z, [1.0, 0.0, 0.0]);
        push_vert(&mut m.vertices, 2.0, 0.0, 0.0, Vec3::Z, [1.0, 0.0, 0.0]);
        push_vert(&mut m.vertices, 0.0, 1.0, 0.0, Vec3::Z, [1.0, 0.0, 0.0]);
        m.indices = vec![0, 1, 2];
        m
    }

    #[test]
    fn test_valid_flag_triangle() {
        let mesh = red_triangle();
        let v = MeshValidator::new(&mesh);
        assert!(v.validate_all().is_empty());
        assert!(v.normals_face(Vec3::Z, 1e-4));
        assert!(v.is_flat_in_z(1e-6));
        assert!(v.has_uniform_color([1.0, 0.0, 0.0], 1e-6));
        assert!((v.projected_area() - 1.0).abs() < 1e-6);
        assert!(v.assert_dimensions_approx([2.0, 1.0, 0.0], 1e-4));
    }

    #[test]
    fn test_plane_is_not_a_flag() {
        let mesh = plane(2.0, 0.0, [0.5; 3]);
        let v = MeshValidator::new(&mesh);
        assert!(v.validate_all().is_empty());
        assert!(!v.normals_face(Vec3::Z, 1e-4));
        assert!(!v.is_flat_in_z(1e-3));
    }

    #[test]
    fn test_bad_stride_is_reported() {
        let bad = MeshData {
            vertices: vec![0.0; 10],
            indices: vec![0, 1, 2],
        };
        let errors = MeshValidator::new(&bad).validate_all();
        assert!(errors.iter().any(|e| e.contains("multiple of 9")));
    }

    #[test]
    fn test_out_of_range_indices_are_reported() {
        let mut bad = red_triangle();
        bad.indices = vec![0, 5, 2];
        let v = MeshValidator::new(&bad);
        assert!(!v.are_indices_in_range());
        assert_eq!(v.projected_area(), 0.0);
        assert!(v.validate_all().iter().any(|e| e.contains("out of range")));
    }

    #[test]
    fn test_scaled_normals_are_reported() {
        let mut bad = red_triangle();
        bad.vertices[5] = 5.0;
        let v = MeshValidator::new(&bad);
        assert!(!v.are_normals_normalized(0.01));
        assert_eq!(v.validate_all().len(), 1);
    }

    #[test]
    fn test_mixed_colors() {
        let mut mesh = red_triangle();
        mesh.vertices[7] = 1.0;
        assert!(!MeshValidator::new(&mesh).has_uniform_color([1.0, 0.0, 0.0], 1e-3));
    }
}
