use glam::Vec3;

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z, r, g, b]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// 9 floats per vertex: position(3) + normal(3) + color(3)
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 9
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append another mesh, rebasing its indices
    pub fn append(&mut self, other: &MeshData) {
        let base = self.vertex_count() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Vertex position at `index`
    pub fn position(&self, index: usize) -> Vec3 {
        let base = index * 9;
        Vec3::new(
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        )
    }
}

/// Convert an sRGB byte color to the float color stored in vertices
pub fn color_from_rgb(rgb: [u8; 3]) -> [f32; 3] {
    [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
    ]
}

// ── Environment primitives ───────────────────────────────────

/// Horizontal square at height `y`, facing up
pub fn plane(size: f32, y: f32, color: [f32; 3]) -> MeshData {
    let h = size * 0.5;
    let mut vertices = Vec::with_capacity(4 * 9);
    push_vert(&mut vertices, -h, y, h, Vec3::Y, color);
    push_vert(&mut vertices, h, y, h, Vec3::Y, color);
    push_vert(&mut vertices, h, y, -h, Vec3::Y, color);
    push_vert(&mut vertices, -h, y, -h, Vec3::Y, color);

    MeshData {
        vertices,
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

// ── Helpers ──────────────────────────────────────────────────

pub fn push_vert(v: &mut Vec<f32>, px: f32, py: f32, pz: f32, n: Vec3, c: [f32; 3]) {
    v.extend_from_slice(&[px, py, pz, n.x, n.y, n.z, c[0], c[1], c[2]]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_is_two_triangles_facing_up() {
        let m = plane(4.0, -0.5, [1.0, 1.0, 1.0]);
        assert_eq!(m.vertex_count(), 4);
        assert_eq!(m.triangle_count(), 2);
        for i in 0..m.vertex_count() {
            assert_eq!(m.position(i).y, -0.5);
            assert_eq!(m.vertices[i * 9 + 4], 1.0);
        }
    }

    #[test]
    fn test_append_rebases_indices() {
        let mut a = plane(1.0, 0.0, [0.0; 3]);
        let b = plane(1.0, 1.0, [0.0; 3]);
        a.append(&b);
        assert_eq!(a.vertex_count(), 8);
        assert_eq!(&a.indices[6..], &[4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn test_color_from_rgb() {
        assert_eq!(color_from_rgb([255, 0, 51]), [1.0, 0.0, 0.2]);
    }
}
