use glam::Vec3;

use super::mesh::MeshData;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Inverted box that any `extend` call replaces
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    /// Compute AABB from MeshData (9 floats per vertex: pos+normal+color)
    pub fn from_mesh(data: &MeshData) -> Self {
        Self::from_mesh_at(data, Vec3::ZERO)
    }

    /// AABB of a mesh placed at `offset`
    pub fn from_mesh_at(data: &MeshData, offset: Vec3) -> Self {
        let mut aabb = Self::empty();
        for i in 0..data.vertex_count() {
            aabb.extend(data.position(i) + offset);
        }
        aabb
    }

    pub fn extend(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// True if no point was ever added
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::mesh;

    #[test]
    fn test_empty_box() {
        let b = Aabb::empty();
        assert!(b.is_empty());
        assert_eq!(b.size(), Vec3::ZERO);
    }

    #[test]
    fn test_from_mesh_at_offsets_points() {
        let m = mesh::plane(2.0, 0.0, [0.0; 3]);
        let b = Aabb::from_mesh_at(&m, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.min, Vec3::new(0.0, 2.0, 2.0));
        assert_eq!(b.max, Vec3::new(2.0, 2.0, 4.0));
        assert_eq!(b.center(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_union() {
        let a = Aabb { min: Vec3::ZERO, max: Vec3::ONE };
        let b = Aabb { min: Vec3::splat(-1.0), max: Vec3::splat(0.5) };
        let u = a.union(&b);
        assert_eq!(u.min, Vec3::splat(-1.0));
        assert_eq!(u.max, Vec3::ONE);
    }
}
