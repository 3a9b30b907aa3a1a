//! Flag entities and the flag group that owns them.

use glam::Vec3;

use crate::viewport::bounds::Aabb;
use crate::viewport::mesh::MeshData;

/// Stable identity of a flag, assigned when its group is built
pub type FlagId = String;

/// Sign of a flag's depth motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Moving towards `MAX_Z` (+1)
    #[default]
    Forward,
    /// Moving towards `MIN_Z` (-1)
    Backward,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// One mesh of the flag group together with its animation bookkeeping.
///
/// `original_depth` and `direction` live next to the mesh they describe so
/// they can never drift out of step with the group.
#[derive(Debug, Clone)]
pub struct Flag {
    pub id: FlagId,
    pub name: String,
    pub mesh: MeshData,
    pub position: Vec3,
    /// Depth reported by the builder, restored by the original layout
    pub original_depth: f32,
    pub direction: Direction,
}

impl Flag {
    pub fn new(name: String, mesh: MeshData, position: Vec3, original_depth: f32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            mesh,
            position,
            original_depth,
            direction: Direction::Forward,
        }
    }

    pub fn z(&self) -> f32 {
        self.position.z
    }

    /// Bounds of the mesh at its current position (group local space)
    pub fn bounds(&self) -> Aabb {
        Aabb::from_mesh_at(&self.mesh, self.position)
    }
}

/// The meshes generated for one image.
///
/// Built once per image and replaced wholesale, never patched.
#[derive(Debug, Clone)]
pub struct FlagGroup {
    /// Fresh for every build, so renderers can tell groups apart
    pub id: String,
    pub name: String,
    pub image_id: String,
    /// Group translation that centers the flags over the ground plane
    pub offset: Vec3,
    flags: Vec<Flag>,
}

impl FlagGroup {
    pub const NAME: &'static str = "flag-group";

    pub fn new(image_id: &str, flags: Vec<Flag>) -> Self {
        let offset = centering_offset(&flags);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: Self::NAME.to_string(),
            image_id: image_id.to_string(),
            offset,
            flags,
        }
    }

    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut [Flag] {
        &mut self.flags
    }

    pub fn get(&self, index: usize) -> Option<&Flag> {
        self.flags.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Flag> {
        self.flags.get_mut(index)
    }

    pub fn find(&self, id: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.id == id)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Current z of every flag, in group order
    pub fn depths(&self) -> Vec<f32> {
        self.flags.iter().map(Flag::z).collect()
    }

    /// Recorded original depth of every flag, in group order
    pub fn original_depths(&self) -> Vec<f32> {
        self.flags.iter().map(|f| f.original_depth).collect()
    }

    /// Direction state of every flag, in group order
    pub fn directions(&self) -> Vec<Direction> {
        self.flags.iter().map(|f| f.direction).collect()
    }

    /// Bounds of all flags in group local space
    pub fn bounds(&self) -> Aabb {
        self.flags
            .iter()
            .fold(Aabb::empty(), |acc, f| acc.union(&f.bounds()))
    }
}

/// Centers x and z on the origin. The y shift is the full `-(min.y + max.y)`,
/// which moves image-space geometry (y <= 0) up above the ground plane.
fn centering_offset(flags: &[Flag]) -> Vec3 {
    let bounds = flags
        .iter()
        .fold(Aabb::empty(), |acc, f| acc.union(&f.bounds()));
    if bounds.is_empty() {
        return Vec3::ZERO;
    }
    Vec3::new(
        -(bounds.min.x + bounds.max.x) / 2.0,
        -(bounds.min.y + bounds.max.y),
        -(bounds.min.z + bounds.max.z) / 2.0,
    )
}
