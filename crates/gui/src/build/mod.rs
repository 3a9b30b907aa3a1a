//! Flag group building from generated color-region geometry.
//!
//! Color extraction and contour tracing happen upstream; this module only
//! turns their output into positioned meshes.

mod contour;
mod library;

pub use contour::{contour_mesh, triangulate};
pub use library::{description_to_group, ContourLibrary, FLAG_WORLD_SIZE};

use glam::Vec3;

use crate::error::BuildError;
use crate::scene::flag::{Flag, FlagGroup};
use crate::viewport::mesh::MeshData;

/// One positioned mesh as produced by a builder
#[derive(Debug, Clone)]
pub struct GeneratedMesh {
    pub name: String,
    pub mesh: MeshData,
    pub position: Vec3,
}

/// Builder output: meshes plus their original depths, index for index
#[derive(Debug, Clone, Default)]
pub struct GeneratedGroup {
    pub meshes: Vec<GeneratedMesh>,
    pub original_depths: Vec<f32>,
}

impl GeneratedGroup {
    /// Group whose original depths are the meshes' own z positions
    pub fn from_positions(meshes: Vec<GeneratedMesh>) -> Self {
        let original_depths = meshes.iter().map(|m| m.position.z).collect();
        Self {
            meshes,
            original_depths,
        }
    }
}

/// Source of flag meshes for an image
pub trait MeshGroupBuilder {
    /// Produce one mesh per color region of `image_id`, in a stable order
    fn generate(&self, image_id: &str) -> Result<GeneratedGroup, BuildError>;
}

impl<B: MeshGroupBuilder + ?Sized> MeshGroupBuilder for &B {
    fn generate(&self, image_id: &str) -> Result<GeneratedGroup, BuildError> {
        (**self).generate(image_id)
    }
}

impl<B: MeshGroupBuilder + ?Sized> MeshGroupBuilder for Box<B> {
    fn generate(&self, image_id: &str) -> Result<GeneratedGroup, BuildError> {
        (**self).generate(image_id)
    }
}

/// Run the builder and pair every mesh with its depth and a fresh direction
pub fn build_flag_group<B: MeshGroupBuilder + ?Sized>(
    builder: &B,
    image_id: &str,
) -> Result<FlagGroup, BuildError> {
    let generated = builder.generate(image_id)?;
    assemble_group(image_id, generated)
}

/// Pair generated meshes with their original depths
pub fn assemble_group(image_id: &str, generated: GeneratedGroup) -> Result<FlagGroup, BuildError> {
    if generated.meshes.len() != generated.original_depths.len() {
        return Err(BuildError::DepthCountMismatch {
            meshes: generated.meshes.len(),
            depths: generated.original_depths.len(),
        });
    }

    let flags = generated
        .meshes
        .into_iter()
        .zip(generated.original_depths)
        .map(|(m, depth)| Flag::new(m.name, m.mesh, m.position, depth))
        .collect();

    Ok(FlagGroup::new(image_id, flags))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::flag::Direction;

    fn generated(depths: &[f32]) -> GeneratedGroup {
        GeneratedGroup::from_positions(
            depths
                .iter()
                .enumerate()
                .map(|(i, z)| GeneratedMesh {
                    name: format!("m{i}"),
                    mesh: MeshData::default(),
                    position: Vec3::new(0.0, 0.0, *z),
                })
                .collect(),
        )
    }

    #[test]
    fn test_assemble_pairs_depths_in_order() {
        let group = assemble_group("img", generated(&[0.05, 0.1, 0.15])).unwrap();
        assert_eq!(group.len(), 3);
        assert_eq!(group.original_depths(), vec![0.05, 0.1, 0.15]);
        assert!(group.directions().iter().all(|d| *d == Direction::Forward));
        assert_eq!(group.image_id, "img");
    }

    #[test]
    fn test_assemble_rejects_mismatched_depths() {
        let mut g = generated(&[0.1, 0.2]);
        g.original_depths.pop();
        let err = assemble_group("img", g).unwrap_err();
        assert!(matches!(
            err,
            BuildError::DepthCountMismatch { meshes: 2, depths: 1 }
        ));
    }

    #[test]
    fn test_assemble_empty_group() {
        let group = assemble_group("img", GeneratedGroup::default()).unwrap();
        assert!(group.is_empty());
    }
}
