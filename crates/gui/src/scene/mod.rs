//! Scene graph: static environment plus at most one flag group.
//!
//! A rebuild computes the complete next scene as a value and swaps it in with
//! a single assignment, so no frame can observe children of two images.

pub mod environment;
pub mod flag;

pub use environment::{Environment, Light};
pub use flag::{Direction, Flag, FlagGroup, FlagId};

use crate::build::{build_flag_group, MeshGroupBuilder};
use crate::error::BuildError;

/// Renderable contents of the viewport
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub environment: Environment,
    pub flag_group: Option<FlagGroup>,
}

impl Scene {
    /// Environment only, no flag group
    pub fn empty(background: [u8; 3]) -> Self {
        Self {
            environment: Environment::with_background(background),
            flag_group: None,
        }
    }

    /// Fresh environment and a newly built group for `image_id`.
    ///
    /// On failure the scene is still complete, just without a flag group.
    pub fn build<B: MeshGroupBuilder + ?Sized>(
        builder: &B,
        image_id: &str,
        background: [u8; 3],
    ) -> (Self, Result<usize, BuildError>) {
        let mut scene = Self::empty(background);
        let result = build_flag_group(builder, image_id).map(|group| {
            let count = group.len();
            scene.flag_group = Some(group);
            count
        });
        (scene, result)
    }

    /// Environment children plus one for the flag group, if present
    pub fn child_count(&self) -> usize {
        self.environment.child_count() + usize::from(self.flag_group.is_some())
    }

    pub fn flag_count(&self) -> usize {
        self.flag_group.as_ref().map_or(0, FlagGroup::len)
    }
}

/// Owner of the current scene contents
#[derive(Debug, Clone)]
pub struct SceneGraph {
    scene: Scene,
    background: [u8; 3],
    rebuild_count: u64,
}

impl SceneGraph {
    pub fn new(background: [u8; 3]) -> Self {
        Self {
            scene: Scene::empty(background),
            background,
            rebuild_count: 0,
        }
    }

    /// Replace the scene with the environment and a new group for `image_id`.
    ///
    /// Returns the number of flags built. A build failure leaves the
    /// environment in place with no flag group.
    pub fn rebuild<B: MeshGroupBuilder + ?Sized>(
        &mut self,
        builder: &B,
        image_id: &str,
    ) -> Result<usize, BuildError> {
        let (next, result) = Scene::build(builder, image_id, self.background);
        self.scene = next;
        self.rebuild_count += 1;
        result
    }

    /// Drop the flag group and reset the environment
    pub fn clear(&mut self) {
        self.scene = Scene::empty(self.background);
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn group(&self) -> Option<&FlagGroup> {
        self.scene.flag_group.as_ref()
    }

    pub fn group_mut(&mut self) -> Option<&mut FlagGroup> {
        self.scene.flag_group.as_mut()
    }

    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new(environment::BACKGROUND_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{stripes_builder, FixtureBuilder};

    #[test]
    fn test_new_graph_has_environment_only() {
        let graph = SceneGraph::default();
        assert!(graph.group().is_none());
        assert_eq!(graph.scene().child_count(), 4);
        assert_eq!(graph.rebuild_count(), 0);
    }

    #[test]
    fn test_rebuild_replaces_group() {
        let builder = stripes_builder();
        let mut graph = SceneGraph::default();

        assert_eq!(graph.rebuild(&builder, "three").unwrap(), 3);
        let first_ids: Vec<_> = graph.group().unwrap().flags().iter().map(|f| f.id.clone()).collect();

        assert_eq!(graph.rebuild(&builder, "two").unwrap(), 2);
        let group = graph.group().unwrap();
        assert_eq!(group.image_id, "two");
        assert!(group.flags().iter().all(|f| !first_ids.contains(&f.id)));
        assert_eq!(graph.scene().child_count(), 5);
    }

    #[test]
    fn test_failed_rebuild_keeps_environment() {
        let builder = stripes_builder();
        let mut graph = SceneGraph::default();
        graph.rebuild(&builder, "three").unwrap();

        let err = graph.rebuild(&builder, "missing").unwrap_err();
        assert!(matches!(err, BuildError::UnknownImage { .. }));
        assert!(graph.group().is_none());
        assert_eq!(graph.scene().child_count(), 4);
        assert_eq!(graph.rebuild_count(), 2);
    }

    #[test]
    fn test_rebuild_with_zero_meshes_keeps_empty_group() {
        let builder = FixtureBuilder::new().with_depths("blank", &[]);
        let mut graph = SceneGraph::default();
        assert_eq!(graph.rebuild(&builder, "blank").unwrap(), 0);
        let group = graph.group().unwrap();
        assert!(group.is_empty());
        assert_eq!(group.original_depths().len(), 0);
        assert_eq!(group.directions().len(), 0);
    }

    #[test]
    fn test_clear_drops_group() {
        let builder = stripes_builder();
        let mut graph = SceneGraph::default();
        graph.rebuild(&builder, "three").unwrap();
        graph.clear();
        assert!(graph.group().is_none());
        assert_eq!(graph.scene().flag_count(), 0);
    }
}
