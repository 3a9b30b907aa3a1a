//! Render pass that captures the scene for the GL paint callback.

use std::sync::Arc;

use glam::{Mat4, Vec3};

use super::mesh::MeshData;
use super::session::ViewportSession;
use crate::scene::{FlagId, Scene};
use crate::session::FrameRenderer;

/// Lighting uniforms derived from the scene environment
#[derive(Debug, Clone, Copy)]
pub struct Lighting {
    pub ambient: f32,
    /// Direction towards the key light
    pub key_dir: Vec3,
    pub key_intensity: f32,
    pub point_position: Vec3,
    pub point_intensity: f32,
}

/// One flag to draw this frame
#[derive(Debug, Clone)]
pub struct FlagDraw {
    pub id: FlagId,
    pub model: Mat4,
}

/// Everything the paint callback needs, owned so it can cross into the
/// GL thread closure
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    /// Group the meshes belong to; `None` without a flag group
    pub group_id: Option<String>,
    pub meshes: Arc<Vec<(FlagId, MeshData)>>,
    pub flags: Vec<FlagDraw>,
    pub plane: Arc<MeshData>,
    pub view_projection: Mat4,
    pub background: [u8; 3],
    pub lighting: Lighting,
}

/// Builds a `FrameSnapshot` per rendered frame.
///
/// Mesh data is only cloned when the flag group changes.
#[derive(Default)]
pub struct SnapshotRenderer {
    latest: Option<FrameSnapshot>,
    meshes: Arc<Vec<(FlagId, MeshData)>>,
    meshes_group: Option<String>,
    plane: Option<Arc<MeshData>>,
}

impl SnapshotRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent snapshot, kept while the loop is stopped
    pub fn latest(&self) -> Option<&FrameSnapshot> {
        self.latest.as_ref()
    }
}

impl FrameRenderer for SnapshotRenderer {
    fn render(&mut self, scene: &Scene, viewport: &ViewportSession) {
        let group = scene.flag_group.as_ref();
        let group_id = group.map(|g| g.id.clone());

        if group_id != self.meshes_group {
            self.meshes = Arc::new(
                group
                    .map(|g| {
                        g.flags()
                            .iter()
                            .map(|f| (f.id.clone(), f.mesh.clone()))
                            .collect()
                    })
                    .unwrap_or_default(),
            );
            self.meshes_group = group_id.clone();
        }

        let plane = self
            .plane
            .get_or_insert_with(|| Arc::new(scene.environment.plane.clone()))
            .clone();

        let flags = group
            .map(|g| {
                g.flags()
                    .iter()
                    .map(|f| FlagDraw {
                        id: f.id.clone(),
                        model: Mat4::from_translation(g.offset + f.position),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let env = &scene.environment;
        let (key_dir, key_intensity) = env.key_light().unwrap_or((Vec3::Y, 0.0));
        let (point_position, point_intensity) = env.point_light().unwrap_or((Vec3::ZERO, 0.0));

        self.latest = Some(FrameSnapshot {
            group_id,
            meshes: self.meshes.clone(),
            flags,
            plane,
            view_projection: viewport.view_projection(),
            background: env.background,
            lighting: Lighting {
                ambient: env.ambient(),
                key_dir,
                key_intensity,
                point_position,
                point_intensity,
            },
        });
    }
}
