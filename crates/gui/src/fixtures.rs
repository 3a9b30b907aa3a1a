//! Factory functions for creating test data.
//!
//! Provides an in-memory `MeshGroupBuilder`, flag description factories and
//! helpers for writing a library directory, used by tests and the harness.

use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::Vec3;
use shared::{ColorRegion, Contour, FlagDescription, Point2D};

use crate::build::{GeneratedGroup, GeneratedMesh, MeshGroupBuilder};
use crate::error::BuildError;
use crate::viewport::mesh::{push_vert, MeshData};

// ── In-memory builder ───────────────────────────────────────────

/// Builder serving fixed groups by image id and counting its calls
#[derive(Debug, Default)]
pub struct FixtureBuilder {
    groups: HashMap<String, GeneratedGroup>,
    calls: Cell<usize>,
}

impl FixtureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// One unit-wide strip per depth, side by side, positioned at that depth
    pub fn with_depths(self, image_id: &str, depths: &[f32]) -> Self {
        let meshes = depths
            .iter()
            .enumerate()
            .map(|(i, &z)| GeneratedMesh {
                name: format!("{image_id}-{i}"),
                mesh: strip_mesh(i as f32, 1.0),
                position: Vec3::new(0.0, 0.0, z),
            })
            .collect();
        self.with_group(image_id, GeneratedGroup::from_positions(meshes))
    }

    /// Serve `group` verbatim, including inconsistent ones
    pub fn with_group(mut self, image_id: &str, group: GeneratedGroup) -> Self {
        self.groups.insert(image_id.to_string(), group);
        self
    }

    /// Number of `generate` calls so far
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl MeshGroupBuilder for FixtureBuilder {
    fn generate(&self, image_id: &str) -> Result<GeneratedGroup, BuildError> {
        self.calls.set(self.calls.get() + 1);
        self.groups
            .get(image_id)
            .cloned()
            .ok_or_else(|| BuildError::UnknownImage {
                image_id: image_id.to_string(),
            })
    }
}

/// "three" at depths [0.05, 0.10, 0.15] and "two" at [0.0, 0.2]
pub fn stripes_builder() -> FixtureBuilder {
    FixtureBuilder::new()
        .with_depths("three", &[0.05, 0.1, 0.15])
        .with_depths("two", &[0.0, 0.2])
}

/// Unit-high vertical strip in image space (y <= 0) starting at `x`
pub fn strip_mesh(x: f32, width: f32) -> MeshData {
    let c = [0.2, 0.4, 0.8];
    let mut m = MeshData::default();
    push_vert(&mut m.vertices, x, -1.0, 0.0, Vec3::Z, c);
    push_vert(&mut m.vertices, x + width, -1.0, 0.0, Vec3::Z, c);
    push_vert(&mut m.vertices, x + width, 0.0, 0.0, Vec3::Z, c);
    push_vert(&mut m.vertices, x, 0.0, 0.0, Vec3::Z, c);
    m.indices = vec![0, 1, 2, 0, 2, 3];
    m
}

// ── Description factories ───────────────────────────────────────

/// Axis-aligned rectangle contour in pixel space
pub fn rect_contour(x: f64, y: f64, w: f64, h: f64) -> Contour {
    vec![
        Point2D::new(x, y),
        Point2D::new(x + w, y),
        Point2D::new(x + w, y + h),
        Point2D::new(x, y + h),
    ]
}

pub fn region(color: [u8; 3], depth: f64, contours: Vec<Contour>) -> ColorRegion {
    ColorRegion {
        color,
        pixel_count: 0,
        depth,
        contours,
    }
}

/// Vertical tricolor, 30x20 pixels, depths 0.05/0.10/0.15
pub fn tricolor_description(image_id: &str) -> FlagDescription {
    FlagDescription {
        image_id: image_id.to_string(),
        width: 30,
        height: 20,
        regions: vec![
            region([0, 85, 164], 0.05, vec![rect_contour(0.0, 0.0, 10.0, 20.0)]),
            region([255, 255, 255], 0.1, vec![rect_contour(10.0, 0.0, 10.0, 20.0)]),
            region([239, 65, 53], 0.15, vec![rect_contour(20.0, 0.0, 10.0, 20.0)]),
        ],
    }
}

/// Description whose regions carry no closed contour
pub fn colorless_description(image_id: &str) -> FlagDescription {
    FlagDescription {
        image_id: image_id.to_string(),
        width: 8,
        height: 8,
        regions: vec![region([10, 10, 10], 0.0, vec![])],
    }
}

// ── Library helpers ─────────────────────────────────────────────

/// Write `description` as `<dir>/<image_id>.json`
pub fn write_description(dir: &Path, description: &FlagDescription) -> Result<PathBuf, String> {
    let path = dir.join(format!("{}.json", description.image_id));
    let json = serde_json::to_string_pretty(description).map_err(|e| e.to_string())?;
    std::fs::write(&path, json).map_err(|e| format!("{}: {e}", path.display()))?;
    Ok(path)
}
