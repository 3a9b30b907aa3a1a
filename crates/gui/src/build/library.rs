//! Directory of flag descriptions produced by the color/contour service.

use std::path::{Path, PathBuf};

use glam::Vec3;
use kurbo::Point;
use shared::{FlagDescription, ImageId};

use super::contour::contour_mesh;
use super::{GeneratedGroup, GeneratedMesh, MeshGroupBuilder};
use crate::error::BuildError;
use crate::viewport::mesh::color_from_rgb;

/// World length of the longer image side
pub const FLAG_WORLD_SIZE: f64 = 2.0;

const EXTENSION: &str = "json";

/// Loads `<dir>/<image_id>.json` and turns every color region into a flag
#[derive(Debug, Clone)]
pub struct ContourLibrary {
    dir: PathBuf,
}

impl ContourLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn set_dir(&mut self, dir: impl Into<PathBuf>) {
        self.dir = dir.into();
        tracing::info!("Flag library set to {}", self.dir.display());
    }

    /// Available image ids, sorted. An unreadable directory lists nothing.
    pub fn image_ids(&self) -> Vec<ImageId> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Cannot list flag library {}: {e}", self.dir.display());
                return Vec::new();
            }
        };

        let mut ids: Vec<ImageId> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(EXTENSION))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
            .collect();
        ids.sort();
        ids
    }

    fn path_for(&self, image_id: &str) -> PathBuf {
        self.dir.join(format!("{image_id}.{EXTENSION}"))
    }

    /// Read and parse the description for `image_id`
    pub fn load(&self, image_id: &str) -> Result<FlagDescription, BuildError> {
        let path = self.path_for(image_id);
        let text = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                BuildError::UnknownImage {
                    image_id: image_id.to_string(),
                }
            } else {
                BuildError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;
        serde_json::from_str(&text).map_err(|source| BuildError::Parse { path, source })
    }
}

impl MeshGroupBuilder for ContourLibrary {
    fn generate(&self, image_id: &str) -> Result<GeneratedGroup, BuildError> {
        let description = self.load(image_id)?;
        let group = description_to_group(&description);
        if group.meshes.is_empty() {
            return Err(BuildError::NoColors {
                image_id: image_id.to_string(),
            });
        }
        tracing::debug!(
            "Generated {} flags for '{}' ({}x{})",
            group.meshes.len(),
            image_id,
            description.width,
            description.height
        );
        Ok(group)
    }
}

/// One flag per usable region, positioned at its depth.
///
/// Pixel coordinates are scaled so the longer image side spans
/// `FLAG_WORLD_SIZE` and flipped so y points up. Regions whose contours
/// enclose no area (collinear or repeated points) are skipped.
pub fn description_to_group(description: &FlagDescription) -> GeneratedGroup {
    let scale = FLAG_WORLD_SIZE / f64::from(description.extent());

    let meshes = description
        .usable_regions()
        .filter_map(|region| {
            let contours: Vec<Vec<Point>> = region
                .closed_contours()
                .map(|c| {
                    c.iter()
                        .map(|p| Point::new(p.x * scale, -p.y * scale))
                        .collect()
                })
                .collect();
            let mesh = contour_mesh(&contours, color_from_rgb(region.color));
            if mesh.is_empty() {
                tracing::debug!(
                    "Skipping degenerate {:?} region of '{}'",
                    region.color,
                    description.image_id
                );
                return None;
            }
            Some((region, mesh))
        })
        .enumerate()
        .map(|(i, (region, mesh))| {
            let [r, g, b] = region.color;
            GeneratedMesh {
                name: format!("flag-{i}-{r:02x}{g:02x}{b:02x}"),
                mesh,
                position: Vec3::new(0.0, 0.0, region.depth as f32),
            }
        })
        .collect();

    GeneratedGroup::from_positions(meshes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{ColorRegion, Point2D};

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Vec<Point2D> {
        vec![
            Point2D::new(x, y),
            Point2D::new(x + w, y),
            Point2D::new(x + w, y + h),
            Point2D::new(x, y + h),
        ]
    }

    fn region(color: [u8; 3], depth: f64, contours: Vec<Vec<Point2D>>) -> ColorRegion {
        ColorRegion {
            color,
            pixel_count: 100,
            depth,
            contours,
        }
    }

    #[test]
    fn test_regions_become_flags_in_order() {
        let desc = FlagDescription {
            image_id: "tri".into(),
            width: 30,
            height: 20,
            regions: vec![
                region([0, 0, 255], 0.05, vec![rect(0.0, 0.0, 10.0, 20.0)]),
                region([255, 255, 255], 0.1, vec![rect(10.0, 0.0, 10.0, 20.0)]),
                region([255, 0, 0], 0.15, vec![rect(20.0, 0.0, 10.0, 20.0)]),
            ],
        };
        let group = description_to_group(&desc);
        assert_eq!(group.meshes.len(), 3);
        assert_eq!(group.original_depths, vec![0.05, 0.1, 0.15]);
        assert_eq!(group.meshes[0].name, "flag-0-0000ff");
        assert_eq!(group.meshes[2].position.z, 0.15);
    }

    #[test]
    fn test_pixels_scale_to_world_and_flip_y() {
        let desc = FlagDescription {
            image_id: "sq".into(),
            width: 100,
            height: 50,
            regions: vec![region([1, 2, 3], 0.0, vec![rect(0.0, 0.0, 100.0, 50.0)])],
        };
        let group = description_to_group(&desc);
        let mesh = &group.meshes[0].mesh;
        let xs: Vec<f32> = (0..mesh.vertex_count()).map(|i| mesh.position(i).x).collect();
        let ys: Vec<f32> = (0..mesh.vertex_count()).map(|i| mesh.position(i).y).collect();
        assert!((xs.iter().cloned().fold(f32::MIN, f32::max) - 2.0).abs() < 1e-6);
        assert!((ys.iter().cloned().fold(f32::MAX, f32::min) + 1.0).abs() < 1e-6);
        assert!(ys.iter().all(|y| *y <= 0.0));
    }

    #[test]
    fn test_regions_without_closed_contours_are_skipped() {
        let desc = FlagDescription {
            image_id: "x".into(),
            width: 10,
            height: 10,
            regions: vec![
                region([0, 0, 0], 0.0, vec![]),
                region([9, 9, 9], 0.2, vec![rect(0.0, 0.0, 5.0, 5.0)]),
            ],
        };
        let group = description_to_group(&desc);
        assert_eq!(group.meshes.len(), 1);
        assert_eq!(group.original_depths, vec![0.2]);
    }

    #[test]
    fn test_degenerate_regions_are_skipped() {
        let line = vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(5.0, 0.0),
            Point2D::new(10.0, 0.0),
        ];
        let dot = vec![Point2D::new(3.0, 3.0); 4];
        let desc = FlagDescription {
            image_id: "thin".into(),
            width: 10,
            height: 10,
            regions: vec![
                region([1, 1, 1], 0.05, vec![line]),
                region([2, 2, 2], 0.1, vec![dot]),
                region([3, 3, 3], 0.15, vec![rect(0.0, 0.0, 10.0, 10.0)]),
            ],
        };
        let group = description_to_group(&desc);
        assert_eq!(group.meshes.len(), 1);
        assert_eq!(group.meshes[0].name, "flag-0-030303");
        assert_eq!(group.original_depths, vec![0.15]);
    }
}
