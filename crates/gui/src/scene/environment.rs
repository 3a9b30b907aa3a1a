//! Static environment objects re-added on every rebuild.

use glam::Vec3;

use crate::viewport::mesh::{self, MeshData};

/// Scene background, `#e9d5e9`
pub const BACKGROUND_COLOR: [u8; 3] = [0xe9, 0xd5, 0xe9];

const PLANE_SIZE: f32 = 10.0;
const PLANE_Y: f32 = -0.001;
const PLANE_COLOR: [f32; 3] = [0.93, 0.9, 0.93];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: [f32; 3],
        intensity: f32,
    },
    Directional {
        color: [f32; 3],
        intensity: f32,
        /// Direction the light travels towards the scene
        direction: Vec3,
    },
    Point {
        color: [f32; 3],
        intensity: f32,
        position: Vec3,
    },
}

/// Ground plane and lights
#[derive(Debug, Clone)]
pub struct Environment {
    pub background: [u8; 3],
    pub plane: MeshData,
    pub lights: Vec<Light>,
}

impl Environment {
    /// Ground plane plus ambient, key and point light
    pub fn standard() -> Self {
        Self::with_background(BACKGROUND_COLOR)
    }

    pub fn with_background(background: [u8; 3]) -> Self {
        Self {
            background,
            plane: mesh::plane(PLANE_SIZE, PLANE_Y, PLANE_COLOR),
            lights: vec![
                Light::Ambient {
                    color: [1.0, 1.0, 1.0],
                    intensity: 0.45,
                },
                Light::Directional {
                    color: [1.0, 1.0, 1.0],
                    intensity: 0.6,
                    direction: Vec3::new(-0.3, -0.8, -0.5).normalize(),
                },
                Light::Point {
                    color: [1.0, 0.96, 0.9],
                    intensity: 0.35,
                    position: Vec3::new(0.0, 1.5, 1.5),
                },
            ],
        }
    }

    /// Sum of ambient light, used as the shading floor
    pub fn ambient(&self) -> f32 {
        self.lights
            .iter()
            .map(|l| match l {
                Light::Ambient { intensity, .. } => *intensity,
                _ => 0.0,
            })
            .sum()
    }

    /// First directional light as (direction towards the light, intensity)
    pub fn key_light(&self) -> Option<(Vec3, f32)> {
        self.lights.iter().find_map(|l| match l {
            Light::Directional {
                direction,
                intensity,
                ..
            } => Some((-*direction, *intensity)),
            _ => None,
        })
    }

    /// First point light as (position, intensity)
    pub fn point_light(&self) -> Option<(Vec3, f32)> {
        self.lights.iter().find_map(|l| match l {
            Light::Point {
                position,
                intensity,
                ..
            } => Some((*position, *intensity)),
            _ => None,
        })
    }

    /// Number of renderable children this environment contributes
    pub fn child_count(&self) -> usize {
        1 + self.lights.len()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::standard()
    }
}
