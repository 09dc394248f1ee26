//! Static description of the telemetry scene: where every primitive sits,
//! how it is shaded and which lights reach it.
//!
//! The layout is built once per mounted panel. Per-frame motion lives in
//! [`crate::animation`]; the renderer combines both.

use crate::constants::*;
use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
}

impl Material {
    const fn flat(color: [f32; 3], opacity: f32) -> Self {
        Self {
            color,
            emissive: [0.0; 3],
            emissive_intensity: 0.0,
            roughness: 1.0,
            metalness: 0.0,
            opacity,
        }
    }

    /// Colour plus emissive term packed for the GPU.
    pub fn packed(&self) -> ([f32; 4], [f32; 4]) {
        let [r, g, b] = self.color;
        let [er, eg, eb] = self.emissive;
        let k = self.emissive_intensity;
        (
            [r, g, b, self.opacity],
            [er * k, eg * k, eb * k, self.roughness],
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub range: f32,
    pub position: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lights {
    pub ambient: [f32; 3],
    pub ambient_intensity: f32,
    pub key: PointLight,
    pub fill: PointLight,
    pub rim_color: [f32; 3],
    pub rim_intensity: f32,
    /// Unit vector pointing from the scene towards the rim light.
    pub rim_direction: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    pub color: [f32; 3],
    pub near: f32,
    pub far: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ground {
    pub radius: f32,
    pub segments: u32,
    pub y: f32,
    pub material: Material,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    pub size: f32,
    pub divisions: u32,
    pub y: f32,
    pub center_color: [f32; 3],
    pub line_color: [f32; 3],
    pub opacity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ring {
    pub radius: f32,
    pub segments: u32,
    pub y: f32,
    pub color: [f32; 3],
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneLayout {
    pub ground: Ground,
    pub grid: Grid,
    /// Base centre of each bar (bars grow upward from `BAR_BASE_Y`).
    pub bars: [Vec3; BAR_COUNT],
    pub bar_size: Vec3,
    pub bar_material: Material,
    pub rings: [Ring; RING_RADII.len()],
    pub nodes: [Vec3; NODE_COUNT],
    pub node_radius: f32,
    pub node_material: Material,
    pub wave: [Vec3; WAVE_POINT_COUNT],
    pub wave_color: [f32; 3],
    pub wave_opacity: f32,
    pub marker_radius: f32,
    pub marker_material: Material,
    pub lights: Lights,
    pub fog: Fog,
}

impl Default for SceneLayout {
    fn default() -> Self {
        let bars = std::array::from_fn(|i| {
            Vec3::new(BAR_START_X + i as f32 * BAR_SPACING, BAR_BASE_Y, BAR_Z)
        });
        let rings = std::array::from_fn(|i| Ring {
            radius: RING_RADII[i],
            segments: RING_SEGMENTS,
            y: RING_Y,
            color: rgb(RING_COLORS[i % RING_COLORS.len()]),
        });
        let nodes = std::array::from_fn(|i| {
            Vec3::new(
                -44.0 + (i % 8) as f32 * 12.0,
                NODE_BASE_Y + (i % 3) as f32 * 1.3,
                -8.0 + (i / 8) as f32 * 10.0,
            )
        });
        let wave = std::array::from_fn(|i| {
            Vec3::new(WAVE_START_X + i as f32 * WAVE_SPACING, WAVE_BASE_Y, WAVE_Z)
        });
        Self {
            ground: Ground {
                radius: GROUND_RADIUS,
                segments: GROUND_SEGMENTS,
                y: GROUND_Y,
                material: Material {
                    roughness: 0.72,
                    metalness: 0.32,
                    ..Material::flat(rgb(GROUND_COLOR), 1.0)
                },
            },
            grid: Grid {
                size: GRID_SIZE,
                divisions: GRID_DIVISIONS,
                y: GRID_Y,
                center_color: rgb(GRID_CENTER_COLOR),
                line_color: rgb(GRID_LINE_COLOR),
                opacity: GRID_OPACITY,
            },
            bars,
            bar_size: Vec3::new(BAR_WIDTH, BAR_HEIGHT, BAR_WIDTH),
            bar_material: Material {
                color: rgb(BAR_COLOR),
                emissive: rgb(BAR_EMISSIVE),
                emissive_intensity: BAR_EMISSIVE_INTENSITY,
                roughness: 0.18,
                metalness: 0.78,
                opacity: 1.0,
            },
            rings,
            nodes,
            node_radius: NODE_RADIUS,
            node_material: Material {
                color: rgb(NODE_COLOR),
                emissive: rgb(NODE_EMISSIVE),
                emissive_intensity: NODE_EMISSIVE_INTENSITY,
                roughness: 0.25,
                metalness: 0.7,
                opacity: 1.0,
            },
            wave,
            wave_color: rgb(WAVE_COLOR),
            wave_opacity: WAVE_OPACITY,
            marker_radius: MARKER_RADIUS,
            marker_material: Material {
                color: rgb(MARKER_COLOR),
                emissive: rgb(MARKER_EMISSIVE),
                emissive_intensity: MARKER_EMISSIVE_INTENSITY,
                roughness: 0.22,
                metalness: 0.7,
                opacity: 1.0,
            },
            lights: Lights {
                ambient: rgb(AMBIENT_COLOR),
                ambient_intensity: AMBIENT_INTENSITY,
                key: PointLight {
                    color: rgb(KEY_LIGHT_COLOR),
                    intensity: KEY_LIGHT_INTENSITY,
                    range: KEY_LIGHT_RANGE,
                    position: Vec3::from(KEY_LIGHT_POSITION),
                },
                fill: PointLight {
                    color: rgb(FILL_LIGHT_COLOR),
                    intensity: FILL_LIGHT_INTENSITY,
                    range: FILL_LIGHT_RANGE,
                    position: Vec3::from(FILL_LIGHT_POSITION),
                },
                rim_color: rgb(RIM_LIGHT_COLOR),
                rim_intensity: RIM_LIGHT_INTENSITY,
                rim_direction: Vec3::from(RIM_LIGHT_POSITION).normalize(),
            },
            fog: Fog {
                color: rgb(FOG_COLOR),
                near: FOG_NEAR,
                far: FOG_FAR,
            },
        }
    }
}

impl SceneLayout {
    /// Model matrix of bar `index` at height `level` (1.0 = full height),
    /// keeping the bar's foot on the base line.
    pub fn bar_transform(&self, index: usize, level: f32) -> Mat4 {
        let base = self.bars[index];
        let center = Vec3::new(base.x, base.y + self.bar_size.y * level / 2.0, base.z);
        Mat4::from_translation(center) * Mat4::from_scale(Vec3::new(1.0, level, 1.0))
    }

    /// Rings are laid in the XZ plane, stood upright, then spun about their own axis.
    pub fn ring_transform(&self, spin: f32) -> Mat4 {
        Mat4::from_rotation_x(FRAC_PI_2) * Mat4::from_rotation_z(spin)
    }

    pub fn ground_transform(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, self.ground.y, 0.0))
    }

    pub fn node_transform(&self, index: usize, y: f32) -> Mat4 {
        let p = self.nodes[index];
        Mat4::from_translation(Vec3::new(p.x, y, p.z))
    }
}
