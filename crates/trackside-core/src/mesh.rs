//! CPU-side geometry for the scene primitives.

use crate::scene::{Grid, Ring};
use glam::{Mat4, Vec3};
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    fn vertex(&mut self, p: Vec3, n: Vec3) -> u16 {
        self.vertices.push(MeshVertex {
            position: p.to_array(),
            normal: n.to_array(),
        });
        (self.vertices.len() - 1) as u16
    }
}

/// Flat disc in the XZ plane facing +Y.
pub fn disc(radius: f32, segments: u32) -> Mesh {
    let mut m = Mesh::default();
    let center = m.vertex(Vec3::ZERO, Vec3::Y);
    for s in 0..=segments {
        let a = s as f32 / segments as f32 * TAU;
        m.vertex(Vec3::new(a.cos() * radius, 0.0, -a.sin() * radius), Vec3::Y);
    }
    for s in 0..segments as u16 {
        m.indices.extend_from_slice(&[center, 1 + s, 2 + s]);
    }
    m
}

/// Axis-aligned box centred on the origin.
pub fn cuboid(size: Vec3) -> Mesh {
    let h = size / 2.0;
    let mut m = Mesh::default();
    // (normal, u axis, v axis) per face
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    for (n, u, v) in faces {
        let c = n * h;
        let du = u * h;
        let dv = v * h;
        let a = m.vertex(c - du - dv, n);
        let b = m.vertex(c + du - dv, n);
        let cc = m.vertex(c + du + dv, n);
        let d = m.vertex(c - du + dv, n);
        m.indices.extend_from_slice(&[a, b, cc, a, cc, d]);
    }
    m
}

pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let mut m = Mesh::default();
    for y in 0..=height_segments {
        let v = y as f32 / height_segments as f32;
        let theta = v * PI;
        for x in 0..=width_segments {
            let u = x as f32 / width_segments as f32;
            let phi = u * TAU;
            let n = Vec3::new(-phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin());
            m.vertex(n * radius, n);
        }
    }
    let row = width_segments as u16 + 1;
    for y in 0..height_segments as u16 {
        for x in 0..width_segments as u16 {
            let a = y * row + x + 1;
            let b = y * row + x;
            let c = (y + 1) * row + x;
            let d = (y + 1) * row + x + 1;
            if y != 0 {
                m.indices.extend_from_slice(&[a, b, d]);
            }
            if y + 1 != height_segments as u16 {
                m.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    m
}

/// Square grid as a line list, centre lines highlighted.
pub fn grid_lines(grid: &Grid) -> Vec<LineVertex> {
    let half = grid.size / 2.0;
    let step = grid.size / grid.divisions as f32;
    let center = grid.divisions / 2;
    let mut out = Vec::with_capacity((grid.divisions as usize + 1) * 4);
    for i in 0..=grid.divisions {
        let k = -half + i as f32 * step;
        let rgb = if i == center {
            grid.center_color
        } else {
            grid.line_color
        };
        let color = [rgb[0], rgb[1], rgb[2], grid.opacity];
        out.push(line_vertex(Vec3::new(-half, grid.y, k), color));
        out.push(line_vertex(Vec3::new(half, grid.y, k), color));
        out.push(line_vertex(Vec3::new(k, grid.y, -half), color));
        out.push(line_vertex(Vec3::new(k, grid.y, half), color));
    }
    out
}

/// Closed ring as a line list after applying `transform`.
pub fn ring_lines(ring: &Ring, transform: Mat4, opacity: f32, out: &mut Vec<LineVertex>) {
    let color = [ring.color[0], ring.color[1], ring.color[2], opacity];
    let point = |s: u32| {
        let a = s as f32 / ring.segments as f32 * TAU;
        transform.transform_point3(Vec3::new(a.cos() * ring.radius, ring.y, a.sin() * ring.radius))
    };
    let mut prev = point(0);
    for s in 1..=ring.segments {
        let next = point(s);
        out.push(line_vertex(prev, color));
        out.push(line_vertex(next, color));
        prev = next;
    }
}

/// Open polyline as a line list.
pub fn polyline(points: &[Vec3], color: [f32; 4], out: &mut Vec<LineVertex>) {
    for pair in points.windows(2) {
        out.push(line_vertex(pair[0], color));
        out.push(line_vertex(pair[1], color));
    }
}

#[inline]
fn line_vertex(p: Vec3, color: [f32; 4]) -> LineVertex {
    LineVertex {
        position: p.to_array(),
        color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneLayout;

    #[test]
    fn cuboid_has_six_quads() {
        let m = cuboid(Vec3::new(2.0, 4.0, 2.0));
        assert_eq!(m.vertices.len(), 24);
        assert_eq!(m.indices.len(), 36);
        let max_y = m.vertices.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert_eq!(max_y, 2.0);
    }

    #[test]
    fn sphere_vertices_sit_on_radius() {
        let m = uv_sphere(1.35, 16, 16);
        assert_eq!(m.vertices.len(), 17 * 17);
        for v in &m.vertices {
            let r = Vec3::from(v.position).length();
            assert!((r - 1.35).abs() < 1e-4);
        }
        assert!(m.indices.iter().all(|&i| (i as usize) < m.vertices.len()));
    }

    #[test]
    fn disc_fans_around_centre() {
        let m = disc(120.0, 64);
        assert_eq!(m.vertices.len(), 66);
        assert_eq!(m.indices.len(), 64 * 3);
    }

    #[test]
    fn grid_line_count() {
        let layout = SceneLayout::default();
        let lines = grid_lines(&layout.grid);
        assert_eq!(lines.len(), 27 * 4);
    }

    #[test]
    fn ring_is_closed() {
        let layout = SceneLayout::default();
        let mut out = Vec::new();
        ring_lines(&layout.rings[0], Mat4::IDENTITY, 0.28, &mut out);
        assert_eq!(out.len(), 240);
        let first = Vec3::from(out[0].position);
        let last = Vec3::from(out[out.len() - 1].position);
        assert!((first - last).length() < 1e-3);
    }
}
