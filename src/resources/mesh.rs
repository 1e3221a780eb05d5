//! Proxy mesh data and generation
//!
//! Lights and reflection probes are rasterized through coarse proxy meshes.
//! Volume meshes must fully enclose the shape they stand in for, so the
//! tessellated sphere and cone push their vertices out far enough that every
//! face lies outside the ideal surface.

use crate::backend::types::Vertex;
use glam::{Vec2, Vec3, Vec4};
use std::f32::consts::PI;

/// A mesh with vertex and index data
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub name: String,
}

impl Mesh {
    pub fn new(name: &str) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            name: name.to_string(),
        }
    }

    /// Calculate vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Calculate triangle count
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get vertex data as bytes
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Get index data as bytes
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Largest distance of any vertex from the origin
    pub fn bounding_radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| v.position.length())
            .fold(0.0, f32::max)
    }

    /// Quad covering [-1, 1] on XY, used for full-screen light and probe passes
    pub fn fullscreen_quad() -> Self {
        let mut mesh = Mesh::new("fullscreen_quad");
        let corners = [
            (Vec3::new(-1.0, -1.0, 0.0), Vec2::new(0.0, 1.0)),
            (Vec3::new(1.0, -1.0, 0.0), Vec2::new(1.0, 1.0)),
            (Vec3::new(1.0, 1.0, 0.0), Vec2::new(1.0, 0.0)),
            (Vec3::new(-1.0, 1.0, 0.0), Vec2::new(0.0, 0.0)),
        ];
        for (position, uv) in corners {
            mesh.vertices.push(Vertex::new(position, Vec3::NEG_Z, uv));
        }
        mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
        mesh
    }

    /// Create a unit cube centered at origin
    pub fn cube() -> Self {
        let mut mesh = Mesh::new("cube");

        let faces = [
            (Vec3::Z, Vec3::X),
            (Vec3::NEG_Z, Vec3::NEG_X),
            (Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_X, Vec3::Z),
            (Vec3::Y, Vec3::X),
            (Vec3::NEG_Y, Vec3::X),
        ];

        for (normal, right) in faces {
            let up = normal.cross(right);
            let base = mesh.vertices.len() as u32;
            let corners = [
                (-0.5, -0.5, Vec2::new(0.0, 1.0)),
                (0.5, -0.5, Vec2::new(1.0, 1.0)),
                (0.5, 0.5, Vec2::new(1.0, 0.0)),
                (-0.5, 0.5, Vec2::new(0.0, 0.0)),
            ];
            for (u, v, uv) in corners {
                let position = normal * 0.5 + right * u + up * v;
                mesh.vertices.push(Vertex {
                    position,
                    normal,
                    uv,
                    tangent: right.extend(1.0),
                });
            }
            mesh.indices.extend_from_slice(&[
                base,
                base + 1,
                base + 2,
                base,
                base + 2,
                base + 3,
            ]);
        }

        mesh
    }

    /// UV sphere enclosing a sphere of radius 0.5
    pub fn sphere(segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);
        let mut mesh = Mesh::new("sphere");

        let segment_angle = 2.0 * PI / segments as f32;
        let ring_angle = PI / rings as f32;

        for ring in 0..=rings {
            let phi = ring as f32 * ring_angle;
            let y = phi.cos();
            let ring_radius = phi.sin();

            for segment in 0..=segments {
                let theta = segment as f32 * segment_angle;
                let x = ring_radius * theta.cos();
                let z = ring_radius * theta.sin();

                let normal = Vec3::new(x, y, z).normalize_or_zero();
                let uv = Vec2::new(
                    segment as f32 / segments as f32,
                    ring as f32 / rings as f32,
                );
                let tangent = Vec3::new(-theta.sin(), 0.0, theta.cos());

                mesh.vertices.push(Vertex {
                    position: Vec3::new(x, y, z),
                    normal,
                    uv,
                    tangent: tangent.extend(1.0),
                });
            }
        }

        for ring in 0..rings {
            for segment in 0..segments {
                let current = ring * (segments + 1) + segment;
                let next = current + segments + 1;

                // Counter-clockwise seen from outside, like the cube and cone
                mesh.indices.extend_from_slice(&[
                    current,
                    current + 1,
                    next,
                    current + 1,
                    next + 1,
                    next,
                ]);
            }
        }

        // Push every face plane out to at least radius 0.5
        let inner = mesh.min_face_distance();
        let scale = if inner > 0.0 { 0.5 / inner } else { 0.5 };
        for vertex in &mut mesh.vertices {
            vertex.position *= scale;
        }

        mesh
    }

    /// Smallest distance from the origin to the plane of any non-degenerate triangle
    fn min_face_distance(&self) -> f32 {
        self.indices
            .chunks_exact(3)
            .filter_map(|tri| {
                let a = self.vertices[tri[0] as usize].position;
                let b = self.vertices[tri[1] as usize].position;
                let c = self.vertices[tri[2] as usize].position;
                let normal = (b - a).cross(c - a);
                (normal.length_squared() > 1e-10).then(|| normal.normalize().dot(a).abs())
            })
            .fold(f32::MAX, f32::min)
    }

    /// Cone with its apex at the origin opening along +Z, enclosing a circle
    /// of radius 1 at z = 1
    pub fn cone(segments: u32) -> Self {
        let segments = segments.max(3);
        let mut mesh = Mesh::new("cone");

        let angle_step = 2.0 * PI / segments as f32;
        let base_radius = 1.0 / (angle_step * 0.5).cos();

        let apex = mesh.vertices.len() as u32;
        mesh.vertices.push(Vertex::new(Vec3::ZERO, Vec3::NEG_Z, Vec2::new(0.5, 0.0)));

        // Side ring
        let side_start = mesh.vertices.len() as u32;
        for i in 0..segments {
            let angle = i as f32 * angle_step;
            let (sin, cos) = angle.sin_cos();
            let normal = Vec3::new(cos, sin, -base_radius).normalize();
            mesh.vertices.push(Vertex {
                position: Vec3::new(cos * base_radius, sin * base_radius, 1.0),
                normal,
                uv: Vec2::new(i as f32 / segments as f32, 1.0),
                tangent: Vec4::new(-sin, cos, 0.0, 1.0),
            });
        }

        // Cap ring and center
        let cap_center = mesh.vertices.len() as u32;
        mesh.vertices
            .push(Vertex::new(Vec3::Z, Vec3::Z, Vec2::new(0.5, 0.5)));
        let cap_start = mesh.vertices.len() as u32;
        for i in 0..segments {
            let angle = i as f32 * angle_step;
            let (sin, cos) = angle.sin_cos();
            mesh.vertices.push(Vertex::new(
                Vec3::new(cos * base_radius, sin * base_radius, 1.0),
                Vec3::Z,
                Vec2::new(0.5 + cos * 0.5, 0.5 + sin * 0.5),
            ));
        }

        for i in 0..segments {
            let next = (i + 1) % segments;
            mesh.indices
                .extend_from_slice(&[apex, side_start + next, side_start + i]);
            mesh.indices
                .extend_from_slice(&[cap_center, cap_start + i, cap_start + next]);
        }

        mesh
    }
}
