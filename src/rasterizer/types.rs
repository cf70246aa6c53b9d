//! Core types for the rasterizer

use serde::{Deserialize, Serialize};

use super::math::Vec3;

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::with_alpha(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

/// Source of triangle faces in object space
pub trait Mesh {
    fn face_count(&self) -> usize;

    /// Position of `corner` (0, 1 or 2) of face `face`
    fn vertex(&self, face: usize, corner: usize) -> Vec3;
}

/// A triangle face (indices into vertex array)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
}

impl Face {
    pub fn new(v0: usize, v1: usize, v2: usize) -> Self {
        Self { v0, v1, v2 }
    }

    pub fn corner(&self, i: usize) -> usize {
        match i {
            0 => self.v0,
            1 => self.v1,
            2 => self.v2,
            _ => panic!("triangle corner {} out of range", i),
        }
    }
}

/// Indexed triangle mesh
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
}

impl TriangleMesh {
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    /// Unit cube centered on the origin, counter-clockwise faces seen from outside
    pub fn cube() -> Self {
        let vertices = vec![
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(0.5, 0.5, -0.5),
            Vec3::new(-0.5, 0.5, -0.5),
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(-0.5, 0.5, 0.5),
        ];

        // Two triangles per side
        let quads = [
            [4, 5, 6, 7], // Front (+z)
            [1, 0, 3, 2], // Back (-z)
            [3, 7, 6, 2], // Top (+y)
            [0, 1, 5, 4], // Bottom (-y)
            [5, 1, 2, 6], // Right (+x)
            [0, 4, 7, 3], // Left (-x)
        ];
        let faces = quads
            .iter()
            .flat_map(|q| [Face::new(q[0], q[1], q[2]), Face::new(q[0], q[2], q[3])])
            .collect();

        Self { vertices, faces }
    }
}

impl Mesh for TriangleMesh {
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn vertex(&self, face: usize, corner: usize) -> Vec3 {
        self.vertices[self.faces[face].corner(corner)]
    }
}

/// Rasterizer settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterSettings {
    /// Split each triangle's pixel rows across worker threads
    pub parallel: bool,
}
