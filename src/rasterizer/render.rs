//! Core rendering functions
//! Triangle scan conversion with depth buffering and backface culling

use rayon::prelude::*;

use super::math::{Mat3, Mat4, Vec3, Vec4};
use super::transform::Transforms;
use super::types::{Color, Mesh, RasterSettings};

/// Depth value meaning "no surface seen yet"
pub const DEPTH_CLEAR: f64 = f64::MIN;

/// Screen-space area matrices with a determinant below this are culled.
/// Rejects back faces and slivers covering less than about a pixel.
pub const MIN_TRIANGLE_AREA: f64 = 1.0;

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>,   // RGBA, 4 bytes per pixel
    pub zbuffer: Vec<f64>, // Depth buffer, larger wins
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![DEPTH_CLEAR; width * height],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        self.zbuffer.fill(DEPTH_CLEAR);
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        let idx = (y * self.width + x) * 4;
        let mut bytes = [0; 4];
        bytes.copy_from_slice(&self.pixels[idx..idx + 4]);
        Color::from_bytes(bytes)
    }

    pub fn depth(&self, x: usize, y: usize) -> f64 {
        self.zbuffer[y * self.width + x]
    }

    /// Write `color` if `z` is strictly greater than the stored depth.
    /// Returns whether the pixel was written.
    pub fn test_and_set(&mut self, x: usize, y: usize, z: f64, color: Color) -> bool {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            if z > self.zbuffer[idx] {
                self.zbuffer[idx] = z;
                self.pixels[idx * 4..idx * 4 + 4].copy_from_slice(&color.to_bytes());
                return true;
            }
        }
        false
    }

    /// Mutable pixel and depth storage for rows `y0..=y1`
    fn rows_mut(&mut self, y0: usize, y1: usize) -> (&mut [u8], &mut [f64]) {
        let (start, end) = (y0 * self.width, (y1 + 1) * self.width);
        (
            &mut self.pixels[start * 4..end * 4],
            &mut self.zbuffer[start..end],
        )
    }
}

/// Why a triangle produced no pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullReason {
    /// A vertex has w == 0 or non-finite coordinates
    InvalidVertex,
    /// Back-facing, or smaller than `MIN_TRIANGLE_AREA`
    Backface,
    /// Bounding box lies entirely off screen
    Offscreen,
}

/// Result of rasterizing one triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleOutcome {
    Drawn { pixels: usize },
    Culled(CullReason),
}

/// Per-frame counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub faces: usize,
    pub drawn: usize,
    pub culled: usize,
    pub pixels: usize,
}

impl FrameStats {
    fn record(&mut self, outcome: TriangleOutcome) {
        self.faces += 1;
        match outcome {
            TriangleOutcome::Drawn { pixels } => {
                self.drawn += 1;
                self.pixels += pixels;
            }
            TriangleOutcome::Culled(_) => self.culled += 1,
        }
    }
}

/// Inputs shared by every pixel of one triangle
struct Coverage {
    /// Left-multiplying (x, y, 1) gives barycentric coordinates
    barycentric: Mat3,
    /// NDC depth of each vertex
    depths: Vec3,
    color: Color,
}

impl Coverage {
    /// Shade pixels `x0..=x1` of row `y`. Returns the number written.
    fn fill_span(&self, y: usize, x0: usize, x1: usize, row: &mut [u8], depth: &mut [f64]) -> usize {
        let bytes = self.color.to_bytes();
        let mut written = 0;
        for x in x0..=x1 {
            let bc = self.barycentric * Vec3::new(x as f64, y as f64, 1.0);
            if bc.x() < 0.0 || bc.y() < 0.0 || bc.z() < 0.0 {
                continue;
            }
            let z = bc.dot(self.depths);
            if z <= depth[x] {
                continue;
            }
            depth[x] = z;
            row[x * 4..x * 4 + 4].copy_from_slice(&bytes);
            written += 1;
        }
        written
    }
}

/// Rasterize a single clip-space triangle with a flat color
pub fn rasterize(
    clip: &[Vec4; 3],
    viewport: &Mat4,
    fb: &mut Framebuffer,
    color: Color,
    settings: &RasterSettings,
) -> TriangleOutcome {
    if clip.iter().any(|v| v.w() == 0.0 || !v.is_finite()) {
        return TriangleOutcome::Culled(CullReason::InvalidVertex);
    }

    // Normalized device coordinates
    let ndc = clip.map(|v| v / v.w());
    let screen = ndc.map(|v| (*viewport * v).xy());

    // Twice the signed screen area
    let abc = Mat3::from_rows(screen.map(|s| [s.x(), s.y(), 1.0]));
    let area = abc.det();
    if area.is_nan() || area < MIN_TRIANGLE_AREA {
        return TriangleOutcome::Culled(CullReason::Backface);
    }
    let Some(barycentric) = abc.invert_transpose() else {
        return TriangleOutcome::Culled(CullReason::Backface);
    };

    if fb.width == 0 || fb.height == 0 {
        return TriangleOutcome::Culled(CullReason::Offscreen);
    }

    // Bounding box clipped by the screen
    let (min_x, max_x) = min_max(screen.map(|s| s.x()));
    let (min_y, max_y) = min_max(screen.map(|s| s.y()));
    let x0 = (min_x as i64).max(0);
    let x1 = (max_x as i64).min(fb.width as i64 - 1);
    let y0 = (min_y as i64).max(0);
    let y1 = (max_y as i64).min(fb.height as i64 - 1);
    if x0 > x1 || y0 > y1 {
        return TriangleOutcome::Culled(CullReason::Offscreen);
    }
    let (x0, x1, y0, y1) = (x0 as usize, x1 as usize, y0 as usize, y1 as usize);

    let coverage = Coverage {
        barycentric,
        depths: Vec3::new(ndc[0].z(), ndc[1].z(), ndc[2].z()),
        color,
    };

    let width = fb.width;
    let (pixels, depth) = fb.rows_mut(y0, y1);

    // Each row is owned by exactly one worker, so depth/color pairs never race
    let written: usize = if settings.parallel {
        pixels
            .par_chunks_mut(width * 4)
            .zip(depth.par_chunks_mut(width))
            .enumerate()
            .map(|(i, (row, zrow))| coverage.fill_span(y0 + i, x0, x1, row, zrow))
            .sum()
    } else {
        pixels
            .chunks_mut(width * 4)
            .zip(depth.chunks_mut(width))
            .enumerate()
            .map(|(i, (row, zrow))| coverage.fill_span(y0 + i, x0, x1, row, zrow))
            .sum()
    };

    TriangleOutcome::Drawn { pixels: written }
}

fn min_max(values: [f64; 3]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Render every face of a mesh in face order
pub fn render_mesh<M: Mesh + ?Sized>(
    mesh: &M,
    transforms: &Transforms,
    fb: &mut Framebuffer,
    color: Color,
    settings: &RasterSettings,
) -> FrameStats {
    render_mesh_with(mesh, transforms, fb, color, settings, |_| {})
}

/// Like `render_mesh`, calling `on_face` with the number of faces processed so far
pub fn render_mesh_with<M, F>(
    mesh: &M,
    transforms: &Transforms,
    fb: &mut Framebuffer,
    color: Color,
    settings: &RasterSettings,
    mut on_face: F,
) -> FrameStats
where
    M: Mesh + ?Sized,
    F: FnMut(usize),
{
    let clip_matrix = transforms.clip_matrix();
    let mut stats = FrameStats::default();

    for face in 0..mesh.face_count() {
        let clip = [0, 1, 2].map(|corner| clip_matrix * mesh.vertex(face, corner).extend(1.0));
        let outcome = rasterize(&clip, &transforms.viewport, fb, color, settings);
        if let TriangleOutcome::Culled(reason) = outcome {
            log::trace!("face {} culled: {:?}", face, reason);
        }
        stats.record(outcome);
        on_face(face + 1);
    }

    log::debug!(
        "frame: {} faces, {} drawn, {} culled, {} pixels written",
        stats.faces,
        stats.drawn,
        stats.culled,
        stats.pixels
    );
    stats
}
