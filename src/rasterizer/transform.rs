//! Camera, projection and viewport matrices
//!
//! Each builder is a pure function of its arguments. The three matrices are
//! carried together in `Transforms` and handed to the rasterizer explicitly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::math::{Mat4, Vec3, Vec4};

/// Invalid camera or viewport parameters
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TransformError {
    #[error("camera eye and center coincide")]
    EyeAtCenter,
    #[error("camera up vector is parallel to the view direction")]
    DegenerateUp,
    #[error("perspective distance must be finite and non-zero (got {0})")]
    InvalidDistance(f64),
    #[error("viewport {w}x{h} has no area")]
    EmptyViewport { w: i32, h: i32 },
}

/// View matrix: world space into camera space.
///
/// Rotation rows are the camera basis (right, up, forward) with forward
/// pointing from `center` back towards `eye`, composed with a translation
/// by `-center`.
pub fn lookat(eye: Vec3, center: Vec3, up: Vec3) -> Result<Mat4, TransformError> {
    let n = (eye - center)
        .try_normalized()
        .ok_or(TransformError::EyeAtCenter)?;
    let l = up.cross(n).try_normalized().ok_or(TransformError::DegenerateUp)?;
    let m = n.cross(l).try_normalized().ok_or(TransformError::DegenerateUp)?;

    let rotation = Mat4::from_rows([
        [l.x(), l.y(), l.z(), 0.0],
        [m.x(), m.y(), m.z(), 0.0],
        [n.x(), n.y(), n.z(), 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);
    let translation = Mat4::from_rows([
        [1.0, 0.0, 0.0, -center.x()],
        [0.0, 1.0, 0.0, -center.y()],
        [0.0, 0.0, 1.0, -center.z()],
        [0.0, 0.0, 0.0, 1.0],
    ]);
    Ok(rotation * translation)
}

/// Perspective matrix for a camera `f` units away from its target.
/// Identity except `-1/f` in the w row, z column.
pub fn perspective(f: f64) -> Result<Mat4, TransformError> {
    if f == 0.0 || !f.is_finite() {
        return Err(TransformError::InvalidDistance(f));
    }
    let mut m = Mat4::identity();
    m[3][2] = -1.0 / f;
    Ok(m)
}

/// Maps NDC x,y in [-1,1] onto the pixel rectangle at (x, y) of size (w, h).
/// z passes through untouched.
pub fn viewport(x: i32, y: i32, w: i32, h: i32) -> Result<Mat4, TransformError> {
    if w <= 0 || h <= 0 {
        return Err(TransformError::EmptyViewport { w, h });
    }
    let (x, y, w, h) = (x as f64, y as f64, w as f64, h as f64);
    Ok(Mat4::from_rows([
        [w / 2.0, 0.0, 0.0, x + w / 2.0],
        [0.0, h / 2.0, 0.0, y + h / 2.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]))
}

/// Target pixel rectangle of the viewport transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl ViewportRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Centered rectangle covering 7/8 of the image, leaving a 1/16 margin
    pub fn inset(width: usize, height: usize) -> Self {
        let (width, height) = (width as i32, height as i32);
        Self {
            x: width / 16,
            y: height / 16,
            w: width * 7 / 8,
            h: height * 7 / 8,
        }
    }

    pub fn matrix(&self) -> Result<Mat4, TransformError> {
        viewport(self.x, self.y, self.w, self.h)
    }
}

/// Look-at camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
}

impl Camera {
    pub fn new(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        Self { eye, center, up }
    }

    /// Eye-to-target distance, used as the perspective parameter
    pub fn distance(&self) -> f64 {
        (self.eye - self.center).norm()
    }

    pub fn transforms(&self, rect: ViewportRect) -> Result<Transforms, TransformError> {
        Ok(Transforms {
            view: lookat(self.eye, self.center, self.up)?,
            projection: perspective(self.distance())?,
            viewport: rect.matrix()?,
        })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(-1.0, 0.0, 2.0),
            center: Vec3::ZERO,
            up: Vec3::UP,
        }
    }
}

/// Per-frame pipeline state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transforms {
    pub view: Mat4,
    pub projection: Mat4,
    pub viewport: Mat4,
}

impl Transforms {
    /// projection * view
    pub fn clip_matrix(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Object-space point into clip space
    pub fn to_clip(&self, p: Vec3) -> Vec4 {
        self.clip_matrix() * p.extend(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_lookat_basis() {
        let eye = Vec3::new(-1.0, 0.0, 2.0);
        let view = lookat(eye, Vec3::ZERO, Vec3::UP).unwrap();

        // Rotation rows stay orthonormal
        for i in 0..3 {
            let r = view[i].xyz();
            assert_abs_diff_eq!(r.norm(), 1.0, epsilon = 1e-12);
            for j in (i + 1)..3 {
                assert_abs_diff_eq!(r.dot(view[j].xyz()), 0.0, epsilon = 1e-12);
            }
        }

        // The eye ends up on the +z axis of camera space
        let cam = view * eye.extend(1.0);
        assert_abs_diff_eq!(cam, Vec4::new(0.0, 0.0, 5f64.sqrt(), 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_lookat_translates_by_center() {
        let center = Vec3::new(1.0, 2.0, 3.0);
        let view = lookat(Vec3::new(1.0, 2.0, 8.0), center, Vec3::UP).unwrap();
        assert_abs_diff_eq!(view * center.extend(1.0), Vec4::new(0.0, 0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_lookat_degenerate() {
        assert_eq!(
            lookat(Vec3::ZERO, Vec3::ZERO, Vec3::UP),
            Err(TransformError::EyeAtCenter)
        );
        assert_eq!(
            lookat(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, Vec3::UP),
            Err(TransformError::DegenerateUp)
        );
    }

    #[test]
    fn test_perspective() {
        let p = perspective(2.0).unwrap();
        let mut expected = Mat4::identity();
        expected[3][2] = -0.5;
        assert_eq!(p, expected);

        // Points at the target distance along -z get w = 2
        let v = p * Vec4::new(0.0, 0.0, -2.0, 1.0);
        assert_eq!(v.w(), 2.0);

        assert!(perspective(0.0).is_err());
        assert!(perspective(f64::NAN).is_err());
    }

    #[test]
    fn test_viewport_maps_ndc_cube() {
        let vp = viewport(50, 50, 700, 700).unwrap();
        assert_eq!(vp * Vec4::new(-1.0, -1.0, 0.3, 1.0), Vec4::new(50.0, 50.0, 0.3, 1.0));
        assert_eq!(vp * Vec4::new(1.0, 1.0, -0.7, 1.0), Vec4::new(750.0, 750.0, -0.7, 1.0));
        assert_eq!(vp * Vec4::new(0.0, 0.0, 0.0, 1.0), Vec4::new(400.0, 400.0, 0.0, 1.0));
        assert_eq!(viewport(0, 0, 0, 10), Err(TransformError::EmptyViewport { w: 0, h: 10 }));
    }

    #[test]
    fn test_inset_rect() {
        assert_eq!(ViewportRect::inset(800, 800), ViewportRect::new(50, 50, 700, 700));
    }

    #[test]
    fn test_camera_transforms() {
        let camera = Camera::default();
        assert_abs_diff_eq!(camera.distance(), 5f64.sqrt(), epsilon = 1e-12);

        let t = camera.transforms(ViewportRect::inset(800, 800)).unwrap();
        assert_eq!(t.clip_matrix(), t.projection * t.view);

        // The look-at target projects to the viewport center
        let clip = t.to_clip(Vec3::ZERO);
        let screen = t.viewport * (clip / clip.w());
        assert_abs_diff_eq!(screen.xy().x(), 400.0, epsilon = 1e-9);
        assert_abs_diff_eq!(screen.xy().y(), 400.0, epsilon = 1e-9);
    }
}
