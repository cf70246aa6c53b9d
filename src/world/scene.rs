//! Scene loading and saving
//!
//! A scene is a RON file describing the camera, image size, mesh and output.
//! Every field is optional; missing ones take the defaults below.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::obj::{load_obj, ObjError};
use crate::rasterizer::{
    Camera, Color, RasterSettings, TransformError, Transforms, TriangleMesh, Vec3, ViewportRect,
    HEIGHT, WIDTH,
};

/// Error type for scene setup
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("Mesh error: {0}")]
    Mesh(#[from] ObjError),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Camera error: {0}")]
    Transform(#[from] TransformError),
    #[error("image size {0}x{1} has no pixels")]
    EmptyImage(usize, usize),
}

/// Look-at camera parameters as stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f64; 3],
    pub center: [f64; 3],
    pub up: [f64; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Camera::default().into()
    }
}

impl From<Camera> for CameraConfig {
    fn from(c: Camera) -> Self {
        Self {
            eye: c.eye.into(),
            center: c.center.into(),
            up: c.up.into(),
        }
    }
}

impl From<CameraConfig> for Camera {
    fn from(c: CameraConfig) -> Self {
        Camera::new(Vec3::from(c.eye), Vec3::from(c.center), Vec3::from(c.up))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub width: usize,
    pub height: usize,
    pub camera: CameraConfig,
    /// Pixel rectangle for NDC; `None` leaves a 1/16 margin on each side
    pub viewport: Option<ViewportRect>,
    /// OBJ mesh; `None` renders the built-in cube
    pub mesh: Option<PathBuf>,
    pub output: PathBuf,
    pub fill: Color,
    pub background: Color,
    /// Put framebuffer row 0 at the bottom of the written image
    pub flip_vertical: bool,
    pub settings: RasterSettings,
    /// Show the result in a window after rendering
    pub preview: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            camera: CameraConfig::default(),
            viewport: None,
            mesh: None,
            output: PathBuf::from("framebuffer.png"),
            fill: Color::WHITE,
            background: Color::BLACK,
            flip_vertical: true,
            settings: RasterSettings::default(),
            preview: false,
        }
    }
}

impl Scene {
    pub fn viewport_rect(&self) -> ViewportRect {
        self.viewport
            .unwrap_or_else(|| ViewportRect::inset(self.width, self.height))
    }

    /// View, projection and viewport matrices for this scene
    pub fn transforms(&self) -> Result<Transforms, SceneError> {
        if self.width == 0 || self.height == 0 {
            return Err(SceneError::EmptyImage(self.width, self.height));
        }
        Ok(Camera::from(self.camera).transforms(self.viewport_rect())?)
    }

    pub fn load_mesh(&self) -> Result<TriangleMesh, SceneError> {
        match &self.mesh {
            Some(path) => {
                let mesh = load_obj(path)?;
                log::info!(
                    "Loaded mesh {} ({} vertices, {} faces)",
                    path.display(),
                    mesh.vertices.len(),
                    mesh.faces.len()
                );
                Ok(mesh)
            }
            None => {
                log::info!("No mesh configured, using built-in cube");
                Ok(TriangleMesh::cube())
            }
        }
    }
}

/// Load a scene from a RON file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, SceneError> {
    let contents = fs::read_to_string(path)?;
    load_scene_from_str(&contents)
}

/// Load a scene from a RON string
pub fn load_scene_from_str(s: &str) -> Result<Scene, SceneError> {
    Ok(ron::from_str(s)?)
}

/// Save a scene to a RON file
pub fn save_scene<P: AsRef<Path>>(scene: &Scene, path: P) -> Result<(), SceneError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(3)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(scene, config)?;
    fs::write(path, contents)?;
    Ok(())
}
