//! Bonnie Raster driver
//!
//! Usage: `bonnie-raster [scene.ron]`
//!
//! Renders one frame of the scene (or the default scene) and writes it to
//! the configured output image. Set `RUST_LOG=debug` for frame statistics.

mod preview;

use std::path::PathBuf;

use bonnie_raster::rasterizer::{Framebuffer, FrameStats, Transforms, TriangleMesh};
use bonnie_raster::world::{load_scene, save_framebuffer, Scene, SceneError};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), SceneError> {
    let scene = match std::env::args_os().nth(1) {
        Some(arg) => {
            let path = PathBuf::from(arg);
            let scene = load_scene(&path)?;
            log::info!("Loaded scene {}", path.display());
            scene
        }
        None => Scene::default(),
    };

    let mesh = scene.load_mesh()?;
    let transforms = scene.transforms()?;

    let mut fb = Framebuffer::new(scene.width, scene.height);
    fb.clear(scene.background);

    let stats = render(&scene, &mesh, &transforms, &mut fb);
    log::info!(
        "Rendered {} of {} faces ({} pixels)",
        stats.drawn,
        stats.faces,
        stats.pixels
    );

    save_framebuffer(&fb, &scene.output, scene.flip_vertical)?;
    log::info!("Wrote {}", scene.output.display());

    if scene.preview {
        preview::show(fb, scene.flip_vertical);
    }
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn render(scene: &Scene, mesh: &TriangleMesh, transforms: &Transforms, fb: &mut Framebuffer) -> FrameStats {
    use bonnie_raster::rasterizer::render_mesh_with;
    use indicatif::{ProgressBar, ProgressStyle};

    let bar = ProgressBar::new(mesh.faces.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} faces") {
        bar.set_style(style);
    }

    let stats = render_mesh_with(mesh, transforms, fb, scene.fill, &scene.settings, |done| {
        bar.set_position(done as u64)
    });
    bar.finish_and_clear();
    stats
}

#[cfg(target_arch = "wasm32")]
fn render(scene: &Scene, mesh: &TriangleMesh, transforms: &Transforms, fb: &mut Framebuffer) -> FrameStats {
    bonnie_raster::rasterizer::render_mesh(mesh, transforms, fb, scene.fill, &scene.settings)
}
