//! World-facing collaborators of the rasterizer
//!
//! - Scene configuration in RON (Rusty Object Notation)
//! - Wavefront OBJ mesh loading
//! - Writing the framebuffer to an image file

mod obj;
mod output;
mod scene;

pub use obj::*;
pub use output::*;
pub use scene::*;
