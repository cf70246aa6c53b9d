//! Software triangle rasterizer
//!
//! Everything runs on the CPU:
//! - Fixed-size vector/matrix algebra with cofactor inverses
//! - Look-at, perspective and viewport transforms
//! - Bounding-box scan conversion with barycentric coverage
//! - Depth buffer (larger NDC z wins) and backface culling

mod math;
mod render;
mod transform;
mod types;

pub use math::*;
pub use render::*;
pub use transform::*;
pub use types::*;

/// Default image dimensions
pub const WIDTH: usize = 800;
pub const HEIGHT: usize = 800;
