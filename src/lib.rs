//! Bonnie Raster: CPU triangle rasterizer
//!
//! Turns a triangle mesh into a flat-filled, depth-tested image without any
//! graphics hardware. `rasterizer` holds the transform and scan-conversion
//! core; `world` holds scene configuration, mesh loading and image output.

pub mod rasterizer;
pub mod world;

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
