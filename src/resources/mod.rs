//! Pipeline-owned resources
//!
//! Proxy meshes rasterized for lights and probes, and the fixed material set.

mod material;
mod mesh;

pub use material::*;
pub use mesh::*;
