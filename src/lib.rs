//! Classic Deferred - a deferred lighting render pipeline for host engines
//!
//! The pipeline doesn't own a GPU device. Each frame it asks a [`RenderHost`]
//! for culling results and records named command buffers for the host to
//! execute:
//! - Shadow constants packed into fixed-size shader arrays
//! - G-buffer allocation and the opaque geometry fill
//! - Per-light additive lighting through quads or proxy volumes
//! - Reflection probes blended back to front over the default probe
//! - Skybox and the final blit to the camera target
//!
//! The in-memory [`RecordingHost`] implements the host side for tests and
//! tooling.

pub mod backend;
pub mod error;
pub mod pipeline;
pub mod render_graph;
pub mod resources;
pub mod scene;

pub use backend::{HostCapabilities, HostError, HostResult, RecordingHost, RenderHost};
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{
    ClassicDeferredPipeline, FrameReport, PipelineConfig, ShadowOutput, ShadowRenderer,
    ShadowSettings, StaticShadows,
};
pub use render_graph::{Command, CommandBuffer};
pub use scene::{Camera, CameraId, Scene};
