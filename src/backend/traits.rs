//! Host abstraction traits
//!
//! The pipeline never talks to a GPU directly. Everything it needs from the
//! engine that hosts it (culling, resource creation, command execution) goes
//! through [`RenderHost`].

use crate::backend::types::*;
use crate::render_graph::CommandBuffer;
use crate::resources::Mesh;
use crate::scene::{Camera, CullResults, CullingParameters};
use glam::Vec4;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Host error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("Failed to create material: {0}")]
    MaterialCreationFailed(String),
    #[error("Failed to create mesh: {0}")]
    MeshCreationFailed(String),
    #[error("Failed to execute command buffer '{buffer}': {reason}")]
    ExecutionFailed { buffer: String, reason: String },
    #[error("Failed to submit frame: {0}")]
    SubmitFailed(String),
}

pub type HostResult<T> = Result<T, HostError>;

/// Handle to a host mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshHandle(pub u64);

/// Handle to a host texture (2D or cube)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u64);

/// Handle to a host shader program
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShaderHandle(pub u64);

/// Handle to a host material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u64);

/// Material descriptor: a shader plus fixed-function state
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDescriptor {
    pub label: String,
    pub shader: ShaderHandle,
    pub state: RenderState,
}

/// Capabilities resolved once when the pipeline is built
#[derive(Debug, Clone, PartialEq)]
pub struct HostCapabilities {
    /// Whether depth can be read back from the framebuffer inside the pass
    /// that wrote it. When false the pipeline copies depth explicitly.
    pub in_pass_depth_read: bool,
    /// Render texture formats the host can allocate
    pub render_texture_formats: Vec<TextureFormat>,
}

impl HostCapabilities {
    pub fn supports_format(&self, format: TextureFormat) -> bool {
        self.render_texture_formats.contains(&format)
    }
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            in_pass_depth_read: true,
            render_texture_formats: vec![
                TextureFormat::Rgba8Unorm,
                TextureFormat::Rgb10A2Unorm,
                TextureFormat::Rgba16Float,
                TextureFormat::R32Float,
                TextureFormat::Depth,
            ],
        }
    }
}

/// The scene's default environment reflection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectionDefaults {
    pub cubemap: TextureHandle,
    pub hdr_decode: Vec4,
}

/// Engine hosting the pipeline
pub trait RenderHost {
    /// Capabilities of the host device
    fn capabilities(&self) -> HostCapabilities;

    /// Culling parameters for a camera, `None` when the camera can't be culled
    fn culling_parameters(&self, camera: &Camera) -> Option<CullingParameters>;

    /// Cull the scene
    fn cull(&mut self, params: &CullingParameters) -> CullResults;

    /// Default reflection probe used as the base reflection layer
    fn default_reflection(&self) -> ReflectionDefaults;

    // Resource creation

    /// Create a material
    fn create_material(&mut self, desc: &MaterialDescriptor) -> HostResult<MaterialHandle>;

    /// Destroy a material
    fn destroy_material(&mut self, material: MaterialHandle);

    /// Upload a mesh
    fn create_mesh(&mut self, mesh: &Mesh) -> HostResult<MeshHandle>;

    /// Release an uploaded mesh
    fn destroy_mesh(&mut self, mesh: MeshHandle);

    // Command execution

    /// Queue a recorded command buffer for execution
    fn execute_command_buffer(&mut self, buffer: CommandBuffer) -> HostResult<()>;

    /// Submit all queued work for the frame
    fn submit(&mut self) -> HostResult<()>;
}
