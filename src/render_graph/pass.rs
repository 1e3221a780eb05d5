//! Render pass definitions for the frame graph

use crate::backend::traits::{HostCapabilities, ReflectionDefaults};
use crate::pipeline::{
    DeferredMaterials, GBufferLayout, PipelineConfig, ProxyMeshes, ShadowConstants,
};
use crate::render_graph::command::CommandBuffer;
use crate::scene::{Camera, CullResults};

/// Everything a pass may read while recording one camera
pub struct PassContext<'a> {
    pub camera: &'a Camera,
    pub cull: &'a CullResults,
    pub shadows: &'a ShadowConstants,
    pub materials: &'a DeferredMaterials,
    pub meshes: &'a ProxyMeshes,
    pub config: &'a PipelineConfig,
    pub capabilities: &'a HostCapabilities,
    pub gbuffer: &'a GBufferLayout,
    pub default_reflection: ReflectionDefaults,
}

impl<'a> PassContext<'a> {
    /// Camera viewport in pixels
    pub fn screen_size(&self) -> (u32, u32) {
        (self.camera.pixel_width, self.camera.pixel_height)
    }
}

/// Trait for render passes
pub trait RenderPass: Send + Sync {
    /// Get the pass name, also used as the command buffer name
    fn name(&self) -> &str;

    /// Whether the pass records anything for this camera
    fn is_enabled(&self, _ctx: &PassContext) -> bool {
        true
    }

    /// Record the pass commands
    fn record(&self, ctx: &PassContext, cmd: &mut CommandBuffer);
}
