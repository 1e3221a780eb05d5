//! G-Buffer setup and geometry fill for deferred rendering
//!
//! Allocates the per-camera targets as frame temporaries, binds them as MRT:
//! - Albedo (RGBA8)
//! - Specular / roughness (RGBA8)
//! - World-space normals (RGB10A2 when available)
//! - Emission, the lighting accumulation target (HDR)
//! - Linear view depth (R32F), only when depth can be read in-pass
//!
//! and then lets the host draw its opaque renderers into them.

use crate::backend::traits::HostCapabilities;
use crate::backend::types::*;
use crate::render_graph::*;

pub const GBUFFER_ALBEDO: ResourceId = ResourceId::new("_CameraGBufferTexture0");
pub const GBUFFER_SPEC_ROUGH: ResourceId = ResourceId::new("_CameraGBufferTexture1");
pub const GBUFFER_NORMAL: ResourceId = ResourceId::new("_CameraGBufferTexture2");
pub const GBUFFER_EMISSION: ResourceId = ResourceId::new("_CameraGBufferTexture3");
pub const GBUFFER_Z: ResourceId = ResourceId::new("_CameraGBufferZ");
pub const CAMERA_DEPTH_TEXTURE: ResourceId = ResourceId::new("_CameraDepthTexture");
pub const CAMERA_TARGET: ResourceId = ResourceId::new("_CameraTarget");
pub const CAMERA_VP_DEPTH: ResourceId = ResourceId::new("_CameraVPDepth");

/// Shader pass tag drawn by the geometry fill
pub const DEFERRED_SHADER_PASS: &str = "Deferred";

/// Target formats resolved once from the host capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GBufferLayout {
    pub normal_format: TextureFormat,
    pub hdr_format: TextureFormat,
    /// Linear depth is written as a fifth color target
    pub linear_depth_target: bool,
}

impl GBufferLayout {
    pub fn resolve(capabilities: &HostCapabilities) -> Self {
        let normal_format = if capabilities.supports_format(TextureFormat::Rgb10A2Unorm) {
            TextureFormat::Rgb10A2Unorm
        } else {
            TextureFormat::Rgba8Unorm
        };
        Self {
            normal_format,
            hdr_format: TextureFormat::Rgba16Float,
            linear_depth_target: capabilities.in_pass_depth_read,
        }
    }

    /// Temporaries acquired for one camera, in acquisition order
    pub fn targets(&self, width: u32, height: u32) -> Vec<(ResourceId, TemporaryTargetDesc)> {
        let color =
            |format, color_space| TemporaryTargetDesc::color(width, height, format, color_space);

        let mut targets = vec![
            (GBUFFER_ALBEDO, color(TextureFormat::Rgba8Unorm, ColorSpace::Default)),
            (GBUFFER_SPEC_ROUGH, color(TextureFormat::Rgba8Unorm, ColorSpace::Default)),
            (GBUFFER_NORMAL, color(self.normal_format, ColorSpace::Linear)),
            (GBUFFER_EMISSION, color(self.hdr_format, ColorSpace::Linear)),
            (CAMERA_DEPTH_TEXTURE, TemporaryTargetDesc::depth(width, height)),
            (
                CAMERA_TARGET,
                color(self.hdr_format, ColorSpace::Default).with_random_write(),
            ),
            (GBUFFER_Z, TemporaryTargetDesc::depth(width, height)),
        ];
        if self.linear_depth_target {
            targets.push((
                CAMERA_VP_DEPTH,
                color(TextureFormat::R32Float, ColorSpace::Default).with_depth_bits(24),
            ));
        }
        targets
    }

    /// Color attachments bound while filling the G-buffer
    pub fn color_attachments(&self) -> Vec<RenderTarget> {
        let mut attachments = vec![
            GBUFFER_ALBEDO.into(),
            GBUFFER_SPEC_ROUGH.into(),
            GBUFFER_NORMAL.into(),
            GBUFFER_EMISSION.into(),
        ];
        if self.linear_depth_target {
            attachments.push(CAMERA_VP_DEPTH.into());
        }
        attachments
    }
}

/// Allocates, binds and clears the G-buffer
#[derive(Debug, Default)]
pub struct GBufferPass;

impl GBufferPass {
    pub fn new() -> Self {
        Self
    }
}

impl RenderPass for GBufferPass {
    fn name(&self) -> &str {
        "Create G-Buffer"
    }

    fn record(&self, ctx: &PassContext, cmd: &mut CommandBuffer) {
        let (width, height) = ctx.screen_size();

        cmd.setup_camera_properties(ctx.camera.id);
        // The standard shaders encode emission differently without HDR
        cmd.enable_keyword(ShaderKeyword::HdrOn);

        for (id, desc) in ctx.gbuffer.targets(width, height) {
            cmd.get_temporary_rt(id, desc);
        }

        cmd.set_render_target(&ctx.gbuffer.color_attachments(), Some(GBUFFER_Z.into()));
        cmd.clear_render_target(true, true, glam::Vec4::ZERO);
    }
}

/// Draws the host's opaque renderers with their deferred shader pass
#[derive(Debug, Default)]
pub struct GeometryPass;

impl GeometryPass {
    pub fn new() -> Self {
        Self
    }

    pub fn settings(ctx: &PassContext) -> DrawRenderersSettings {
        DrawRenderersSettings {
            camera: ctx.camera.id,
            shader_pass: DEFERRED_SHADER_PASS,
            sorting: SortMode::CommonOpaque,
            queue: RenderQueueRange::OPAQUE,
            per_object_data: PerObjectData::LIGHTMAPS | PerObjectData::LIGHT_PROBE,
        }
    }
}

impl RenderPass for GeometryPass {
    fn name(&self) -> &str {
        "Deferred Geometry"
    }

    fn record(&self, ctx: &PassContext, cmd: &mut CommandBuffer) {
        cmd.draw_renderers(Self::settings(ctx));
    }
}

/// Copies G-buffer depth into the sampled camera depth texture
///
/// Only needed on hosts that can't read depth from the framebuffer while the
/// lighting pass runs.
#[derive(Debug, Default)]
pub struct DepthCopyPass;

impl DepthCopyPass {
    pub fn new() -> Self {
        Self
    }
}

impl RenderPass for DepthCopyPass {
    fn name(&self) -> &str {
        "Copy Depth"
    }

    fn is_enabled(&self, ctx: &PassContext) -> bool {
        !ctx.capabilities.in_pass_depth_read
    }

    fn record(&self, _ctx: &PassContext, cmd: &mut CommandBuffer) {
        cmd.copy_texture(GBUFFER_Z.into(), CAMERA_DEPTH_TEXTURE.into());
    }
}
