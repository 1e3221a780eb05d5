//! Shared fixture for pass unit tests

use crate::backend::traits::*;
use crate::pipeline::*;
use crate::render_graph::PassContext;
use crate::scene::{Camera, CameraId, CullResults, Projection};
use glam::{Vec3, Vec4};

/// Owns everything a [`PassContext`] borrows
pub struct PassFixture {
    pub camera: Camera,
    pub cull: CullResults,
    pub shadows: ShadowConstants,
    pub materials: DeferredMaterials,
    pub meshes: ProxyMeshes,
    pub config: PipelineConfig,
    pub capabilities: HostCapabilities,
    pub gbuffer: GBufferLayout,
    pub default_reflection: ReflectionDefaults,
}

impl PassFixture {
    /// Camera at the origin looking down +Z, near 0.3 and far 100
    pub fn new() -> Self {
        let capabilities = HostCapabilities::default();
        Self {
            camera: Camera::new(CameraId(1), Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0))
                .with_projection(Projection::perspective(60.0, 4.0 / 3.0, 0.3, 100.0))
                .with_pixel_size(640, 480),
            cull: CullResults::new(),
            shadows: ShadowConstants::new(),
            materials: DeferredMaterials {
                lighting_quad: MaterialHandle(1),
                lighting_volume: MaterialHandle(2),
                reflection: MaterialHandle(3),
                reflection_near_clip: MaterialHandle(4),
                reflection_quad: MaterialHandle(5),
                blit: MaterialHandle(6),
            },
            meshes: ProxyMeshes {
                quad: MeshHandle(1),
                cube: MeshHandle(2),
                point_light: MeshHandle(3),
                spot_light: MeshHandle(4),
                generated: Vec::new(),
            },
            config: PipelineConfig::default(),
            gbuffer: GBufferLayout::resolve(&capabilities),
            capabilities,
            default_reflection: ReflectionDefaults {
                cubemap: TextureHandle(99),
                hdr_decode: Vec4::new(1.0, 1.0, 0.0, 0.0),
            },
        }
    }

    pub fn set_in_pass_depth_read(&mut self, supported: bool) {
        self.capabilities.in_pass_depth_read = supported;
        self.gbuffer = GBufferLayout::resolve(&self.capabilities);
    }

    pub fn ctx(&self) -> PassContext<'_> {
        PassContext {
            camera: &self.camera,
            cull: &self.cull,
            shadows: &self.shadows,
            materials: &self.materials,
            meshes: &self.meshes,
            config: &self.config,
            capabilities: &self.capabilities,
            gbuffer: &self.gbuffer,
            default_reflection: self.default_reflection,
        }
    }
}
