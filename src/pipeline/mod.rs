//! Classic deferred rendering pipeline
//!
//! Per camera the pipeline records, in order:
//! 1. Shadow constants - packed shadow matrices and PCF terms as globals
//! 2. G-Buffer - target allocation, MRT bind and the opaque geometry fill
//! 3. Depth copy - only on hosts without in-pass depth reads
//! 4. Lighting - one additive draw per light into the emission target
//! 5. Reflections - probes back to front, then the default probe
//! 6. Skybox
//! 7. Final pass - emission blit to the camera target

pub mod config;
pub mod final_pass;
pub mod gbuffer_pass;
pub mod light_classifier;
pub mod lighting_pass;
pub mod reflection_pass;
pub mod shader_ids;
pub mod shadow;
pub mod shadow_constants;

#[cfg(test)]
pub(crate) mod testing;

pub use config::*;
pub use final_pass::{FinalPass, SkyboxPass};
pub use gbuffer_pass::{DepthCopyPass, GBufferLayout, GBufferPass, GeometryPass};
pub use light_classifier::{classify, LightClassification, LightRenderStyle};
pub use lighting_pass::LightingPass;
pub use reflection_pass::{classify_probe, ProbeRenderStyle, ReflectionPass};
pub use shadow::*;
pub use shadow_constants::*;

pub use crate::resources::DeferredMaterials;

use crate::backend::traits::*;
use crate::error::PipelineResult;
use crate::render_graph::{FrameGraph, FrameGraphExecutor, FrameStats, PassContext};
use crate::resources::Mesh;
use crate::scene::{Camera, CullResults};

/// Host meshes the lighting and reflection passes rasterize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyMeshes {
    pub quad: MeshHandle,
    pub cube: MeshHandle,
    pub point_light: MeshHandle,
    pub spot_light: MeshHandle,
    /// Meshes uploaded by the pipeline, released with it
    generated: Vec<MeshHandle>,
}

impl ProxyMeshes {
    /// Use configured meshes, uploading generated ones for the rest
    ///
    /// A failed upload releases the meshes generated before it.
    pub fn resolve<H: RenderHost>(host: &mut H, config: &ProxyMeshConfig) -> PipelineResult<Self> {
        let mut generated = Vec::new();
        match Self::upload_missing(host, config, &mut generated) {
            Ok([quad, cube, point_light, spot_light]) => Ok(Self {
                quad,
                cube,
                point_light,
                spot_light,
                generated,
            }),
            Err(err) => {
                for handle in generated {
                    host.destroy_mesh(handle);
                }
                Err(err.into())
            }
        }
    }

    fn upload_missing<H: RenderHost>(
        host: &mut H,
        config: &ProxyMeshConfig,
        generated: &mut Vec<MeshHandle>,
    ) -> HostResult<[MeshHandle; 4]> {
        let mut upload = |configured: Option<MeshHandle>,
                          generate: fn() -> Mesh|
         -> HostResult<MeshHandle> {
            if let Some(handle) = configured {
                return Ok(handle);
            }
            let mesh = generate();
            log::debug!(
                "Uploading proxy mesh '{}' ({} triangles)",
                mesh.name,
                mesh.triangle_count()
            );
            let handle = host.create_mesh(&mesh)?;
            generated.push(handle);
            Ok(handle)
        };

        Ok([
            upload(config.quad, Mesh::fullscreen_quad)?,
            upload(config.cube, Mesh::cube)?,
            upload(config.point_light, || Mesh::sphere(16, 8))?,
            upload(config.spot_light, || Mesh::cone(16))?,
        ])
    }

    /// Meshes the pipeline uploaded itself
    pub fn generated(&self) -> &[MeshHandle] {
        &self.generated
    }

    /// Release the generated meshes, leaving configured ones to their owner
    pub fn release<H: RenderHost>(self, host: &mut H) {
        for handle in self.generated {
            host.destroy_mesh(handle);
        }
    }
}

/// Outcome of one `render` call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub cameras_rendered: usize,
    pub cameras_skipped: usize,
    /// Mesh draws recorded across all cameras
    pub draws: usize,
    /// Light budget changes observed this frame, in camera order
    pub budget_transitions: Vec<BudgetTransition>,
}

/// Build the fixed deferred frame graph
pub fn build_deferred_graph() -> FrameGraph {
    let mut graph = FrameGraph::new();
    graph.add_pass(PushShadowConstantsPass);
    graph.add_pass(GBufferPass::new());
    graph.add_pass(GeometryPass::new());
    graph.add_pass(DepthCopyPass::new());
    graph.add_pass(LightingPass::new());
    graph.add_pass(ReflectionPass::new());
    graph.add_pass(SkyboxPass);
    graph.add_pass(FinalPass);
    graph
}

/// Deferred pipeline bound to a host
pub struct ClassicDeferredPipeline<S: ShadowRenderer> {
    config: PipelineConfig,
    capabilities: HostCapabilities,
    gbuffer: GBufferLayout,
    materials: DeferredMaterials,
    meshes: ProxyMeshes,
    shadow_renderer: S,
    shadow_constants: ShadowConstants,
    graph: FrameGraph,
    executor: FrameGraphExecutor,
}

impl<S: ShadowRenderer> ClassicDeferredPipeline<S> {
    /// Validate the configuration and create the host resources
    pub fn build<H: RenderHost>(
        host: &mut H,
        config: PipelineConfig,
        shadow_renderer: S,
    ) -> PipelineResult<Self> {
        config.validate()?;

        let capabilities = host.capabilities();
        let gbuffer = GBufferLayout::resolve(&capabilities);
        let meshes = ProxyMeshes::resolve(host, &config.proxy_meshes)?;
        let materials = match DeferredMaterials::create(host, &config.shaders) {
            Ok(materials) => materials,
            Err(err) => {
                meshes.release(host);
                return Err(err.into());
            }
        };

        log::info!(
            "Classic deferred pipeline ready (normals {:?}, in-pass depth read: {})",
            gbuffer.normal_format,
            capabilities.in_pass_depth_read
        );

        Ok(Self {
            config,
            capabilities,
            gbuffer,
            materials,
            meshes,
            shadow_renderer,
            shadow_constants: ShadowConstants::new(),
            graph: build_deferred_graph(),
            executor: FrameGraphExecutor::new(),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn capabilities(&self) -> &HostCapabilities {
        &self.capabilities
    }

    pub fn gbuffer_layout(&self) -> &GBufferLayout {
        &self.gbuffer
    }

    pub fn materials(&self) -> &DeferredMaterials {
        &self.materials
    }

    pub fn meshes(&self) -> &ProxyMeshes {
        &self.meshes
    }

    pub fn graph(&self) -> &FrameGraph {
        &self.graph
    }

    /// Constants packed for the most recently rendered camera
    pub fn shadow_constants(&self) -> &ShadowConstants {
        &self.shadow_constants
    }

    pub fn shadow_renderer_mut(&mut self) -> &mut S {
        &mut self.shadow_renderer
    }

    /// Render every camera in order and submit the frame
    pub fn render<H: RenderHost>(
        &mut self,
        host: &mut H,
        cameras: &[Camera],
    ) -> PipelineResult<FrameReport> {
        let mut report = FrameReport::default();

        for camera in cameras {
            let Some(mut params) = host.culling_parameters(camera) else {
                log::debug!("Skipping camera {:?}: no culling parameters", camera.id);
                report.cameras_skipped += 1;
                continue;
            };
            self.shadow_renderer.update_culling_parameters(&mut params);
            let cull = host.cull(&params);

            match self.render_camera(host, camera, &cull, &mut report) {
                Ok(stats) => {
                    report.cameras_rendered += 1;
                    report.draws += stats.draws;
                }
                Err(err) => {
                    log::error!("Failed to render camera {:?}: {}", camera.id, err);
                    report.cameras_skipped += 1;
                }
            }
        }

        host.submit()?;
        Ok(report)
    }

    fn render_camera<H: RenderHost>(
        &mut self,
        host: &mut H,
        camera: &Camera,
        cull: &CullResults,
        report: &mut FrameReport,
    ) -> PipelineResult<FrameStats> {
        let shadows = self.shadow_renderer.render(host, cull)?;
        if let Some(transition) =
            self.shadow_constants
                .update(&cull.visible_lights, &shadows, &self.config.shadows)
        {
            report.budget_transitions.push(transition);
        }

        let ctx = PassContext {
            camera,
            cull,
            shadows: &self.shadow_constants,
            materials: &self.materials,
            meshes: &self.meshes,
            config: &self.config,
            capabilities: &self.capabilities,
            gbuffer: &self.gbuffer,
            default_reflection: host.default_reflection(),
        };
        let stats = self.executor.execute(&self.graph, &ctx, host)?;

        log::debug!(
            "Camera {:?}: {} lights, {} probes, {} command buffers, {} draws",
            camera.id,
            cull.visible_lights.len(),
            cull.visible_reflection_probes.len(),
            stats.command_buffers,
            stats.draws
        );
        Ok(stats)
    }

    /// Destroy the host materials and meshes owned by the pipeline
    pub fn dispose<H: RenderHost>(self, host: &mut H) {
        self.materials.destroy(host);
        self.meshes.release(host);
        log::info!("Classic deferred pipeline disposed");
    }
}
