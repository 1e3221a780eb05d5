//! Common utilities for frame scenario tests.
//!
//! Builds pipelines against the recording host so scenarios only describe
//! the scene and the host flavour.

#![allow(dead_code)]

use classic_deferred::backend::{HostCapabilities, ShaderHandle, TextureFormat, TextureHandle};
use classic_deferred::pipeline::{
    PipelineConfig, ShaderSet, ShadowOutput, ShadowSettings, StaticShadows,
};
use classic_deferred::render_graph::{Command, CommandBuffer};
use classic_deferred::scene::{Camera, CameraId, Projection, Scene};
use classic_deferred::{ClassicDeferredPipeline, RecordingHost};
use glam::Vec3;

/// Host flavours the pipeline adapts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    /// Depth can be read in the lighting pass
    FramebufferFetch,
    /// Depth must be copied before lighting
    DepthCopy,
}

impl HostKind {
    pub fn capabilities(&self) -> HostCapabilities {
        match self {
            HostKind::FramebufferFetch => HostCapabilities::default(),
            HostKind::DepthCopy => HostCapabilities {
                in_pass_depth_read: false,
                render_texture_formats: vec![
                    TextureFormat::Rgba8Unorm,
                    TextureFormat::Rgba16Float,
                    TextureFormat::Depth,
                ],
            },
        }
    }
}

pub const SPOT_COOKIE: TextureHandle = TextureHandle(500);

pub fn config() -> PipelineConfig {
    PipelineConfig::default()
        .with_shaders(ShaderSet {
            final_pass: ShaderHandle(1),
            deferred_lighting: ShaderHandle(2),
            deferred_reflections: ShaderHandle(3),
        })
        .with_default_spot_cookie(SPOT_COOKIE)
}

/// Camera at the origin looking down +Z
pub fn camera(id: u32) -> Camera {
    Camera::new(CameraId(id), Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0))
        .with_projection(Projection::perspective(60.0, 16.0 / 9.0, 0.3, 200.0))
        .with_pixel_size(1280, 720)
}

pub fn host(scene: Scene, kind: HostKind) -> RecordingHost {
    RecordingHost::new(scene).with_capabilities(kind.capabilities())
}

/// Route pipeline logs through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn build(host: &mut RecordingHost) -> ClassicDeferredPipeline<StaticShadows> {
    build_with_shadows(host, ShadowOutput::new())
}

pub fn build_with_shadows(
    host: &mut RecordingHost,
    output: ShadowOutput,
) -> ClassicDeferredPipeline<StaticShadows> {
    init_logging();
    let config = config();
    let shadows = StaticShadows::new(config.shadows.clone(), output);
    ClassicDeferredPipeline::build(host, config, shadows).expect("pipeline should build")
}

/// Scene with `count` point lights well inside the view
pub fn point_light_scene(count: usize) -> Scene {
    let mut scene = Scene::new();
    for i in 0..count {
        scene.add_point_light(Vec3::new(i as f32 - 5.0, 0.0, 40.0), Vec3::ONE, 1.0, 3.0);
    }
    scene
}

pub fn default_shadow_settings() -> ShadowSettings {
    config().shadows
}

/// Every command of the buffers with this name, in order
pub fn commands_in<'a>(host: &'a RecordingHost, name: &'a str) -> Vec<&'a Command> {
    host.buffers_named(name)
        .flat_map(|b: &CommandBuffer| b.commands().iter())
        .collect()
}
