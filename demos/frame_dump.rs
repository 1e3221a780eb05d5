//! # Frame Dump
//!
//! Renders a synthetic scene through the recording host and prints every
//! command buffer the pipeline produced.
//!
//! ```bash
//! cargo run --example frame_dump -- --lights 12 --probes 3 --frames 2
//! cargo run --example frame_dump -- --no-depth-fetch --config pipeline.json
//! ```

use std::path::PathBuf;

use clap::Parser;
use classic_deferred::backend::{HostCapabilities, ShaderHandle, TextureHandle};
use classic_deferred::pipeline::{ShaderSet, ShadowOutput, ShadowSlice};
use classic_deferred::render_graph::Command;
use classic_deferred::scene::{Camera, CameraId, LightShadows, Projection, Scene, VisibleLight};
use classic_deferred::{ClassicDeferredPipeline, PipelineConfig, RecordingHost, StaticShadows};
use glam::{Mat4, Vec3};

/// Dump the command buffers of a deferred frame.
#[derive(Parser, Debug)]
#[command(name = "frame_dump", version)]
struct Args {
    /// Number of point lights in the scene.
    #[arg(long, default_value = "4")]
    lights: usize,

    /// Number of spot lights in the scene.
    #[arg(long, default_value = "1")]
    spots: usize,

    /// Number of reflection probes in the scene.
    #[arg(long, default_value = "2")]
    probes: usize,

    /// Add a shadowed directional sun.
    #[arg(long)]
    sun: bool,

    /// Host cannot read depth inside the lighting pass.
    #[arg(long)]
    no_depth_fetch: bool,

    /// Frames to render.
    #[arg(long, default_value = "1")]
    frames: u32,

    /// Pipeline configuration as JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print every command, not only buffer summaries.
    #[arg(short, long)]
    verbose: bool,
}

fn build_scene(args: &Args) -> Scene {
    let mut scene = Scene::new();

    for i in 0..args.lights {
        let angle = i as f32 / args.lights.max(1) as f32 * std::f32::consts::TAU;
        scene.add_point_light(
            Vec3::new(angle.cos() * 8.0, 1.0, 20.0 + angle.sin() * 8.0),
            Vec3::new(1.0, 0.9, 0.8),
            2.0,
            4.0,
        );
    }

    for i in 0..args.spots {
        scene.add_spot_light(
            Vec3::new(i as f32 * 3.0, 5.0, 15.0),
            Vec3::new(0.0, -1.0, 0.2),
            Vec3::ONE,
            4.0,
            10.0,
            40.0,
        );
    }

    if args.sun {
        scene.add_light(
            VisibleLight::directional(Vec3::new(0.3, -1.0, 0.4), Vec3::new(1.0, 0.95, 0.9), 1.5)
                .with_shadows(LightShadows::Soft),
        );
    }

    for i in 0..args.probes {
        scene.add_reflection_probe(
            Vec3::new(i as f32 * 12.0 - 6.0, 2.0, 25.0),
            Vec3::new(5.0, 3.0, 5.0),
            Some(TextureHandle(100 + i as u64)),
        );
    }

    scene
}

/// Four cascades for the sun, which is always the last light
fn sun_shadows(scene: &Scene) -> ShadowOutput {
    let mut output = ShadowOutput::new();
    let count = scene.lights.len();
    for index in 0..count {
        if index + 1 == count {
            output.push_light((0..4u32).map(|cascade| {
                ShadowSlice::new(Mat4::from_scale(Vec3::splat(1.0 / (cascade + 1) as f32)))
                    .with_atlas_rect((cascade % 2) * 512, (cascade / 2) * 512, 512, 512)
            }));
        } else {
            output.push_light(Vec::<ShadowSlice>::new());
        }
    }
    output
}

fn load_config(args: &Args) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => PipelineConfig::default(),
    };
    Ok(config
        .with_shaders(ShaderSet {
            final_pass: ShaderHandle(1),
            deferred_lighting: ShaderHandle(2),
            deferred_reflections: ShaderHandle(3),
        })
        .with_default_spot_cookie(TextureHandle(50)))
}

fn describe(command: &Command) -> String {
    match command {
        Command::DrawMesh(draw) => format!(
            "DrawMesh mesh={:?} material={:?} properties={}",
            draw.mesh,
            draw.material,
            draw.properties.len()
        ),
        Command::SetGlobalMatrixArray { name, values } => {
            format!("SetGlobalMatrixArray {} [{}]", name, values.len())
        }
        Command::SetGlobalVectorArray { name, values } => {
            format!("SetGlobalVectorArray {} [{}]", name, values.len())
        }
        other => format!("{:?}", other),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(if args.verbose {
        "debug"
    } else {
        "info"
    }))
    .init();

    let scene = build_scene(&args);
    let shadow_output = if args.sun {
        sun_shadows(&scene)
    } else {
        ShadowOutput::new()
    };

    let mut capabilities = HostCapabilities::default();
    capabilities.in_pass_depth_read = !args.no_depth_fetch;
    let mut host = RecordingHost::new(scene).with_capabilities(capabilities);

    let config = load_config(&args)?;
    let shadows = StaticShadows::new(config.shadows.clone(), shadow_output);
    let mut pipeline = ClassicDeferredPipeline::build(&mut host, config, shadows)?;

    let camera = Camera::new(CameraId(1), Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 1.0, 20.0))
        .with_projection(Projection::perspective(60.0, 16.0 / 9.0, 0.3, 500.0))
        .with_pixel_size(1920, 1080);

    log::info!("{}: {:?}", host.name(), pipeline.graph().pass_names());

    for frame in 0..args.frames {
        host.clear_buffers();
        let report = pipeline.render(&mut host, std::slice::from_ref(&camera))?;

        println!("=== Frame {} ===", frame);
        for buffer in host.buffers() {
            println!(
                "{:<24} {:>3} commands {:>3} draws",
                buffer.name(),
                buffer.len(),
                buffer.draws().count()
            );
            if args.verbose {
                for command in buffer.commands() {
                    println!("    {}", describe(command));
                }
            }
        }
        println!(
            "rendered {} skipped {} draws {} budget {:?}",
            report.cameras_rendered,
            report.cameras_skipped,
            report.draws,
            report.budget_transitions
        );
    }

    pipeline.dispose(&mut host);
    Ok(())
}
