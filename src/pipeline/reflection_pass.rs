//! Reflection probe compositing
//!
//! Probes are drawn in reverse visibility order with destination-alpha
//! blending, so the emission target ends up holding nested lerps:
//!
//! ```text
//! emission += lerp(lerp(lerp(base, probe0, 1 - t0), probe1, 1 - t1), probe2, 1 - t2)
//! ```
//!
//! The scene's default cubemap is drawn last as the base layer.

use crate::backend::traits::TextureHandle;
use crate::pipeline::shader_ids;
use crate::render_graph::*;
use crate::scene::{ClipIntersection, ViewVolume, VisibleReflectionProbe};
use glam::{Mat4, Vec4};

/// How a probe volume is rasterized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeRenderStyle {
    /// Volume spans both clip planes
    Quad,
    /// Volume crosses the near plane; back faces with an inverted depth test
    NearClipBox,
    Box,
}

impl From<ClipIntersection> for ProbeRenderStyle {
    fn from(hit: ClipIntersection) -> Self {
        if hit.both() {
            ProbeRenderStyle::Quad
        } else if hit.near {
            ProbeRenderStyle::NearClipBox
        } else {
            ProbeRenderStyle::Box
        }
    }
}

/// Clip-plane classification of a probe using its bounding sphere
///
/// The sphere is centered on the world-space influence volume, not on the
/// probe-space box offset, so a probe far from the origin with no offset is
/// tested where its box is drawn.
pub fn classify_probe(probe: &VisibleReflectionProbe, view: &ViewVolume) -> ProbeRenderStyle {
    let radius = probe.combined_extent().length();
    view.sphere_intersections(probe.volume_center(), radius).into()
}

/// Reflection compositing pass
#[derive(Debug, Default)]
pub struct ReflectionPass;

impl ReflectionPass {
    pub fn new() -> Self {
        Self
    }

    fn bind_probe_globals(
        cmd: &mut CommandBuffer,
        cubemap: TextureHandle,
        hdr_decode: Vec4,
        box_min: Vec4,
        box_max: Vec4,
        probe_position: Vec4,
        blend_distance: f32,
    ) {
        cmd.set_global_texture(shader_ids::SPEC_CUBE0, cubemap);
        cmd.set_global_vector(shader_ids::SPEC_CUBE0_HDR, hdr_decode);
        cmd.set_global_vector(shader_ids::SPEC_CUBE0_BOX_MIN, box_min);
        cmd.set_global_vector(shader_ids::SPEC_CUBE0_BOX_MAX, box_max);
        cmd.set_global_vector(shader_ids::SPEC_CUBE0_PROBE_POSITION, probe_position);
        cmd.set_global_vector(
            shader_ids::SPEC_CUBE1_PROBE_POSITION,
            Vec4::new(0.0, 0.0, 0.0, blend_distance),
        );
    }

    fn quad_properties(as_quad: bool) -> PropertyBlock {
        let mut props = PropertyBlock::new();
        props.set_float(shader_ids::LIGHT_AS_QUAD, if as_quad { 1.0 } else { 0.0 });
        props
    }
}

impl RenderPass for ReflectionPass {
    fn name(&self) -> &str {
        "Reflections"
    }

    fn record(&self, ctx: &PassContext, cmd: &mut CommandBuffer) {
        let view = ViewVolume::from_camera(ctx.camera);
        let probes = &ctx.cull.visible_reflection_probes;

        for (index, probe) in probes.iter().enumerate().rev() {
            let Some(cubemap) = probe.texture else {
                log::trace!("Skipping reflection probe {} without a cubemap", index);
                continue;
            };

            let style = classify_probe(probe, &view);
            let box_projection = if probe.box_projection { 1.0 } else { 0.0 };

            Self::bind_probe_globals(
                cmd,
                cubemap,
                probe.hdr_decode,
                probe.bounds.min().extend(0.0),
                probe.bounds.max().extend(0.0),
                probe.position().extend(box_projection),
                probe.blend_distance,
            );

            let props = Self::quad_properties(style == ProbeRenderStyle::Quad);
            let (mesh, transform, material) = match style {
                ProbeRenderStyle::Quad => (
                    ctx.meshes.quad,
                    Mat4::IDENTITY,
                    ctx.materials.reflection_quad,
                ),
                ProbeRenderStyle::NearClipBox => (
                    ctx.meshes.cube,
                    probe.volume_transform(),
                    ctx.materials.reflection_near_clip,
                ),
                ProbeRenderStyle::Box => (
                    ctx.meshes.cube,
                    probe.volume_transform(),
                    ctx.materials.reflection,
                ),
            };

            log::trace!("Reflection probe {} drawn as {:?}", index, style);
            cmd.draw_mesh(mesh, transform, material, props);
        }

        // Base layer from the scene's default reflection
        let defaults = ctx.default_reflection;
        Self::bind_probe_globals(
            cmd,
            defaults.cubemap,
            defaults.hdr_decode,
            Vec4::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY, 1.0),
            Vec4::new(f32::INFINITY, f32::INFINITY, f32::INFINITY, 1.0),
            Vec4::ZERO,
            1.0,
        );
        cmd.draw_mesh(
            ctx.meshes.quad,
            Mat4::IDENTITY,
            ctx.materials.reflection_quad,
            Self::quad_properties(true),
        );
    }
}
