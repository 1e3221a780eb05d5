//! Lighting pass for deferred rendering
//!
//! Accumulates every visible light into the emission target with one additive
//! draw per light. Lights that cover the camera's clip planes, and all
//! directional lights, are drawn as full-screen quads; the others rasterize a
//! proxy volume so only the pixels they can reach run the lighting shader.

use crate::pipeline::gbuffer_pass::{GBUFFER_EMISSION, GBUFFER_Z};
use crate::pipeline::light_classifier::{classify, LightClassification};
use crate::pipeline::shader_ids;
use crate::pipeline::shadow_constants::MAX_LIGHTS;
use crate::render_graph::*;
use crate::scene::{LightType, ViewVolume, VisibleLight};

/// Deferred lighting pass
#[derive(Debug, Default)]
pub struct LightingPass;

impl LightingPass {
    pub fn new() -> Self {
        Self
    }

    /// Shadow matrix array index of a packed light, or -1 without shadows
    fn shadow_index(ctx: &PassContext, index: usize, light: &VisibleLight) -> f32 {
        let has_slices = ctx
            .shadows
            .packed_lights()
            .get(index)
            .map_or(false, |packed| packed.shadows_enabled());
        if light.casts_shadows() && has_slices {
            index as f32
        } else {
            -1.0
        }
    }

    fn properties(
        ctx: &PassContext,
        index: usize,
        light: &VisibleLight,
        class: &LightClassification,
    ) -> PropertyBlock {
        let position = light.position();
        let inv_range_sqr = if light.range > 0.0 {
            1.0 / (light.range * light.range)
        } else {
            0.0
        };

        let mut props = PropertyBlock::new();
        props.set_float(shader_ids::LIGHT_AS_QUAD, if class.as_quad() { 1.0 } else { 0.0 });
        props.set_vector(shader_ids::LIGHT_POS, position.extend(inv_range_sqr));
        props.set_vector(shader_ids::LIGHT_DIR, light.direction().extend(0.0));
        props.set_vector(shader_ids::LIGHT_COLOR, light.final_color);
        props.set_float(
            shader_ids::LIGHT_INDEX_FOR_SHADOW_MATRIX_ARRAY,
            Self::shadow_index(ctx, index, light),
        );
        props.set_matrix(shader_ids::WORLD_TO_LIGHT, class.world_to_light);
        if let Some(light_matrix) = class.light_matrix {
            props.set_matrix(shader_ids::LIGHT_MATRIX0, light_matrix);
        }
        props
    }
}

impl RenderPass for LightingPass {
    fn name(&self) -> &str {
        "Lighting"
    }

    fn record(&self, ctx: &PassContext, cmd: &mut CommandBuffer) {
        // Without framebuffer fetch the shader samples the copied depth texture
        if !ctx.capabilities.in_pass_depth_read {
            cmd.set_render_target(&[GBUFFER_EMISSION.into()], Some(GBUFFER_Z.into()));
        }

        let view = ViewVolume::from_camera(ctx.camera);

        for (index, light) in ctx.cull.visible_lights.iter().take(MAX_LIGHTS).enumerate() {
            let class = classify(light, &view, ctx.config);

            for keyword in ShaderKeyword::LIGHT_VARIANTS {
                cmd.disable_keyword(keyword);
            }
            cmd.enable_keyword(class.keyword);

            if let Some(cookie) = class.cookie {
                cmd.set_global_texture(shader_ids::LIGHT_TEXTURE0, cookie);
            }

            let props = Self::properties(ctx, index, light, &class);

            let (mesh, material) = if class.as_quad() {
                (ctx.meshes.quad, ctx.materials.lighting_quad)
            } else {
                let mesh = match light.light_type {
                    LightType::Spot => ctx.meshes.spot_light,
                    _ => ctx.meshes.point_light,
                };
                (mesh, ctx.materials.lighting_volume)
            };

            log::trace!(
                "Light {} ({:?}) drawn as {:?} with {}",
                index,
                light.light_type,
                class.style,
                class.keyword.as_str()
            );
            cmd.draw_mesh(mesh, class.mesh_transform, material, props);
        }
    }
}
