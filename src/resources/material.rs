//! Fixed-function material presets for the deferred passes
//!
//! Every material is created once when the pipeline is built and never
//! mutated afterwards. Per-draw values travel in property blocks instead.

use crate::backend::traits::*;
use crate::backend::types::*;
use crate::pipeline::ShaderSet;

/// The six material bundles used by the lighting, reflection and final passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeferredMaterialKind {
    /// Full-screen quad lights (directional, or lights crossing a clip plane)
    LightingQuad,
    /// Point and spot light volumes
    LightingVolume,
    /// Probe box seen from outside
    Reflection,
    /// Probe box crossing the near plane, drawn with its back faces
    ReflectionNearClip,
    /// Full-screen probe pass, used for the default probe
    ReflectionQuad,
    /// Emission to camera target copy
    Blit,
}

impl DeferredMaterialKind {
    pub const ALL: [DeferredMaterialKind; 6] = [
        DeferredMaterialKind::LightingQuad,
        DeferredMaterialKind::LightingVolume,
        DeferredMaterialKind::Reflection,
        DeferredMaterialKind::ReflectionNearClip,
        DeferredMaterialKind::ReflectionQuad,
        DeferredMaterialKind::Blit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DeferredMaterialKind::LightingQuad => "deferred_lighting_quad",
            DeferredMaterialKind::LightingVolume => "deferred_lighting_volume",
            DeferredMaterialKind::Reflection => "deferred_reflection",
            DeferredMaterialKind::ReflectionNearClip => "deferred_reflection_near_clip",
            DeferredMaterialKind::ReflectionQuad => "deferred_reflection_quad",
            DeferredMaterialKind::Blit => "final_blit",
        }
    }

    /// Blend, cull and depth state
    pub fn render_state(&self) -> RenderState {
        match self {
            DeferredMaterialKind::LightingQuad => RenderState {
                blend: BlendState::additive(),
                cull_mode: CullMode::Off,
                depth_compare: CompareFunction::Always,
            },
            DeferredMaterialKind::LightingVolume => RenderState {
                blend: BlendState::additive(),
                cull_mode: CullMode::Back,
                depth_compare: CompareFunction::LessEqual,
            },
            DeferredMaterialKind::Reflection => RenderState {
                blend: BlendState::destination_alpha_accumulate(),
                cull_mode: CullMode::Back,
                depth_compare: CompareFunction::LessEqual,
            },
            DeferredMaterialKind::ReflectionNearClip => RenderState {
                blend: BlendState::destination_alpha_accumulate(),
                cull_mode: CullMode::Front,
                depth_compare: CompareFunction::GreaterEqual,
            },
            DeferredMaterialKind::ReflectionQuad => RenderState {
                blend: BlendState::destination_alpha_accumulate(),
                cull_mode: CullMode::Off,
                depth_compare: CompareFunction::Always,
            },
            DeferredMaterialKind::Blit => RenderState {
                blend: BlendState::default(),
                cull_mode: CullMode::Off,
                depth_compare: CompareFunction::Always,
            },
        }
    }

    fn shader(&self, shaders: &ShaderSet) -> ShaderHandle {
        match self {
            DeferredMaterialKind::LightingQuad | DeferredMaterialKind::LightingVolume => {
                shaders.deferred_lighting
            }
            DeferredMaterialKind::Reflection
            | DeferredMaterialKind::ReflectionNearClip
            | DeferredMaterialKind::ReflectionQuad => shaders.deferred_reflections,
            DeferredMaterialKind::Blit => shaders.final_pass,
        }
    }

    pub fn descriptor(&self, shaders: &ShaderSet) -> MaterialDescriptor {
        MaterialDescriptor {
            label: self.label().to_string(),
            shader: self.shader(shaders),
            state: self.render_state(),
        }
    }
}

/// Host handles of the deferred materials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredMaterials {
    pub lighting_quad: MaterialHandle,
    pub lighting_volume: MaterialHandle,
    pub reflection: MaterialHandle,
    pub reflection_near_clip: MaterialHandle,
    pub reflection_quad: MaterialHandle,
    pub blit: MaterialHandle,
}

impl DeferredMaterials {
    /// Create every material on the host
    ///
    /// Materials created before a failure are destroyed again so a failed
    /// build doesn't leak host objects.
    pub fn create<H: RenderHost>(host: &mut H, shaders: &ShaderSet) -> HostResult<Self> {
        let mut created = Vec::with_capacity(DeferredMaterialKind::ALL.len());
        for kind in DeferredMaterialKind::ALL {
            match host.create_material(&kind.descriptor(shaders)) {
                Ok(handle) => {
                    log::debug!("Created material '{}' ({:?})", kind.label(), handle);
                    created.push(handle);
                }
                Err(err) => {
                    for handle in created {
                        host.destroy_material(handle);
                    }
                    return Err(err);
                }
            }
        }

        Ok(Self {
            lighting_quad: created[0],
            lighting_volume: created[1],
            reflection: created[2],
            reflection_near_clip: created[3],
            reflection_quad: created[4],
            blit: created[5],
        })
    }

    pub fn get(&self, kind: DeferredMaterialKind) -> MaterialHandle {
        match kind {
            DeferredMaterialKind::LightingQuad => self.lighting_quad,
            DeferredMaterialKind::LightingVolume => self.lighting_volume,
            DeferredMaterialKind::Reflection => self.reflection,
            DeferredMaterialKind::ReflectionNearClip => self.reflection_near_clip,
            DeferredMaterialKind::ReflectionQuad => self.reflection_quad,
            DeferredMaterialKind::Blit => self.blit,
        }
    }

    /// Release every material on the host
    pub fn destroy<H: RenderHost>(self, host: &mut H) {
        for kind in DeferredMaterialKind::ALL {
            host.destroy_material(self.get(kind));
        }
    }
}
