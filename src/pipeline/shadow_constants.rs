//! Shadow constant packing
//!
//! Packs the shadow service output into fixed-size shader constant arrays.
//! At most [`MAX_LIGHTS`] lights are packed per camera; each owns
//! [`MAX_SHADOWMAPS_PER_LIGHT`] consecutive world-to-shadow slots. Lights past
//! the cap are counted and otherwise ignored, and crossing the cap in either
//! direction is logged once.

use crate::pipeline::shader_ids;
use crate::pipeline::shadow::{ShadowOutput, ShadowSettings};
use crate::render_graph::{CommandBuffer, PassContext, RenderPass};
use crate::scene::{LightType, VisibleLight};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

/// Maximum number of lights packed per camera
pub const MAX_LIGHTS: usize = 10;
/// Shadow slices per light (six for point light cube faces)
pub const MAX_SHADOWMAPS_PER_LIGHT: usize = 6;
/// Directional shadow cascades
pub const MAX_DIRECTIONAL_SPLITS: usize = 4;

const PCF_WEIGHTS: Vec4 = Vec4::new(20.0 / 267.0, 33.0 / 267.0, 55.0 / 267.0, 0.0);

/// Shader-visible shadow constant block
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ShadowConstantData {
    /// Transposed world-to-shadow matrices, slot `light * 6 + slice`
    pub world_to_shadow: [Mat4; MAX_LIGHTS * MAX_SHADOWMAPS_PER_LIGHT],
    pub dir_shadow_split_spheres: [Vec4; MAX_DIRECTIONAL_SPLITS],
    pub pcf_terms: [Vec4; 4],
}

impl Default for ShadowConstantData {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Per-light parameters produced while packing
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PackedLight {
    /// `(shadowsEnabled, 0, 1, 1)`
    pub shadow_params: Vec4,
    /// `(1/range², 0, range², lightType)`; directional lights have no falloff
    pub falloff: Vec4,
}

impl PackedLight {
    fn new(light: &VisibleLight, has_shadows: bool) -> Self {
        let shadow_params = Vec4::new(if has_shadows { 1.0 } else { 0.0 }, 0.0, 1.0, 1.0);
        let code = light.light_type.shader_code();
        let falloff = match light.light_type {
            LightType::Directional => Vec4::new(0.0, 0.0, f32::MAX, code),
            LightType::Point | LightType::Spot => {
                let range_sqr = light.range * light.range;
                let inv = if range_sqr > 0.0 { 1.0 / range_sqr } else { 0.0 };
                Vec4::new(inv, 0.0, range_sqr, code)
            }
        };
        Self {
            shadow_params,
            falloff,
        }
    }

    pub fn shadows_enabled(&self) -> bool {
        self.shadow_params.x != 0.0
    }
}

/// Whether the visible light count fits the packing capacity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BudgetState {
    #[default]
    WithinBudget,
    OverBudget,
}

/// Budget state change observed by one packing call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetTransition {
    /// `found` lights were visible, `found - MAX_LIGHTS` were dropped
    EnteredOverBudget { found: usize },
    ReturnedWithinBudget { found: usize },
}

/// Edge-triggered light budget monitor
#[derive(Debug, Clone, Default)]
pub struct LightBudget {
    state: BudgetState,
}

impl LightBudget {
    pub fn state(&self) -> BudgetState {
        self.state
    }

    /// Observe a frame's light count, logging only on state changes
    pub fn observe(&mut self, found: usize) -> Option<BudgetTransition> {
        let over = found > MAX_LIGHTS;
        match (self.state, over) {
            (BudgetState::WithinBudget, true) => {
                self.state = BudgetState::OverBudget;
                let dropped = found - MAX_LIGHTS;
                log::warn!(
                    "Found {} runtime lights, only {} are supported at a time; \
                     disabling {} light{}",
                    found,
                    MAX_LIGHTS,
                    dropped,
                    if dropped > 1 { "s" } else { "" }
                );
                Some(BudgetTransition::EnteredOverBudget { found })
            }
            (BudgetState::OverBudget, false) => {
                self.state = BudgetState::WithinBudget;
                log::info!(
                    "Found {} runtime lights, within the supported {}",
                    found,
                    MAX_LIGHTS
                );
                Some(BudgetTransition::ReturnedWithinBudget { found })
            }
            _ => None,
        }
    }
}

/// PCF 3x3 weights and texel offsets for an atlas size
pub fn pcf_terms(atlas_width: u32, atlas_height: u32) -> [Vec4; 4] {
    let tx = 1.0 / atlas_width.max(1) as f32;
    let ty = 1.0 / atlas_height.max(1) as f32;
    [
        PCF_WEIGHTS,
        Vec4::new(tx, ty, -tx, -ty),
        Vec4::new(tx, ty, 0.0, 0.0),
        Vec4::new(-tx, -ty, 0.0, 0.0),
    ]
}

/// Shadow constants persisted across frames
///
/// Slots not written by the current frame keep their previous contents.
#[derive(Debug, Clone, Default)]
pub struct ShadowConstants {
    data: ShadowConstantData,
    lights: [PackedLight; MAX_LIGHTS],
    num_lights: usize,
    total_lights: usize,
    budget: LightBudget,
}

impl ShadowConstants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pack the visible lights and the shadow output of one camera
    pub fn update(
        &mut self,
        lights: &[VisibleLight],
        shadow: &ShadowOutput,
        settings: &ShadowSettings,
    ) -> Option<BudgetTransition> {
        self.total_lights = lights.len();
        self.num_lights = lights.len().min(MAX_LIGHTS);

        for (index, light) in lights.iter().take(MAX_LIGHTS).enumerate() {
            let slice_count = shadow.slice_count(index);
            let has_shadows = slice_count != 0;
            self.lights[index] = PackedLight::new(light, has_shadows);

            if !has_shadows {
                continue;
            }

            if light.light_type == LightType::Directional {
                self.data.dir_shadow_split_spheres = shadow.directional_split_spheres_sqr;
            }

            for s in 0..slice_count.min(MAX_SHADOWMAPS_PER_LIGHT) {
                if let Some(slice) = shadow.slice(index, s) {
                    self.data.world_to_shadow[index * MAX_SHADOWMAPS_PER_LIGHT + s] =
                        slice.shadow_transform.transpose();
                }
            }
        }

        self.data.pcf_terms = pcf_terms(settings.atlas_width, settings.atlas_height);
        self.budget.observe(self.total_lights)
    }

    pub fn data(&self) -> &ShadowConstantData {
        &self.data
    }

    /// Raw bytes of the constant block
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.data)
    }

    /// Lights packed by the last update
    pub fn packed_lights(&self) -> &[PackedLight] {
        &self.lights[..self.num_lights]
    }

    pub fn num_lights(&self) -> usize {
        self.num_lights
    }

    /// Visible lights seen by the last update, including dropped ones
    pub fn total_lights(&self) -> usize {
        self.total_lights
    }

    pub fn budget_state(&self) -> BudgetState {
        self.budget.state()
    }

    pub fn world_to_shadow(&self, light: usize, slice: usize) -> Option<Mat4> {
        if light >= MAX_LIGHTS || slice >= MAX_SHADOWMAPS_PER_LIGHT {
            return None;
        }
        Some(self.data.world_to_shadow[light * MAX_SHADOWMAPS_PER_LIGHT + slice])
    }
}

/// Pass pushing the packed shadow constants as shader globals
#[derive(Debug, Default)]
pub struct PushShadowConstantsPass;

impl RenderPass for PushShadowConstantsPass {
    fn name(&self) -> &str {
        "Push Global Parameters"
    }

    fn record(&self, ctx: &PassContext, cmd: &mut CommandBuffer) {
        let data = ctx.shadows.data();
        cmd.set_global_matrix_array(shader_ids::WORLD_TO_SHADOW, &data.world_to_shadow);
        cmd.set_global_vector_array(
            shader_ids::DIR_SHADOW_SPLIT_SPHERES,
            &data.dir_shadow_split_spheres,
        );
        for (name, value) in shader_ids::SHADOW_PCF_TERMS.into_iter().zip(data.pcf_terms) {
            cmd.set_global_vector(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::shadow::{ShadowSlice, ShadowTechnique};
    use glam::Vec3;

    fn point(i: usize) -> VisibleLight {
        VisibleLight::point(Vec3::new(i as f32, 0.0, 0.0), 4.0, Vec3::ONE, 1.0)
    }

    fn tagged(tag: f32) -> Mat4 {
        Mat4::from_translation(Vec3::new(tag, 0.0, 0.0))
    }

    #[test]
    fn test_slots_are_transposed_and_disjoint() {
        let lights: Vec<_> = (0..3).map(point).collect();
        let mut output = ShadowOutput::new();
        output.push_light((0..6).map(|s| ShadowSlice::new(tagged(s as f32))));
        output.push_light(Vec::<ShadowSlice>::new());
        output.push_light((0..2).map(|s| ShadowSlice::new(tagged(100.0 + s as f32))));

        let mut constants = ShadowConstants::new();
        constants.update(&lights, &output, &ShadowSettings::default());

        assert_eq!(constants.num_lights(), 3);
        for s in 0..6 {
            assert_eq!(constants.world_to_shadow(0, s), Some(tagged(s as f32).transpose()));
        }
        assert_eq!(constants.world_to_shadow(2, 0), Some(tagged(100.0).transpose()));
        assert_eq!(constants.world_to_shadow(2, 1), Some(tagged(101.0).transpose()));
        assert_eq!(constants.world_to_shadow(1, 0), Some(Mat4::ZERO));

        let packed = constants.packed_lights();
        assert!(packed[0].shadows_enabled());
        assert!(!packed[1].shadows_enabled());
        assert_eq!(packed[2].shadow_params, Vec4::new(1.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_extra_slices_ignored() {
        let lights = vec![point(0), point(1)];
        let mut output = ShadowOutput::new();
        output.push_light((0..8).map(|s| ShadowSlice::new(tagged(s as f32))));

        let mut constants = ShadowConstants::new();
        constants.update(&lights, &output, &ShadowSettings::default());

        // Slices 6 and 7 must not spill into light 1's slots
        assert_eq!(constants.world_to_shadow(1, 0), Some(Mat4::ZERO));
        assert_eq!(constants.world_to_shadow(1, 1), Some(Mat4::ZERO));
    }

    #[test]
    fn test_falloff() {
        let lights = vec![
            point(0),
            VisibleLight::directional(Vec3::NEG_Y, Vec3::ONE, 1.0),
        ];
        let mut constants = ShadowConstants::new();
        constants.update(&lights, &ShadowOutput::new(), &ShadowSettings::default());

        let packed = constants.packed_lights();
        assert_eq!(packed[0].falloff, Vec4::new(1.0 / 16.0, 0.0, 16.0, 2.0));
        assert_eq!(packed[1].falloff, Vec4::new(0.0, 0.0, f32::MAX, 1.0));
    }

    #[test]
    fn test_directional_split_spheres() {
        let spheres = [Vec4::splat(1.0), Vec4::splat(2.0), Vec4::splat(3.0), Vec4::splat(4.0)];
        let lights = vec![VisibleLight::directional(Vec3::NEG_Y, Vec3::ONE, 1.0)];
        let mut output = ShadowOutput::new().with_split_spheres(spheres);
        output.push_light([ShadowSlice::new(Mat4::IDENTITY)]);

        let mut constants = ShadowConstants::new();
        constants.update(&lights, &output, &ShadowSettings::default());
        assert_eq!(constants.data().dir_shadow_split_spheres, spheres);
    }

    #[test]
    fn test_pcf_terms() {
        let terms = pcf_terms(1024, 512);
        assert_eq!(terms[0], Vec4::new(20.0 / 267.0, 33.0 / 267.0, 55.0 / 267.0, 0.0));
        assert_eq!(terms[1], Vec4::new(1.0 / 1024.0, 1.0 / 512.0, -1.0 / 1024.0, -1.0 / 512.0));
        assert_eq!(terms[2], Vec4::new(1.0 / 1024.0, 1.0 / 512.0, 0.0, 0.0));
        assert_eq!(terms[3], Vec4::new(-1.0 / 1024.0, -1.0 / 512.0, 0.0, 0.0));
    }

    #[test]
    fn test_pcf_terms_ignore_technique() {
        let lights = vec![point(0)];
        let settings = ShadowSettings::default().with_atlas_size(2048, 1024);

        let mut hard = ShadowConstants::new();
        hard.update(
            &lights,
            &ShadowOutput::new(),
            &settings.clone().with_technique(ShadowTechnique::Hard),
        );
        let mut filtered = ShadowConstants::new();
        filtered.update(
            &lights,
            &ShadowOutput::new(),
            &settings.with_technique(ShadowTechnique::Pcf3x3),
        );

        assert_eq!(hard.data().pcf_terms, pcf_terms(2048, 1024));
        assert_eq!(hard.data().pcf_terms, filtered.data().pcf_terms);
    }

    #[test]
    fn test_budget_is_edge_triggered() {
        let mut budget = LightBudget::default();
        assert_eq!(budget.observe(10), None);
        assert_eq!(
            budget.observe(11),
            Some(BudgetTransition::EnteredOverBudget { found: 11 })
        );
        assert_eq!(budget.observe(11), None);
        assert_eq!(budget.observe(14), None);
        assert_eq!(
            budget.observe(10),
            Some(BudgetTransition::ReturnedWithinBudget { found: 10 })
        );
        assert_eq!(budget.observe(3), None);
    }

    #[test]
    fn test_block_layout() {
        let constants = ShadowConstants::new();
        assert_eq!(constants.as_bytes().len(), (60 * 16 + 4 * 4 + 4 * 4) * 4);
    }
}
