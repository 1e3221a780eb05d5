//! Shadow service interface
//!
//! Shadow map rendering is owned by an external service. The pipeline only
//! lets it adjust culling, asks it to render, and consumes the resulting
//! [`ShadowOutput`] when packing shader constants.

use crate::backend::traits::RenderHost;
use crate::error::PipelineResult;
use crate::scene::{CullResults, CullingParameters};
use glam::{Mat4, Vec4};
use serde::{Deserialize, Serialize};

/// Filtering applied when sampling the shadow atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShadowTechnique {
    /// Single tap
    Hard,
    /// Weighted 3x3 percentage-closer filter
    #[default]
    Pcf3x3,
}

/// Shadow atlas and cascade settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowSettings {
    pub enabled: bool,
    pub atlas_width: u32,
    pub atlas_height: u32,
    /// Filter the shadow service compiles into its receivers. The pipeline
    /// pushes the same 3x3 PCF terms for every technique.
    pub technique: ShadowTechnique,
    /// Distance from the camera beyond which casters are culled
    pub max_distance: f32,
    /// Number of directional cascades, at most 4
    pub cascade_count: u32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            atlas_width: 1024,
            atlas_height: 1024,
            technique: ShadowTechnique::Pcf3x3,
            max_distance: 1000.0,
            cascade_count: 4,
        }
    }
}

impl ShadowSettings {
    pub fn with_atlas_size(mut self, width: u32, height: u32) -> Self {
        self.atlas_width = width;
        self.atlas_height = height;
        self
    }

    pub fn with_technique(mut self, technique: ShadowTechnique) -> Self {
        self.technique = technique;
        self
    }

    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn with_cascade_count(mut self, cascade_count: u32) -> Self {
        self.cascade_count = cascade_count;
        self
    }
}

/// One rendered shadow map inside the atlas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSlice {
    /// World space to shadow-map texture space
    pub shadow_transform: Mat4,
    pub atlas_x: u32,
    pub atlas_y: u32,
    pub atlas_width: u32,
    pub atlas_height: u32,
}

impl ShadowSlice {
    pub fn new(shadow_transform: Mat4) -> Self {
        Self {
            shadow_transform,
            atlas_x: 0,
            atlas_y: 0,
            atlas_width: 0,
            atlas_height: 0,
        }
    }

    pub fn with_atlas_rect(mut self, x: u32, y: u32, width: u32, height: u32) -> Self {
        self.atlas_x = x;
        self.atlas_y = y;
        self.atlas_width = width;
        self.atlas_height = height;
        self
    }
}

/// Range of [`ShadowOutput::slices`] owned by one visible light
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShadowSliceRange {
    pub start: usize,
    pub count: usize,
}

/// Result of one shadow render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShadowOutput {
    pub slices: Vec<ShadowSlice>,
    /// Indexed by visible light; lights past the end have no slices
    pub light_slices: Vec<ShadowSliceRange>,
    /// Squared-radius spheres bounding the directional cascades
    pub directional_split_spheres_sqr: [Vec4; 4],
}

impl ShadowOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append slices for the next visible light
    pub fn push_light(&mut self, slices: impl IntoIterator<Item = ShadowSlice>) {
        let start = self.slices.len();
        self.slices.extend(slices);
        self.light_slices.push(ShadowSliceRange {
            start,
            count: self.slices.len() - start,
        });
    }

    pub fn with_split_spheres(mut self, spheres: [Vec4; 4]) -> Self {
        self.directional_split_spheres_sqr = spheres;
        self
    }

    /// Number of slices rendered for a visible light
    pub fn slice_count(&self, light: usize) -> usize {
        self.light_slices.get(light).map_or(0, |range| range.count)
    }

    /// Index into [`Self::slices`] of slice `s` of a visible light
    pub fn slice_index(&self, light: usize, s: usize) -> Option<usize> {
        let range = self.light_slices.get(light)?;
        (s < range.count).then_some(range.start + s)
    }

    pub fn slice(&self, light: usize, s: usize) -> Option<&ShadowSlice> {
        self.slices.get(self.slice_index(light, s)?)
    }
}

/// External service rendering shadow maps for a camera
pub trait ShadowRenderer {
    /// Adjust culling so shadow casters outside the view are kept
    fn update_culling_parameters(&self, params: &mut CullingParameters);

    /// Render the shadow maps for the visible lights
    fn render<H: RenderHost>(
        &mut self,
        host: &mut H,
        cull: &CullResults,
    ) -> PipelineResult<ShadowOutput>;
}

/// Shadow service returning a fixed output every frame
#[derive(Debug, Clone, Default)]
pub struct StaticShadows {
    settings: ShadowSettings,
    output: ShadowOutput,
}

impl StaticShadows {
    pub fn new(settings: ShadowSettings, output: ShadowOutput) -> Self {
        Self { settings, output }
    }

    pub fn settings(&self) -> &ShadowSettings {
        &self.settings
    }

    pub fn set_output(&mut self, output: ShadowOutput) {
        self.output = output;
    }
}

impl ShadowRenderer for StaticShadows {
    fn update_culling_parameters(&self, params: &mut CullingParameters) {
        params.shadow_distance = if self.settings.enabled {
            self.settings.max_distance
        } else {
            0.0
        };
    }

    fn render<H: RenderHost>(
        &mut self,
        _host: &mut H,
        _cull: &CullResults,
    ) -> PipelineResult<ShadowOutput> {
        if !self.settings.enabled {
            return Ok(ShadowOutput::default());
        }
        Ok(self.output.clone())
    }
}
