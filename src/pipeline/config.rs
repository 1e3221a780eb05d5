//! Pipeline configuration

use crate::backend::traits::{MeshHandle, ShaderHandle, TextureHandle};
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::shadow::ShadowSettings;
use crate::pipeline::shadow_constants::MAX_DIRECTIONAL_SPLITS;
use serde::{Deserialize, Serialize};

/// Shaders the pipeline materials are built from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderSet {
    pub final_pass: ShaderHandle,
    pub deferred_lighting: ShaderHandle,
    pub deferred_reflections: ShaderHandle,
}

/// Host meshes to use instead of the generated proxies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyMeshConfig {
    pub quad: Option<MeshHandle>,
    pub cube: Option<MeshHandle>,
    pub point_light: Option<MeshHandle>,
    pub spot_light: Option<MeshHandle>,
}

/// Configuration for the classic deferred pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub shadows: ShadowSettings,
    /// Scale applied to `range` for the point light sphere; the default
    /// sphere has radius 0.5, so 2.0 makes it match the light range
    pub point_light_mesh_scale: f32,
    pub spot_light_mesh_scale: f32,
    /// Cookie bound for spot lights without their own
    pub default_spot_cookie: Option<TextureHandle>,
    pub shaders: ShaderSet,
    pub proxy_meshes: ProxyMeshConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            shadows: ShadowSettings::default(),
            point_light_mesh_scale: 2.0,
            spot_light_mesh_scale: 1.0,
            default_spot_cookie: None,
            shaders: ShaderSet::default(),
            proxy_meshes: ProxyMeshConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn with_shaders(mut self, shaders: ShaderSet) -> Self {
        self.shaders = shaders;
        self
    }

    pub fn with_shadow_settings(mut self, shadows: ShadowSettings) -> Self {
        self.shadows = shadows;
        self
    }

    pub fn with_default_spot_cookie(mut self, cookie: TextureHandle) -> Self {
        self.default_spot_cookie = Some(cookie);
        self
    }

    pub fn with_proxy_meshes(mut self, proxy_meshes: ProxyMeshConfig) -> Self {
        self.proxy_meshes = proxy_meshes;
        self
    }

    pub fn with_mesh_scales(mut self, point: f32, spot: f32) -> Self {
        self.point_light_mesh_scale = point;
        self.spot_light_mesh_scale = spot;
        self
    }

    /// Check the values the pipeline divides by or sizes arrays with
    pub fn validate(&self) -> PipelineResult<()> {
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !positive(self.point_light_mesh_scale) {
            return Err(PipelineError::InvalidConfig(format!(
                "point light mesh scale must be positive, got {}",
                self.point_light_mesh_scale
            )));
        }
        if !positive(self.spot_light_mesh_scale) {
            return Err(PipelineError::InvalidConfig(format!(
                "spot light mesh scale must be positive, got {}",
                self.spot_light_mesh_scale
            )));
        }
        if self.shadows.atlas_width == 0 || self.shadows.atlas_height == 0 {
            return Err(PipelineError::InvalidConfig(format!(
                "shadow atlas must not be empty, got {}x{}",
                self.shadows.atlas_width, self.shadows.atlas_height
            )));
        }
        if !positive(self.shadows.max_distance) {
            return Err(PipelineError::InvalidConfig(format!(
                "shadow distance must be positive, got {}",
                self.shadows.max_distance
            )));
        }
        if self.shadows.cascade_count == 0
            || self.shadows.cascade_count as usize > MAX_DIRECTIONAL_SPLITS
        {
            return Err(PipelineError::InvalidConfig(format!(
                "cascade count must be between 1 and {}, got {}",
                MAX_DIRECTIONAL_SPLITS, self.shadows.cascade_count
            )));
        }
        Ok(())
    }
}
