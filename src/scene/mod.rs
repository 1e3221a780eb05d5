//! Scene inputs: cameras, visible lights and reflection probes

mod camera;
mod culling;
mod light;
mod reflection_probe;

pub use camera::*;
pub use culling::*;
pub use light::*;
pub use reflection_probe::*;

use crate::backend::traits::TextureHandle;
use glam::Vec3;

/// Flat scene description used by hosts that don't perform their own culling
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub lights: Vec<VisibleLight>,
    pub reflection_probes: Vec<VisibleReflectionProbe>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a point light to the scene
    pub fn add_point_light(&mut self, position: Vec3, color: Vec3, intensity: f32, range: f32) {
        self.lights
            .push(VisibleLight::point(position, range, color, intensity));
    }

    /// Add a spot light to the scene
    pub fn add_spot_light(
        &mut self,
        position: Vec3,
        direction: Vec3,
        color: Vec3,
        intensity: f32,
        range: f32,
        spot_angle: f32,
    ) {
        self.lights.push(VisibleLight::spot(
            position, direction, range, spot_angle, color, intensity,
        ));
    }

    /// Add a directional light to the scene
    pub fn add_directional_light(&mut self, direction: Vec3, color: Vec3, intensity: f32) {
        self.lights
            .push(VisibleLight::directional(direction, color, intensity));
    }

    /// Add any prepared light
    pub fn add_light(&mut self, light: VisibleLight) {
        self.lights.push(light);
    }

    /// Add a reflection probe whose box is centered on its capture point
    pub fn add_reflection_probe(
        &mut self,
        position: Vec3,
        extents: Vec3,
        cubemap: Option<TextureHandle>,
    ) {
        self.reflection_probes
            .push(VisibleReflectionProbe::new(position, extents, cubemap));
    }

    /// Everything in the scene, treated as visible
    pub fn cull_results(&self) -> CullResults {
        CullResults {
            visible_lights: self.lights.clone(),
            visible_reflection_probes: self.reflection_probes.clone(),
        }
    }
}
