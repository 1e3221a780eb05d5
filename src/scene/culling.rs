//! Culling inputs and outputs exchanged with the host

use crate::scene::{CameraId, VisibleLight, VisibleReflectionProbe};

/// Parameters the host culls a camera with
#[derive(Debug, Clone, PartialEq)]
pub struct CullingParameters {
    pub camera: CameraId,
    /// Distance up to which shadow casters are kept, set by the shadow service
    pub shadow_distance: f32,
}

impl CullingParameters {
    pub fn new(camera: CameraId) -> Self {
        Self {
            camera,
            shadow_distance: 0.0,
        }
    }
}

/// Per-camera culling results, in visibility order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CullResults {
    pub visible_lights: Vec<VisibleLight>,
    pub visible_reflection_probes: Vec<VisibleReflectionProbe>,
}

impl CullResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.visible_lights.is_empty() && self.visible_reflection_probes.is_empty()
    }
}
