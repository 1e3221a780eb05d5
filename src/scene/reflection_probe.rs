//! Visible reflection probes

use crate::backend::traits::TextureHandle;
use glam::{Mat4, Vec3, Vec4};

/// Axis-aligned bounding box stored as center and half extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub center: Vec3,
    pub extents: Vec3,
}

impl Bounds {
    pub fn new(center: Vec3, extents: Vec3) -> Self {
        Self { center, extents }
    }

    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self {
            center: (min + max) * 0.5,
            extents: (max - min) * 0.5,
        }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.extents
    }
}

/// A reflection probe that survived culling this frame
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleReflectionProbe {
    /// World-space bounds of the influence volume
    pub bounds: Bounds,
    /// Offset of the influence volume from the capture point, in probe space
    pub center: Vec3,
    pub blend_distance: f32,
    pub local_to_world: Mat4,
    pub box_projection: bool,
    /// Captured cubemap, absent while the probe hasn't been baked
    pub texture: Option<TextureHandle>,
    pub hdr_decode: Vec4,
}

impl VisibleReflectionProbe {
    /// Probe captured at `position` whose influence box is centered on the capture point
    pub fn new(position: Vec3, extents: Vec3, texture: Option<TextureHandle>) -> Self {
        Self {
            bounds: Bounds::new(position, extents),
            center: Vec3::ZERO,
            blend_distance: 1.0,
            local_to_world: Mat4::from_translation(position),
            box_projection: false,
            texture,
            hdr_decode: Vec4::new(1.0, 1.0, 0.0, 0.0),
        }
    }

    pub fn with_blend_distance(mut self, blend_distance: f32) -> Self {
        self.blend_distance = blend_distance;
        self
    }

    pub fn with_box_projection(mut self, box_projection: bool) -> Self {
        self.box_projection = box_projection;
        self
    }

    /// Capture position in world space
    pub fn position(&self) -> Vec3 {
        self.local_to_world.w_axis.truncate()
    }

    /// Influence box extents grown by the blend distance on every axis
    pub fn combined_extent(&self) -> Vec3 {
        self.bounds.extents + Vec3::splat(self.blend_distance)
    }

    /// Center of the influence volume in world space
    pub fn volume_center(&self) -> Vec3 {
        self.local_to_world.transform_point3(self.center)
    }

    /// Transform mapping the unit box mesh onto the blended influence volume
    pub fn volume_transform(&self) -> Mat4 {
        self.local_to_world
            * Mat4::from_translation(self.center)
            * Mat4::from_scale(self.combined_extent() * 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_min_max() {
        let bounds = Bounds::from_min_max(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, 4.0, 6.0));
        assert_eq!(bounds.center, Vec3::new(1.0, 2.0, 4.0));
        assert_eq!(bounds.extents, Vec3::splat(2.0));
        assert_eq!(bounds.min(), Vec3::new(-1.0, 0.0, 2.0));
    }

    #[test]
    fn test_volume_transform_scales_unit_box() {
        let probe = VisibleReflectionProbe::new(Vec3::new(10.0, 0.0, 0.0), Vec3::splat(2.0), None)
            .with_blend_distance(0.5);
        let corner = probe.volume_transform().transform_point3(Vec3::splat(0.5));
        assert!((corner - Vec3::new(12.5, 2.5, 2.5)).length() < 1e-5);
    }
}
