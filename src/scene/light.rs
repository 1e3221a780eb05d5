//! Visible light types produced by culling

use crate::backend::traits::TextureHandle;
use bitflags::bitflags;
use glam::{Mat4, Quat, Vec3, Vec4};

/// Light type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightType {
    Spot,
    Directional,
    Point,
}

impl LightType {
    /// Numeric code the lighting shaders expect
    pub fn shader_code(&self) -> f32 {
        match self {
            LightType::Spot => 0.0,
            LightType::Directional => 1.0,
            LightType::Point => 2.0,
        }
    }

    /// Whether the light has a finite volume
    pub fn is_local(&self) -> bool {
        !matches!(self, LightType::Directional)
    }
}

/// Shadow casting mode of a light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightShadows {
    #[default]
    None,
    Hard,
    Soft,
}

bitflags! {
    /// Flags reported by the host's culling for each visible light
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct VisibleLightFlags: u32 {
        const INTERSECTS_NEAR_PLANE = 1 << 0;
        const INTERSECTS_FAR_PLANE = 1 << 1;
    }
}

/// A light that survived culling this frame
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleLight {
    pub light_type: LightType,
    pub local_to_world: Mat4,
    pub range: f32,
    /// Full cone angle in degrees, spot lights only
    pub spot_angle: f32,
    /// Linear color premultiplied by intensity
    pub final_color: Vec4,
    pub cookie: Option<TextureHandle>,
    pub shadows: LightShadows,
    pub flags: VisibleLightFlags,
}

impl VisibleLight {
    pub fn point(position: Vec3, range: f32, color: Vec3, intensity: f32) -> Self {
        Self {
            light_type: LightType::Point,
            local_to_world: Mat4::from_translation(position),
            range,
            spot_angle: 0.0,
            final_color: (color * intensity).extend(1.0),
            cookie: None,
            shadows: LightShadows::None,
            flags: VisibleLightFlags::empty(),
        }
    }

    pub fn spot(
        position: Vec3,
        direction: Vec3,
        range: f32,
        spot_angle: f32,
        color: Vec3,
        intensity: f32,
    ) -> Self {
        Self {
            light_type: LightType::Spot,
            local_to_world: Mat4::from_rotation_translation(look_rotation(direction), position),
            range,
            spot_angle,
            final_color: (color * intensity).extend(1.0),
            cookie: None,
            shadows: LightShadows::None,
            flags: VisibleLightFlags::empty(),
        }
    }

    pub fn directional(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            light_type: LightType::Directional,
            local_to_world: Mat4::from_quat(look_rotation(direction)),
            range: 0.0,
            spot_angle: 0.0,
            final_color: (color * intensity).extend(1.0),
            cookie: None,
            shadows: LightShadows::None,
            flags: VisibleLightFlags::empty(),
        }
    }

    pub fn with_cookie(mut self, cookie: TextureHandle) -> Self {
        self.cookie = Some(cookie);
        self
    }

    pub fn with_shadows(mut self, shadows: LightShadows) -> Self {
        self.shadows = shadows;
        self
    }

    pub fn with_flags(mut self, flags: VisibleLightFlags) -> Self {
        self.flags = flags;
        self
    }

    /// World position (translation column)
    pub fn position(&self) -> Vec3 {
        self.local_to_world.w_axis.truncate()
    }

    /// Light forward axis (local +Z)
    pub fn direction(&self) -> Vec3 {
        self.local_to_world.z_axis.truncate()
    }

    pub fn world_to_light(&self) -> Mat4 {
        self.local_to_world.inverse()
    }

    pub fn casts_shadows(&self) -> bool {
        self.shadows != LightShadows::None
    }
}

/// Rotation taking local +Z onto `direction`
fn look_rotation(direction: Vec3) -> Quat {
    let direction = direction.normalize_or_zero();
    if direction == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(Vec3::Z, direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spot_axes() {
        let light = VisibleLight::spot(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.0, -1.0, 0.0),
            5.0,
            60.0,
            Vec3::ONE,
            2.0,
        );
        assert_eq!(light.position(), Vec3::new(1.0, 2.0, 3.0));
        assert!((light.direction() - Vec3::NEG_Y).length() < 1e-5);
        assert_eq!(light.final_color, Vec4::new(2.0, 2.0, 2.0, 1.0));
    }

    #[test]
    fn test_world_to_light_inverts() {
        let light = VisibleLight::point(Vec3::new(4.0, 0.0, 0.0), 3.0, Vec3::ONE, 1.0);
        let local = light.world_to_light().transform_point3(Vec3::new(4.0, 0.0, 0.0));
        assert!(local.length() < 1e-5);
    }

    #[test]
    fn test_shader_codes_are_distinct() {
        assert_ne!(LightType::Spot.shader_code(), LightType::Point.shader_code());
        assert!(!LightType::Directional.is_local());
        assert!(LightType::Spot.is_local());
    }
}
