//! Per-light classification for the lighting pass
//!
//! Decides how each visible light is rasterized (full-screen quad or proxy
//! volume), which shader variant it uses, and derives the light-space
//! matrices the deferred lighting shader samples cookies and shadows with.

use crate::backend::traits::TextureHandle;
use crate::pipeline::config::PipelineConfig;
use crate::render_graph::ShaderKeyword;
use crate::scene::{LightType, ViewVolume, VisibleLight, VisibleLightFlags};
use glam::{Mat4, Vec3, Vec4};

/// How a light is rasterized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightRenderStyle {
    /// Full-screen quad with the always-pass material
    Quad,
    /// Proxy mesh with back-face culling and depth testing
    Volume,
}

/// Everything the lighting pass needs to draw one light
#[derive(Debug, Clone, PartialEq)]
pub struct LightClassification {
    pub style: LightRenderStyle,
    pub keyword: ShaderKeyword,
    pub light_to_world: Mat4,
    pub world_to_light: Mat4,
    /// Cookie projection (`_LightMatrix0`), spot and directional lights only
    pub light_matrix: Option<Mat4>,
    /// Draw transform; identity when drawn as a quad
    pub mesh_transform: Mat4,
    pub cookie: Option<TextureHandle>,
}

impl LightClassification {
    pub fn as_quad(&self) -> bool {
        self.style == LightRenderStyle::Quad
    }
}

/// Cotangent of half the full cone angle, in degrees
pub fn cotan_half_spot_angle(spot_angle: f32) -> f32 {
    let half = 0.5 * spot_angle.to_radians();
    half.cos() / half.sin()
}

/// Right-handed perspective projection built from a cotangent
pub fn perspective_cotan(cotangent: f32, z_near: f32, z_far: f32) -> Mat4 {
    let delta_z = z_near - z_far;
    Mat4::from_cols(
        Vec4::new(cotangent, 0.0, 0.0, 0.0),
        Vec4::new(0.0, cotangent, 0.0, 0.0),
        Vec4::new(0.0, 0.0, (z_far + z_near) / delta_z, -1.0),
        Vec4::new(0.0, 0.0, 2.0 * z_near * z_far / delta_z, 0.0),
    )
}

/// Whether a light must be drawn as a full-screen quad
fn needs_quad(light: &VisibleLight, view: &ViewVolume) -> bool {
    if !light.light_type.is_local() {
        return true;
    }
    let clipped =
        VisibleLightFlags::INTERSECTS_NEAR_PLANE | VisibleLightFlags::INTERSECTS_FAR_PLANE;
    if light.flags.intersects(clipped) {
        return true;
    }
    view.sphere_intersections(light.position(), light.range).any()
}

/// Classify a visible light for one camera
pub fn classify(
    light: &VisibleLight,
    view: &ViewVolume,
    config: &PipelineConfig,
) -> LightClassification {
    let light_to_world = light.local_to_world;
    let world_to_light = light.world_to_light();
    let style = if needs_quad(light, view) {
        LightRenderStyle::Quad
    } else {
        LightRenderStyle::Volume
    };
    let range = light.range;

    let (keyword, light_matrix, volume_transform, cookie) = match light.light_type {
        LightType::Point => {
            let keyword = if light.cookie.is_some() {
                ShaderKeyword::PointCookie
            } else {
                ShaderKeyword::Point
            };
            let scale = range * config.point_light_mesh_scale;
            let transform = Mat4::from_scale_rotation_translation(
                Vec3::splat(scale),
                glam::Quat::IDENTITY,
                light.position(),
            );
            (keyword, None, transform, light.cookie)
        }
        LightType::Spot => {
            let cot = cotan_half_spot_angle(light.spot_angle);
            let light_matrix = Mat4::from_translation(Vec3::new(0.5, 0.5, 0.0))
                * Mat4::from_scale(Vec3::new(-0.5, -0.5, 1.0))
                * perspective_cotan(cot, 0.0, range)
                * world_to_light;

            let side = range / cot;
            let scale = config.spot_light_mesh_scale;
            let cone_scale = Vec3::new(side * scale, side * scale, range * scale);
            let transform = light_to_world * Mat4::from_scale(cone_scale);

            let cookie = light.cookie.or(config.default_spot_cookie);
            (ShaderKeyword::Spot, Some(light_matrix), transform, cookie)
        }
        LightType::Directional => {
            let keyword = if light.cookie.is_some() {
                ShaderKeyword::DirectionalCookie
            } else {
                ShaderKeyword::Directional
            };
            let light_matrix = Mat4::from_translation(Vec3::new(0.5, 0.5, 0.0))
                * Mat4::from_scale(Vec3::new(1.0, 1.0, 0.0))
                * world_to_light;
            (keyword, Some(light_matrix), Mat4::IDENTITY, light.cookie)
        }
    };

    let mesh_transform = match style {
        LightRenderStyle::Quad => Mat4::IDENTITY,
        LightRenderStyle::Volume => volume_transform,
    };

    LightClassification {
        style,
        keyword,
        light_to_world,
        world_to_light,
        light_matrix,
        mesh_transform,
        cookie,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Camera, CameraId, Projection};
    use rstest::rstest;

    fn view() -> ViewVolume {
        let camera = Camera::new(CameraId(0), Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0))
            .with_projection(Projection::perspective(60.0, 1.0, 0.3, 100.0));
        ViewVolume::from_camera(&camera)
    }

    #[rstest]
    #[case(90.0, 1.0)]
    #[case(60.0, 3.0f32.sqrt())]
    #[case(120.0, 1.0 / 3.0f32.sqrt())]
    fn test_cotan_half_spot_angle(#[case] angle: f32, #[case] expected: f32) {
        assert!((cotan_half_spot_angle(angle) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_perspective_cotan_maps_depth_range() {
        let m = perspective_cotan(1.0, 1.0, 10.0);
        // Near plane maps to -1, far plane to +1 after the divide
        let near = m * Vec4::new(0.0, 0.0, -1.0, 1.0);
        let far = m * Vec4::new(0.0, 0.0, -10.0, 1.0);
        assert!((near.z / near.w + 1.0).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_point_volume() {
        let light = VisibleLight::point(Vec3::new(0.0, 0.0, 20.0), 3.0, Vec3::ONE, 1.0);
        let class = classify(&light, &view(), &PipelineConfig::default());

        assert_eq!(class.style, LightRenderStyle::Volume);
        assert_eq!(class.keyword, ShaderKeyword::Point);
        assert_eq!(class.light_matrix, None);
        let expected = Mat4::from_scale_rotation_translation(
            Vec3::splat(6.0),
            glam::Quat::IDENTITY,
            Vec3::new(0.0, 0.0, 20.0),
        );
        assert_eq!(class.mesh_transform, expected);
    }

    #[test]
    fn test_point_cookie_variant() {
        let light = VisibleLight::point(Vec3::new(0.0, 0.0, 20.0), 3.0, Vec3::ONE, 1.0)
            .with_cookie(TextureHandle(5));
        let class = classify(&light, &view(), &PipelineConfig::default());
        assert_eq!(class.keyword, ShaderKeyword::PointCookie);
        assert_eq!(class.cookie, Some(TextureHandle(5)));
    }

    #[test]
    fn test_point_near_plane_becomes_quad() {
        let light = VisibleLight::point(Vec3::new(0.0, 0.0, 2.0), 3.0, Vec3::ONE, 1.0);
        let class = classify(&light, &view(), &PipelineConfig::default());
        assert!(class.as_quad());
        assert_eq!(class.mesh_transform, Mat4::IDENTITY);
    }

    #[test]
    fn test_host_flags_force_quad() {
        let light = VisibleLight::point(Vec3::new(0.0, 0.0, 50.0), 1.0, Vec3::ONE, 1.0)
            .with_flags(VisibleLightFlags::INTERSECTS_FAR_PLANE);
        let class = classify(&light, &view(), &PipelineConfig::default());
        assert!(class.as_quad());
    }

    #[test]
    fn test_spot_volume_and_default_cookie() {
        let light = VisibleLight::spot(
            Vec3::new(0.0, 0.0, 30.0),
            Vec3::Z,
            10.0,
            90.0,
            Vec3::ONE,
            1.0,
        );
        let config = PipelineConfig::default().with_default_spot_cookie(TextureHandle(9));
        let class = classify(&light, &view(), &config);

        assert_eq!(class.style, LightRenderStyle::Volume);
        assert_eq!(class.keyword, ShaderKeyword::Spot);
        assert_eq!(class.cookie, Some(TextureHandle(9)));
        assert!(class.light_matrix.is_some());

        // cot(45°) = 1, so the cone base is 10 wide and 10 deep
        let base = class.mesh_transform.transform_point3(Vec3::new(1.0, 0.0, 1.0));
        assert!((base - Vec3::new(10.0, 0.0, 40.0)).length() < 1e-3);
    }

    #[test]
    fn test_spot_cookie_keeps_plain_variant() {
        let light =
            VisibleLight::spot(Vec3::new(0.0, 0.0, 30.0), Vec3::Z, 10.0, 45.0, Vec3::ONE, 1.0)
                .with_cookie(TextureHandle(2));
        let config = PipelineConfig::default().with_default_spot_cookie(TextureHandle(9));
        let class = classify(&light, &view(), &config);
        assert_eq!(class.keyword, ShaderKeyword::Spot);
        assert_eq!(class.cookie, Some(TextureHandle(2)));
    }

    #[test]
    fn test_directional_always_quad() {
        let light = VisibleLight::directional(Vec3::NEG_Y, Vec3::ONE, 1.0);
        let class = classify(&light, &view(), &PipelineConfig::default());
        assert!(class.as_quad());
        assert_eq!(class.keyword, ShaderKeyword::Directional);

        let expected = Mat4::from_translation(Vec3::new(0.5, 0.5, 0.0))
            * Mat4::from_scale(Vec3::new(1.0, 1.0, 0.0))
            * light.world_to_light();
        assert_eq!(class.light_matrix, Some(expected));

        let cookie = light.clone().with_cookie(TextureHandle(1));
        let class = classify(&cookie, &view(), &PipelineConfig::default());
        assert_eq!(class.keyword, ShaderKeyword::DirectionalCookie);
    }
}
