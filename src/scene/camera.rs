//! Camera system

use glam::{Mat4, Vec3};

/// Near clip distances are pushed out by this factor before intersection tests
pub const NEAR_CLIP_FUDGE: f32 = 1.001;
/// Far clip distances are pulled in by this factor before intersection tests
pub const FAR_CLIP_FUDGE: f32 = 0.999;

/// Host identifier of a camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CameraId(pub u32);

/// Camera projection type
#[derive(Debug, Clone, Copy)]
pub enum Projection {
    Perspective {
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Perspective {
            fov_y: std::f32::consts::FRAC_PI_3,
            aspect: 16.0 / 9.0,
            near: 0.3,
            far: 1000.0,
        }
    }
}

impl Projection {
    pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Projection::Perspective {
            fov_y: fov_y_degrees.to_radians(),
            aspect,
            near,
            far,
        }
    }

    pub fn orthographic(width: f32, height: f32, near: f32, far: f32) -> Self {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        Projection::Orthographic {
            left: -half_w,
            right: half_w,
            bottom: -half_h,
            top: half_h,
            near,
            far,
        }
    }

    pub fn near(&self) -> f32 {
        match self {
            Projection::Perspective { near, .. } => *near,
            Projection::Orthographic { near, .. } => *near,
        }
    }

    pub fn far(&self) -> f32 {
        match self {
            Projection::Perspective { far, .. } => *far,
            Projection::Orthographic { far, .. } => *far,
        }
    }
}

/// Camera rendered by the pipeline
#[derive(Debug, Clone)]
pub struct Camera {
    pub id: CameraId,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub projection: Projection,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            id: CameraId(0),
            position: Vec3::new(0.0, 1.0, -10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            projection: Projection::default(),
            pixel_width: 1280,
            pixel_height: 720,
        }
    }
}

impl Camera {
    pub fn new(id: CameraId, position: Vec3, target: Vec3) -> Self {
        Self {
            id,
            position,
            target,
            ..Default::default()
        }
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_pixel_size(mut self, width: u32, height: u32) -> Self {
        self.pixel_width = width;
        self.pixel_height = height;
        self
    }

    /// World-to-camera (view) matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Camera-to-world matrix
    pub fn camera_to_world(&self) -> Mat4 {
        self.view_matrix().inverse()
    }

    /// Viewing direction; the view space looks down -Z
    pub fn forward(&self) -> Vec3 {
        -self.camera_to_world().z_axis.truncate().normalize()
    }

    pub fn near_clip(&self) -> f32 {
        self.projection.near()
    }

    pub fn far_clip(&self) -> f32 {
        self.projection.far()
    }
}

/// Which clip planes a bounding volume touches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClipIntersection {
    pub near: bool,
    pub far: bool,
}

impl ClipIntersection {
    pub fn any(&self) -> bool {
        self.near || self.far
    }

    pub fn both(&self) -> bool {
        self.near && self.far
    }
}

/// Eye plane plus fudged clip distances of one camera
#[derive(Debug, Clone, Copy)]
pub struct ViewVolume {
    eye: Vec3,
    forward: Vec3,
    near_fudged: f32,
    far_fudged: f32,
}

impl ViewVolume {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            eye: camera.position,
            forward: camera.forward(),
            near_fudged: camera.near_clip() * NEAR_CLIP_FUDGE,
            far_fudged: camera.far_clip() * FAR_CLIP_FUDGE,
        }
    }

    /// Signed distance of a point in front of the eye plane
    pub fn view_distance(&self, point: Vec3) -> f32 {
        self.forward.dot(point - self.eye)
    }

    /// Conservative sphere test against the fudged near and far planes
    pub fn sphere_intersections(&self, center: Vec3, radius: f32) -> ClipIntersection {
        let distance = self.view_distance(center);
        ClipIntersection {
            near: distance - radius <= self.near_fudged,
            far: distance + radius >= self.far_fudged,
        }
    }
}
