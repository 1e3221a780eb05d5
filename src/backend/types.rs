//! Common types shared between the pipeline and its host

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};

/// Render texture format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// 4x8-bit color
    Rgba8Unorm,
    /// 10-bit color channels with a 2-bit alpha
    Rgb10A2Unorm,
    /// Default HDR color format
    Rgba16Float,
    /// Single channel 32-bit float
    R32Float,
    /// Depth-only format, bit depth given by the target descriptor
    Depth,
}

impl TextureFormat {
    pub fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::Depth)
    }

    pub fn is_hdr(&self) -> bool {
        matches!(self, TextureFormat::Rgba16Float | TextureFormat::R32Float)
    }

    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            TextureFormat::Rgba8Unorm
            | TextureFormat::Rgb10A2Unorm
            | TextureFormat::R32Float
            | TextureFormat::Depth => 4,
            TextureFormat::Rgba16Float => 8,
        }
    }
}

/// How color values written to a target are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    /// Whatever the host's project color space is (sRGB writes in gamma-correct projects)
    #[default]
    Default,
    /// No sRGB conversion
    Linear,
}

/// Filter mode for sampling render targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    Point,
    Bilinear,
}

/// Cull mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    Off,
    Front,
    Back,
}

/// Compare function for depth testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareFunction {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

/// Blend factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    Src,
    OneMinusSrc,
    SrcAlpha,
    OneMinusSrcAlpha,
    Dst,
    OneMinusDst,
    DstAlpha,
    OneMinusDstAlpha,
}

/// Blend component state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendComponent {
    pub src_factor: BlendFactor,
    pub dst_factor: BlendFactor,
}

impl Default for BlendComponent {
    fn default() -> Self {
        Self {
            src_factor: BlendFactor::One,
            dst_factor: BlendFactor::Zero,
        }
    }
}

impl BlendComponent {
    pub const fn new(src_factor: BlendFactor, dst_factor: BlendFactor) -> Self {
        Self {
            src_factor,
            dst_factor,
        }
    }
}

/// Blend state, always combined with an additive blend operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlendState {
    pub color: BlendComponent,
    pub alpha: BlendComponent,
}

impl BlendState {
    /// `dst.rgb += src.rgb`, `dst.a = src.a`
    pub fn additive() -> Self {
        Self {
            color: BlendComponent::new(BlendFactor::One, BlendFactor::One),
            alpha: BlendComponent::new(BlendFactor::One, BlendFactor::Zero),
        }
    }

    /// `dst.rgb += dst.a * src.rgb`, `dst.a *= src.a`
    ///
    /// Lets a sequence of draws behave like nested lerps when issued back to front.
    pub fn destination_alpha_accumulate() -> Self {
        Self {
            color: BlendComponent::new(BlendFactor::DstAlpha, BlendFactor::One),
            alpha: BlendComponent::new(BlendFactor::DstAlpha, BlendFactor::Zero),
        }
    }
}

/// Fixed-function state of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    pub blend: BlendState,
    pub cull_mode: CullMode,
    pub depth_compare: CompareFunction,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            blend: BlendState::default(),
            cull_mode: CullMode::Back,
            depth_compare: CompareFunction::LessEqual,
        }
    }
}

/// Standard vertex with position, normal, UV, and tangent
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub tangent: Vec4,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
            tangent: Vec4::new(1.0, 0.0, 0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 48);
    }

    #[test]
    fn test_format_queries() {
        assert!(TextureFormat::Depth.is_depth());
        assert!(!TextureFormat::Rgb10A2Unorm.is_depth());
        assert!(TextureFormat::Rgba16Float.is_hdr());
        assert_eq!(TextureFormat::Rgba16Float.bytes_per_pixel(), 8);
    }
}
