//! Frame-scoped render target resources

use crate::backend::types::*;

/// Identifier of a named frame resource, such as a G-buffer target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub(crate) &'static str);

impl ResourceId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

/// Something that can be bound as a render target or copy source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderTarget {
    /// A temporary target acquired during the frame
    Temporary(ResourceId),
    /// The host's final display target for the current camera
    CameraTarget,
}

impl From<ResourceId> for RenderTarget {
    fn from(id: ResourceId) -> Self {
        RenderTarget::Temporary(id)
    }
}

/// Descriptor for a temporary render target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporaryTargetDesc {
    pub width: u32,
    pub height: u32,
    /// Depth buffer bits, 0 for color-only targets
    pub depth_bits: u32,
    pub filter: FilterMode,
    pub format: TextureFormat,
    pub color_space: ColorSpace,
    /// Whether the target can also be bound for unordered (UAV) writes
    pub random_write: bool,
}

impl TemporaryTargetDesc {
    /// Color target with point filtering
    pub fn color(width: u32, height: u32, format: TextureFormat, color_space: ColorSpace) -> Self {
        Self {
            width,
            height,
            depth_bits: 0,
            filter: FilterMode::Point,
            format,
            color_space,
            random_write: false,
        }
    }

    /// 24-bit depth-only target
    pub fn depth(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            depth_bits: 24,
            filter: FilterMode::Point,
            format: TextureFormat::Depth,
            color_space: ColorSpace::Linear,
            random_write: false,
        }
    }

    pub fn with_depth_bits(mut self, depth_bits: u32) -> Self {
        self.depth_bits = depth_bits;
        self
    }

    pub fn with_random_write(mut self) -> Self {
        self.random_write = true;
        self
    }

    /// Approximate memory footprint in bytes
    pub fn byte_size(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.format.bytes_per_pixel() as u64
    }
}
