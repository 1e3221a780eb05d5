//! Recorded GPU commands
//!
//! Passes never touch the host directly while recording. They append
//! [`Command`]s to a [`CommandBuffer`] which the frame executor hands to the
//! host in order.

use crate::backend::traits::{MaterialHandle, MeshHandle, TextureHandle};
use crate::render_graph::resource::*;
use crate::scene::CameraId;
use bitflags::bitflags;
use glam::{Mat4, Vec4};

/// Shader keywords toggled by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKeyword {
    Point,
    PointCookie,
    Spot,
    Directional,
    DirectionalCookie,
    /// Forces HDR emission encoding in the G-buffer shaders
    HdrOn,
}

impl ShaderKeyword {
    /// Keywords selecting the light variant of the deferred lighting shader
    pub const LIGHT_VARIANTS: [ShaderKeyword; 5] = [
        ShaderKeyword::Point,
        ShaderKeyword::PointCookie,
        ShaderKeyword::Spot,
        ShaderKeyword::Directional,
        ShaderKeyword::DirectionalCookie,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShaderKeyword::Point => "POINT",
            ShaderKeyword::PointCookie => "POINT_COOKIE",
            ShaderKeyword::Spot => "SPOT",
            ShaderKeyword::Directional => "DIRECTIONAL",
            ShaderKeyword::DirectionalCookie => "DIRECTIONAL_COOKIE",
            ShaderKeyword::HdrOn => "UNITY_HDR_ON",
        }
    }
}

/// A single per-draw shader property value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Float(f32),
    Vector(Vec4),
    Matrix(Mat4),
}

/// Per-draw uniform payload layered over a shared material
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBlock {
    values: Vec<(&'static str, PropertyValue)>,
}

impl PropertyBlock {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&mut self, name: &'static str, value: PropertyValue) {
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn set_float(&mut self, name: &'static str, value: f32) {
        self.set(name, PropertyValue::Float(value));
    }

    pub fn set_vector(&mut self, name: &'static str, value: Vec4) {
        self.set(name, PropertyValue::Vector(value));
    }

    pub fn set_matrix(&mut self, name: &'static str, value: Mat4) {
        self.set(name, PropertyValue::Matrix(value));
    }

    pub fn get(&self, name: &str) -> Option<PropertyValue> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            PropertyValue::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn vector(&self, name: &str) -> Option<Vec4> {
        match self.get(name)? {
            PropertyValue::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn matrix(&self, name: &str) -> Option<Mat4> {
        match self.get(name)? {
            PropertyValue::Matrix(m) => Some(m),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A mesh draw with its material and per-draw properties
#[derive(Debug, Clone, PartialEq)]
pub struct DrawMesh {
    pub mesh: MeshHandle,
    pub transform: Mat4,
    pub material: MaterialHandle,
    pub properties: PropertyBlock,
}

/// Sort order requested from the host's renderer batcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Front to back, grouped by material where possible
    CommonOpaque,
}

/// Render queue range filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderQueueRange {
    pub min: u32,
    pub max: u32,
}

impl RenderQueueRange {
    pub const OPAQUE: Self = Self { min: 0, max: 2500 };
}

bitflags! {
    /// Per-object data the host must provide to the shader pass
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PerObjectData: u32 {
        const LIGHTMAPS = 1 << 0;
        const LIGHT_PROBE = 1 << 1;
    }
}

/// Request to draw the host's visible renderers with a tagged shader pass
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRenderersSettings {
    pub camera: CameraId,
    pub shader_pass: &'static str,
    pub sorting: SortMode,
    pub queue: RenderQueueRange,
    pub per_object_data: PerObjectData,
}

/// A recorded command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetupCameraProperties(CameraId),
    GetTemporaryRt {
        id: ResourceId,
        desc: TemporaryTargetDesc,
    },
    ReleaseTemporaryRt(ResourceId),
    SetRenderTarget {
        color: Vec<RenderTarget>,
        depth: Option<RenderTarget>,
    },
    ClearRenderTarget {
        depth: bool,
        color: bool,
        value: Vec4,
    },
    EnableKeyword(ShaderKeyword),
    DisableKeyword(ShaderKeyword),
    SetGlobalTexture {
        name: &'static str,
        texture: TextureHandle,
    },
    SetGlobalVector {
        name: &'static str,
        value: Vec4,
    },
    SetGlobalVectorArray {
        name: &'static str,
        values: Vec<Vec4>,
    },
    SetGlobalMatrixArray {
        name: &'static str,
        values: Vec<Mat4>,
    },
    DrawMesh(DrawMesh),
    DrawRenderers(DrawRenderersSettings),
    DrawSkybox(CameraId),
    CopyTexture {
        src: RenderTarget,
        dst: RenderTarget,
    },
    Blit {
        src: RenderTarget,
        dst: RenderTarget,
        material: MaterialHandle,
    },
}

/// A named list of recorded commands
#[derive(Debug, Clone, PartialEq)]
pub struct CommandBuffer {
    name: String,
    commands: Vec<Command>,
}

impl CommandBuffer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterate the mesh draws in recording order
    pub fn draws(&self) -> impl Iterator<Item = &DrawMesh> {
        self.commands.iter().filter_map(|c| match c {
            Command::DrawMesh(draw) => Some(draw),
            _ => None,
        })
    }

    pub fn setup_camera_properties(&mut self, camera: CameraId) {
        self.commands.push(Command::SetupCameraProperties(camera));
    }

    pub fn get_temporary_rt(&mut self, id: ResourceId, desc: TemporaryTargetDesc) {
        self.commands.push(Command::GetTemporaryRt { id, desc });
    }

    pub fn release_temporary_rt(&mut self, id: ResourceId) {
        self.commands.push(Command::ReleaseTemporaryRt(id));
    }

    pub fn set_render_target(&mut self, color: &[RenderTarget], depth: Option<RenderTarget>) {
        self.commands.push(Command::SetRenderTarget {
            color: color.to_vec(),
            depth,
        });
    }

    pub fn clear_render_target(&mut self, depth: bool, color: bool, value: Vec4) {
        self.commands
            .push(Command::ClearRenderTarget { depth, color, value });
    }

    pub fn enable_keyword(&mut self, keyword: ShaderKeyword) {
        self.commands.push(Command::EnableKeyword(keyword));
    }

    pub fn disable_keyword(&mut self, keyword: ShaderKeyword) {
        self.commands.push(Command::DisableKeyword(keyword));
    }

    pub fn set_global_texture(&mut self, name: &'static str, texture: TextureHandle) {
        self.commands
            .push(Command::SetGlobalTexture { name, texture });
    }

    pub fn set_global_vector(&mut self, name: &'static str, value: Vec4) {
        self.commands.push(Command::SetGlobalVector { name, value });
    }

    pub fn set_global_vector_array(&mut self, name: &'static str, values: &[Vec4]) {
        self.commands.push(Command::SetGlobalVectorArray {
            name,
            values: values.to_vec(),
        });
    }

    pub fn set_global_matrix_array(&mut self, name: &'static str, values: &[Mat4]) {
        self.commands.push(Command::SetGlobalMatrixArray {
            name,
            values: values.to_vec(),
        });
    }

    pub fn draw_mesh(
        &mut self,
        mesh: MeshHandle,
        transform: Mat4,
        material: MaterialHandle,
        properties: PropertyBlock,
    ) {
        self.commands.push(Command::DrawMesh(DrawMesh {
            mesh,
            transform,
            material,
            properties,
        }));
    }

    pub fn draw_renderers(&mut self, settings: DrawRenderersSettings) {
        self.commands.push(Command::DrawRenderers(settings));
    }

    pub fn draw_skybox(&mut self, camera: CameraId) {
        self.commands.push(Command::DrawSkybox(camera));
    }

    pub fn copy_texture(&mut self, src: RenderTarget, dst: RenderTarget) {
        self.commands.push(Command::CopyTexture { src, dst });
    }

    pub fn blit(&mut self, src: RenderTarget, dst: RenderTarget, material: MaterialHandle) {
        self.commands.push(Command::Blit { src, dst, material });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_block_overwrites_by_name() {
        let mut props = PropertyBlock::new();
        props.set_float("_LightAsQuad", 0.0);
        props.set_float("_LightAsQuad", 1.0);
        props.set_vector("_LightColor", Vec4::ONE);

        assert_eq!(props.len(), 2);
        assert_eq!(props.float("_LightAsQuad"), Some(1.0));
        assert_eq!(props.vector("_LightColor"), Some(Vec4::ONE));
        // Wrong type lookups don't coerce
        assert_eq!(props.matrix("_LightColor"), None);
    }

    #[test]
    fn test_draws_filter() {
        let mut cmd = CommandBuffer::new("Lighting");
        cmd.enable_keyword(ShaderKeyword::Point);
        cmd.draw_mesh(
            MeshHandle(1),
            Mat4::IDENTITY,
            MaterialHandle(2),
            PropertyBlock::new(),
        );
        cmd.draw_skybox(CameraId(0));

        assert_eq!(cmd.len(), 3);
        assert_eq!(cmd.draws().count(), 1);
        assert_eq!(cmd.name(), "Lighting");
    }
}
