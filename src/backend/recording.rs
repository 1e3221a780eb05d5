//! In-memory recording host
//!
//! This host doesn't perform any GPU work. It culls a flat [`Scene`], hands
//! out resource handles, and keeps every executed command buffer so tests and
//! tools can inspect exactly what the pipeline recorded.

use std::collections::HashMap;

use crate::backend::traits::*;
use crate::render_graph::{CommandBuffer, DrawMesh};
use crate::resources::Mesh;
use crate::scene::{Camera, CameraId, CullResults, CullingParameters, Scene};
use glam::Vec4;

/// Recording host
#[derive(Debug)]
pub struct RecordingHost {
    scene: Scene,
    capabilities: HostCapabilities,
    default_reflection: ReflectionDefaults,
    next_handle: u64,
    materials: HashMap<MaterialHandle, MaterialDescriptor>,
    destroyed_materials: Vec<MaterialHandle>,
    meshes: Vec<(MeshHandle, String)>,
    destroyed_meshes: Vec<MeshHandle>,
    buffers: Vec<CommandBuffer>,
    last_culling: Option<CullingParameters>,
    submit_count: usize,
    unculled_cameras: Vec<CameraId>,
    failing_buffers: Vec<String>,
    failing_materials: Vec<String>,
    failing_meshes: Vec<String>,
    fail_submit: bool,
}

impl RecordingHost {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            capabilities: HostCapabilities::default(),
            default_reflection: ReflectionDefaults {
                cubemap: TextureHandle(0),
                hdr_decode: Vec4::new(1.0, 1.0, 0.0, 0.0),
            },
            next_handle: 1,
            materials: HashMap::new(),
            destroyed_materials: Vec::new(),
            meshes: Vec::new(),
            destroyed_meshes: Vec::new(),
            buffers: Vec::new(),
            last_culling: None,
            submit_count: 0,
            unculled_cameras: Vec::new(),
            failing_buffers: Vec::new(),
            failing_materials: Vec::new(),
            failing_meshes: Vec::new(),
            fail_submit: false,
        }
    }

    /// Get the host name
    pub fn name(&self) -> &'static str {
        "Recording Host"
    }

    pub fn with_capabilities(mut self, capabilities: HostCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_default_reflection(mut self, defaults: ReflectionDefaults) -> Self {
        self.default_reflection = defaults;
        self
    }

    /// Report no culling parameters for a camera
    pub fn skip_camera(&mut self, camera: CameraId) {
        self.unculled_cameras.push(camera);
    }

    /// Fail execution of every command buffer with this name
    pub fn fail_buffer(&mut self, name: impl Into<String>) {
        self.failing_buffers.push(name.into());
    }

    /// Fail creation of materials with this label
    pub fn fail_material(&mut self, label: impl Into<String>) {
        self.failing_materials.push(label.into());
    }

    /// Fail uploads of meshes with this name
    pub fn fail_mesh(&mut self, name: impl Into<String>) {
        self.failing_meshes.push(name.into());
    }

    pub fn set_fail_submit(&mut self, fail: bool) {
        self.fail_submit = fail;
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Executed command buffers, oldest first
    pub fn buffers(&self) -> &[CommandBuffer] {
        &self.buffers
    }

    pub fn buffer_names(&self) -> Vec<&str> {
        self.buffers.iter().map(|b| b.name()).collect()
    }

    /// Executed buffers with the given name
    pub fn buffers_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a CommandBuffer> + 'a {
        self.buffers.iter().filter(move |b| b.name() == name)
    }

    /// Every mesh draw executed, in order
    pub fn draws(&self) -> impl Iterator<Item = &DrawMesh> {
        self.buffers.iter().flat_map(|b| b.draws())
    }

    /// Forget executed buffers, keeping resources
    pub fn clear_buffers(&mut self) {
        self.buffers.clear();
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&MaterialDescriptor> {
        self.materials.get(&handle)
    }

    pub fn live_material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn destroyed_materials(&self) -> &[MaterialHandle] {
        &self.destroyed_materials
    }

    /// Live uploaded meshes by name
    pub fn mesh_names(&self) -> Vec<&str> {
        self.meshes.iter().map(|(_, name)| name.as_str()).collect()
    }

    pub fn live_mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn destroyed_meshes(&self) -> &[MeshHandle] {
        &self.destroyed_meshes
    }

    pub fn last_culling(&self) -> Option<&CullingParameters> {
        self.last_culling.as_ref()
    }

    pub fn submit_count(&self) -> usize {
        self.submit_count
    }

    fn allocate_handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new(Scene::new())
    }
}

impl RenderHost for RecordingHost {
    fn capabilities(&self) -> HostCapabilities {
        self.capabilities.clone()
    }

    fn culling_parameters(&self, camera: &Camera) -> Option<CullingParameters> {
        if self.unculled_cameras.contains(&camera.id) {
            return None;
        }
        Some(CullingParameters::new(camera.id))
    }

    fn cull(&mut self, params: &CullingParameters) -> CullResults {
        self.last_culling = Some(params.clone());
        self.scene.cull_results()
    }

    fn default_reflection(&self) -> ReflectionDefaults {
        self.default_reflection
    }

    fn create_material(&mut self, desc: &MaterialDescriptor) -> HostResult<MaterialHandle> {
        if self.failing_materials.contains(&desc.label) {
            return Err(HostError::MaterialCreationFailed(desc.label.clone()));
        }
        let handle = MaterialHandle(self.allocate_handle());
        log::trace!("RecordingHost: creating material '{}' as {:?}", desc.label, handle);
        self.materials.insert(handle, desc.clone());
        Ok(handle)
    }

    fn destroy_material(&mut self, material: MaterialHandle) {
        if self.materials.remove(&material).is_some() {
            log::trace!("RecordingHost: destroying material {:?}", material);
            self.destroyed_materials.push(material);
        }
    }

    fn create_mesh(&mut self, mesh: &Mesh) -> HostResult<MeshHandle> {
        if mesh.vertices.is_empty() || mesh.indices.is_empty() {
            return Err(HostError::MeshCreationFailed(format!(
                "mesh '{}' has no geometry",
                mesh.name
            )));
        }
        if self.failing_meshes.contains(&mesh.name) {
            return Err(HostError::MeshCreationFailed(format!(
                "mesh '{}' rejected by recording host",
                mesh.name
            )));
        }
        let handle = MeshHandle(self.allocate_handle());
        log::trace!(
            "RecordingHost: uploading mesh '{}' ({} vertices) as {:?}",
            mesh.name,
            mesh.vertex_count(),
            handle
        );
        self.meshes.push((handle, mesh.name.clone()));
        Ok(handle)
    }

    fn destroy_mesh(&mut self, mesh: MeshHandle) {
        if let Some(index) = self.meshes.iter().position(|(handle, _)| *handle == mesh) {
            log::trace!("RecordingHost: destroying mesh {:?}", mesh);
            self.meshes.remove(index);
            self.destroyed_meshes.push(mesh);
        }
    }

    fn execute_command_buffer(&mut self, buffer: CommandBuffer) -> HostResult<()> {
        if self.failing_buffers.iter().any(|name| name == buffer.name()) {
            return Err(HostError::ExecutionFailed {
                buffer: buffer.name().to_string(),
                reason: "rejected by recording host".to_string(),
            });
        }
        log::trace!(
            "RecordingHost: executing '{}' ({} commands)",
            buffer.name(),
            buffer.len()
        );
        self.buffers.push(buffer);
        Ok(())
    }

    fn submit(&mut self) -> HostResult<()> {
        if self.fail_submit {
            return Err(HostError::SubmitFailed("rejected by recording host".to_string()));
        }
        self.submit_count += 1;
        Ok(())
    }
}
