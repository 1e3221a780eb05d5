//! Skybox and final composite passes

use crate::pipeline::gbuffer_pass::GBUFFER_EMISSION;
use crate::render_graph::*;

/// Draws the host's skybox behind the lit scene
#[derive(Debug, Default)]
pub struct SkyboxPass;

impl RenderPass for SkyboxPass {
    fn name(&self) -> &str {
        "Skybox"
    }

    fn record(&self, ctx: &PassContext, cmd: &mut CommandBuffer) {
        cmd.draw_skybox(ctx.camera.id);
    }
}

/// Copies the accumulated emission to the camera's target
#[derive(Debug, Default)]
pub struct FinalPass;

impl RenderPass for FinalPass {
    fn name(&self) -> &str {
        "Final Pass"
    }

    fn record(&self, ctx: &PassContext, cmd: &mut CommandBuffer) {
        cmd.setup_camera_properties(ctx.camera.id);
        cmd.blit(
            GBUFFER_EMISSION.into(),
            RenderTarget::CameraTarget,
            ctx.materials.blit,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::PassFixture;

    #[test]
    fn test_final_blit() {
        let fixture = PassFixture::new();
        let mut cmd = CommandBuffer::new("Final Pass");
        FinalPass.record(&fixture.ctx(), &mut cmd);
        assert_eq!(
            cmd.commands(),
            &[
                Command::SetupCameraProperties(fixture.camera.id),
                Command::Blit {
                    src: GBUFFER_EMISSION.into(),
                    dst: RenderTarget::CameraTarget,
                    material: fixture.materials.blit,
                },
            ]
        );
    }

    #[test]
    fn test_skybox() {
        let fixture = PassFixture::new();
        let mut cmd = CommandBuffer::new("Skybox");
        SkyboxPass.record(&fixture.ctx(), &mut cmd);
        assert_eq!(cmd.commands(), &[Command::DrawSkybox(fixture.camera.id)]);
    }
}
