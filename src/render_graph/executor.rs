//! Frame graph executor

use crate::backend::traits::*;
use crate::render_graph::command::*;
use crate::render_graph::graph::*;
use crate::render_graph::pass::*;
use crate::render_graph::resource::*;

/// Name of the command buffer that releases leftover temporaries
pub const RELEASE_TEMPORARIES: &str = "Release Temporaries";

/// Summary of one recorded camera
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub command_buffers: usize,
    pub commands: usize,
    pub draws: usize,
    pub temporaries_released: usize,
}

/// Executor recording a frame graph into host command buffers
///
/// Temporary targets acquired by any pass are tracked and released at the end
/// of the camera, so their lifetime never exceeds one frame.
#[derive(Debug, Default)]
pub struct FrameGraphExecutor {
    live_temporaries: Vec<ResourceId>,
}

impl FrameGraphExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Temporaries acquired and not yet released
    pub fn live_temporaries(&self) -> &[ResourceId] {
        &self.live_temporaries
    }

    fn track(&mut self, cmd: &CommandBuffer) {
        for command in cmd.commands() {
            match command {
                Command::GetTemporaryRt { id, .. } => {
                    if !self.live_temporaries.contains(id) {
                        self.live_temporaries.push(*id);
                    }
                }
                Command::ReleaseTemporaryRt(id) => {
                    self.live_temporaries.retain(|live| live != id);
                }
                _ => {}
            }
        }
    }

    /// Record and execute every pass of the graph in order
    pub fn execute<H: RenderHost>(
        &mut self,
        graph: &FrameGraph,
        ctx: &PassContext,
        host: &mut H,
    ) -> HostResult<FrameStats> {
        let mut stats = FrameStats::default();

        let mut result: HostResult<()> = Ok(());
        for pass in graph.passes() {
            if !pass.is_enabled(ctx) {
                log::trace!("Skipping disabled pass '{}'", pass.name());
                continue;
            }

            let mut cmd = CommandBuffer::new(pass.name());
            pass.record(ctx, &mut cmd);
            self.track(&cmd);

            stats.command_buffers += 1;
            stats.commands += cmd.len();
            stats.draws += cmd.draws().count();

            if let Err(err) = host.execute_command_buffer(cmd) {
                result = Err(err);
                break;
            }
        }

        // Release even after a failure so nothing leaks into the next frame
        let released = self.release_all(host);
        result?;
        stats.temporaries_released = released?;
        Ok(stats)
    }

    fn release_all<H: RenderHost>(&mut self, host: &mut H) -> HostResult<usize> {
        if self.live_temporaries.is_empty() {
            return Ok(0);
        }

        let mut cmd = CommandBuffer::new(RELEASE_TEMPORARIES);
        for id in self.live_temporaries.drain(..) {
            cmd.release_temporary_rt(id);
        }
        let count = cmd.len();
        host.execute_command_buffer(cmd)?;
        Ok(count)
    }
}
