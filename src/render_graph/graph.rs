//! Frame graph definition
//!
//! Unlike a general render graph, the deferred frame has a fixed pass order
//! that must never be rearranged: shadow constants, G-buffer, lighting,
//! reflections, skybox and the final blit each depend on everything recorded
//! before them. Passes therefore run exactly in insertion order.

use crate::render_graph::pass::*;

/// Unique identifier for a pass in the frame graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PassId(pub(crate) u32);

/// Metadata about a pass in the graph
#[derive(Debug, Clone)]
pub struct PassNode {
    pub id: PassId,
    pub name: String,
}

/// Ordered list of render passes recorded once per camera
pub struct FrameGraph {
    passes: Vec<Box<dyn RenderPass>>,
    pass_nodes: Vec<PassNode>,
    next_pass_id: u32,
}

impl FrameGraph {
    pub fn new() -> Self {
        Self {
            passes: Vec::new(),
            pass_nodes: Vec::new(),
            next_pass_id: 0,
        }
    }

    /// Append a render pass to the graph
    pub fn add_pass<P: RenderPass + 'static>(&mut self, pass: P) -> PassId {
        let id = PassId(self.next_pass_id);
        self.next_pass_id += 1;

        self.pass_nodes.push(PassNode {
            id,
            name: pass.name().to_string(),
        });
        self.passes.push(Box::new(pass));

        id
    }

    /// Get all passes in execution order
    pub fn passes(&self) -> &[Box<dyn RenderPass>] {
        &self.passes
    }

    /// Get pass nodes (metadata)
    pub fn pass_nodes(&self) -> &[PassNode] {
        &self.pass_nodes
    }

    /// Get pass by ID
    pub fn get_pass(&self, id: PassId) -> Option<&dyn RenderPass> {
        let index = self.pass_nodes.iter().position(|n| n.id == id)?;
        Some(self.passes[index].as_ref())
    }

    /// Pass names in execution order
    pub fn pass_names(&self) -> Vec<&str> {
        self.pass_nodes.iter().map(|n| n.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for FrameGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_graph::CommandBuffer;

    struct NamedPass(&'static str);

    impl RenderPass for NamedPass {
        fn name(&self) -> &str {
            self.0
        }

        fn record(&self, _ctx: &PassContext, _cmd: &mut CommandBuffer) {}
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut graph = FrameGraph::new();
        let first = graph.add_pass(NamedPass("B"));
        let second = graph.add_pass(NamedPass("A"));

        assert_eq!(graph.pass_names(), vec!["B", "A"]);
        assert_eq!(graph.get_pass(first).map(|p| p.name()), Some("B"));
        assert_eq!(graph.get_pass(second).map(|p| p.name()), Some("A"));
        assert_eq!(graph.len(), 2);
    }
}
