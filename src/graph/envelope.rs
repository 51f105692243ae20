use crate::{dsp::envelope::Envelope, graph::node::{GraphNode, RenderCtx}};

/// Envelope program node.
///
/// Renders envelope *values* (0..1) into the buffer; combine with a sound
/// source via `.amplify()` to shape loudness. The program starts on trigger
/// and reports inactive once its final segment completes, which is what frees
/// the owning voice.
pub struct EnvNode {
    env: Envelope,
}

impl EnvNode {
    pub fn new(env: Envelope) -> Self {
        Self { env }
    }

    pub fn level(&self) -> f32 {
        self.env.level()
    }
}

impl GraphNode for EnvNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.env.render(out, ctx);
    }

    fn trigger(&mut self, _ctx: &RenderCtx) {
        self.env.trigger();
    }

    fn is_active(&self) -> bool {
        self.env.is_active()
    }
}
