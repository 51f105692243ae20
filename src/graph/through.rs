use crate::graph::node::{GraphNode, RenderCtx};

/// Serial chain: render the source, then process it in place.
///
/// The classic subtractive path reads left to right:
///
/// ```text
/// OscNode::sawtooth()
///     .through(FilterNode::lowpass_tracking(6.0).sweep_to(1.0, 0.3))
///     .amplify(EnvNode::new(env))
/// ```
///
/// `through` is for processors that transform audio (filters); `amplify` is
/// for multiplicative shaping (envelopes); `mix` is for parallel layers.
pub struct Through<S, F> {
    source: S,
    filter: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, filter: F) -> Self {
        Self { source, filter }
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.filter.render_block(out, ctx);
    }

    fn trigger(&mut self, ctx: &RenderCtx) {
        self.source.trigger(ctx);
        self.filter.trigger(ctx);
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }
}
