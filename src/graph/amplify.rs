use crate::{
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// Multiply a signal by a modulator, sample by sample.
///
/// This is how envelopes shape loudness: `osc.amplify(env)` renders the
/// oscillator, renders the envelope values, and multiplies the two.
pub struct Amplify<N, M> {
    pub signal: N,
    pub modulator: M,
    temp_buffer: Vec<f32>,
}

impl<N, M> Amplify<N, M> {
    pub fn new(signal: N, modulator: M) -> Self {
        Self {
            signal,
            modulator,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<N: GraphNode, M: GraphNode> GraphNode for Amplify<N, M> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.signal.render_block(out, ctx);

        // Slice temp buffer to match output size (RT-safe, no allocation)
        let frames = &mut self.temp_buffer[..out.len()];
        frames.fill(0.0);
        self.modulator.render_block(frames, ctx);

        for (o, m) in out.iter_mut().zip(frames.iter()) {
            *o *= *m;
        }
    }

    fn trigger(&mut self, ctx: &RenderCtx) {
        self.signal.trigger(ctx);
        self.modulator.trigger(ctx);
    }

    fn is_active(&self) -> bool {
        // The modulator is the envelope; once it finishes, the voice is done
        // even though the oscillator would keep running.
        self.modulator.is_active() && self.signal.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dsp::envelope::Envelope,
        graph::{envelope::EnvNode, extensions::NodeExt, oscillator::OscNode},
    };

    #[test]
    fn envelope_gates_oscillator() {
        let env = Envelope::program().linear(0.5, 0.001).linear(0.0, 0.004);
        let mut voice = OscNode::sine().amplify(EnvNode::new(env));
        let ctx = RenderCtx::new(48_000.0, 440.0);

        voice.trigger(&ctx);
        assert!(voice.is_active());

        // 0.005s program at 48kHz = 240 samples
        let mut buffer = vec![0.0f32; 512];
        voice.render_block(&mut buffer, &ctx);

        assert!(buffer[..240].iter().any(|&s| s.abs() > 0.0));
        assert!(buffer[300..].iter().all(|&s| s.abs() < 1e-6));
        assert!(!voice.is_active(), "voice should finish with its envelope");
    }
}
