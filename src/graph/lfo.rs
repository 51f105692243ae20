use crate::{
    dsp::oscillator::OscillatorBlock,
    graph::node::{GraphNode, RenderCtx},
};

/// Low frequency oscillator node.
///
/// Same waveform math as the audio oscillators, but running at a fixed
/// sub-audio frequency that ignores the note pitch. Output is bipolar
/// [-1, 1]; pair with `.modulate()` and a depth to swing a parameter either
/// side of its base value. Vibrato wants 2-7 Hz with a depth of a few cents.
pub struct LfoNode {
    osc: OscillatorBlock,
    frequency: f32, // Fixed frequency in Hz (ignores note context)
}

impl LfoNode {
    pub fn sine(frequency: f32) -> Self {
        Self {
            osc: OscillatorBlock::sine(),
            frequency,
        }
    }

    pub fn triangle(frequency: f32) -> Self {
        Self {
            osc: OscillatorBlock::triangle(),
            frequency,
        }
    }

    pub fn sawtooth(frequency: f32) -> Self {
        Self {
            osc: OscillatorBlock::sawtooth(),
            frequency,
        }
    }
}

impl GraphNode for LfoNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        // Render with the LFO's own frequency, not the note frequency
        let lfo_ctx = RenderCtx::new(ctx.sample_rate, self.frequency);
        self.osc.render(out, &lfo_ctx);
    }

    fn trigger(&mut self, _ctx: &RenderCtx) {
        // Phase-sync to note start so every note gets the same vibrato shape
        self.osc.reset();
    }
}
