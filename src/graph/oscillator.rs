use crate::dsp::oscillator::OscillatorBlock;
use crate::graph::node::{GraphNode, Modulatable, RenderCtx};

/*
Audio Oscillator Node
=====================

The raw sound source of every voice. Wraps the waveform math with the two
pitch controls instrument graphs need:

Detune (cents)
    A fixed offset from the note frequency, 100 cents = 1 semitone. Layering
    the same note at 0 / +5 / -5 cents is what gives the piano patch its body:
    the layers drift in and out of phase a few times per second, which the ear
    reads as resonance rather than as separate notes.

Detune modulation
    The detune offset is also the modulation target for vibrato: a slow sine
    LFO swinging the detune a few cents either side of the base value. See
    `graph::modulate`.

The node tracks `ctx.frequency`, so one graph definition plays any pitch.
*/

pub struct OscNode {
    osc: OscillatorBlock,
    /// Detune in cents. 100 cents = 1 semitone.
    detune_cents: f32,
    /// Detune after modulation is applied (swings around `detune_cents`).
    current_detune: f32,
}

/// Parameters that can be modulated on an oscillator
#[derive(Clone, Copy, Debug)]
pub enum OscParam {
    /// Detune in cents (100 cents = 1 semitone)
    Detune,
}

impl OscNode {
    fn new(osc: OscillatorBlock) -> Self {
        Self {
            osc,
            detune_cents: 0.0,
            current_detune: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorBlock::sine())
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorBlock::triangle())
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorBlock::sawtooth())
    }

    pub fn noise() -> Self {
        Self::new(OscillatorBlock::noise())
    }

    /// Set a fixed detune in cents.
    pub fn with_detune(mut self, cents: f32) -> Self {
        self.detune_cents = cents;
        self.current_detune = cents;
        self
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        // frequency * 2^(cents/1200)
        let final_freq = if self.current_detune != 0.0 {
            ctx.frequency * 2.0_f32.powf(self.current_detune / 1200.0)
        } else {
            ctx.frequency
        };

        let modified_ctx = RenderCtx {
            frequency: final_freq,
            ..*ctx
        };
        self.osc.render(out, &modified_ctx);
    }

    fn trigger(&mut self, _ctx: &RenderCtx) {
        // Restart at phase zero and clear any leftover modulation
        self.osc.reset();
        self.current_detune = self.detune_cents;
    }
}

impl Modulatable for OscNode {
    type Param = OscParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            OscParam::Detune => self.detune_cents,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        match param {
            OscParam::Detune => {
                // Clamp to ±2 semitones
                self.current_detune = (base + modulation).clamp(-200.0, 200.0);
            }
        }
    }
}
