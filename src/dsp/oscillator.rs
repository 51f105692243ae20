use std::f32::consts::TAU;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::node::RenderCtx;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Saw,
    Noise,
}

/// Phase-accumulator oscillator.
///
/// Phase lives in [0, 1) and advances by `frequency / sample_rate` per sample.
/// Output is bipolar [-1, 1] for every waveform. The noise source keeps its
/// own generator so each voice gets an independent stream.
pub struct OscillatorBlock {
    waveform: Waveform,
    phase: f32,
    rng: SmallRng,
}

impl OscillatorBlock {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
            rng: SmallRng::seed_from_u64(0x00C0_FFEE),
        }
    }

    pub fn sine() -> Self {
        Self::new(Waveform::Sine)
    }

    pub fn triangle() -> Self {
        Self::new(Waveform::Triangle)
    }

    pub fn sawtooth() -> Self {
        Self::new(Waveform::Saw)
    }

    pub fn noise() -> Self {
        Self::new(Waveform::Noise)
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    #[inline]
    fn next_sample(&mut self, increment: f32) -> f32 {
        let out = match self.waveform {
            Waveform::Sine => (TAU * self.phase).sin(),
            // Rises -1 -> +1 over the first half cycle, falls back over the second
            Waveform::Triangle => {
                if self.phase < 0.5 {
                    4.0 * self.phase - 1.0
                } else {
                    3.0 - 4.0 * self.phase
                }
            }
            Waveform::Saw => 2.0 * self.phase - 1.0,
            Waveform::Noise => self.rng.random_range(-1.0..1.0),
        };

        self.phase += increment;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }

        out
    }

    pub fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let increment = ctx.frequency / ctx.sample_rate;
        for sample in out.iter_mut() {
            *sample = self.next_sample(increment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn render(waveform: Waveform, frequency: f32, len: usize) -> Vec<f32> {
        let mut osc = OscillatorBlock::new(waveform);
        let mut buffer = vec![0.0f32; len];
        let ctx = RenderCtx::new(SAMPLE_RATE, frequency);
        osc.render(&mut buffer, &ctx);
        buffer
    }

    #[test]
    fn sine_matches_closed_form() {
        let buffer = render(Waveform::Sine, 440.0, 128);

        // sample n should be sin(2pi f n / sr)
        for n in [0usize, 12, 63, 127] {
            let expected = (TAU * 440.0 * n as f32 / SAMPLE_RATE).sin();
            assert!(
                (buffer[n] - expected).abs() < 1e-5,
                "sample {n}: expected {expected}, got {}",
                buffer[n]
            );
        }
    }

    #[test]
    fn triangle_hits_extremes() {
        // 480 Hz at 48 kHz = exactly 100 samples per cycle
        let buffer = render(Waveform::Triangle, 480.0, 100);

        assert!((buffer[0] - (-1.0)).abs() < 1e-6);
        assert!((buffer[25] - 0.0).abs() < 0.05);
        assert!((buffer[50] - 1.0).abs() < 0.05);
    }

    #[test]
    fn saw_ramps_upward_within_cycle() {
        let buffer = render(Waveform::Saw, 480.0, 99);

        for pair in buffer.windows(2) {
            assert!(pair[1] > pair[0], "saw should rise monotonically in-cycle");
        }
        assert!((buffer[0] - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn noise_stays_in_range_and_varies() {
        let buffer = render(Waveform::Noise, 440.0, 1024);

        assert!(buffer.iter().all(|s| (-1.0..1.0).contains(s)));
        let first = buffer[0];
        assert!(buffer.iter().any(|&s| (s - first).abs() > 1e-3));
    }

    #[test]
    fn all_waveforms_bounded() {
        for waveform in [
            Waveform::Sine,
            Waveform::Triangle,
            Waveform::Saw,
            Waveform::Noise,
        ] {
            let buffer = render(waveform, 997.0, 2048);
            assert!(
                buffer.iter().all(|s| s.abs() <= 1.0 + 1e-6),
                "{waveform:?} exceeded [-1, 1]"
            );
        }
    }
}
