/*
Autocorrelation Pitch Detection
===============================

A periodic signal looks like itself shifted by one period. The
autocorrelation

    c[i] = sum_j buf[j] * buf[j+i]

peaks wherever the shift i lines the waveform up with itself; the first real
peak after the trivial zero-lag maximum sits at the fundamental period.

The estimator hardens that idea against microphone reality in three steps:

  gate     Frames whose RMS is below 0.01 are rejected outright. Silence and
           the noise floor otherwise produce confident-looking garbage peaks.

  trim     Leading and trailing low-amplitude runs (below 0.2) are cut off.
           A note that starts or ends inside the frame pads the buffer with
           near-silence, which smears the correlation; the periodic middle is
           all that matters.

  refine   The integer peak position is sharpened by fitting a parabola
           through the peak and its two neighbors. At 44.1 kHz a one-sample
           error at 440 Hz is about seven cents, so sub-sample precision is
           needed for a usable tuner.

Known limitation: a frame shorter than a few periods of the note cannot be
estimated reliably. At the 2048-sample default and 44.1 kHz that puts the
practical floor around 80-100 Hz; below that, readings wander.
*/

/// Samples per analysis frame.
pub const FRAME_LEN: usize = 2048;

/// Frames quieter than this RMS are treated as silence.
const RMS_GATE: f32 = 0.01;

/// Samples below this magnitude count as padding during trimming.
const TRIM_THRESHOLD: f32 = 0.2;

/// Fundamental-frequency estimator over fixed-size time-domain frames.
pub struct PitchDetector {
    sample_rate: f32,
}

impl PitchDetector {
    pub fn new(sample_rate: f32) -> Self {
        Self { sample_rate }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Estimate the fundamental of `frame`, or `None` when there is no
    /// confident pitch (weak signal, no usable correlation peak).
    pub fn estimate(&self, frame: &[f32]) -> Option<f32> {
        let size = frame.len();
        if size < 4 {
            return None;
        }

        let rms = (frame.iter().map(|s| s * s).sum::<f32>() / size as f32).sqrt();
        if rms < RMS_GATE {
            return None;
        }

        // Trim silence padding from both ends.
        let mut r1 = 0;
        let mut r2 = size - 1;
        for i in 0..size / 2 {
            if frame[i].abs() < TRIM_THRESHOLD {
                r1 = i;
                break;
            }
        }
        for i in 1..size / 2 {
            if frame[size - i].abs() < TRIM_THRESHOLD {
                r2 = size - i;
                break;
            }
        }
        let buf = &frame[r1..r2];
        let len = buf.len();
        if len < 4 {
            return None;
        }

        let mut c = vec![0.0f64; len];
        for (i, value) in c.iter_mut().enumerate() {
            *value = buf[..len - i]
                .iter()
                .zip(&buf[i..])
                .map(|(&a, &b)| a as f64 * b as f64)
                .sum();
        }

        // Walk off the zero-lag peak to the first local minimum.
        let mut d = 0;
        while d + 1 < len && c[d] > c[d + 1] {
            d += 1;
        }

        // Strongest correlation from there on is the period.
        let mut t0 = 0;
        let mut max_val = f64::MIN;
        for (i, &value) in c.iter().enumerate().skip(d) {
            if value > max_val {
                max_val = value;
                t0 = i;
            }
        }
        if t0 == 0 || max_val <= 0.0 {
            return None;
        }

        // Parabolic interpolation to sub-sample precision, skipped when the
        // peak sits at a buffer boundary and has no neighbor.
        let mut period = t0 as f64;
        if t0 + 1 < len {
            let x1 = c[t0 - 1];
            let x2 = c[t0];
            let x3 = c[t0 + 1];
            let a = (x1 + x3 - 2.0 * x2) / 2.0;
            let b = (x3 - x1) / 2.0;
            if a != 0.0 {
                period = t0 as f64 - b / (2.0 * a);
            }
        }
        if period <= 0.0 {
            return None;
        }

        Some(self.sample_rate / period as f32)
    }
}
