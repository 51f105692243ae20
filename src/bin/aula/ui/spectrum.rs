//! Spectrum widget for the output bus.
//!
//! FFT magnitudes reduced to log-spaced bars, drawn as a sparkline.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Sparkline},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Number of bars to display
const SPECTRUM_BARS: usize = 48;

/// Bar height resolution
const BAR_SCALE: f64 = 64.0;

/// Visible band: below 40 Hz is rumble, above 8 kHz nothing musical happens
/// in this synth.
const MIN_FREQ: f64 = 40.0;
const MAX_FREQ: f64 = 8_000.0;

pub struct SpectrumAnalyzer {
    /// Hann window coefficients
    window: Vec<f32>,
    /// FFT bin index backing each displayed bar
    bin_indices: Vec<usize>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    bars: Vec<u64>,
}

impl SpectrumAnalyzer {
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(buffer_len);

        // Hann window - reduces spectral leakage
        let window: Vec<f32> = (0..buffer_len)
            .map(|i| {
                let denom = (buffer_len.max(2) - 1) as f32;
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos())
            })
            .collect();

        // Log-spaced bars from MIN_FREQ up to the band limit
        let half = (buffer_len / 2).max(1);
        let max_freq = MAX_FREQ.min(sample_rate as f64 / 2.0);
        let ratio = max_freq / MIN_FREQ;
        let bin_indices: Vec<usize> = (0..SPECTRUM_BARS)
            .map(|i| {
                let t = i as f64 / (SPECTRUM_BARS - 1) as f64;
                let freq = MIN_FREQ * ratio.powf(t);
                let index = (freq * buffer_len as f64 / sample_rate as f64).round() as usize;
                index.min(half - 1)
            })
            .collect();

        Self {
            window,
            bin_indices,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            bars: vec![0; SPECTRUM_BARS],
        }
    }

    /// Recompute the bars from new audio samples.
    ///
    /// Skipped when the buffer length does not match the planned FFT size.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for (i, sample) in buffer.iter().enumerate() {
            self.scratch[i].re = *sample * self.window[i];
            self.scratch[i].im = 0.0;
        }
        self.fft.process(&mut self.scratch);

        for (bar, &index) in self.bars.iter_mut().zip(&self.bin_indices) {
            let bin = self.scratch[index];
            let power = (bin.re * bin.re + bin.im * bin.im).max(1e-12) as f64;
            let db = 10.0 * power.log10();
            // Map [-80 dB, 0 dB] onto bar height
            *bar = (((db + 80.0) / 80.0) * BAR_SCALE).clamp(0.0, BAR_SCALE) as u64;
        }
    }

    pub fn bars(&self) -> &[u64] {
        &self.bars
    }
}

/// Render the spectrum bars widget
pub fn render_spectrum(frame: &mut Frame, area: Rect, bars: &[u64]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let sparkline = Sparkline::default()
        .block(block)
        .style(Style::default().fg(Color::Cyan))
        .max(BAR_SCALE as u64)
        .data(bars);

    frame.render_widget(sparkline, area);
}
