use crate::{
    dsp::filter::SVFilter,
    graph::node::{GraphNode, RenderCtx},
};

/*
Filter Node
===========

Wraps the state-variable filter for use inside voice graphs, adding the one
piece of automation the instrument patches need: a cutoff sweep.

A plucked string starts bright and darkens within a fraction of a second as
the high harmonics die first. That is modeled as an exponential glide of the
lowpass cutoff from an opening value down to a target over a fixed time:

    cutoff(t) = start * (target/start)^(t/T)   for t in [0, T], then target

The sweep is expressed relative to the note frequency (tracking ratio down to
`target_ratio`), so the same patch darkens correctly for any pitch. Cutoff is
updated once per block; at typical block sizes that is well under a
millisecond of granularity, far finer than the ear can follow a filter move.

A fixed-cutoff filter (breath-noise bandpass) just never installs a sweep.
*/

#[derive(Debug, Clone, Copy)]
struct CutoffSweep {
    target_ratio: f32,
    duration: f32,
}

pub struct FilterNode {
    filter: SVFilter,
    /// Cutoff as a multiple of the note frequency; None = absolute cutoff_hz.
    ratio: Option<f32>,
    sweep: Option<CutoffSweep>,
    elapsed: u32,
}

impl FilterNode {
    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self {
            filter: SVFilter::lowpass(cutoff_hz),
            ratio: None,
            sweep: None,
            elapsed: 0,
        }
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self {
            filter: SVFilter::bandpass(cutoff_hz),
            ratio: None,
            sweep: None,
            elapsed: 0,
        }
    }

    /// Lowpass whose cutoff tracks the note: `ratio` times the frequency.
    pub fn lowpass_tracking(ratio: f32) -> Self {
        let mut node = Self::lowpass(1_000.0);
        node.ratio = Some(ratio);
        node
    }

    /// Bandpass whose center tracks the note: `ratio` times the frequency.
    pub fn bandpass_tracking(ratio: f32) -> Self {
        let mut node = Self::bandpass(1_000.0);
        node.ratio = Some(ratio);
        node
    }

    pub fn with_resonance(mut self, resonance: f32) -> Self {
        self.filter.set_resonance(resonance);
        self
    }

    /// Exponentially glide the cutoff from the tracking ratio down (or up)
    /// to `target_ratio`x the note frequency over `duration` seconds after
    /// trigger. Requires a tracking filter.
    pub fn sweep_to(mut self, target_ratio: f32, duration: f32) -> Self {
        self.sweep = Some(CutoffSweep {
            target_ratio,
            duration,
        });
        self
    }

    fn current_cutoff(&self, ctx: &RenderCtx) -> f32 {
        let base = match self.ratio {
            Some(ratio) => ratio * ctx.frequency,
            None => self.filter.cutoff_hz,
        };
        match self.sweep {
            Some(sweep) => {
                let total = (sweep.duration * ctx.sample_rate).max(1.0);
                let progress = (self.elapsed as f32 / total).min(1.0);
                let target = sweep.target_ratio * ctx.frequency;
                base * (target / base).powf(progress)
            }
            None => base,
        }
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let cutoff = self.current_cutoff(ctx).clamp(20.0, 20_000.0);
        self.filter.set_cutoff(cutoff);
        self.filter.render(out, ctx);
        self.elapsed = self.elapsed.saturating_add(out.len() as u32);
    }

    fn trigger(&mut self, _ctx: &RenderCtx) {
        self.elapsed = 0;
        self.filter.reset();
    }
}
