use crate::graph::node::{GraphNode, RenderCtx};

/// One playable instance of a timbre layer for a single note.
///
/// A voice owns its graph and a scheduled lifetime in samples. It frees
/// itself when the schedule elapses or the envelope finishes, whichever comes
/// first — callers never tear a voice down explicitly. Voices share nothing
/// but the output bus they are summed into.
pub struct Voice {
    graph: Box<dyn GraphNode>,
    frequency: f32,
    remaining_samples: u64,
}

impl Voice {
    /// Build and trigger a voice scheduled to stop after `duration` seconds.
    pub fn start(
        mut graph: Box<dyn GraphNode>,
        frequency: f32,
        duration: f32,
        sample_rate: f32,
    ) -> Self {
        let ctx = RenderCtx::new(sample_rate, frequency);
        graph.trigger(&ctx);

        Self {
            graph,
            frequency,
            remaining_samples: (duration.max(0.0) as f64 * sample_rate as f64).round() as u64,
        }
    }

    /// Render into `out` (overwrites). Samples past the scheduled stop are
    /// left untouched, so callers must hand in a zeroed buffer.
    pub fn render(&mut self, out: &mut [f32], sample_rate: f32) {
        let renderable = (self.remaining_samples.min(out.len() as u64)) as usize;
        if renderable == 0 {
            return;
        }

        let ctx = RenderCtx::new(sample_rate, self.frequency);
        self.graph.render_block(&mut out[..renderable], &ctx);
        self.remaining_samples -= renderable as u64;
    }

    pub fn is_active(&self) -> bool {
        self.remaining_samples > 0 && self.graph.is_active()
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn remaining_samples(&self) -> u64 {
        self.remaining_samples
    }
}
