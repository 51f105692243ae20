use crate::{graph::node::RenderCtx, MIN_TIME};

/*
Breakpoint Envelope Programs
============================

A note's loudness contour is described as a program of ramp segments fixed at
note-on time:

    level
     0.6 |   /\
         |  /  \_
         | /     \__
     0.0 |/         \_____
         +-------------------> time
          attack   decay ...

Each segment ramps from the level where the previous segment ended to its own
target, over its own duration, with one of two curves:

  Linear        level moves by a constant amount per sample. Used for attacks
                and fade-outs that must reach 0.0 exactly.

  Exponential   level is multiplied by a constant ratio per sample, tracing
                from * (target/from)^(t/T). This matches how struck and
                plucked sounds actually lose energy. An exponential ramp never
                reaches zero, so programs that must end silent finish with a
                linear segment or a near-zero target.

There is no gate: once triggered, the program runs to its end and the envelope
reports Finished. Scheduled-duration voices (a played note knows its length up
front) make a release gate unnecessary.

Levels below EXP_FLOOR are clamped before an exponential ramp so a zero start
level cannot poison the ratio.
*/

const EXP_FLOOR: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    Linear,
    Exponential,
}

#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub target: f32,
    pub duration: f32,
    pub curve: Curve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,     // Not yet triggered, level = 0
    Running,  // Program in progress
    Finished, // Final segment completed, level parked at its target
}

pub struct Envelope {
    segments: Vec<Segment>,

    state: EnvelopeState,
    stage: usize,
    stage_start_level: f32,
    stage_elapsed: u32,
    level: f32,
}

impl Envelope {
    /// Start building a program. Level before the first segment is 0.
    pub fn program() -> Self {
        Self {
            segments: Vec::new(),
            state: EnvelopeState::Idle,
            stage: 0,
            stage_start_level: 0.0,
            stage_elapsed: 0,
            level: 0.0,
        }
    }

    /// Ramp linearly to `target` over `duration` seconds.
    pub fn linear(mut self, target: f32, duration: f32) -> Self {
        self.segments.push(Segment {
            target,
            duration: duration.max(MIN_TIME),
            curve: Curve::Linear,
        });
        self
    }

    /// Ramp exponentially to `target` over `duration` seconds.
    pub fn exponential(mut self, target: f32, duration: f32) -> Self {
        self.segments.push(Segment {
            target: target.max(EXP_FLOOR),
            duration: duration.max(MIN_TIME),
            curve: Curve::Exponential,
        });
        self
    }

    /// Hold the previous segment's target for `duration` seconds.
    pub fn hold(self, duration: f32) -> Self {
        let target = self.segments.last().map(|s| s.target).unwrap_or(0.0);
        self.linear(target, duration)
    }

    /// Start the program from the beginning.
    pub fn trigger(&mut self) {
        self.state = if self.segments.is_empty() {
            EnvelopeState::Finished
        } else {
            EnvelopeState::Running
        };
        self.stage = 0;
        self.stage_start_level = 0.0;
        self.stage_elapsed = 0;
        self.level = 0.0;
    }

    /// Advance the envelope by one sample.
    pub fn next_sample(&mut self, ctx: &RenderCtx) {
        if self.state != EnvelopeState::Running {
            return;
        }

        let segment = self.segments[self.stage];
        let total = (segment.duration * ctx.sample_rate).round().max(1.0) as u32;
        let progress = self.stage_elapsed as f32 / total as f32;

        let from = self.stage_start_level;
        self.level = match segment.curve {
            Curve::Linear => from + (segment.target - from) * progress,
            Curve::Exponential => {
                let from = from.max(EXP_FLOOR);
                from * (segment.target / from).powf(progress)
            }
        };

        self.stage_elapsed += 1;
        if self.stage_elapsed >= total {
            self.level = segment.target;
            self.stage_start_level = segment.target;
            self.stage_elapsed = 0;
            self.stage += 1;
            if self.stage >= self.segments.len() {
                self.state = EnvelopeState::Finished;
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        for sample in buffer.iter_mut() {
            self.next_sample(ctx);
            *sample = self.level;
        }
    }

    /// Returns true while the program is still shaping output.
    pub fn is_active(&self) -> bool {
        self.state == EnvelopeState::Running
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Total program length in seconds.
    pub fn total_duration(&self) -> f32 {
        self.segments.iter().map(|s| s.duration).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::RenderCtx;

    const SAMPLE_RATE: f32 = 1_000.0;

    fn render_samples(env: &mut Envelope, samples: usize) {
        let ctx = RenderCtx::new(SAMPLE_RATE, 440.0);
        for _ in 0..samples {
            env.next_sample(&ctx);
        }
    }

    #[test]
    fn idle_until_triggered() {
        let mut env = Envelope::program().linear(0.6, 0.01);
        render_samples(&mut env, 50);

        assert_eq!(env.state(), EnvelopeState::Idle);
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn linear_attack_reaches_peak() {
        let mut env = Envelope::program().linear(0.6, 0.01).exponential(0.001, 0.5);

        env.trigger();
        render_samples(&mut env, (0.01 * SAMPLE_RATE) as usize);

        assert!(
            (env.level() - 0.6).abs() < 1e-3,
            "attack should reach peak, got {}",
            env.level()
        );
    }

    #[test]
    fn exponential_decay_is_monotonic() {
        let mut env = Envelope::program().linear(0.6, 0.002).exponential(0.001, 0.2);
        let ctx = RenderCtx::new(SAMPLE_RATE, 440.0);

        env.trigger();
        render_samples(&mut env, 2);

        let mut previous = env.level();
        for _ in 0..(0.2 * SAMPLE_RATE) as usize {
            env.next_sample(&ctx);
            assert!(env.level() <= previous + 1e-6);
            previous = env.level();
        }
        assert!(env.level() < 0.01, "decay should approach its target");
    }

    #[test]
    fn hold_keeps_level_flat() {
        let mut env = Envelope::program().linear(0.5, 0.01).hold(0.1).linear(0.0, 0.02);

        env.trigger();
        render_samples(&mut env, (0.01 * SAMPLE_RATE) as usize + 5);

        let held = env.level();
        render_samples(&mut env, 50);
        assert!((env.level() - held).abs() < 1e-4, "hold drifted");
    }

    #[test]
    fn finishes_after_total_duration() {
        let mut env = Envelope::program().linear(0.5, 0.01).linear(0.0, 0.02);

        env.trigger();
        assert!(env.is_active());

        render_samples(&mut env, (0.03 * SAMPLE_RATE) as usize + 2);
        assert_eq!(env.state(), EnvelopeState::Finished);
        assert!(env.level() <= 1e-6);
        assert!(!env.is_active());
    }

    #[test]
    fn retrigger_restarts_program() {
        let mut env = Envelope::program().linear(0.5, 0.01).linear(0.0, 0.01);

        env.trigger();
        render_samples(&mut env, (0.02 * SAMPLE_RATE) as usize + 2);
        assert_eq!(env.state(), EnvelopeState::Finished);

        env.trigger();
        assert!(env.is_active());
        render_samples(&mut env, 5);
        assert!(env.level() > 0.0);
    }
}
