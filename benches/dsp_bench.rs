use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use aula_dsp::analysis::{PitchDetector, FRAME_LEN};
use aula_dsp::graph::{GraphNode, RenderCtx};
use aula_dsp::synth::{SynthCommand, SynthEngine, Timbre};
use aula_dsp::voices;
use rtrb::RingBuffer;

const SAMPLE_RATE: f32 = 48_000.0;
const BLOCK: usize = 512;

fn bench_guitar_voice(c: &mut Criterion) {
    let ctx = RenderCtx::new(SAMPLE_RATE, 220.0);
    let mut graph = voices::build(Timbre::Guitar, 2.0).remove(0);
    graph.trigger(&ctx);
    let mut buffer = vec![0.0f32; BLOCK];

    c.bench_function("guitar_voice_block", |b| {
        b.iter(|| {
            graph.render_block(black_box(&mut buffer), &ctx);
        })
    });
}

fn bench_pitch_estimate(c: &mut Criterion) {
    let detector = PitchDetector::new(44_100.0);
    let frame: Vec<f32> = (0..FRAME_LEN)
        .map(|n| 0.5 * (std::f32::consts::TAU * 440.0 * n as f32 / 44_100.0).sin())
        .collect();

    c.bench_function("pitch_estimate_2048", |b| {
        b.iter(|| black_box(detector.estimate(black_box(&frame))))
    });
}

fn bench_engine_chord(c: &mut Criterion) {
    let (mut tx, rx) = RingBuffer::new(64);
    let mut engine = SynthEngine::new(SAMPLE_RATE, rx);
    for (i, frequency) in [82.41f32, 110.0, 146.83, 196.0, 246.94, 329.63]
        .into_iter()
        .enumerate()
    {
        tx.push(SynthCommand::NoteOn {
            frequency,
            duration: 3.5,
            timbre: Timbre::Piano,
            delay: i as f32 * 0.05,
        })
        .unwrap();
    }
    let mut out = vec![0.0f32; BLOCK];

    c.bench_function("engine_chord_block", |b| {
        b.iter(|| {
            engine.render_block(black_box(&mut out));
        })
    });
}

criterion_group!(
    benches,
    bench_guitar_voice,
    bench_pitch_estimate,
    bench_engine_chord
);
criterion_main!(benches);
