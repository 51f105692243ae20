//! End-to-end checks wiring the synthesis engine into the analysis path:
//! what the engine renders, the tuner must recognize.

use aula_dsp::analysis::{AnalysisTask, PitchClass, FRAME_LEN};
use aula_dsp::synth::{SynthCommand, SynthEngine, Timbre};
use rtrb::RingBuffer;

const SAMPLE_RATE: f32 = 44_100.0;
const BLOCK: usize = 512;

#[test]
fn synthesized_note_round_trips_through_the_tuner() {
    let (mut tx, rx) = RingBuffer::new(16);
    let mut engine = SynthEngine::new(SAMPLE_RATE, rx);
    tx.push(SynthCommand::NoteOn {
        frequency: 440.0,
        duration: 1.0,
        timbre: Timbre::Metallophone,
        delay: 0.0,
    })
    .unwrap();

    let (mut mic_tx, mic_rx) = RingBuffer::new(FRAME_LEN * 4);
    let mut task = AnalysisTask::new(mic_rx, SAMPLE_RATE);

    let mut block = vec![0.0f32; BLOCK];
    let mut display = None;
    for _ in 0..8 {
        engine.render_block(&mut block);
        for &sample in &block {
            mic_tx.push(sample).unwrap();
        }
        if let Some(update) = task.poll() {
            display = update;
        }
    }

    let reading = display.expect("a sounding metallophone must be detected");
    assert_eq!(reading.note, PitchClass::A);
    assert!(
        (reading.frequency_hz - 440.0).abs() < 5.0,
        "estimated {} Hz for a 440 Hz note",
        reading.frequency_hz
    );
    assert!(
        reading.cents.abs() <= 10,
        "clean tone should read close to in tune, got {} cents",
        reading.cents
    );
}

#[test]
fn idle_engine_reads_as_no_signal() {
    let (_tx, rx) = RingBuffer::new(16);
    let mut engine = SynthEngine::new(SAMPLE_RATE, rx);

    let (mut mic_tx, mic_rx) = RingBuffer::new(FRAME_LEN * 4);
    let mut task = AnalysisTask::new(mic_rx, SAMPLE_RATE);

    let mut block = vec![0.0f32; BLOCK];
    for _ in 0..4 {
        engine.render_block(&mut block);
        for &sample in &block {
            mic_tx.push(sample).unwrap();
        }
    }

    assert_eq!(
        task.poll().expect("a full silent frame was delivered"),
        None,
        "silence must surface as the neutral no-signal display"
    );
}

#[test]
fn strummed_chord_fills_the_bus_in_string_order() {
    let (mut tx, rx) = RingBuffer::new(16);
    let mut engine = SynthEngine::new(SAMPLE_RATE, rx);

    let frequencies = [82.41f32, 110.0, 146.83, 196.0, 246.94, 329.63];
    for (i, &frequency) in frequencies.iter().enumerate() {
        tx.push(SynthCommand::NoteOn {
            frequency,
            duration: 3.5,
            timbre: Timbre::Guitar,
            delay: i as f32 * 0.05 + 0.002,
        })
        .unwrap();
    }

    // Render through the whole strum window (~260 ms)
    let mut block = vec![0.0f32; BLOCK];
    let blocks = (0.35 * SAMPLE_RATE) as usize / BLOCK + 1;
    for _ in 0..blocks {
        engine.render_block(&mut block);
    }

    assert_eq!(engine.active_voices(), frequencies.len());
    let spawned: Vec<f32> = engine.voices().iter().map(|v| v.frequency()).collect();
    assert_eq!(spawned, frequencies, "strum must preserve string order");
}
