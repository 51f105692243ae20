//! Application state and event loop.

use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use rtrb::Consumer;

use aula_dsp::{analysis::TunerController, runtime::Synth, synth::Timbre};

use crate::ui::{self, spectrum::SpectrumAnalyzer, UiSnapshot};

/// Note length for single key presses.
const NOTE_DURATION: f32 = 1.5;

/// C major scale across the home row, C4 to C5.
const SCALE: [(char, f32); 8] = [
    ('a', 261.63),
    ('s', 293.66),
    ('d', 329.63),
    ('f', 349.23),
    ('g', 392.00),
    ('h', 440.00),
    ('j', 493.88),
    ('k', 523.25),
];

/// Open E major, low string first.
const E_MAJOR: [f32; 6] = [82.41, 110.00, 146.83, 207.65, 246.94, 329.63];

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 1024;

pub struct App {
    synth: Synth,
    tuner: TunerController,
    timbre: Timbre,
    /// Ring buffer receiver tapping the output bus
    scope_rx: Option<Consumer<f32>>,
    /// Last VIS_BUFFER_SIZE output samples
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        let mut synth = Synth::new();
        let scope_rx = synth.take_scope();
        let spectrum = SpectrumAnalyzer::new(VIS_BUFFER_SIZE, synth.sample_rate());
        let status = synth
            .is_silent()
            .then(|| "no output device - running silent".to_string());

        Self {
            synth,
            tuner: TunerController::new(),
            timbre: Timbre::Metallophone,
            scope_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum,
            status,
            should_quit: false,
        }
    }

    /// Run the application (takes over the terminal).
    pub fn run(mut self) -> EyreResult<()> {
        let mut terminal = ratatui::init();
        let result = self.event_loop(&mut terminal);
        ratatui::restore();
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();

            let snapshot = UiSnapshot {
                timbre: self.timbre,
                listening: self.tuner.is_listening(),
                reading: self.tuner.reading(),
                bars: self.spectrum.bars().to_vec(),
                status: self.status.clone(),
            };
            terminal.draw(|frame| ui::render(frame, &snapshot))?;

            // Non-blocking keyboard input, ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.tuner.stop();
        Ok(())
    }

    /// Drain the scope tap, keeping the last VIS_BUFFER_SIZE samples.
    fn poll_audio(&mut self) {
        let Some(rx) = &mut self.scope_rx else { return };

        let mut received = false;
        while let Ok(sample) = rx.pop() {
            self.audio_buffer.push(sample);
            received = true;
        }
        if received {
            let excess = self.audio_buffer.len().saturating_sub(VIS_BUFFER_SIZE);
            self.audio_buffer.drain(0..excess);
            self.spectrum.update(&self.audio_buffer);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('1') => self.timbre = Timbre::Metallophone,
            KeyCode::Char('2') => self.timbre = Timbre::Piano,
            KeyCode::Char('3') => self.timbre = Timbre::Guitar,
            KeyCode::Char('4') => self.timbre = Timbre::Flute,
            KeyCode::Char('c') => self.synth.play_chord(&E_MAJOR, self.timbre),
            KeyCode::Char('t') => self.toggle_tuner(),
            KeyCode::Char(ch) => {
                if let Some(&(_, frequency)) = SCALE.iter().find(|(k, _)| *k == ch) {
                    self.synth.play_note(frequency, NOTE_DURATION, self.timbre);
                }
            }
            _ => {}
        }
    }

    fn toggle_tuner(&mut self) {
        if self.tuner.is_listening() {
            self.tuner.stop();
            return;
        }
        if let Err(err) = self.tuner.start() {
            self.status = Some(format!("microphone unavailable: {err}"));
        } else {
            self.status = None;
        }
    }
}
