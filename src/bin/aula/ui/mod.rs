//! TUI rendering for aula.
//!
//! Three panels: instrument selector, tuner (note + cents needle), and an
//! output-bus spectrum.

pub mod spectrum;

use aula_dsp::{analysis::TunerReading, synth::Timbre};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use spectrum::render_spectrum;

/// Everything the renderer needs for one frame.
pub struct UiSnapshot {
    pub timbre: Timbre,
    pub listening: bool,
    pub reading: Option<TunerReading>,
    pub bars: Vec<u64>,
    pub status: Option<String>,
}

pub fn render(frame: &mut Frame, snapshot: &UiSnapshot) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Instrument bar
            Constraint::Length(6), // Tuner
            Constraint::Min(6),    // Spectrum
            Constraint::Length(1), // Help / status bar
        ])
        .split(area);

    render_instruments(frame, chunks[0], snapshot.timbre);
    render_tuner(frame, chunks[1], snapshot);
    render_spectrum(frame, chunks[2], &snapshot.bars);
    render_help(frame, chunks[3], snapshot);
}

fn render_instruments(frame: &mut Frame, area: ratatui::layout::Rect, selected: Timbre) {
    let spans: Vec<Span> = Timbre::ALL
        .iter()
        .enumerate()
        .flat_map(|(i, &timbre)| {
            let style = if timbre == selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            [
                Span::styled(format!(" [{}] {} ", i + 1, timbre.name()), style),
                Span::raw(" "),
            ]
        })
        .collect();

    let block = Block::default().title(" Instrument ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_tuner(frame: &mut Frame, area: ratatui::layout::Rect, snapshot: &UiSnapshot) {
    let block = Block::default()
        .title(if snapshot.listening {
            " Tuner (listening) "
        } else {
            " Tuner "
        })
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    if !snapshot.listening {
        frame.render_widget(
            Paragraph::new("press [T] to start tuning")
                .style(Style::default().fg(Color::DarkGray)),
            rows[0],
        );
        return;
    }

    match snapshot.reading {
        Some(reading) => {
            let color = if reading.is_in_tune() {
                Color::Green
            } else {
                Color::Red
            };
            let line = Line::from(vec![
                Span::styled(
                    format!(" {:<2} ", reading.note),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(
                    " {:.0} Hz   {:+} cents",
                    reading.frequency_hz, reading.cents
                )),
            ]);
            frame.render_widget(Paragraph::new(line), rows[0]);

            // Needle: -50..+50 cents across the gauge, center = in tune
            let ratio = ((reading.cents as f64 + 50.0) / 100.0).clamp(0.0, 1.0);
            let gauge = Gauge::default()
                .gauge_style(Style::default().fg(color))
                .ratio(ratio)
                .label(format!("{:+} cents", reading.cents));
            frame.render_widget(gauge, rows[1]);
        }
        None => {
            frame.render_widget(
                Paragraph::new(" --   no signal").style(Style::default().fg(Color::DarkGray)),
                rows[0],
            );
        }
    }
}

fn render_help(frame: &mut Frame, area: ratatui::layout::Rect, snapshot: &UiSnapshot) {
    let text = match &snapshot.status {
        Some(status) => format!(" {status}"),
        None => " [A-K] Play  [C] Chord  [1-4] Instrument  [T] Tuner  [Q] Quit".to_string(),
    };
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
