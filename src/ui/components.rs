//! Panels of the full-screen view

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph};
use ratatui::Frame;

use super::{Outcome, Phase, Progress, Tally};

const BORDER: Color = Color::Blue;

/// Current phase, source info and the per-phase tally
pub struct StatusPanel {
    phase: Phase,
    info: String,
    tally: Tally,
}

impl StatusPanel {
    pub fn new() -> Self {
        Self {
            phase: Phase::Loading,
            info: String::new(),
            tally: Tally::default(),
        }
    }

    /// Entering a migration phase starts a fresh tally; `Complete` keeps the last one
    pub fn set_phase(&mut self, phase: Phase) {
        if phase != self.phase && phase != Phase::Complete {
            self.tally = Tally::default();
        }
        self.phase = phase;
    }

    pub fn set_info(&mut self, info: impl Into<String>) {
        self.info = info.into();
    }

    pub fn record(&mut self, outcome: Outcome) {
        self.tally.record(outcome);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let phase_style = match self.phase {
            Phase::Complete => Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            _ => Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        };

        let indicator = match self.phase {
            Phase::Loading => "◐",
            Phase::MigratingCompanies | Phase::MigratingMembers => "⇢",
            Phase::Complete => "✓",
        };

        let lines = vec![
            Line::from(vec![
                Span::styled(format!(" {} ", indicator), phase_style),
                Span::styled(self.phase.to_string(), phase_style),
            ]),
            Line::from(vec![
                Span::raw("   "),
                Span::styled(&self.info, Style::default().fg(Color::Gray)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::raw("   "),
                Span::styled(
                    format!("migrated {}", self.tally.migrated),
                    outcome_style(Outcome::Migrated),
                ),
                Span::raw("   "),
                Span::styled(
                    format!("skipped {}", self.tally.skipped),
                    outcome_style(Outcome::Skipped),
                ),
                Span::raw("   "),
                Span::styled(
                    format!("errors {}", self.tally.failed),
                    outcome_style(Outcome::Failed),
                ),
            ]),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" SINDPLAST registry migration ")
            .border_style(Style::default().fg(BORDER));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

/// Gauge over the records of the current phase
pub struct ProgressPanel {
    progress: Option<Progress>,
}

impl ProgressPanel {
    pub fn new() -> Self {
        Self { progress: None }
    }

    pub fn set_progress(&mut self, progress: Progress) {
        self.progress = Some(progress);
    }

    pub fn clear(&mut self) {
        self.progress = None;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT)
            .border_style(Style::default().fg(BORDER));

        let Some(progress) = &self.progress else {
            frame.render_widget(Paragraph::new("").block(block), area);
            return;
        };

        let gauge = Gauge::default()
            .block(block)
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
            .ratio(progress.ratio().min(1.0))
            .label(format!(
                "{}/{} {}",
                progress.current, progress.total, progress.label
            ));

        frame.render_widget(gauge, area);
    }
}

struct LogEntry {
    outcome: Option<Outcome>,
    message: String,
}

/// Most recent record outcomes and messages
pub struct LogPanel {
    entries: Vec<LogEntry>,
    max_entries: usize,
}

impl LogPanel {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            max_entries: 200,
        }
    }

    pub fn add(&mut self, message: impl Into<String>) {
        self.push(None, message.into());
    }

    pub fn add_outcome(&mut self, outcome: Outcome, message: impl Into<String>) {
        self.push(Some(outcome), message.into());
    }

    fn push(&mut self, outcome: Option<Outcome>, message: String) {
        self.entries.push(LogEntry { outcome, message });
        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Records ")
            .border_style(Style::default().fg(BORDER));

        let visible_height = area.height.saturating_sub(2) as usize;
        let start = self.entries.len().saturating_sub(visible_height);

        let items: Vec<ListItem> = self.entries[start..]
            .iter()
            .map(|entry| {
                let style = entry
                    .outcome
                    .map(outcome_style)
                    .unwrap_or_else(|| Style::default().fg(Color::White));
                ListItem::new(Span::styled(format!(" {}", entry.message), style))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}

fn outcome_style(outcome: Outcome) -> Style {
    match outcome {
        Outcome::Migrated => Style::default().fg(Color::Green),
        Outcome::Skipped => Style::default().fg(Color::Yellow),
        Outcome::Failed => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}
