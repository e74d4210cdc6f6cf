//! Progress reporting for migration runs
//!
//! The runner only talks to the [`Ui`] trait:
//! - [`ConsoleUi`] prints one line per record (the default)
//! - [`UiApp`] draws a full-screen ratatui view (`--tui`)
//! - [`SilentUi`] swallows everything (tests)

mod components;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::time::Duration;

use components::{LogPanel, ProgressPanel, StatusPanel};

/// Run phases shown in the status panel
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Loading,
    MigratingCompanies,
    MigratingMembers,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Loading => write!(f, "Loading exports"),
            Phase::MigratingCompanies => write!(f, "Migrating companies"),
            Phase::MigratingMembers => write!(f, "Migrating members"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// What happened to a single source record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Migrated,
    Skipped,
    Failed,
}

/// Running per-outcome counts for the current phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub migrated: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl Tally {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Migrated => self.migrated += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

/// Progress information for the current operation
#[derive(Debug, Clone, Default)]
pub struct Progress {
    pub current: u64,
    pub total: u64,
    pub label: String,
}

impl Progress {
    pub fn new(current: u64, total: u64, label: impl Into<String>) -> Self {
        Self {
            current,
            total,
            label: label.into(),
        }
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64
        }
    }
}

/// Sink for run progress
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_info(&mut self, info: impl Into<String>);
    /// About to process record `current` of `total`
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn clear_progress(&mut self);
    /// Result of the record last announced with `set_progress`
    fn outcome(&mut self, outcome: Outcome, message: impl Into<String>);
    fn log(&mut self, message: impl Into<String>);
}

/// Full-screen terminal view
pub struct UiApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    status: StatusPanel,
    progress: ProgressPanel,
    log: LogPanel,
}

impl UiApp {
    /// Create the view and enter the alternate screen
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self {
            terminal,
            status: StatusPanel::new(),
            progress: ProgressPanel::new(),
            log: LogPanel::new(),
        })
    }

    fn draw(&mut self) -> Result<()> {
        let status = &self.status;
        let progress = &self.progress;
        let log = &self.log;

        self.terminal.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(6), // Phase, info and tally
                    Constraint::Length(3), // Record gauge
                    Constraint::Min(5),    // Per-record outcomes
                ])
                .split(frame.area());

            status.render(frame, chunks[0]);
            progress.render(frame, chunks[1]);
            log.render(frame, chunks[2]);
        })?;

        Ok(())
    }

    /// Show the final summary, wait for a key, then restore the terminal
    pub fn finish(mut self, summary: &str) -> Result<()> {
        self.set_phase(Phase::Complete);
        self.clear_progress();
        for line in summary.lines() {
            self.log(line);
        }
        self.log("Press any key to exit...");

        loop {
            if event::poll(Duration::from_millis(100))? {
                if let CrosstermEvent::Key(_) = event::read()? {
                    break;
                }
            }
        }

        self.restore()
    }

    /// Restore the terminal without waiting
    pub fn restore(mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Ui for UiApp {
    fn set_phase(&mut self, phase: Phase) {
        self.status.set_phase(phase);
        self.draw().ok();
    }

    fn set_info(&mut self, info: impl Into<String>) {
        self.status.set_info(info);
        self.draw().ok();
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        self.progress
            .set_progress(Progress::new(current, total, label));
        self.draw().ok();
    }

    fn clear_progress(&mut self) {
        self.progress.clear();
        self.draw().ok();
    }

    fn outcome(&mut self, outcome: Outcome, message: impl Into<String>) {
        self.status.record(outcome);
        self.log.add_outcome(outcome, message);
        self.draw().ok();
    }

    fn log(&mut self, message: impl Into<String>) {
        self.log.add(message);
        self.draw().ok();
    }
}

impl Drop for UiApp {
    fn drop(&mut self) {
        // Best effort cleanup
        terminal::disable_raw_mode().ok();
        self.terminal
            .backend_mut()
            .execute(LeaveAlternateScreen)
            .ok();
        self.terminal.show_cursor().ok();
    }
}

/// Line-oriented output on stdout
#[derive(Default)]
pub struct ConsoleUi {
    phase: Option<Phase>,
}

impl ConsoleUi {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Ui for ConsoleUi {
    fn set_phase(&mut self, phase: Phase) {
        if self.phase.as_ref() != Some(&phase) {
            println!("\n{}\n{}", phase, "=".repeat(50));
            self.phase = Some(phase);
        }
    }

    fn set_info(&mut self, info: impl Into<String>) {
        println!("{}", info.into());
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        println!("[{}/{}] {}", current, total, label.into());
    }

    fn clear_progress(&mut self) {}

    fn outcome(&mut self, outcome: Outcome, message: impl Into<String>) {
        let marker = match outcome {
            Outcome::Migrated => "ok",
            Outcome::Skipped => "skip",
            Outcome::Failed => "FAIL",
        };
        println!("  {:>4}  {}", marker, message.into());
    }

    fn log(&mut self, message: impl Into<String>) {
        println!("{}", message.into());
    }
}

/// Silent UI implementation for testing and non-interactive use
#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_info(&mut self, _info: impl Into<String>) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn clear_progress(&mut self) {}
    fn outcome(&mut self, _outcome: Outcome, _message: impl Into<String>) {}
    fn log(&mut self, _message: impl Into<String>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_counts_outcomes() {
        let mut tally = Tally::default();
        for outcome in [Outcome::Migrated, Outcome::Skipped, Outcome::Migrated, Outcome::Failed] {
            tally.record(outcome);
        }
        assert_eq!(
            tally,
            Tally {
                migrated: 2,
                skipped: 1,
                failed: 1
            }
        );
    }

    #[test]
    fn test_progress_ratio() {
        assert_eq!(Progress::new(1, 4, "x").ratio(), 0.25);
        assert_eq!(Progress::new(1, 0, "x").ratio(), 0.0);
    }
}
