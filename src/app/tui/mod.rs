mod actions;
mod render;
mod session;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::TableState;

use crate::progress::{ProgressTracker, SnapshotStore};

use self::actions::{apply_action, initial_selection, status_error, status_info};
use self::render::draw_tui;
use self::session::TuiSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TuiAction {
    Open,
    Complete,
    Incomplete,
    Next,
    Previous,
    Reset,
}

impl TuiAction {
    pub(crate) fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Enter => Some(Self::Open),
            KeyCode::Char('c') | KeyCode::Char(' ') => Some(Self::Complete),
            KeyCode::Char('u') => Some(Self::Incomplete),
            KeyCode::Char('n') | KeyCode::Right => Some(Self::Next),
            KeyCode::Char('p') | KeyCode::Left => Some(Self::Previous),
            _ => None,
        }
    }
}

pub(crate) fn run_tui<S: SnapshotStore>(tracker: &mut ProgressTracker<S>) -> Result<()> {
    let mut session = TuiSession::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("failed to initialize terminal backend")?;
    terminal.clear()?;

    let mut table_state = TableState::default();
    table_state.select(initial_selection(tracker));
    let mut pending_reset = false;
    let mut status = if tracker.completed_count() == 0 {
        status_info("Welcome! Press Enter to open a step and c to mark it complete.")
    } else {
        status_info("Ready.")
    };

    loop {
        terminal.draw(|frame| draw_tui(frame, tracker, &mut table_state, &status, pending_reset))?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if pending_reset {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    pending_reset = false;
                    status = run_action(tracker, TuiAction::Reset, &mut table_state);
                }
                KeyCode::Esc | KeyCode::Char('n') => {
                    pending_reset = false;
                    status = status_info("Reset canceled.");
                }
                _ => {}
            }
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Up => {
                if let Some(selected) = table_state.selected() {
                    table_state.select(Some(selected.saturating_sub(1)));
                }
            }
            KeyCode::Down => {
                if let Some(selected) = table_state.selected() {
                    let next = (selected + 1).min(tracker.total_steps().saturating_sub(1));
                    table_state.select(Some(next));
                }
            }
            KeyCode::Char('r') => {
                pending_reset = true;
                status = status_info("Confirm reset: y/Enter to reset, n/Esc to cancel.");
            }
            code => {
                if let Some(action) = TuiAction::from_key(code) {
                    status = run_action(tracker, action, &mut table_state);
                }
            }
        }
    }

    terminal.show_cursor()?;
    session.leave()?;
    Ok(())
}

fn run_action<S: SnapshotStore>(
    tracker: &mut ProgressTracker<S>,
    action: TuiAction,
    table_state: &mut TableState,
) -> String {
    match apply_action(tracker, action, table_state.selected()) {
        Ok(outcome) => {
            if let Some(idx) = outcome.select {
                table_state.select(Some(idx));
            }
            status_info(&outcome.message)
        }
        Err(err) => status_error(&format!("{err:#}")),
    }
}
