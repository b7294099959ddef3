use anyhow::Result;

use crate::progress::{ProgressTracker, SnapshotStore};

use super::TuiAction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ActionOutcome {
    pub(crate) message: String,
    pub(crate) select: Option<usize>,
}

impl ActionOutcome {
    fn stay(message: String) -> Self {
        Self {
            message,
            select: None,
        }
    }
}

pub(super) fn status_info(msg: &str) -> String {
    format!("INFO: {msg}")
}

pub(super) fn status_error(msg: &str) -> String {
    format!("ERROR: {msg}")
}

/// Table row to highlight on start: the current step when it is part of the
/// catalog, otherwise the first row.
pub(crate) fn initial_selection<S: SnapshotStore>(tracker: &ProgressTracker<S>) -> Option<usize> {
    if tracker.catalog().is_empty() {
        return None;
    }
    let current = usize::try_from(tracker.current_step()).unwrap_or(0);
    Some(if current < tracker.total_steps() { current } else { 0 })
}

pub(crate) fn apply_action<S: SnapshotStore>(
    tracker: &mut ProgressTracker<S>,
    action: TuiAction,
    selected: Option<usize>,
) -> Result<ActionOutcome> {
    let selected_step = selected.and_then(|idx| tracker.catalog().iter().nth(idx).cloned());

    match action {
        TuiAction::Open => {
            let Some(step) = selected_step else {
                return Ok(ActionOutcome::stay("No step selected.".to_string()));
            };
            tracker.set_current_step(step.id)?;
            Ok(ActionOutcome::stay(format!(
                "Now on step {}: {}",
                step.id, step.title
            )))
        }
        TuiAction::Complete => {
            let Some(step) = selected_step else {
                return Ok(ActionOutcome::stay("No step selected.".to_string()));
            };
            if tracker.is_step_completed(step.id) {
                return Ok(ActionOutcome::stay(format!(
                    "Step {} is already complete.",
                    step.id
                )));
            }
            tracker.complete_step(step.id)?;
            Ok(ActionOutcome::stay(format!(
                "Completed {}. Progress: {}%",
                step.short_title,
                tracker.progress()
            )))
        }
        TuiAction::Incomplete => {
            let Some(step) = selected_step else {
                return Ok(ActionOutcome::stay("No step selected.".to_string()));
            };
            tracker.mark_step_incomplete(step.id)?;
            Ok(ActionOutcome::stay(format!(
                "Marked {} incomplete. Progress: {}%",
                step.short_title,
                tracker.progress()
            )))
        }
        TuiAction::Next => match tracker.next_step().cloned() {
            Some(step) => {
                tracker.set_current_step(step.id)?;
                Ok(ActionOutcome {
                    message: format!("Now on step {}: {}", step.id, step.title),
                    select: usize::try_from(step.id).ok(),
                })
            }
            None => Ok(ActionOutcome::stay("No next step.".to_string())),
        },
        TuiAction::Previous => match tracker.previous_step().cloned() {
            Some(step) => {
                tracker.set_current_step(step.id)?;
                Ok(ActionOutcome {
                    message: format!("Now on step {}: {}", step.id, step.title),
                    select: usize::try_from(step.id).ok(),
                })
            }
            None => Ok(ActionOutcome::stay("No previous step.".to_string())),
        },
        TuiAction::Reset => {
            tracker.reset_progress()?;
            Ok(ActionOutcome {
                message: "Progress reset.".to_string(),
                select: Some(0),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{MemoryStore, StepCatalog};

    fn tracker() -> ProgressTracker<MemoryStore> {
        ProgressTracker::load(MemoryStore::default(), StepCatalog::builtin())
            .expect("tracker should load")
    }

    #[test]
    fn initial_selection_follows_current_step_inside_catalog() {
        let mut tracker = tracker();
        tracker.set_current_step(4).expect("step should be saved");
        assert_eq!(initial_selection(&tracker), Some(4));

        tracker.set_current_step(42).expect("step should be saved");
        assert_eq!(initial_selection(&tracker), Some(0));

        tracker.set_current_step(-1).expect("step should be saved");
        assert_eq!(initial_selection(&tracker), Some(0));
    }

    #[test]
    fn open_sets_current_step_to_selected_row() {
        let mut tracker = tracker();
        let outcome = apply_action(&mut tracker, TuiAction::Open, Some(3))
            .expect("action should succeed");
        assert_eq!(tracker.current_step(), 3);
        assert_eq!(outcome.select, None);
        assert!(outcome.message.starts_with("Now on step 3"));
    }

    #[test]
    fn complete_and_incomplete_toggle_selected_row() {
        let mut tracker = tracker();
        apply_action(&mut tracker, TuiAction::Complete, Some(2)).expect("complete should work");
        assert!(tracker.is_step_completed(2));

        let again = apply_action(&mut tracker, TuiAction::Complete, Some(2))
            .expect("repeat complete should work");
        assert_eq!(again.message, "Step 2 is already complete.");
        assert_eq!(tracker.completed_count(), 1);

        apply_action(&mut tracker, TuiAction::Incomplete, Some(2))
            .expect("incomplete should work");
        assert!(!tracker.is_step_completed(2));
    }

    #[test]
    fn actions_without_selection_leave_state_untouched() {
        let mut tracker = tracker();
        let outcome = apply_action(&mut tracker, TuiAction::Complete, None)
            .expect("action should succeed");
        assert_eq!(outcome.message, "No step selected.");
        assert_eq!(tracker.completed_count(), 0);

        let outcome = apply_action(&mut tracker, TuiAction::Open, Some(99))
            .expect("action should succeed");
        assert_eq!(outcome.message, "No step selected.");
        assert_eq!(tracker.current_step(), 0);
    }

    #[test]
    fn next_and_previous_move_selection_with_current_step() {
        let mut tracker = tracker();
        let outcome =
            apply_action(&mut tracker, TuiAction::Next, Some(0)).expect("next should work");
        assert_eq!(tracker.current_step(), 1);
        assert_eq!(outcome.select, Some(1));

        let outcome = apply_action(&mut tracker, TuiAction::Previous, Some(1))
            .expect("previous should work");
        assert_eq!(tracker.current_step(), 0);
        assert_eq!(outcome.select, Some(0));

        let outcome = apply_action(&mut tracker, TuiAction::Previous, Some(0))
            .expect("previous should work");
        assert_eq!(outcome.message, "No previous step.");
        assert_eq!(tracker.current_step(), 0);
    }

    #[test]
    fn next_stops_at_last_step() {
        let mut tracker = tracker();
        tracker.set_current_step(8).expect("step should be saved");
        let outcome =
            apply_action(&mut tracker, TuiAction::Next, Some(8)).expect("next should work");
        assert_eq!(outcome.message, "No next step.");
        assert_eq!(tracker.current_step(), 8);
    }

    #[test]
    fn reset_clears_progress_and_selects_first_row() {
        let mut tracker = tracker();
        tracker.complete_step(0).expect("complete should work");
        tracker.set_current_step(5).expect("step should be saved");
        let outcome =
            apply_action(&mut tracker, TuiAction::Reset, Some(5)).expect("reset should work");
        assert_eq!(outcome.select, Some(0));
        assert_eq!(tracker.progress(), 0);
        assert_eq!(tracker.current_step(), 0);
    }

    #[test]
    fn failed_save_is_reported_as_error() {
        let mut tracker =
            ProgressTracker::load(MemoryStore::failing_writes(), StepCatalog::builtin())
                .expect("tracker should load");
        let err = apply_action(&mut tracker, TuiAction::Complete, Some(0))
            .expect_err("read-only store should fail");
        assert!(format!("{err:#}").contains("failed to save progress"));
    }

    #[test]
    fn key_bindings_map_to_actions() {
        use crossterm::event::KeyCode;

        assert_eq!(TuiAction::from_key(KeyCode::Enter), Some(TuiAction::Open));
        assert_eq!(TuiAction::from_key(KeyCode::Char('c')), Some(TuiAction::Complete));
        assert_eq!(TuiAction::from_key(KeyCode::Char('u')), Some(TuiAction::Incomplete));
        assert_eq!(TuiAction::from_key(KeyCode::Right), Some(TuiAction::Next));
        assert_eq!(TuiAction::from_key(KeyCode::Char('p')), Some(TuiAction::Previous));
        assert_eq!(TuiAction::from_key(KeyCode::Char('r')), None);
    }
}
