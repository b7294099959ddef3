use anyhow::{Context, Result};

use super::catalog::{LessonStep, StepCatalog, StepId};
use super::state::{ProgressState, QuizAnswer};
use super::store::SnapshotStore;

pub const PROGRESS_SLOT: &str = "tutorial-progress";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepView<'a> {
    pub step: &'a LessonStep,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizSummary {
    pub answered: usize,
    pub correct: usize,
}

/// Learner progress over a fixed step catalog, written back to its store
/// after every mutation.
///
/// Step ids are not checked against the catalog: whatever the caller passes
/// is stored and reported back as-is.
pub struct ProgressTracker<S: SnapshotStore> {
    store: S,
    catalog: StepCatalog,
    state: ProgressState,
}

impl<S: SnapshotStore> ProgressTracker<S> {
    /// Restores the last saved state, or starts empty when the slot is absent
    /// or cannot be decoded. Repeated answers to one question are collapsed.
    pub fn load(store: S, catalog: StepCatalog) -> Result<Self> {
        let raw = store
            .read_slot(PROGRESS_SLOT)
            .context("failed to read saved progress")?;
        let state = match raw {
            Some(raw) => match ProgressState::from_json(&raw) {
                Ok(mut state) => {
                    let dropped = state.dedup_quiz_answers();
                    if dropped > 0 {
                        tracing::warn!(
                            dropped,
                            "saved progress repeats quiz answers; keeping the latest"
                        );
                    }
                    state
                }
                Err(err) => {
                    tracing::warn!(error = %err, "saved progress is unreadable; starting over");
                    ProgressState::default()
                }
            },
            None => {
                tracing::debug!("no saved progress found");
                ProgressState::default()
            }
        };
        Ok(Self {
            store,
            catalog,
            state,
        })
    }

    pub fn catalog(&self) -> &StepCatalog {
        &self.catalog
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub(crate) fn into_store(self) -> S {
        self.store
    }

    pub fn set_current_step(&mut self, step_id: StepId) -> Result<()> {
        self.state.current_step = step_id;
        self.persist()
    }

    pub fn complete_step(&mut self, step_id: StepId) -> Result<()> {
        self.state.completed_steps.insert(step_id);
        self.persist()
    }

    pub fn mark_step_incomplete(&mut self, step_id: StepId) -> Result<()> {
        self.state.completed_steps.remove(&step_id);
        self.persist()
    }

    pub fn save_quiz_answer(&mut self, answer: QuizAnswer) -> Result<()> {
        match self
            .state
            .quiz_answers
            .iter_mut()
            .find(|existing| existing.same_question(&answer))
        {
            Some(existing) => *existing = answer,
            None => self.state.quiz_answers.push(answer),
        }
        self.persist()
    }

    pub fn reset_progress(&mut self) -> Result<()> {
        self.state = ProgressState::default();
        self.persist()
    }

    pub fn current_step(&self) -> StepId {
        self.state.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.catalog.len()
    }

    pub fn completed_count(&self) -> usize {
        self.state.completed_steps.len()
    }

    /// Completed share of the catalog as a whole percentage, rounded half up.
    pub fn progress(&self) -> u8 {
        progress_percent(self.completed_count(), self.total_steps())
    }

    pub fn is_step_completed(&self, step_id: StepId) -> bool {
        self.state.completed_steps.contains(&step_id)
    }

    pub fn steps_with_completion(&self) -> Vec<StepView<'_>> {
        self.catalog
            .iter()
            .map(|step| StepView {
                step,
                completed: self.is_step_completed(step.id),
            })
            .collect()
    }

    pub fn next_step(&self) -> Option<&LessonStep> {
        self.catalog.next_after(self.state.current_step)
    }

    pub fn previous_step(&self) -> Option<&LessonStep> {
        self.catalog.previous_before(self.state.current_step)
    }

    pub fn quiz_answers(&self) -> &[QuizAnswer] {
        &self.state.quiz_answers
    }

    pub fn quiz_answer(&self, step_id: StepId, question_index: u32) -> Option<&QuizAnswer> {
        self.state
            .quiz_answers
            .iter()
            .find(|answer| answer.step_id == step_id && answer.question_index == question_index)
    }

    pub fn quiz_summary(&self, step_id: StepId) -> QuizSummary {
        self.state
            .quiz_answers
            .iter()
            .filter(|answer| answer.step_id == step_id)
            .fold(QuizSummary::default(), |mut summary, answer| {
                summary.answered += 1;
                if answer.is_correct {
                    summary.correct += 1;
                }
                summary
            })
    }

    fn persist(&mut self) -> Result<()> {
        let raw = self
            .state
            .to_json()
            .context("failed to encode progress")?;
        self.store
            .write_slot(PROGRESS_SLOT, &raw)
            .context("failed to save progress")?;
        tracing::debug!(
            current_step = self.state.current_step,
            completed = self.state.completed_steps.len(),
            answers = self.state.quiz_answers.len(),
            "progress saved"
        );
        Ok(())
    }
}

pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total);
    ((200 * completed + total) / (2 * total)) as u8
}
