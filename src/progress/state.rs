use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::catalog::StepId;

/// One recorded response to a quiz question. `is_correct` is decided by the
/// caller when the answer is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAnswer {
    pub step_id: StepId,
    pub question_index: u32,
    pub selected_option: u32,
    pub is_correct: bool,
}

impl QuizAnswer {
    pub(crate) fn same_question(&self, other: &QuizAnswer) -> bool {
        self.step_id == other.step_id && self.question_index == other.question_index
    }
}

/// Everything that is written to the persisted slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressState {
    pub current_step: StepId,
    pub completed_steps: BTreeSet<StepId>,
    pub quiz_answers: Vec<QuizAnswer>,
}

impl ProgressState {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Collapses repeated answers to the same question into one record: the
    /// last value wins and keeps the slot of the first. Returns how many
    /// records were dropped.
    pub(crate) fn dedup_quiz_answers(&mut self) -> usize {
        let before = self.quiz_answers.len();
        let mut kept: Vec<QuizAnswer> = Vec::with_capacity(before);
        for answer in self.quiz_answers.drain(..) {
            match kept.iter_mut().find(|existing| existing.same_question(&answer)) {
                Some(existing) => *existing = answer,
                None => kept.push(answer),
            }
        }
        self.quiz_answers = kept;
        before - self.quiz_answers.len()
    }
}
