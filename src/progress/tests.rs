use super::catalog::{CatalogError, LessonStep};
use super::state::ProgressState;
use super::tracker::{QuizSummary, progress_percent};
use super::*;

fn builtin_tracker() -> ProgressTracker<MemoryStore> {
    ProgressTracker::load(MemoryStore::default(), StepCatalog::builtin())
        .expect("tracker should load")
}

fn catalog_of(len: usize) -> StepCatalog {
    let steps = (0..len)
        .map(|idx| LessonStep {
            id: idx as StepId,
            slug: format!("step-{idx}"),
            title: format!("Step {idx}"),
            short_title: format!("S{idx}"),
            duration: "5 min".to_string(),
            description: String::new(),
        })
        .collect();
    StepCatalog::new(steps).expect("generated catalog should be valid")
}

fn answer(step_id: StepId, question_index: u32, selected_option: u32, is_correct: bool) -> QuizAnswer {
    QuizAnswer {
        step_id,
        question_index,
        selected_option,
        is_correct,
    }
}

#[test]
fn fresh_store_starts_empty() {
    let tracker = builtin_tracker();
    assert_eq!(tracker.progress(), 0);
    assert_eq!(tracker.current_step(), 0);
    assert!(tracker.quiz_answers().is_empty());

    let views = tracker.steps_with_completion();
    assert_eq!(views.len(), 9);
    assert!(views.iter().all(|view| !view.completed));
}

#[test]
fn three_of_nine_steps_is_thirty_three_percent() {
    let mut tracker = builtin_tracker();
    for id in 0..3 {
        tracker.complete_step(id).expect("complete should work");
    }
    assert_eq!(tracker.progress(), 33);

    tracker.complete_step(2).expect("complete should work");
    assert_eq!(tracker.progress(), 33);
    assert_eq!(tracker.completed_count(), 3);
}

#[test]
fn progress_matches_rounded_share_for_every_subset_size() {
    for total in 1..=12usize {
        for completed in 0..=total {
            let mut tracker = ProgressTracker::load(MemoryStore::default(), catalog_of(total))
                .expect("tracker should load");
            for id in 0..completed {
                tracker
                    .complete_step(id as StepId)
                    .expect("complete should work");
            }
            let expected = (100.0 * completed as f64 / total as f64).round() as u8;
            assert_eq!(
                tracker.progress(),
                expected,
                "{completed} of {total} steps"
            );
        }
    }
}

#[test]
fn progress_percent_rounds_half_up_and_clamps() {
    assert_eq!(progress_percent(1, 8), 13);
    assert_eq!(progress_percent(0, 9), 0);
    assert_eq!(progress_percent(9, 9), 100);
    assert_eq!(progress_percent(12, 9), 100);
    assert_eq!(progress_percent(3, 0), 0);
}

#[test]
fn completed_ids_outside_catalog_never_push_progress_past_full() {
    let mut tracker = builtin_tracker();
    for id in 0..9 {
        tracker.complete_step(id).expect("complete should work");
    }
    tracker.complete_step(100).expect("complete should work");
    tracker.complete_step(-3).expect("complete should work");
    assert_eq!(tracker.progress(), 100);
    assert!(tracker.is_step_completed(100));
    assert!(tracker.is_step_completed(-3));
}

#[test]
fn complete_step_is_idempotent() {
    let mut once = builtin_tracker();
    once.complete_step(4).expect("complete should work");

    let mut twice = builtin_tracker();
    twice.complete_step(4).expect("complete should work");
    twice.complete_step(4).expect("complete should work");

    assert_eq!(once.state().completed_steps, twice.state().completed_steps);
}

#[test]
fn mark_step_incomplete_always_clears_membership() {
    let mut tracker = builtin_tracker();
    tracker.complete_step(1).expect("complete should work");
    tracker.mark_step_incomplete(1).expect("incomplete should work");
    assert!(!tracker.is_step_completed(1));

    tracker.mark_step_incomplete(7).expect("incomplete should work");
    assert!(!tracker.is_step_completed(7));
    assert_eq!(tracker.completed_count(), 0);
}

#[test]
fn set_current_step_stores_out_of_range_ids() {
    let mut tracker = builtin_tracker();
    tracker.set_current_step(42).expect("step should be saved");
    assert_eq!(tracker.current_step(), 42);
    assert!(tracker.next_step().is_none());
    assert!(tracker.previous_step().is_none());

    tracker.set_current_step(-1).expect("step should be saved");
    assert_eq!(tracker.current_step(), -1);
}

#[test]
fn save_quiz_answer_replaces_same_question() {
    let mut tracker = builtin_tracker();
    tracker
        .save_quiz_answer(answer(0, 0, 1, true))
        .expect("answer should be saved");
    tracker
        .save_quiz_answer(answer(0, 0, 2, false))
        .expect("answer should be saved");

    assert_eq!(tracker.quiz_answers(), &[answer(0, 0, 2, false)]);
    assert_eq!(tracker.quiz_answer(0, 0), Some(&answer(0, 0, 2, false)));
}

#[test]
fn save_quiz_answer_keeps_position_of_replaced_record() {
    let mut tracker = builtin_tracker();
    tracker
        .save_quiz_answer(answer(2, 0, 0, true))
        .expect("answer should be saved");
    tracker
        .save_quiz_answer(answer(2, 1, 3, false))
        .expect("answer should be saved");
    tracker
        .save_quiz_answer(answer(2, 0, 1, false))
        .expect("answer should be saved");

    assert_eq!(
        tracker.quiz_answers(),
        &[answer(2, 0, 1, false), answer(2, 1, 3, false)]
    );
}

#[test]
fn quiz_summary_counts_per_step() {
    let mut tracker = builtin_tracker();
    tracker
        .save_quiz_answer(answer(3, 0, 0, true))
        .expect("answer should be saved");
    tracker
        .save_quiz_answer(answer(3, 1, 2, false))
        .expect("answer should be saved");
    tracker
        .save_quiz_answer(answer(4, 0, 1, true))
        .expect("answer should be saved");

    assert_eq!(
        tracker.quiz_summary(3),
        QuizSummary {
            answered: 2,
            correct: 1
        }
    );
    assert_eq!(tracker.quiz_summary(5), QuizSummary::default());
}

#[test]
fn reset_progress_clears_everything() {
    let mut tracker = builtin_tracker();
    tracker.set_current_step(6).expect("step should be saved");
    for id in [0, 3, 8] {
        tracker.complete_step(id).expect("complete should work");
    }
    tracker
        .save_quiz_answer(answer(3, 0, 0, true))
        .expect("answer should be saved");

    tracker.reset_progress().expect("reset should work");

    assert_eq!(tracker.progress(), 0);
    assert_eq!(tracker.current_step(), 0);
    assert!((-1..10).all(|id| !tracker.is_step_completed(id)));
    assert!(tracker.quiz_answers().is_empty());
    assert_eq!(tracker.state(), &ProgressState::default());
}

#[test]
fn reloading_from_same_store_restores_state() {
    let mut tracker = builtin_tracker();
    tracker.set_current_step(5).expect("step should be saved");
    tracker.complete_step(0).expect("complete should work");
    tracker.complete_step(4).expect("complete should work");
    tracker
        .save_quiz_answer(answer(4, 1, 2, false))
        .expect("answer should be saved");
    let expected = tracker.state().clone();

    let reloaded = ProgressTracker::load(tracker.into_store(), StepCatalog::builtin())
        .expect("tracker should reload");
    assert_eq!(reloaded.state(), &expected);
    assert_eq!(reloaded.progress(), 22);
}

#[test]
fn every_mutation_is_written_to_the_slot() {
    let mut tracker = builtin_tracker();
    tracker.complete_step(2).expect("complete should work");
    let raw = tracker
        .store()
        .read_slot(PROGRESS_SLOT)
        .expect("slot should be readable")
        .expect("slot should exist after a mutation");
    let saved = ProgressState::from_json(&raw).expect("slot should decode");
    assert!(saved.completed_steps.contains(&2));

    tracker.mark_step_incomplete(2).expect("incomplete should work");
    let raw = tracker
        .store()
        .read_slot(PROGRESS_SLOT)
        .expect("slot should be readable")
        .expect("slot should exist after a mutation");
    let saved = ProgressState::from_json(&raw).expect("slot should decode");
    assert!(saved.completed_steps.is_empty());
}

#[test]
fn corrupted_slot_falls_back_to_default_state() {
    let mut store = MemoryStore::default();
    store
        .write_slot(PROGRESS_SLOT, "{not json")
        .expect("slot should be written");
    let tracker =
        ProgressTracker::load(store, StepCatalog::builtin()).expect("tracker should load");
    assert_eq!(tracker.state(), &ProgressState::default());
}

#[test]
fn partial_snapshot_fills_missing_fields_with_defaults() {
    let mut store = MemoryStore::default();
    store
        .write_slot(PROGRESS_SLOT, r#"{"completed_steps":[1,2]}"#)
        .expect("slot should be written");
    let tracker =
        ProgressTracker::load(store, StepCatalog::builtin()).expect("tracker should load");
    assert_eq!(tracker.current_step(), 0);
    assert!(tracker.is_step_completed(1));
    assert!(tracker.quiz_answers().is_empty());
}

#[test]
fn repeated_quiz_answers_in_snapshot_collapse_to_latest() {
    let mut store = MemoryStore::default();
    store
        .write_slot(
            PROGRESS_SLOT,
            r#"{"current_step":0,"completed_steps":[],"quiz_answers":[
                {"step_id":0,"question_index":0,"selected_option":1,"is_correct":true},
                {"step_id":2,"question_index":1,"selected_option":0,"is_correct":false},
                {"step_id":0,"question_index":0,"selected_option":2,"is_correct":false}
            ]}"#,
        )
        .expect("slot should be written");
    let mut tracker =
        ProgressTracker::load(store, StepCatalog::builtin()).expect("tracker should load");

    assert_eq!(
        tracker.quiz_answers(),
        &[answer(0, 0, 2, false), answer(2, 1, 0, false)]
    );
    assert_eq!(
        tracker.quiz_summary(0),
        QuizSummary {
            answered: 1,
            correct: 0
        }
    );

    tracker
        .save_quiz_answer(answer(0, 0, 3, true))
        .expect("answer should be saved");
    assert_eq!(
        tracker
            .quiz_answers()
            .iter()
            .filter(|saved| saved.step_id == 0 && saved.question_index == 0)
            .count(),
        1
    );
    assert_eq!(
        tracker.quiz_summary(0),
        QuizSummary {
            answered: 1,
            correct: 1
        }
    );
}

#[test]
fn dedup_quiz_answers_reports_dropped_records() {
    let mut state = ProgressState::default();
    state.quiz_answers.extend([
        answer(1, 0, 0, false),
        answer(1, 1, 2, true),
        answer(1, 0, 3, true),
        answer(1, 0, 1, false),
    ]);
    assert_eq!(state.dedup_quiz_answers(), 2);
    assert_eq!(
        state.quiz_answers,
        vec![answer(1, 0, 1, false), answer(1, 1, 2, true)]
    );
    assert_eq!(state.dedup_quiz_answers(), 0);
}

#[test]
fn snapshot_json_round_trip_preserves_state() {
    let mut state = ProgressState {
        current_step: 7,
        ..ProgressState::default()
    };
    state.completed_steps.extend([6, 0, 3]);
    state.quiz_answers.push(answer(6, 2, 1, true));

    let raw = state.to_json().expect("state should encode");
    let decoded = ProgressState::from_json(&raw).expect("state should decode");
    assert_eq!(decoded, state);
}

#[test]
fn failed_write_keeps_in_memory_update() {
    let mut tracker = ProgressTracker::load(MemoryStore::failing_writes(), StepCatalog::builtin())
        .expect("tracker should load");
    let err = tracker
        .complete_step(1)
        .expect_err("read-only store should fail");
    assert!(format!("{err:#}").contains("failed to save progress"));
    assert!(tracker.is_step_completed(1));
}

#[test]
fn steps_with_completion_follows_catalog_order() {
    let mut tracker = builtin_tracker();
    tracker.complete_step(8).expect("complete should work");
    tracker.complete_step(1).expect("complete should work");

    let views = tracker.steps_with_completion();
    let ids: Vec<StepId> = views.iter().map(|view| view.step.id).collect();
    assert_eq!(ids, (0..9).collect::<Vec<_>>());
    let completed: Vec<StepId> = views
        .iter()
        .filter(|view| view.completed)
        .map(|view| view.step.id)
        .collect();
    assert_eq!(completed, vec![1, 8]);

    tracker.mark_step_incomplete(8).expect("incomplete should work");
    assert!(!tracker.steps_with_completion()[8].completed);
}

#[test]
fn next_and_previous_follow_catalog_neighbours() {
    let mut tracker = builtin_tracker();
    assert_eq!(tracker.next_step().map(|step| step.id), Some(1));
    assert!(tracker.previous_step().is_none());

    tracker.set_current_step(8).expect("step should be saved");
    assert!(tracker.next_step().is_none());
    assert_eq!(tracker.previous_step().map(|step| step.id), Some(7));
}

#[test]
fn builtin_catalog_has_nine_ordered_steps() {
    let catalog = StepCatalog::builtin();
    assert_eq!(catalog.len(), 9);
    for (idx, step) in catalog.iter().enumerate() {
        assert_eq!(step.id as usize, idx);
        assert_eq!(step.slug, idx.to_string());
        assert!(!step.title.is_empty());
    }
    assert_eq!(catalog.find_by_slug("4").map(|step| step.id), Some(4));
    assert!(catalog.find_by_slug("nine").is_none());
}

#[test]
fn catalog_rejects_empty_list() {
    assert_eq!(StepCatalog::new(Vec::new()).err(), Some(CatalogError::Empty));
}

#[test]
fn catalog_rejects_id_that_does_not_match_position() {
    let mut steps: Vec<LessonStep> = catalog_of(3).iter().cloned().collect();
    steps[2].id = 5;
    assert_eq!(
        StepCatalog::new(steps).err(),
        Some(CatalogError::IdMismatch { position: 2, id: 5 })
    );
}

#[test]
fn catalog_rejects_duplicate_and_empty_slugs() {
    let mut steps: Vec<LessonStep> = catalog_of(3).iter().cloned().collect();
    steps[1].slug = "step-0".to_string();
    assert_eq!(
        StepCatalog::new(steps).err(),
        Some(CatalogError::DuplicateSlug {
            slug: "step-0".to_string()
        })
    );

    let mut steps: Vec<LessonStep> = catalog_of(2).iter().cloned().collect();
    steps[0].slug = "  ".to_string();
    assert_eq!(
        StepCatalog::new(steps).err(),
        Some(CatalogError::EmptySlug { id: 0 })
    );
}

#[test]
fn catalog_from_json_reports_shape_errors() {
    let err = StepCatalog::from_json_str(r#"{"steps":[]}"#).expect_err("object is not a list");
    assert!(format!("{err:#}").contains("not a JSON array"));

    let err = StepCatalog::from_json_str("[]").expect_err("empty list is rejected");
    assert!(format!("{err:#}").contains("no steps"));
}
