mod display;
mod tui;


use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use crate::cli::{Cli, Command};
use crate::config::Settings;
use crate::db::Database;
use crate::progress::{PROGRESS_SLOT, ProgressTracker, QuizAnswer, SnapshotStore, StepId};

use self::display::{
    format_progress_bar, format_saved_at_display, is_affirmative, option_letter, parse_step_arg,
    step_position_text, truncate,
};

pub fn run(cli: Cli) -> Result<()> {
    let settings = Settings::resolve(cli.db.as_deref(), cli.catalog.as_deref())?;
    let mut tracker = open_tracker(&settings)?;

    match cli.command {
        Some(Command::Status) => run_status(&tracker)?,
        Some(Command::Steps) => print!("{}", render_steps(&tracker)),
        Some(Command::Goto { step }) => println!("{}", goto_step(&mut tracker, &step)?),
        Some(Command::Next) => println!("{}", move_to_next(&mut tracker)?),
        Some(Command::Prev) => println!("{}", move_to_previous(&mut tracker)?),
        Some(Command::Complete { step }) => {
            println!("{}", complete_step(&mut tracker, step.as_deref())?)
        }
        Some(Command::Incomplete { step }) => {
            println!("{}", mark_incomplete(&mut tracker, &step)?)
        }
        Some(Command::Answer {
            step,
            question,
            option,
            correct,
        }) => println!(
            "{}",
            record_answer(&mut tracker, &step, question, option, correct)?
        ),
        Some(Command::Answers { step }) => {
            print!("{}", render_answers(&tracker, step.as_deref())?)
        }
        Some(Command::Reset { yes }) => run_reset(&mut tracker, yes)?,
        Some(Command::Tui) | None => tui::run_tui(&mut tracker)?,
    }

    Ok(())
}

fn open_tracker(settings: &Settings) -> Result<ProgressTracker<Database>> {
    let catalog = settings.load_catalog()?;
    let db = Database::open(&settings.db_path)?;
    db.migrate()?;
    ProgressTracker::load(db, catalog)
}

fn run_status(tracker: &ProgressTracker<Database>) -> Result<()> {
    let saved_at = tracker.store().slot_saved_at(PROGRESS_SLOT)?;
    print!("{}", render_status(tracker, saved_at.as_deref()));
    Ok(())
}

fn run_reset<S: SnapshotStore>(tracker: &mut ProgressTracker<S>, yes: bool) -> Result<()> {
    if !yes && !confirm("Reset all progress and quiz answers? This cannot be undone. [y/N] ")? {
        println!("Reset canceled.");
        return Ok(());
    }
    tracker.reset_progress()?;
    println!("Progress reset. Back to step 0.");
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush().context("failed to flush prompt")?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(is_affirmative(&answer))
}

pub(crate) fn render_status<S: SnapshotStore>(
    tracker: &ProgressTracker<S>,
    saved_at: Option<&str>,
) -> String {
    let percent = tracker.progress();
    let current = tracker.current_step();
    let mut out = String::new();

    out.push_str(&format!(
        "Progress: {percent:>3}% {}\n",
        format_progress_bar(percent, 30)
    ));
    let position = step_position_text(current, tracker.total_steps());
    match tracker.catalog().get(current) {
        Some(step) => {
            let mark = if tracker.is_step_completed(current) {
                " [done]"
            } else {
                ""
            };
            out.push_str(&format!(
                "{position}: {} ({}){mark}\n",
                step.title, step.duration
            ));
        }
        None => {
            out.push_str(&format!("{position}: not part of this tutorial\n"));
        }
    }
    out.push_str(&format!(
        "Completed: {} of {} steps\n",
        tracker.completed_count(),
        tracker.total_steps()
    ));
    if let Some(next) = tracker.next_step() {
        out.push_str(&format!("Next: {}\n", next.title));
    }
    if let Some(raw) = saved_at {
        out.push_str(&format!("Last saved: {}\n", format_saved_at_display(raw)));
    }
    out
}

pub(crate) fn render_steps<S: SnapshotStore>(tracker: &ProgressTracker<S>) -> String {
    let current = tracker.current_step();
    let mut out = format!(
        "{:<3} {:<4} {:<16} {:<8} {:<48}\n",
        "", "ID", "STEP", "TIME", "TITLE"
    );
    for view in tracker.steps_with_completion() {
        let mark = match (view.completed, view.step.id == current) {
            (true, true) => "*x",
            (true, false) => " x",
            (false, true) => "* ",
            (false, false) => "  ",
        };
        out.push_str(&format!(
            "{:<3} {:<4} {:<16} {:<8} {:<48}\n",
            mark,
            view.step.id,
            truncate(&view.step.short_title, 16),
            view.step.duration,
            truncate(&view.step.title, 48)
        ));
    }
    out
}

pub(crate) fn render_answers<S: SnapshotStore>(
    tracker: &ProgressTracker<S>,
    step: Option<&str>,
) -> Result<String> {
    let filter = step
        .map(|raw| parse_step_arg(tracker.catalog(), raw))
        .transpose()?;
    let step_ids: BTreeSet<StepId> = tracker
        .quiz_answers()
        .iter()
        .map(|answer| answer.step_id)
        .filter(|id| filter.is_none_or(|wanted| wanted == *id))
        .collect();

    if step_ids.is_empty() {
        return Ok("No quiz answers recorded yet.\n".to_string());
    }

    let mut out = String::new();
    for step_id in step_ids {
        let summary = tracker.quiz_summary(step_id);
        let name = tracker
            .catalog()
            .get(step_id)
            .map(|step| step.short_title.as_str())
            .unwrap_or("unknown step");
        out.push_str(&format!(
            "Step {step_id} ({name}): {} answered, {} correct\n",
            summary.answered, summary.correct
        ));

        let mut answers: Vec<&QuizAnswer> = tracker
            .quiz_answers()
            .iter()
            .filter(|answer| answer.step_id == step_id)
            .collect();
        answers.sort_by_key(|answer| answer.question_index);
        for answer in answers {
            out.push_str(&format!(
                "  Q{}: option {} {}\n",
                u64::from(answer.question_index) + 1,
                option_letter(answer.selected_option),
                if answer.is_correct { "correct" } else { "incorrect" }
            ));
        }
    }
    Ok(out)
}

pub(crate) fn goto_step<S: SnapshotStore>(
    tracker: &mut ProgressTracker<S>,
    raw: &str,
) -> Result<String> {
    let step_id = parse_step_arg(tracker.catalog(), raw)?;
    tracker.set_current_step(step_id)?;
    Ok(match tracker.catalog().get(step_id) {
        Some(step) => format!("Now on step {}: {}", step.id, step.title),
        None => {
            tracing::warn!(step_id, "current step set outside the catalog");
            format!(
                "Now on step {step_id}, which is not part of this tutorial (steps 0-{}).",
                tracker.total_steps().saturating_sub(1)
            )
        }
    })
}

pub(crate) fn move_to_next<S: SnapshotStore>(tracker: &mut ProgressTracker<S>) -> Result<String> {
    match tracker.next_step().map(|step| (step.id, step.title.clone())) {
        Some((id, title)) => {
            tracker.set_current_step(id)?;
            Ok(format!("Now on step {id}: {title}"))
        }
        None if tracker.catalog().contains(tracker.current_step()) => {
            Ok("Already on the last step. Tutorial finished!".to_string())
        }
        None => Ok(outside_catalog_message(tracker.current_step())),
    }
}

pub(crate) fn move_to_previous<S: SnapshotStore>(
    tracker: &mut ProgressTracker<S>,
) -> Result<String> {
    match tracker.previous_step().map(|step| (step.id, step.title.clone())) {
        Some((id, title)) => {
            tracker.set_current_step(id)?;
            Ok(format!("Now on step {id}: {title}"))
        }
        None if tracker.catalog().contains(tracker.current_step()) => {
            Ok("Already on the first step.".to_string())
        }
        None => Ok(outside_catalog_message(tracker.current_step())),
    }
}

fn outside_catalog_message(current: StepId) -> String {
    format!("Current step {current} is not part of this tutorial. Use `steptrack goto` to return.")
}

pub(crate) fn complete_step<S: SnapshotStore>(
    tracker: &mut ProgressTracker<S>,
    raw: Option<&str>,
) -> Result<String> {
    let step_id = match raw {
        Some(raw) => parse_step_arg(tracker.catalog(), raw)?,
        None => tracker.current_step(),
    };
    let already = tracker.is_step_completed(step_id);
    tracker.complete_step(step_id)?;
    let verb = if already { "Already completed" } else { "Completed" };
    Ok(format!(
        "{verb} step {step_id}. Progress: {}%",
        tracker.progress()
    ))
}

pub(crate) fn mark_incomplete<S: SnapshotStore>(
    tracker: &mut ProgressTracker<S>,
    raw: &str,
) -> Result<String> {
    let step_id = parse_step_arg(tracker.catalog(), raw)?;
    tracker.mark_step_incomplete(step_id)?;
    Ok(format!(
        "Step {step_id} marked incomplete. Progress: {}%",
        tracker.progress()
    ))
}

pub(crate) fn record_answer<S: SnapshotStore>(
    tracker: &mut ProgressTracker<S>,
    raw_step: &str,
    question_index: u32,
    selected_option: u32,
    is_correct: bool,
) -> Result<String> {
    let step_id = parse_step_arg(tracker.catalog(), raw_step)?;
    let replaced = tracker.quiz_answer(step_id, question_index).is_some();
    tracker.save_quiz_answer(QuizAnswer {
        step_id,
        question_index,
        selected_option,
        is_correct,
    })?;
    Ok(format!(
        "{} step {step_id} Q{}: option {} ({})",
        if replaced { "Updated" } else { "Recorded" },
        u64::from(question_index) + 1,
        option_letter(selected_option),
        if is_correct { "correct" } else { "incorrect" }
    ))
}
