use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "steptrack",
    version,
    about = "Track your way through the step-by-step framework tutorial"
)]
pub struct Cli {
    /// Progress database file (overrides STEPTRACK_DB)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// JSON step catalog replacing the built-in tutorial (overrides STEPTRACK_CATALOG)
    #[arg(long, global = true, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show overall progress and the current step
    Status,
    /// List every step with its completion mark
    Steps,
    /// Jump to a step by id or slug
    Goto { step: String },
    /// Move to the following step
    Next,
    /// Move to the preceding step
    Prev,
    /// Mark a step complete (defaults to the current step)
    Complete { step: Option<String> },
    /// Clear the completion mark of a step
    Incomplete { step: String },
    /// Record the option chosen for a quiz question
    Answer {
        step: String,
        question: u32,
        option: u32,
        /// The chosen option was the right one
        #[arg(long)]
        correct: bool,
    },
    /// List recorded quiz answers
    Answers {
        #[arg(long)]
        step: Option<String>,
    },
    /// Forget all progress and quiz answers
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    Tui,
}
