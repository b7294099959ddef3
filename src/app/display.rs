use anyhow::{Result, bail};
use chrono::{DateTime, Local};

use crate::progress::{StepCatalog, StepId};

/// Resolves a step argument: an exact slug match first, then a plain
/// integer id. Integer ids outside the catalog are passed through.
pub(crate) fn parse_step_arg(catalog: &StepCatalog, raw: &str) -> Result<StepId> {
    let trimmed = raw.trim();
    if let Some(step) = catalog.find_by_slug(trimmed) {
        return Ok(step.id);
    }
    match trimmed.parse::<StepId>() {
        Ok(id) => Ok(id),
        Err(_) => bail!("unknown step '{trimmed}'"),
    }
}

pub(crate) fn step_position_text(current: StepId, total: usize) -> String {
    format!("Step {} / {}", i64::from(current) + 1, total)
}

pub(crate) fn format_progress_bar(percent: u8, width: usize) -> String {
    let percent = usize::from(percent.min(100));
    let filled = (percent * width + 50) / 100;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    )
}

pub(crate) fn option_letter(index: u32) -> String {
    match u8::try_from(index) {
        Ok(offset) if offset < 26 => char::from(b'A' + offset).to_string(),
        _ => (u64::from(index) + 1).to_string(),
    }
}

pub(crate) fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    let mut out = s.to_string();
    if out.chars().count() > max {
        out = out.chars().take(max.saturating_sub(3)).collect::<String>() + "...";
    }
    out
}

pub(crate) fn format_saved_at_display(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| {
            dt.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M %:z")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}
