use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Gauge, Padding, Paragraph, Row, Table, TableState,
    Wrap,
};

use crate::progress::{ProgressTracker, SnapshotStore};

use super::super::display::{step_position_text, truncate};

pub(super) fn draw_tui<S: SnapshotStore>(
    frame: &mut Frame,
    tracker: &ProgressTracker<S>,
    table_state: &mut TableState,
    status: &str,
    pending_reset: bool,
) {
    let bg = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(bg, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let percent = tracker.progress();
    let current = tracker.current_step();
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "STEPTRACK",
            Style::default()
                .fg(Color::Rgb(110, 170, 255))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(
            format!("{percent}% complete"),
            Style::default().fg(Color::Rgb(120, 220, 150)),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(
            step_position_text(current, tracker.total_steps()),
            Style::default().fg(Color::Rgb(185, 195, 210)),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(
            format!(
                "{}/{} done",
                tracker.completed_count(),
                tracker.total_steps()
            ),
            Style::default().fg(Color::Yellow),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(panel_block("Tutorial"));
    frame.render_widget(header, chunks[0]);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(chunks[1]);
    let details_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(body_chunks[1]);

    let views = tracker.steps_with_completion();
    let rows: Vec<Row> = views
        .iter()
        .map(|view| {
            let row = Row::new(vec![
                Cell::from(if view.completed { "✔" } else { "○" }),
                Cell::from(view.step.id.to_string()),
                Cell::from(truncate(&view.step.short_title, 20)),
                Cell::from(view.step.duration.clone()),
            ]);
            if view.step.id == current {
                row.style(Style::default().fg(Color::Yellow))
            } else if view.completed {
                row.style(Style::default().fg(Color::Rgb(120, 220, 150)))
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(10),
        ],
    )
    .header(
        Row::new(vec!["", "#", "Step", "Time"]).style(
            Style::default()
                .fg(Color::Rgb(110, 170, 255))
                .add_modifier(Modifier::BOLD),
        ),
    )
    .block(panel_block("Steps"))
    .row_highlight_style(
        Style::default()
            .bg(Color::Rgb(110, 170, 255))
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("▸ ");
    frame.render_stateful_widget(table, body_chunks[0], table_state);

    let selection_text = match table_state.selected().and_then(|idx| views.get(idx)) {
        Some(view) => {
            let summary = tracker.quiz_summary(view.step.id);
            let mut text = format!(
                "{}\n\n{}\n\nDuration\n{}\n\nStatus\n{}",
                truncate(&view.step.title, 48),
                view.step.description,
                view.step.duration,
                if view.completed {
                    "Completed"
                } else {
                    "Not completed"
                },
            );
            if view.step.id == current {
                text.push_str(" (current step)");
            }
            if summary.answered > 0 {
                text.push_str(&format!(
                    "\n\nQuiz\n{} answered, {} correct",
                    summary.answered, summary.correct
                ));
            }
            text
        }
        None => "No step selected.".to_string(),
    };
    let selection = Paragraph::new(selection_text)
        .style(Style::default().fg(Color::Rgb(230, 230, 230)))
        .wrap(Wrap { trim: true })
        .block(panel_block("Selected"))
        .alignment(Alignment::Left);
    frame.render_widget(selection, details_chunks[0]);

    let progress = Gauge::default()
        .block(panel_block("Progress"))
        .gauge_style(
            Style::default()
                .fg(Color::Rgb(130, 190, 255))
                .bg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .label(format!("{percent}%"))
        .ratio(f64::from(percent) / 100.0);
    frame.render_widget(progress, details_chunks[1]);

    let command_bar = Paragraph::new(controls_line())
        .alignment(Alignment::Center)
        .block(panel_block("Controls"));
    frame.render_widget(command_bar, chunks[2]);

    let status_widget = Paragraph::new(status.to_string())
        .style(status_style(status))
        .block(panel_block("Status"));
    frame.render_widget(status_widget, chunks[3]);

    if pending_reset {
        let popup_text = "Reset all progress?\n\nCompleted steps and quiz answers will be forgotten.\n\n[y / Enter] Reset   [n / Esc] Cancel";
        let popup_area = popup_rect_for_text(frame.area(), popup_text);
        render_popup_shadow(frame, popup_area);
        frame.render_widget(Clear, popup_area);
        let popup = Paragraph::new(popup_text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(modal_block("Confirm Reset"));
        frame.render_widget(popup, popup_area);
    }
}

fn panel_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(125, 135, 150)))
        .title(title)
}

fn modal_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(
            Style::default()
                .fg(Color::Rgb(160, 190, 235))
                .add_modifier(Modifier::BOLD),
        )
        .title(title)
        .padding(Padding::new(2, 2, 1, 1))
}

fn key_hint(key: &'static str, label: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(
            format!(" {key} "),
            Style::default()
                .bg(Color::Rgb(72, 82, 96))
                .fg(Color::Rgb(230, 235, 242))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {label}  "),
            Style::default().fg(Color::Rgb(185, 195, 210)),
        ),
    ]
}

fn controls_line() -> Line<'static> {
    let hints = [
        key_hint("↑/↓", "move"),
        key_hint("Enter", "open"),
        key_hint("c", "complete"),
        key_hint("u", "undo"),
        key_hint("n/p", "next/prev"),
        key_hint("r", "reset"),
        key_hint("q", "quit"),
    ];
    Line::from(hints.into_iter().flatten().collect::<Vec<_>>())
}

fn status_style(status: &str) -> Style {
    if status.starts_with("ERROR:") {
        Style::default()
            .fg(Color::Rgb(255, 145, 120))
            .add_modifier(Modifier::BOLD)
    } else if status.starts_with("INFO:") {
        Style::default().fg(Color::Rgb(205, 165, 255))
    } else {
        Style::default().fg(Color::Rgb(230, 235, 242))
    }
}

fn centered_fixed_rect(width: u16, height: u16, area: Rect) -> Rect {
    let clamped_width = width.min(area.width.max(1));
    let clamped_height = height.min(area.height.max(1));
    let x = area.x + area.width.saturating_sub(clamped_width) / 2;
    let y = area.y + area.height.saturating_sub(clamped_height) / 2;
    Rect::new(x, y, clamped_width, clamped_height)
}

fn render_popup_shadow(frame: &mut Frame, popup_area: Rect) {
    let area = frame.area();
    let shadow = Rect::new(
        (popup_area.x + 1).min(area.x + area.width.saturating_sub(1)),
        (popup_area.y + 1).min(area.y + area.height.saturating_sub(1)),
        popup_area.width.saturating_sub(1),
        popup_area.height.saturating_sub(1),
    );
    if shadow.width == 0 || shadow.height == 0 {
        return;
    }
    let shadow_block = Block::default().style(Style::default().bg(Color::Rgb(14, 16, 24)));
    frame.render_widget(shadow_block, shadow);
}

fn popup_rect_for_text(area: Rect, text: &str) -> Rect {
    let max_line_width = text
        .lines()
        .map(|line| line.chars().count() as u16)
        .max()
        .unwrap_or(0);
    let line_count = text.lines().count() as u16;

    let available_width = area.width.saturating_sub(2).max(1);
    let width = max_line_width
        .saturating_add(8)
        .clamp(40.min(available_width), 72.min(available_width));

    let available_height = area.height.saturating_sub(2).max(1);
    let height = line_count
        .saturating_add(4)
        .clamp(8.min(available_height), 14.min(available_height));

    centered_fixed_rect(width, height, area)
}
