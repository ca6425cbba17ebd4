use crate::models::{AssignmentReport, Role};
use crate::preview::{self, FilePreview};
use crate::ui::state::{
    ActivityLog, SubmissionView, SubmissionsPane, SubmitDialog, ViewState,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

const SUBMITTED_TAG: Color = Color::Rgb(250, 140, 22);
const EVALUATED_TAG: Color = Color::Green;

pub fn render_ui(
    frame: &mut Frame,
    view: &ViewState,
    submissions: Option<&SubmissionsPane>,
    dialog: Option<&SubmitDialog>,
    role: Role,
    busy: bool,
    log: &ActivityLog,
) {
    if let Some(pane) = submissions {
        render_submissions(frame, pane, busy);
    } else {
        match view {
            ViewState::Loading => render_loading(frame, "Loading assignment..."),
            ViewState::Error { message } => render_error(frame, message),
            ViewState::NotFound => render_not_found(frame),
            ViewState::Loaded { report, submission } => {
                render_report(frame, report, submission, role, busy, log)
            }
        }
    }

    if let Some(dialog) = dialog {
        render_submit_dialog(frame, dialog);
    }
}

fn render_loading(frame: &mut Frame, message: &str) {
    let area = frame.area();
    let block = Block::default()
        .title("Assignment")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(message)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_error(frame: &mut Frame, message: &str) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let text = vec![
        Line::from(vec![Span::styled(
            "Error",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(message),
        Line::from(""),
        Line::from("Please try again later."),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, chunks[0]);

    render_help(frame, chunks[1], "[Enter/Esc: Reload | q: Quit]");
}

fn render_not_found(frame: &mut Frame) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let text = vec![
        Line::from(vec![Span::styled(
            "Assignment not found",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("The requested assignment could not be found."),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, chunks[0]);

    render_help(frame, chunks[1], "[Enter/Esc: Reload | q: Quit]");
}

fn render_report(
    frame: &mut Frame,
    report: &AssignmentReport,
    submission: &SubmissionView,
    role: Role,
    busy: bool,
    log: &ActivityLog,
) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(area);

    // Header: title + description
    let header_title = if busy {
        "Assignment (working...)"
    } else {
        "Assignment"
    };
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            report.assignment_title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(report.description.clone()),
    ])
    .block(
        Block::default()
            .title(header_title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(header, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[1]);

    render_details_column(frame, columns[0], report, log);
    render_submission_panel(frame, columns[1], report, submission, role);

    let help = match (role, submission) {
        (Role::Student, SubmissionView::Unsubmitted) => {
            "[a: Add or create | r: Refresh | q: Quit]"
        }
        (Role::Student, _) => "[u: Unsubmit | r: Refresh | q: Quit]",
        (Role::Trainer, _) => "[s: View Submissions | r: Refresh | q: Quit]",
    };
    render_help(frame, chunks[2], help);
}

fn render_details_column(frame: &mut Frame, area: Rect, report: &AssignmentReport, log: &ActivityLog) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(8)])
        .split(area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Due: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(report.due_date.format("%Y-%m-%d").to_string()),
        ]),
        Line::from(""),
        Line::from(report.description.clone()),
        Line::from(""),
        Line::from(Span::styled(
            "Assignment File:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    match report.assignment_file.as_deref() {
        Some(link) => lines.extend(preview_lines(Some(link))),
        None => lines.push(Line::from("No file attached to this assignment.")),
    }

    let details = Paragraph::new(lines)
        .block(
            Block::default()
                .title("Details")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(details, rows[0]);

    let log_items: Vec<ListItem> = log
        .messages()
        .iter()
        .map(|msg| ListItem::new(format!("• {}", msg)).style(Style::default().fg(Color::Green)))
        .collect();

    let log_list = List::new(log_items).block(
        Block::default()
            .title("Activity")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    frame.render_widget(log_list, rows[1]);
}

fn render_submission_panel(
    frame: &mut Frame,
    area: Rect,
    report: &AssignmentReport,
    submission: &SubmissionView,
    role: Role,
) {
    let block = Block::default()
        .title("Your Submission")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    match submission {
        SubmissionView::Unsubmitted => {
            let action = if role.capabilities().can_submit {
                "Press 'a' to add or create a submission."
            } else {
                "Press 's' to view submissions."
            };
            let paragraph = Paragraph::new(vec![
                Line::from("No submission yet."),
                Line::from(""),
                Line::from(action),
            ])
            .block(block)
            .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
        }
        SubmissionView::SubmittedUngraded => {
            let lines = submission_lines(report, "Submitted", SUBMITTED_TAG);
            let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
        }
        SubmissionView::SubmittedGraded { progress } => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(6), Constraint::Length(3)])
                .split(area);

            let mut lines = submission_lines(report, "Evaluated", EVALUATED_TAG);
            if let Some(marks) = report.marks {
                lines.insert(
                    3,
                    Line::from(vec![
                        Span::styled(
                            "Obtained Marks: ",
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(marks.to_string()),
                    ]),
                );
            }
            let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
            frame.render_widget(paragraph, rows[0]);

            match progress {
                Some(percent) => {
                    let gauge = Gauge::default()
                        .block(Block::default().title("Score").borders(Borders::ALL))
                        .gauge_style(Style::default().fg(Color::Green))
                        .percent(*percent)
                        .label(format!("{}%", percent));
                    frame.render_widget(gauge, rows[1]);
                }
                None => {
                    let na = Paragraph::new("Score: N/A")
                        .block(Block::default().title("Score").borders(Borders::ALL))
                        .alignment(Alignment::Center);
                    frame.render_widget(na, rows[1]);
                }
            }
        }
    }
}

fn submission_lines(report: &AssignmentReport, tag: &str, tag_color: Color) -> Vec<Line<'static>> {
    let submitted_on = report
        .submission_date
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                "Submitted on: ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(submitted_on),
        ]),
        Line::from(vec![
            Span::styled("Status: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                tag.to_string(),
                Style::default().fg(tag_color).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(
                "Total Marks: ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(report.total_marks.to_string()),
        ]),
    ];

    lines.push(Line::from(""));
    lines.extend(preview_lines(report.submitted_file_link.as_deref()));

    if let Some(rating) = &report.rating {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Rating:",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(rating.clone()));
    }
    if let Some(remark) = &report.remark {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Remark:",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(remark.clone()));
    }

    lines
}

/// Text stand-ins for the page's file widgets. The fallback branch keeps the
/// shipped dual rendering: an image attempt plus a plain download link.
fn preview_lines(link: Option<&str>) -> Vec<Line<'static>> {
    let Some(link) = link else {
        return Vec::new();
    };

    match preview::classify(Some(link)) {
        FilePreview::Image => vec![Line::from(format!("[image] {}", link))],
        FilePreview::Document => vec![Line::from(format!("[pdf preview] {}", link))],
        FilePreview::Fallback => vec![
            Line::from(format!("[image] {}", link)),
            Line::from(format!("{} (download)", link)),
        ],
        FilePreview::None => Vec::new(),
    }
}

fn render_submissions(frame: &mut Frame, pane: &SubmissionsPane, busy: bool) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let items: Vec<ListItem> = pane
        .rows
        .values()
        .enumerate()
        .map(|(i, entry)| {
            let style = if i == pane.selected_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let prefix = if i == pane.selected_index { "> " } else { "  " };
            let submitted = entry
                .submission_date
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "not submitted".to_string());
            let marks = entry
                .marks
                .map(|m| format!("{} marks", m))
                .unwrap_or_else(|| "ungraded".to_string());
            let content = format!("{}{} - {} - {}", prefix, entry.student_name, submitted, marks);

            ListItem::new(content).style(style)
        })
        .collect();

    let title = if busy {
        "Submissions (working...)".to_string()
    } else {
        match &pane.exported_to {
            Some(path) => format!("Submissions - Exported to {}", path),
            None => "Submissions".to_string(),
        }
    };

    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(list, chunks[0]);

    render_help(
        frame,
        chunks[1],
        &format!(
            "Found: {} submission(s) | [↑↓: Navigate | e: Export CSV | Esc: Back | q: Quit]",
            pane.rows.len()
        ),
    );
}

fn render_submit_dialog(frame: &mut Frame, dialog: &SubmitDialog) {
    let area = centered_rect(60, 7, frame.area());

    frame.render_widget(Clear, area);

    let text = vec![
        Line::from("Paste the link to your submitted file:"),
        Line::from(""),
        Line::from(format!("{}_", dialog.file_link)),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .title("Submit Assignment - [Enter: Submit | Esc: Cancel]")
                .borders(Borders::ALL)
                .border_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(text.to_string())
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(help, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
