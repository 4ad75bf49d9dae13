//! Centered popups: the password-gated control dialog and blocking
//! notifications (control confirmations, sleep-timer auto-stop).

use crate::app::{App, Modal, ModalField};
use crate::types::ControlAction;
use crate::ui::{CYAN, GRAY, RED, YELLOW};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub fn render(frame: &mut Frame, app: &App) {
    if let Modal::Open {
        action,
        password,
        minutes,
        field,
        error,
        submitting,
    } = &app.modal
    {
        render_control_dialog(frame, *action, password, minutes, *field, error, *submitting);
    }
    if let Some(message) = app.notifications.front() {
        render_notification(frame, message);
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn field_value<'a>(value: String, active: bool, submitting: bool) -> Span<'a> {
    let mut style = Style::default();
    if active && !submitting {
        style = style.fg(YELLOW).add_modifier(Modifier::BOLD);
    }
    let text = if active && !submitting {
        format!("{value}_")
    } else {
        value
    };
    Span::styled(text, style)
}

fn render_control_dialog(
    frame: &mut Frame,
    action: ControlAction,
    password: &str,
    minutes: &str,
    field: ModalField,
    error: &Option<String>,
    submitting: bool,
) {
    let area = frame.area();
    if area.width < 36 || area.height < 8 {
        return;
    }
    let is_timer = action == ControlAction::Timer;
    let height = if is_timer { 9 } else { 8 };
    let popup = centered_rect(area, 46, height);

    let masked = "*".repeat(password.chars().count());
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw(" Passwort: "),
            field_value(masked, field == ModalField::Password, submitting),
        ]),
    ];
    if is_timer {
        lines.push(Line::from(vec![
            Span::raw(" Minuten:  "),
            field_value(minutes.to_string(), field == ModalField::Minutes, submitting),
        ]));
    }
    lines.push(Line::from(""));
    if submitting {
        lines.push(Line::from(Span::styled(
            " Wird gesendet...",
            Style::default().fg(YELLOW),
        )));
    } else {
        let hint = if is_timer {
            " Enter Bestätigen · Tab Feld · Esc Abbrechen"
        } else {
            " Enter Bestätigen · Esc Abbrechen"
        };
        lines.push(Line::from(Span::styled(hint, Style::default().fg(GRAY))));
    }
    if let Some(err) = error {
        lines.push(Line::from(Span::styled(
            format!(" {err}"),
            Style::default().fg(RED),
        )));
    }

    let block = Block::bordered()
        .title(action.title())
        .border_style(Style::default().fg(CYAN));
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        popup,
    );
}

fn render_notification(frame: &mut Frame, message: &str) {
    let area = frame.area();
    if area.width < 30 || area.height < 6 {
        return;
    }
    let popup = centered_rect(area, 52, 7);
    let lines = vec![
        Line::from(""),
        Line::from(format!(" {message}")),
        Line::from(""),
        Line::from(Span::styled(
            " Beliebige Taste zum Schließen",
            Style::default().fg(GRAY),
        )),
    ];
    let block = Block::bordered()
        .title("Hinweis")
        .border_style(Style::default().fg(YELLOW));
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        popup,
    );
}
