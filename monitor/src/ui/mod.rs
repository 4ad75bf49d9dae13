//! Dashboard layout and shared render helpers.

pub mod charts;
pub mod modal;
pub mod panels;

use crate::app::App;
use crate::format::{self, UtilLevel};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

pub const GREEN: Color = Color::Green;
pub const RED: Color = Color::Red;
pub const YELLOW: Color = Color::Yellow;
pub const CYAN: Color = Color::Cyan;
pub const GRAY: Color = Color::DarkGray;

pub fn level_color(level: UtilLevel) -> Color {
    match level {
        UtilLevel::Ok => GREEN,
        UtilLevel::Warn => YELLOW,
        UtilLevel::Critical => RED,
    }
}

pub fn util_color(percent: f64) -> Color {
    level_color(format::util_level(percent))
}

pub fn pnl_color(value: f64) -> Color {
    if value >= 0.0 {
        GREEN
    } else {
        RED
    }
}

pub fn draw(frame: &mut Frame, app: &App) {
    let [header_area, top_area, middle_area, bottom_area, logs_area, footer_area] =
        Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(9),
            Constraint::Length(11),
            Constraint::Min(6),
            Constraint::Length(9),
            Constraint::Length(1),
        ])
        .areas(frame.area());

    render_header(frame, header_area, app);

    let [status_area, wallet_area, control_area] = Layout::horizontal([
        Constraint::Percentage(33),
        Constraint::Percentage(33),
        Constraint::Percentage(34),
    ])
    .areas(top_area);
    panels::render_status(frame, status_area, app);
    panels::render_wallet(frame, wallet_area, app);
    panels::render_bot_control(frame, control_area, app);

    let [stats_area, perf_area, winloss_area] = Layout::horizontal([
        Constraint::Percentage(30),
        Constraint::Percentage(40),
        Constraint::Percentage(30),
    ])
    .areas(middle_area);
    panels::render_stats(frame, stats_area, app);
    charts::render_performance(frame, perf_area);
    charts::render_winloss(frame, winloss_area, app);

    // Older backends have no positions endpoint; the trades table then
    // takes the full row.
    if app.positions_supported {
        let [trades_area, positions_area] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(bottom_area);
        panels::render_trades(frame, trades_area, app);
        panels::render_positions(frame, positions_area, app);
    } else {
        panels::render_trades(frame, bottom_area, app);
    }

    panels::render_logs(frame, logs_area, app);
    render_footer(frame, footer_area, app);

    modal::render(frame, app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let countdown = app.countdown_secs();
    let countdown_color = if countdown < 30 { RED } else { YELLOW };
    let line = Line::from(vec![
        Span::styled(
            " MEMERO MONITOR ",
            Style::default().fg(CYAN).add_modifier(Modifier::BOLD),
        ),
        Span::styled("| ", Style::default().fg(GRAY)),
        Span::raw(format!(
            "Uhrzeit {} ",
            format::fmt_clock(app.now, app.tz_offset)
        )),
        Span::styled("| ", Style::default().fg(GRAY)),
        Span::raw("Nächster Trade-Zyklus "),
        Span::styled(
            format::fmt_countdown(countdown),
            Style::default()
                .fg(countdown_color)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(line).block(Block::bordered()), area);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let hotkey = |label: &str, enabled: bool| {
        if enabled {
            Span::styled(label.to_string(), Style::default().fg(CYAN))
        } else {
            Span::styled(label.to_string(), Style::default().fg(GRAY).add_modifier(Modifier::DIM))
        }
    };
    let line = Line::from(vec![
        hotkey(" q Beenden ", true),
        hotkey("· s Start ", app.can_start()),
        hotkey("· x Stop ", app.can_stop()),
        hotkey("· t Timer ", true),
        hotkey("· ↑↓ Position ", !app.positions.is_empty()),
        hotkey("· c Adresse kopieren ", !app.positions.is_empty()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
