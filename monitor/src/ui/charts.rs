//! Chart widgets for the performance row.

use crate::app::App;
use crate::ui::{CYAN, GRAY, GREEN, RED, YELLOW};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

/// Fixed 7-day placeholder series. The backend serves no PnL history
/// endpoint, so this chart is decorative and never re-derived from live
/// data; only the win/loss segments update per poll.
const PERFORMANCE_HISTORY: [(f64, f64); 7] = [
    (0.0, 0.0),
    (1.0, 0.005),
    (2.0, 0.012),
    (3.0, 0.008),
    (4.0, 0.015),
    (5.0, 0.020),
    (6.0, 0.025),
];

pub fn render_performance(frame: &mut Frame, area: Rect) {
    if area.width < 12 || area.height < 4 {
        return;
    }
    let datasets = vec![Dataset::default()
        .name("PnL (SOL)")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(CYAN))
        .data(&PERFORMANCE_HISTORY)];
    let chart = Chart::new(datasets)
        .block(Block::bordered().title("Performance (Tag 1-7)"))
        .x_axis(Axis::default().bounds([0.0, 6.0]).style(Style::default().fg(GRAY)))
        .y_axis(Axis::default().bounds([0.0, 0.03]).style(Style::default().fg(GRAY)));
    frame.render_widget(chart, area);
}

/// Win/Loss/Failed as three proportional segments summing to the full
/// width, rebuilt from every stats poll (absent counts default to zero).
pub fn render_winloss(frame: &mut Frame, area: Rect, app: &App) {
    if area.width < 8 || area.height < 3 {
        return;
    }
    let block = Block::bordered().title("Win / Loss / Failed");
    let (wins, losses, failed) = app
        .stats
        .as_ref()
        .map(|s| {
            (
                s.wins.unwrap_or(0),
                s.loss_trades.unwrap_or(0),
                s.failed_trades.unwrap_or(0),
            )
        })
        .unwrap_or((0, 0, 0));
    let total = wins + losses + failed;

    if total == 0 {
        frame.render_widget(
            Paragraph::new("Noch keine abgeschlossenen Trades")
                .style(Style::default().fg(GRAY))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }

    let bar_width = area.width.saturating_sub(2) as u64;
    let win_cells = bar_width * wins / total;
    let loss_cells = bar_width * losses / total;
    let failed_cells = bar_width - win_cells - loss_cells;

    let bar = Line::from(vec![
        Span::styled("█".repeat(win_cells as usize), Style::default().fg(GREEN)),
        Span::styled("█".repeat(loss_cells as usize), Style::default().fg(RED)),
        Span::styled("█".repeat(failed_cells as usize), Style::default().fg(YELLOW)),
    ]);
    let legend = Line::from(vec![
        Span::styled(
            format!("Gewinn {wins}"),
            Style::default().fg(GREEN).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" · "),
        Span::styled(
            format!("Verlust {losses}"),
            Style::default().fg(RED).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" · "),
        Span::styled(
            format!("Fehlgeschlagen {failed}"),
            Style::default().fg(YELLOW).add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(vec![bar, legend]).block(block), area);
}
