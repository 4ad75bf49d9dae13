//! One render function per dashboard section. Every panel tolerates
//! missing data (placeholder text, no panics) and keeps whatever was on
//! screen when a poll fails, since the reducer only replaces snapshots on
//! success.

use crate::app::App;
use crate::format;
use crate::ui::{level_color, pnl_color, util_color, CYAN, GRAY, GREEN, RED, YELLOW};
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, List, ListItem, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

fn placeholder(frame: &mut Frame, area: Rect, block: Block, text: &str) {
    frame.render_widget(
        Paragraph::new(text.to_string())
            .style(Style::default().fg(GRAY))
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

pub fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let block = Block::bordered().title("System");
    let Some(status) = &app.status else {
        placeholder(frame, area, block, "Lade Status...");
        return;
    };

    let (bot_label, bot_color) = if status.bot.is_running {
        ("Läuft", GREEN)
    } else {
        ("Gestoppt", RED)
    };
    let server_status = if status.server.status.is_empty() {
        "--"
    } else {
        status.server.status.as_str()
    };
    let server_color = match server_status {
        "healthy" => GREEN,
        "warning" => YELLOW,
        _ => RED,
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("● ", Style::default().fg(bot_color)),
            Span::raw("Bot: "),
            Span::styled(bot_label, Style::default().fg(bot_color).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(Span::styled(
            format!(
                "Letzte Aktivität: {}",
                status.bot.last_activity.as_deref().unwrap_or("N/A")
            ),
            Style::default().fg(GRAY),
        )),
        Line::from(vec![
            Span::styled("● ", Style::default().fg(server_color)),
            Span::raw("Server: "),
            Span::styled(server_status.to_string(), Style::default().fg(server_color)),
        ]),
    ];
    for (label, value) in [
        ("CPU", status.server.cpu_percent),
        ("RAM", status.server.ram_percent),
        ("Disk", status.server.disk_percent),
    ] {
        lines.push(Line::from(vec![
            Span::raw(format!("{label:<5} ")),
            Span::styled(
                format!("{value:.1}%"),
                Style::default().fg(util_color(value)),
            ),
        ]));
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_wallet(frame: &mut Frame, area: Rect, app: &App) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let block = Block::bordered().title("Wallet");
    let Some(wallet) = &app.wallet else {
        placeholder(frame, area, block, "Lade Wallet...");
        return;
    };

    let mut lines = Vec::new();
    if let Some(err) = &wallet.error {
        lines.push(Line::from(Span::styled(
            "Fehler",
            Style::default().fg(RED).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(RED),
        )));
        lines.push(Line::from(format!(
            "Adresse: {}",
            wallet.address.as_deref().unwrap_or("N/A")
        )));
    } else {
        lines.push(Line::from(Span::styled(
            format!("{:.6} SOL", wallet.balance_sol.unwrap_or(0.0)),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!(
            "${:.2}",
            wallet.balance_usd.unwrap_or(0.0)
        )));
        lines.push(Line::from(format!(
            "Adresse: {}",
            wallet.address.as_deref().unwrap_or("N/A")
        )));
        if let Some(ts) = &wallet.last_update {
            lines.push(Line::from(Span::styled(
                format!("Stand: {ts}"),
                Style::default().fg(GRAY),
            )));
        }
    }
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

pub fn render_stats(frame: &mut Frame, area: Rect, app: &App) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let block = Block::bordered().title("Performance");
    let Some(stats) = &app.stats else {
        placeholder(frame, area, block, "Lade Statistiken...");
        return;
    };

    let mut lines = Vec::new();
    if let Some(err) = &stats.error {
        lines.push(Line::from(Span::styled(
            "Fehler",
            Style::default().fg(RED).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(err.clone(), Style::default().fg(RED))));
    } else {
        let today = stats.today_pnl.unwrap_or(0.0);
        let total = stats.total_pnl.unwrap_or(0.0);
        lines.push(Line::from(vec![
            Span::raw("Heute:    "),
            Span::styled(
                format::fmt_pnl_sol(today),
                Style::default().fg(pnl_color(today)).add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::raw("Gesamt:   "),
            Span::styled(
                format::fmt_pnl_sol(total),
                Style::default().fg(pnl_color(total)).add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(format!(
            "Win-Rate: {}",
            format::fmt_win_rate(stats.win_rate.unwrap_or(0.0))
        )));
        if let Some(total_trades) = stats.total_trades {
            lines.push(Line::from(format!("Trades:   {total_trades}")));
        }
        if let Some(avg) = stats.avg_profit {
            lines.push(Line::from(format!("Ø Profit: {avg:+.6} SOL")));
        }
        if let (Some(best), Some(worst)) = (stats.best_trade, stats.worst_trade) {
            lines.push(Line::from(vec![
                Span::raw("Best/Worst: "),
                Span::styled(format!("{best:+.2}%"), Style::default().fg(GREEN)),
                Span::raw(" / "),
                Span::styled(format!("{worst:+.2}%"), Style::default().fg(RED)),
            ]));
        }
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_trades(frame: &mut Frame, area: Rect, app: &App) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let block = Block::bordered().title(format!("Letzte Trades ({})", app.trades.len()));
    if app.trades.is_empty() {
        placeholder(frame, area, block, "Keine Trades vorhanden");
        return;
    }

    let header = Row::new(vec!["Zeit", "Symbol", "Adresse", "Typ", "Status"])
        .style(Style::default().fg(CYAN).add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = app
        .trades
        .iter()
        .take(20)
        .map(|trade| {
            let status = trade.status.as_deref().unwrap_or("pending");
            let badge_color = level_color(format::trade_badge_level(status));
            let address = trade
                .address
                .as_deref()
                .map(format::truncate_addr)
                .unwrap_or_else(|| "N/A".to_string());
            Row::new(vec![
                Cell::from(trade.timestamp.as_deref().unwrap_or("N/A").to_string()),
                Cell::from(trade.symbol.as_deref().unwrap_or("N/A").to_string()),
                Cell::from(address),
                Cell::from(trade.trade_type.as_deref().unwrap_or("N/A").to_string()),
                Cell::from(Span::styled(
                    status.to_string(),
                    Style::default().fg(badge_color),
                )),
            ])
        })
        .collect();
    let widths = [
        Constraint::Length(19),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(5),
        Constraint::Min(7),
    ];
    frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
}

pub fn render_positions(frame: &mut Frame, area: Rect, app: &App) {
    // Absent on older backends; the layout already skips the panel then.
    if area.width == 0 || area.height == 0 {
        return;
    }
    let block = Block::bordered().title(format!("Offene Positionen ({})", app.positions.len()));
    if app.positions.is_empty() {
        placeholder(frame, area, block, "Keine offenen Positionen");
        return;
    }

    let mut lines = Vec::new();
    for (i, position) in app.positions.iter().enumerate() {
        let selected = i == app.selected_position;
        let marker = if selected { "▶ " } else { "  " };
        let pnl = position.pnl_percent.unwrap_or(0.0);
        let symbol_style = if selected {
            Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(
                position.symbol.as_deref().unwrap_or("N/A").to_string(),
                symbol_style,
            ),
            Span::raw(" "),
            Span::styled(
                format::fmt_signed_pct(pnl),
                Style::default().fg(pnl_color(pnl)).add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "  {:.6} → {:.6} | {:.2} Tokens | {}",
                position.entry_price.unwrap_or(0.0),
                position.current_price.unwrap_or(0.0),
                position.amount_tokens.unwrap_or(0.0),
                position
                    .token_address
                    .as_deref()
                    .map(format::truncate_addr)
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
            Style::default().fg(GRAY),
        )));
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_logs(frame: &mut Frame, area: Rect, app: &App) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let block = Block::bordered().title(format!("Bot Logs ({})", app.logs.len()));
    if app.logs.is_empty() {
        placeholder(frame, area, block, "Keine Logs vorhanden");
        return;
    }

    // Pinned to the tail: the newest lines are always visible.
    let visible = area.height.saturating_sub(2) as usize;
    let skip = app.logs.len().saturating_sub(visible);
    let items: Vec<ListItem> = app
        .logs
        .iter()
        .skip(skip)
        .map(|log| {
            let level = log.level.as_deref().unwrap_or("INFO");
            let level_color = match level {
                "ERROR" | "CRITICAL" => RED,
                "WARNING" => YELLOW,
                "DEBUG" => GRAY,
                _ => GREEN,
            };
            let message = format::sanitize_log(log.message.as_deref().unwrap_or(""));
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", log.timestamp.as_deref().unwrap_or("")),
                    Style::default().fg(GRAY),
                ),
                Span::styled(format!("{level:<8} "), Style::default().fg(level_color)),
                Span::raw(message),
            ]))
        })
        .collect();
    frame.render_widget(List::new(items).block(block), area);
}

pub fn render_bot_control(frame: &mut Frame, area: Rect, app: &App) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let block = Block::bordered().title("Bot-Steuerung");
    let mut lines = Vec::new();
    match &app.bot_control {
        Some(control) => {
            let (label, color) = if control.is_running {
                ("Läuft", GREEN)
            } else {
                ("Gestoppt", RED)
            };
            lines.push(Line::from(vec![
                Span::styled("● ", Style::default().fg(color)),
                Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            ]));
            lines.push(Line::from(format::bot_status_line(control)));
            match &control.timer {
                Some(timer) if timer.timer_active => {
                    let minutes = timer
                        .remaining_minutes
                        .unwrap_or_else(|| timer.remaining_seconds.unwrap_or(0) as f64 / 60.0);
                    lines.push(Line::from(Span::styled(
                        format!("Timer aktiv: noch {minutes:.1} min"),
                        Style::default().fg(YELLOW),
                    )));
                }
                _ => lines.push(Line::from(Span::styled(
                    "Kein Timer aktiv",
                    Style::default().fg(GRAY),
                ))),
            }
        }
        None => lines.push(Line::from(Span::styled(
            "Lade Bot-Status...",
            Style::default().fg(GRAY),
        ))),
    }

    let hotkey = |label: &str, enabled: bool| {
        if enabled {
            Span::styled(label.to_string(), Style::default().fg(CYAN))
        } else {
            Span::styled(
                label.to_string(),
                Style::default().fg(GRAY).add_modifier(Modifier::DIM),
            )
        }
    };
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        hotkey("[s] Start", app.can_start()),
        Span::raw("  "),
        hotkey("[x] Stop", app.can_stop()),
        Span::raw("  "),
        hotkey("[t] Timer", true),
    ]));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), area);
}
