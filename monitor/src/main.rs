mod api;
mod app;
mod config;
mod format;
mod poller;
mod types;
mod ui;

use crate::api::MonitorApi;
use crate::app::{App, Modal, PollCommand};
use crate::config::Config;
use crate::types::ControlAction;
use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::info;

#[derive(Parser)]
#[command(name = "memon", about = "Terminal monitoring dashboard for the Memero trading bot")]
struct Cli {
    /// Fetch every section once, print a snapshot and exit
    #[arg(long)]
    once: bool,

    /// Override the backend base URL
    #[arg(long)]
    api_base: Option<String>,

    /// Override the refresh interval (seconds)
    #[arg(long)]
    interval: Option<u64>,

    /// Load config from a specific .env file
    #[arg(long)]
    config_file: Option<String>,

    /// Log file path (the terminal belongs to the dashboard)
    #[arg(long)]
    log_file: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = Config::from_env_file(cli.config_file.as_deref())?;
    if let Some(base) = cli.api_base {
        cfg.api_base = base;
    }
    if let Some(interval) = cli.interval {
        cfg.refresh_interval_secs = interval.max(1);
    }
    if let Some(log_file) = cli.log_file {
        cfg.log_file = log_file;
    }

    init_tracing(&cfg, cli.once)?;

    let rt = tokio::runtime::Runtime::new()?;
    let api = MonitorApi::new(&cfg.api_base, Duration::from_secs(cfg.request_timeout_secs));

    if cli.once {
        return rt.block_on(run_once(&api, &cfg));
    }

    info!(
        "memon v{} starting (backend {}, refresh {}s)",
        env!("CARGO_PKG_VERSION"),
        cfg.api_base,
        cfg.refresh_interval_secs
    );

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    rt.block_on(async { poller::spawn(api, &cfg, event_tx, cmd_rx, shutdown_rx) });

    let mut app = App::new(&cfg, Utc::now().timestamp());
    let mut terminal = setup_terminal()?;
    let result = run_ui(&mut terminal, &mut app, event_rx, cmd_tx);
    shutdown_tx.send(true).ok();
    restore_terminal(&mut terminal)?;
    info!("memon stopped");
    result
}

fn init_tracing(cfg: &Config, to_stderr: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    if to_stderr {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&cfg.log_file)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Arc::new(file))
            .init();
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Synchronous draw/input loop on the main thread; the poller feeds it
/// through the event channel.
fn run_ui(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    mut events: mpsc::UnboundedReceiver<app::AppEvent>,
    cmd_tx: mpsc::UnboundedSender<PollCommand>,
) -> Result<()> {
    loop {
        while let Ok(event) = events.try_recv() {
            if let Some(cmd) = app.apply(event) {
                cmd_tx.send(cmd).ok();
            }
        }

        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key, &cmd_tx);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, cmd_tx: &mpsc::UnboundedSender<PollCommand>) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // A blocking notification swallows the next keypress.
    if !app.notifications.is_empty() {
        app.dismiss_notification();
        return;
    }

    if matches!(app.modal, Modal::Open { .. }) {
        match key.code {
            KeyCode::Esc => app.close_modal(),
            KeyCode::Tab => app.modal_toggle_field(),
            KeyCode::Enter => {
                if let Some(cmd) = app.submit_modal() {
                    cmd_tx.send(cmd).ok();
                }
            }
            KeyCode::Backspace => app.modal_backspace(),
            KeyCode::Char(c) => app.modal_input(c),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('s') => app.open_modal(ControlAction::Start),
        KeyCode::Char('x') => app.open_modal(ControlAction::Stop),
        KeyCode::Char('t') => app.open_modal(ControlAction::Timer),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev_position(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_position(),
        KeyCode::Char('c') => {
            if let Some(address) = app.selected_position_address() {
                if cli_clipboard::set_contents(address.to_string()).is_err() {
                    tracing::warn!("clipboard not available");
                }
            }
        }
        _ => {}
    }
}

/// Headless snapshot for scripts and cron: one poll of every section,
/// printed with the same formatting the panels use.
async fn run_once(api: &MonitorApi, cfg: &Config) -> Result<()> {
    let offset = chrono::FixedOffset::east_opt(cfg.tz_offset_hours * 3600)
        .unwrap_or_else(|| chrono::FixedOffset::east_opt(0).expect("zero offset"));
    let mut reachable = 0usize;

    println!(
        "MEMERO MONITOR | {}",
        format::fmt_clock(Utc::now().timestamp(), offset)
    );

    match api.status().await {
        Ok(status) => {
            reachable += 1;
            let bot = if status.bot.is_running { "Läuft" } else { "Gestoppt" };
            println!(
                "Bot:    {} (Letzte Aktivität: {})",
                bot,
                status.bot.last_activity.as_deref().unwrap_or("N/A")
            );
            println!(
                "Server: {} | CPU {:.1}% | RAM {:.1}% | Disk {:.1}%",
                status.server.status,
                status.server.cpu_percent,
                status.server.ram_percent,
                status.server.disk_percent
            );
        }
        Err(e) => println!("Status: Fehler ({e})"),
    }

    match api.wallet().await {
        Ok(wallet) => {
            reachable += 1;
            match wallet.error {
                Some(err) => println!("Wallet: Fehler ({err})"),
                None => println!(
                    "Wallet: {:.6} SOL (${:.2}) | {}",
                    wallet.balance_sol.unwrap_or(0.0),
                    wallet.balance_usd.unwrap_or(0.0),
                    wallet.address.as_deref().unwrap_or("N/A")
                ),
            }
        }
        Err(e) => println!("Wallet: Fehler ({e})"),
    }

    match api.stats().await {
        Ok(stats) => {
            reachable += 1;
            match stats.error {
                Some(err) => println!("Stats:  Fehler ({err})"),
                None => println!(
                    "Stats:  Heute {} | Gesamt {} | Win-Rate {}",
                    format::fmt_pnl_sol(stats.today_pnl.unwrap_or(0.0)),
                    format::fmt_pnl_sol(stats.total_pnl.unwrap_or(0.0)),
                    format::fmt_win_rate(stats.win_rate.unwrap_or(0.0))
                ),
            }
        }
        Err(e) => println!("Stats:  Fehler ({e})"),
    }

    match api.trades(cfg.trades_limit).await {
        Ok(resp) => {
            reachable += 1;
            if resp.trades.is_empty() {
                println!("Trades: Keine Trades vorhanden");
            } else {
                println!("Trades: {}", resp.trades.len());
                for trade in resp.trades.iter().take(5) {
                    println!(
                        "  {} {} {} {}",
                        trade.timestamp.as_deref().unwrap_or("N/A"),
                        trade.symbol.as_deref().unwrap_or("N/A"),
                        trade.trade_type.as_deref().unwrap_or("N/A"),
                        trade.status.as_deref().unwrap_or("pending")
                    );
                }
            }
        }
        Err(e) => println!("Trades: Fehler ({e})"),
    }

    match api.positions().await {
        Ok(resp) => {
            reachable += 1;
            println!("Positionen: {}", resp.positions.len());
            for position in &resp.positions {
                println!(
                    "  {} {} ({:.6} → {:.6})",
                    position.symbol.as_deref().unwrap_or("N/A"),
                    format::fmt_signed_pct(position.pnl_percent.unwrap_or(0.0)),
                    position.entry_price.unwrap_or(0.0),
                    position.current_price.unwrap_or(0.0)
                );
            }
        }
        Err(api::ApiError::Unsupported) => {}
        Err(e) => println!("Positionen: Fehler ({e})"),
    }

    match api.logs(cfg.log_lines).await {
        Ok(resp) => {
            reachable += 1;
            if resp.logs.is_empty() {
                println!("Logs:   Keine Logs vorhanden");
            } else {
                println!("Logs:   {} Zeilen, zuletzt:", resp.logs.len());
                for log in resp.logs.iter().rev().take(3).rev() {
                    println!(
                        "  {} {} {}",
                        log.timestamp.as_deref().unwrap_or(""),
                        log.level.as_deref().unwrap_or("INFO"),
                        format::sanitize_log(log.message.as_deref().unwrap_or(""))
                    );
                }
            }
        }
        Err(e) => println!("Logs:   Fehler ({e})"),
    }

    match api.bot_status().await {
        Ok(control) => {
            reachable += 1;
            println!("Steuerung: {}", format::bot_status_line(&control));
        }
        Err(e) => println!("Steuerung: Fehler ({e})"),
    }

    if reachable == 0 {
        anyhow::bail!("backend unreachable: {}", cfg.api_base);
    }
    Ok(())
}
