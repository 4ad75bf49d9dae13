//! Background refresh scheduler.
//!
//! Every section is fetched as its own fire-and-forget task: a slow or
//! failing endpoint only delays its own panel. Each dispatch carries a
//! monotonically increasing sequence number so the reducer can drop a
//! stale response that finishes after a newer one.

use crate::api::{ApiError, MonitorApi};
use crate::app::{AppEvent, PollCommand, Section, SectionData};
use crate::config::Config;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::warn;

#[derive(Clone)]
struct Poller {
    api: Arc<MonitorApi>,
    tx: mpsc::UnboundedSender<AppEvent>,
    seq: Arc<AtomicU64>,
    trades_limit: u32,
    log_lines: u32,
}

impl Poller {
    fn refresh_all(&self) {
        for section in Section::ALL {
            self.fetch(section);
        }
    }

    fn fetch(&self, section: Section) {
        let this = self.clone();
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        tokio::spawn(async move {
            let result = match section {
                Section::Status => this.api.status().await.map(SectionData::Status),
                Section::Wallet => this.api.wallet().await.map(SectionData::Wallet),
                Section::Stats => this.api.stats().await.map(SectionData::Stats),
                Section::Trades => this
                    .api
                    .trades(this.trades_limit)
                    .await
                    .map(|r| SectionData::Trades(r.trades)),
                Section::Positions => match this.api.positions().await {
                    Ok(r) => Ok(SectionData::Positions(r.positions)),
                    Err(ApiError::Unsupported) => Ok(SectionData::PositionsUnsupported),
                    Err(e) => Err(e),
                },
                Section::Logs => this
                    .api
                    .logs(this.log_lines)
                    .await
                    .map(|r| SectionData::Logs(r.logs)),
                Section::BotControl => this.api.bot_status().await.map(SectionData::BotControl),
            };
            match result {
                Ok(data) => {
                    this.tx.send(AppEvent::Section { section, seq, data }).ok();
                }
                // Previous snapshot stays on screen; the failure only hits the log.
                Err(e) => warn!(section = section.name(), error = %e, "section fetch failed"),
            }
        });
    }

    fn execute(&self, cmd: PollCommand) {
        match cmd {
            PollCommand::Control {
                action,
                password,
                minutes,
            } => {
                let this = self.clone();
                tokio::spawn(async move {
                    let result = this
                        .api
                        .control(action, &password, minutes)
                        .await
                        .map_err(|e| e.to_string());
                    this.tx.send(AppEvent::ControlDone { action, result }).ok();
                });
            }
            PollCommand::RefreshBotControl => self.fetch(Section::BotControl),
        }
    }
}

/// Spawn the refresh loop, the one-second ticker and the command executor.
/// All tasks drain when the shutdown flag flips or its sender drops.
pub fn spawn(
    api: MonitorApi,
    cfg: &Config,
    tx: mpsc::UnboundedSender<AppEvent>,
    mut cmd_rx: mpsc::UnboundedReceiver<PollCommand>,
    shutdown: watch::Receiver<bool>,
) {
    let poller = Poller {
        api: Arc::new(api),
        tx: tx.clone(),
        seq: Arc::new(AtomicU64::new(0)),
        trades_limit: cfg.trades_limit,
        log_lines: cfg.log_lines,
    };

    // Clock/countdown ticker.
    let tick_tx = tx;
    let mut tick_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let now = Utc::now().timestamp();
                    if tick_tx.send(AppEvent::Tick { now }).is_err() {
                        break;
                    }
                }
                _ = tick_shutdown.changed() => break,
            }
        }
    });

    // Section refresh + control commands.
    let refresh = Duration::from_secs(cfg.refresh_interval_secs.max(1));
    let mut shutdown = shutdown;
    tokio::spawn(async move {
        poller.refresh_all();
        let mut interval = tokio::time::interval(refresh);
        interval.tick().await; // the first tick fires immediately
        loop {
            tokio::select! {
                _ = interval.tick() => poller.refresh_all(),
                cmd = cmd_rx.recv() => match cmd {
                    Some(cmd) => poller.execute(cmd),
                    None => break,
                },
                _ = shutdown.changed() => break,
            }
        }
    });
}
