//! Client-side state and the reducer over poller events.
//!
//! All mutable state lives in [`App`]; the poller and ticker feed it
//! [`AppEvent`]s and the UI reads snapshots. Commands back to the poller
//! (control POSTs, forced re-fetches) are returned from the reducer so the
//! state machine stays testable without channels.

use crate::config::Config;
use crate::format;
use crate::types::{
    BotControlStatus, ControlAction, ControlResponse, LogEntry, Position, Stats, SystemStatus,
    Trade, WalletInfo,
};
use chrono::FixedOffset;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// One dashboard section = one endpoint = one panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Status,
    Wallet,
    Stats,
    Trades,
    Positions,
    Logs,
    BotControl,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Status,
        Section::Wallet,
        Section::Stats,
        Section::Trades,
        Section::Positions,
        Section::Logs,
        Section::BotControl,
    ];

    fn idx(self) -> usize {
        match self {
            Section::Status => 0,
            Section::Wallet => 1,
            Section::Stats => 2,
            Section::Trades => 3,
            Section::Positions => 4,
            Section::Logs => 5,
            Section::BotControl => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Section::Status => "status",
            Section::Wallet => "wallet",
            Section::Stats => "stats",
            Section::Trades => "trades",
            Section::Positions => "positions",
            Section::Logs => "logs",
            Section::BotControl => "bot-control",
        }
    }
}

/// Payload of a completed section fetch.
#[derive(Debug, Clone)]
pub enum SectionData {
    Status(SystemStatus),
    Wallet(WalletInfo),
    Stats(Stats),
    Trades(Vec<Trade>),
    Positions(Vec<Position>),
    /// The backend has no positions endpoint; hide the panel silently.
    PositionsUnsupported,
    Logs(Vec<LogEntry>),
    BotControl(BotControlStatus),
}

/// Events flowing from the poller/ticker into the reducer.
#[derive(Debug, Clone)]
pub enum AppEvent {
    Section {
        section: Section,
        seq: u64,
        data: SectionData,
    },
    Tick {
        now: i64,
    },
    ControlDone {
        action: ControlAction,
        result: Result<ControlResponse, String>,
    },
}

/// Commands the reducer hands back for the poller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollCommand {
    Control {
        action: ControlAction,
        password: String,
        minutes: Option<u64>,
    },
    RefreshBotControl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalField {
    Password,
    Minutes,
}

/// Control dialog lifecycle: closed -> open -> submitting -> closed on
/// success, or back to open with an inline error.
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Closed,
    Open {
        action: ControlAction,
        password: String,
        minutes: String,
        field: ModalField,
        error: Option<String>,
        submitting: bool,
    },
}

pub struct App {
    pub status: Option<SystemStatus>,
    pub wallet: Option<WalletInfo>,
    pub stats: Option<Stats>,
    pub trades: Vec<Trade>,
    pub positions: Vec<Position>,
    pub positions_supported: bool,
    pub logs: Vec<LogEntry>,
    pub bot_control: Option<BotControlStatus>,
    pub selected_position: usize,
    pub modal: Modal,
    /// FIFO of blocking notifications; the front one is on screen.
    pub notifications: VecDeque<String>,
    pub now: i64,
    pub last_trade_time: Option<i64>,
    pub should_quit: bool,
    pub tz_offset: FixedOffset,
    trade_interval: i64,
    applied_seq: [Option<u64>; 7],
}

impl App {
    pub fn new(cfg: &Config, now: i64) -> Self {
        let tz_offset = FixedOffset::east_opt(cfg.tz_offset_hours * 3600)
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset"));
        Self {
            status: None,
            wallet: None,
            stats: None,
            trades: Vec::new(),
            positions: Vec::new(),
            positions_supported: true,
            logs: Vec::new(),
            bot_control: None,
            selected_position: 0,
            modal: Modal::Closed,
            notifications: VecDeque::new(),
            now,
            last_trade_time: None,
            should_quit: false,
            tz_offset,
            trade_interval: cfg.trade_interval_secs.max(1),
            applied_seq: [None; 7],
        }
    }

    // ── Reducer ──

    pub fn apply(&mut self, event: AppEvent) -> Option<PollCommand> {
        match event {
            AppEvent::Section { section, seq, data } => {
                if !self.accept_seq(section, seq) {
                    debug!(section = section.name(), seq, "dropping stale section result");
                    return None;
                }
                self.apply_section(data);
                None
            }
            AppEvent::Tick { now } => {
                self.on_tick(now);
                None
            }
            AppEvent::ControlDone { action, result } => self.on_control_done(action, result),
        }
    }

    /// Per-section monotonic guard: a slow response from an older poll
    /// must not overwrite a newer one.
    fn accept_seq(&mut self, section: Section, seq: u64) -> bool {
        let slot = &mut self.applied_seq[section.idx()];
        if slot.is_some_and(|prev| seq <= prev) {
            return false;
        }
        *slot = Some(seq);
        true
    }

    fn apply_section(&mut self, data: SectionData) {
        match data {
            SectionData::Status(status) => {
                self.sync_countdown(status.bot.last_activity.as_deref());
                self.status = Some(status);
            }
            SectionData::Wallet(wallet) => self.wallet = Some(wallet),
            SectionData::Stats(stats) => self.stats = Some(stats),
            SectionData::Trades(trades) => self.trades = trades,
            SectionData::Positions(positions) => {
                self.positions_supported = true;
                if self.selected_position >= positions.len() {
                    self.selected_position = positions.len().saturating_sub(1);
                }
                self.positions = positions;
            }
            SectionData::PositionsUnsupported => {
                self.positions_supported = false;
                self.positions.clear();
            }
            SectionData::Logs(logs) => self.logs = logs,
            SectionData::BotControl(control) => {
                if control.timer.as_ref().is_some_and(|t| t.auto_stopped) {
                    let msg = control
                        .timer
                        .as_ref()
                        .and_then(|t| t.stop_message.clone())
                        .unwrap_or_else(|| {
                            "Bot wurde vom Sleep-Timer automatisch gestoppt.".to_string()
                        });
                    self.notifications.push_back(msg);
                }
                self.bot_control = Some(control);
            }
        }
    }

    // ── Countdown ──

    /// Re-anchor the countdown to the server's authoritative last-activity
    /// time. Parse failures keep the previous anchor.
    fn sync_countdown(&mut self, last_activity: Option<&str>) {
        let Some(raw) = last_activity else { return };
        match format::parse_activity(raw, self.tz_offset) {
            Some(epoch) => self.last_trade_time = Some(epoch),
            None => warn!(raw, "could not parse last_activity timestamp"),
        }
    }

    /// Seconds until the next expected trade cycle. Without a known last
    /// trade the countdown free-runs on a synthetic phase so it is never
    /// blank.
    pub fn countdown_secs(&self) -> i64 {
        match self.last_trade_time {
            Some(last) => (self.trade_interval - (self.now - last)).max(0),
            None => self.trade_interval - self.now.rem_euclid(self.trade_interval),
        }
    }

    fn on_tick(&mut self, now: i64) {
        self.now = now;
        // Self-reset: at zero the countdown restarts from the full interval
        // instead of sticking, independent of server confirmation.
        if let Some(last) = self.last_trade_time {
            if self.trade_interval - (now - last) <= 0 {
                self.last_trade_time = Some(now);
            }
        }
    }

    // ── Control modal ──

    pub fn can_start(&self) -> bool {
        self.bot_control.as_ref().is_some_and(|c| !c.is_running)
    }

    pub fn can_stop(&self) -> bool {
        self.bot_control.as_ref().is_some_and(|c| c.is_running)
    }

    /// Open the dialog for an action, clearing prior input and errors.
    /// Start/stop respect the enabled state derived from the bot status.
    pub fn open_modal(&mut self, action: ControlAction) {
        let allowed = match action {
            ControlAction::Start => self.can_start(),
            ControlAction::Stop => self.can_stop(),
            ControlAction::Timer => true,
        };
        if !allowed || self.is_submitting() {
            return;
        }
        self.modal = Modal::Open {
            action,
            password: String::new(),
            minutes: String::new(),
            field: ModalField::Password,
            error: None,
            submitting: false,
        };
    }

    pub fn close_modal(&mut self) {
        if !self.is_submitting() {
            self.modal = Modal::Closed;
        }
    }

    fn is_submitting(&self) -> bool {
        matches!(self.modal, Modal::Open { submitting: true, .. })
    }

    pub fn modal_input(&mut self, c: char) {
        if let Modal::Open {
            password,
            minutes,
            field,
            submitting: false,
            ..
        } = &mut self.modal
        {
            match field {
                ModalField::Password => password.push(c),
                ModalField::Minutes => {
                    if c.is_ascii_digit() && minutes.len() < 4 {
                        minutes.push(c);
                    }
                }
            }
        }
    }

    pub fn modal_backspace(&mut self) {
        if let Modal::Open {
            password,
            minutes,
            field,
            submitting: false,
            ..
        } = &mut self.modal
        {
            match field {
                ModalField::Password => {
                    password.pop();
                }
                ModalField::Minutes => {
                    minutes.pop();
                }
            }
        }
    }

    /// Tab between password and minutes; only the timer dialog has two fields.
    pub fn modal_toggle_field(&mut self) {
        if let Modal::Open {
            action: ControlAction::Timer,
            field,
            submitting: false,
            ..
        } = &mut self.modal
        {
            *field = match field {
                ModalField::Password => ModalField::Minutes,
                ModalField::Minutes => ModalField::Password,
            };
        }
    }

    /// Validate and submit. An empty password never leaves the client.
    pub fn submit_modal(&mut self) -> Option<PollCommand> {
        let Modal::Open {
            action,
            password,
            minutes,
            error,
            submitting,
            ..
        } = &mut self.modal
        else {
            return None;
        };
        if *submitting {
            return None;
        }

        if password.is_empty() {
            *error = Some("Bitte Passwort eingeben".to_string());
            return None;
        }

        let minutes = match action {
            // Empty or zero minutes deactivate the timer server-side.
            ControlAction::Timer => Some(minutes.parse().unwrap_or(0)),
            _ => None,
        };
        *error = None;
        *submitting = true;
        Some(PollCommand::Control {
            action: *action,
            password: password.clone(),
            minutes,
        })
    }

    fn on_control_done(
        &mut self,
        action: ControlAction,
        result: Result<ControlResponse, String>,
    ) -> Option<PollCommand> {
        match result {
            Ok(resp) if resp.success => {
                self.modal = Modal::Closed;
                let msg = resp
                    .message
                    .unwrap_or_else(|| format!("{action}: Aktion erfolgreich"));
                self.notifications.push_back(msg);
                Some(PollCommand::RefreshBotControl)
            }
            Ok(resp) => {
                self.reopen_with_error(
                    resp.message
                        .unwrap_or_else(|| "Aktion fehlgeschlagen".to_string()),
                );
                None
            }
            Err(e) => {
                warn!(action = %action, error = %e, "control request failed");
                self.reopen_with_error("Netzwerkfehler - bitte erneut versuchen".to_string());
                None
            }
        }
    }

    fn reopen_with_error(&mut self, message: String) {
        if let Modal::Open {
            error, submitting, ..
        } = &mut self.modal
        {
            *error = Some(message);
            *submitting = false;
        }
    }

    // ── Notifications / positions ──

    pub fn dismiss_notification(&mut self) {
        self.notifications.pop_front();
    }

    pub fn select_next_position(&mut self) {
        if !self.positions.is_empty() {
            self.selected_position = (self.selected_position + 1).min(self.positions.len() - 1);
        }
    }

    pub fn select_prev_position(&mut self) {
        self.selected_position = self.selected_position.saturating_sub(1);
    }

    /// Full token address of the selected position, for the clipboard.
    pub fn selected_position_address(&self) -> Option<&str> {
        self.positions
            .get(self.selected_position)
            .and_then(|p| p.token_address.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimerStatus;

    fn test_app() -> App {
        let cfg = Config {
            api_base: "http://127.0.0.1:5000".into(),
            refresh_interval_secs: 10,
            trade_interval_secs: 300,
            trades_limit: 20,
            log_lines: 100,
            tz_offset_hours: 2,
            log_file: "memon.log".into(),
            request_timeout_secs: 10,
        };
        App::new(&cfg, 1_000_000)
    }

    fn status_with_activity(activity: Option<&str>) -> SectionData {
        SectionData::Status(SystemStatus {
            server: Default::default(),
            bot: crate::types::BotActivity {
                is_running: true,
                last_activity: activity.map(str::to_string),
                seconds_since_activity: None,
            },
        })
    }

    #[test]
    fn countdown_primary_rule() {
        let mut app = test_app();
        app.last_trade_time = Some(app.now - 290);
        assert_eq!(app.countdown_secs(), 10);
        assert_eq!(format::fmt_countdown(app.countdown_secs()), "00:10");
    }

    #[test]
    fn countdown_self_resets_at_zero() {
        let mut app = test_app();
        app.last_trade_time = Some(app.now - 300);
        assert_eq!(app.countdown_secs(), 0);
        let next = app.now + 1;
        app.apply(AppEvent::Tick { now: next });
        assert_eq!(app.last_trade_time, Some(next));
        assert_eq!(app.countdown_secs(), 300);
    }

    #[test]
    fn countdown_synthetic_phase_without_anchor() {
        let mut app = test_app();
        app.apply(AppEvent::Tick { now: 1_000_010 });
        assert!(app.last_trade_time.is_none());
        assert_eq!(app.countdown_secs(), 300 - 1_000_010 % 300);
    }

    #[test]
    fn synchronizer_overwrites_anchor_on_parse() {
        let mut app = test_app();
        app.apply(AppEvent::Section {
            section: Section::Status,
            seq: 1,
            data: status_with_activity(Some("2026-01-07 18:28:05 CEST")),
        });
        assert_eq!(app.last_trade_time, Some(1767803285));
    }

    #[test]
    fn synchronizer_keeps_anchor_on_garbage() {
        let mut app = test_app();
        app.last_trade_time = Some(42);
        app.apply(AppEvent::Section {
            section: Section::Status,
            seq: 1,
            data: status_with_activity(Some("N/A")),
        });
        assert_eq!(app.last_trade_time, Some(42));
        app.apply(AppEvent::Section {
            section: Section::Status,
            seq: 2,
            data: status_with_activity(None),
        });
        assert_eq!(app.last_trade_time, Some(42));
    }

    #[test]
    fn stale_section_results_are_dropped() {
        let mut app = test_app();
        app.apply(AppEvent::Section {
            section: Section::Wallet,
            seq: 5,
            data: SectionData::Wallet(WalletInfo {
                balance_sol: Some(2.0),
                ..Default::default()
            }),
        });
        app.apply(AppEvent::Section {
            section: Section::Wallet,
            seq: 3,
            data: SectionData::Wallet(WalletInfo {
                balance_sol: Some(1.0),
                ..Default::default()
            }),
        });
        assert_eq!(app.wallet.as_ref().unwrap().balance_sol, Some(2.0));
        // A newer sequence still applies, and guards are per section.
        app.apply(AppEvent::Section {
            section: Section::Stats,
            seq: 1,
            data: SectionData::Stats(Stats::default()),
        });
        assert!(app.stats.is_some());
    }

    #[test]
    fn empty_password_blocks_submission() {
        let mut app = test_app();
        app.modal = Modal::Open {
            action: ControlAction::Stop,
            password: String::new(),
            minutes: String::new(),
            field: ModalField::Password,
            error: None,
            submitting: false,
        };
        assert!(app.submit_modal().is_none());
        match &app.modal {
            Modal::Open { error, submitting, .. } => {
                assert_eq!(error.as_deref(), Some("Bitte Passwort eingeben"));
                assert!(!submitting);
            }
            Modal::Closed => panic!("modal must stay open"),
        }
    }

    #[test]
    fn submission_carries_minutes_only_for_timer() {
        let mut app = test_app();
        app.modal = Modal::Open {
            action: ControlAction::Timer,
            password: "geheim".into(),
            minutes: "45".into(),
            field: ModalField::Password,
            error: None,
            submitting: false,
        };
        let cmd = app.submit_modal().unwrap();
        assert_eq!(
            cmd,
            PollCommand::Control {
                action: ControlAction::Timer,
                password: "geheim".into(),
                minutes: Some(45),
            }
        );

        let mut app = test_app();
        app.bot_control = Some(BotControlStatus {
            is_running: true,
            ..Default::default()
        });
        app.open_modal(ControlAction::Stop);
        app.modal_input('p');
        app.modal_input('w');
        let cmd = app.submit_modal().unwrap();
        assert_eq!(
            cmd,
            PollCommand::Control {
                action: ControlAction::Stop,
                password: "pw".into(),
                minutes: None,
            }
        );
        assert!(matches!(app.modal, Modal::Open { submitting: true, .. }));
    }

    #[test]
    fn start_stop_respect_running_state() {
        let mut app = test_app();
        // No bot status yet: both disabled.
        app.open_modal(ControlAction::Start);
        assert_eq!(app.modal, Modal::Closed);

        app.bot_control = Some(BotControlStatus {
            is_running: true,
            ..Default::default()
        });
        app.open_modal(ControlAction::Start);
        assert_eq!(app.modal, Modal::Closed);
        app.open_modal(ControlAction::Stop);
        assert!(matches!(app.modal, Modal::Open { action: ControlAction::Stop, .. }));
    }

    #[test]
    fn server_failure_keeps_modal_open_with_message() {
        let mut app = test_app();
        app.modal = Modal::Open {
            action: ControlAction::Start,
            password: "falsch".into(),
            minutes: String::new(),
            field: ModalField::Password,
            error: None,
            submitting: true,
        };
        let cmd = app.apply(AppEvent::ControlDone {
            action: ControlAction::Start,
            result: Ok(ControlResponse {
                success: false,
                message: Some("Ungültiges Bot-Control-Passwort!".into()),
            }),
        });
        assert!(cmd.is_none());
        match &app.modal {
            Modal::Open { error, submitting, .. } => {
                assert_eq!(error.as_deref(), Some("Ungültiges Bot-Control-Passwort!"));
                assert!(!submitting);
            }
            Modal::Closed => panic!("modal must stay open for retry"),
        }
    }

    #[test]
    fn success_closes_modal_and_refreshes() {
        let mut app = test_app();
        app.modal = Modal::Open {
            action: ControlAction::Start,
            password: "geheim".into(),
            minutes: String::new(),
            field: ModalField::Password,
            error: None,
            submitting: true,
        };
        let cmd = app.apply(AppEvent::ControlDone {
            action: ControlAction::Start,
            result: Ok(ControlResponse {
                success: true,
                message: Some("Bot erfolgreich gestartet!".into()),
            }),
        });
        assert_eq!(cmd, Some(PollCommand::RefreshBotControl));
        assert_eq!(app.modal, Modal::Closed);
        assert_eq!(
            app.notifications.front().map(String::as_str),
            Some("Bot erfolgreich gestartet!")
        );
    }

    #[test]
    fn auto_stop_queues_one_notification_per_response() {
        let mut app = test_app();
        let stopped = BotControlStatus {
            is_running: false,
            timer: Some(TimerStatus {
                timer_active: false,
                auto_stopped: true,
                stop_message: Some("Bot erfolgreich gestoppt!".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        app.apply(AppEvent::Section {
            section: Section::BotControl,
            seq: 1,
            data: SectionData::BotControl(stopped),
        });
        assert_eq!(app.notifications.len(), 1);

        // The next response no longer carries the flag: no new alert.
        app.apply(AppEvent::Section {
            section: Section::BotControl,
            seq: 2,
            data: SectionData::BotControl(BotControlStatus::default()),
        });
        assert_eq!(app.notifications.len(), 1);
    }

    #[test]
    fn positions_unsupported_hides_panel() {
        let mut app = test_app();
        app.apply(AppEvent::Section {
            section: Section::Positions,
            seq: 1,
            data: SectionData::PositionsUnsupported,
        });
        assert!(!app.positions_supported);
        assert!(app.positions.is_empty());
    }
}
