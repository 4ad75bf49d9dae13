use serde::Deserialize;
use std::fmt;

/// Combined payload from `/api/status`: host health plus bot liveness.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemStatus {
    pub server: ServerHealth,
    pub bot: BotActivity,
}

/// Host resource usage as reported by the backend.
///
/// `status` is `"healthy"` / `"warning"` / anything else; unknown values
/// render as the danger state.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ServerHealth {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub cpu_percent: f64,
    #[serde(default)]
    pub ram_percent: f64,
    #[serde(default)]
    pub disk_percent: f64,
    pub ram_used_gb: Option<f64>,
    pub ram_total_gb: Option<f64>,
    pub disk_used_gb: Option<f64>,
    pub disk_total_gb: Option<f64>,
    pub error: Option<String>,
}

/// Bot liveness derived from the log file's last line.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BotActivity {
    #[serde(default)]
    pub is_running: bool,
    pub last_activity: Option<String>,
    pub seconds_since_activity: Option<i64>,
}

/// Wallet balance from `/api/wallet`. When `error` is set the balance
/// fields carry no meaning and the panel shows the error instead.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WalletInfo {
    pub balance_sol: Option<f64>,
    pub balance_usd: Option<f64>,
    pub address: Option<String>,
    pub last_update: Option<String>,
    pub error: Option<String>,
}

/// Performance statistics from `/api/stats`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Stats {
    pub today_pnl: Option<f64>,
    pub total_pnl: Option<f64>,
    pub win_rate: Option<f64>,
    pub wins: Option<u64>,
    pub loss_trades: Option<u64>,
    pub failed_trades: Option<u64>,
    pub total_trades: Option<u64>,
    pub successful_trades: Option<u64>,
    pub avg_profit: Option<f64>,
    pub best_trade: Option<f64>,
    pub worst_trade: Option<f64>,
    pub error: Option<String>,
}

/// A single historical trade row.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Trade {
    pub timestamp: Option<String>,
    pub symbol: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub trade_type: Option<String>,
    pub status: Option<String>,
    pub profit_sol: Option<f64>,
    pub profit_percent: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TradesResponse {
    #[serde(default)]
    pub trades: Vec<Trade>,
    pub total: Option<u64>,
}

/// An open position card.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Position {
    pub symbol: Option<String>,
    pub pnl_percent: Option<f64>,
    pub entry_price: Option<f64>,
    pub current_price: Option<f64>,
    pub amount_tokens: Option<f64>,
    pub token_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PositionsResponse {
    #[serde(default)]
    pub positions: Vec<Position>,
    pub total: Option<u64>,
}

/// One parsed log line. `message` is untrusted text and is sanitized
/// before it reaches the terminal.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogEntry {
    pub timestamp: Option<String>,
    pub level: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogsResponse {
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    pub total: Option<u64>,
}

/// Live process metrics from `/api/bot/status`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BotControlStatus {
    #[serde(default)]
    pub is_running: bool,
    pub pid: Option<u32>,
    pub uptime: Option<f64>,
    pub uptime_formatted: Option<String>,
    pub last_activity: Option<String>,
    pub memory_mb: Option<f64>,
    pub timer: Option<TimerStatus>,
}

/// Sleep-timer state attached to the bot status.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TimerStatus {
    #[serde(default)]
    pub timer_active: bool,
    pub remaining_seconds: Option<u64>,
    pub remaining_minutes: Option<f64>,
    #[serde(default)]
    pub auto_stopped: bool,
    pub stop_message: Option<String>,
}

/// Response shape of all three control endpoints.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ControlResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
}

/// The three password-gated control commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Start,
    Stop,
    Timer,
}

impl ControlAction {
    pub fn endpoint(&self) -> &'static str {
        match self {
            ControlAction::Start => "/api/bot/start",
            ControlAction::Stop => "/api/bot/stop",
            ControlAction::Timer => "/api/bot/timer",
        }
    }

    /// German dialog title, matching the backend's UI language.
    pub fn title(&self) -> &'static str {
        match self {
            ControlAction::Start => "Bot starten",
            ControlAction::Stop => "Bot stoppen",
            ControlAction::Timer => "Sleep-Timer setzen",
        }
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlAction::Start => write!(f, "START"),
            ControlAction::Stop => write!(f, "STOP"),
            ControlAction::Timer => write!(f, "TIMER"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_payloads_deserialize() {
        let status: SystemStatus = serde_json::from_str(
            r#"{"server": {"status": "healthy", "cpu_percent": 12.0, "ram_percent": 40.1, "disk_percent": 61.0},
                "bot": {"is_running": false}}"#,
        )
        .unwrap();
        assert!(!status.bot.is_running);
        assert!(status.bot.last_activity.is_none());

        let wallet: WalletInfo =
            serde_json::from_str(r#"{"error": "RPC Error: timeout", "balance_sol": 0}"#).unwrap();
        assert!(wallet.error.is_some());
        assert!(wallet.address.is_none());

        let stats: Stats = serde_json::from_str(r#"{"total_pnl": 0.5, "win_rate": 62.5}"#).unwrap();
        assert_eq!(stats.win_rate, Some(62.5));
        assert!(stats.wins.is_none());

        let trades: TradesResponse = serde_json::from_str(r#"{"trades": [], "total": 0}"#).unwrap();
        assert!(trades.trades.is_empty());

        let empty_bot: BotControlStatus = serde_json::from_str(r#"{"is_running": true}"#).unwrap();
        assert!(empty_bot.timer.is_none());
    }

    #[test]
    fn trade_type_field_is_renamed() {
        let trade: Trade =
            serde_json::from_str(r#"{"symbol": "BONK", "type": "BUY", "status": "success"}"#)
                .unwrap();
        assert_eq!(trade.trade_type.as_deref(), Some("BUY"));
    }

    #[test]
    fn control_action_endpoints() {
        assert_eq!(ControlAction::Start.endpoint(), "/api/bot/start");
        assert_eq!(ControlAction::Stop.endpoint(), "/api/bot/stop");
        assert_eq!(ControlAction::Timer.endpoint(), "/api/bot/timer");
    }

    #[test]
    fn timer_status_defaults() {
        let timer: TimerStatus = serde_json::from_str(r#"{"timer_active": false}"#).unwrap();
        assert!(!timer.auto_stopped);
        assert!(timer.remaining_minutes.is_none());
    }
}
