//! Pure display helpers shared by the TUI panels and the `--once` snapshot.

use crate::types::BotControlStatus;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};

/// Timezone-name suffixes the backend appends to wall-clock timestamps.
const TZ_SUFFIXES: [&str; 6] = ["CEST", "CET", "MESZ", "MEZ", "UTC", "GMT"];

/// Utilization band for percentage metrics and badge coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilLevel {
    Ok,
    Warn,
    Critical,
}

/// Threshold rule shared by CPU/RAM/Disk: <70 ok, 70-84 warning, >=85 danger.
pub fn util_level(percent: f64) -> UtilLevel {
    if percent < 70.0 {
        UtilLevel::Ok
    } else if percent < 85.0 {
        UtilLevel::Warn
    } else {
        UtilLevel::Critical
    }
}

/// Badge style for a trade status: `success` and `failed` map to their
/// own styles, anything else renders with the pending style.
pub fn trade_badge_level(status: &str) -> UtilLevel {
    match status {
        "success" => UtilLevel::Ok,
        "failed" => UtilLevel::Critical,
        _ => UtilLevel::Warn,
    }
}

/// PnL with an explicit sign for non-negative values and exactly six
/// fractional digits, e.g. `+0.000000 SOL` / `-0.000500 SOL`.
pub fn fmt_pnl_sol(value: f64) -> String {
    format!("{value:+.6} SOL")
}

pub fn fmt_win_rate(value: f64) -> String {
    format!("{value:.1}%")
}

/// Signed percentage with two decimals, used for position PnL badges.
pub fn fmt_signed_pct(value: f64) -> String {
    format!("{value:+.2}%")
}

/// First eight characters of an address plus an ellipsis.
pub fn truncate_addr(addr: &str) -> String {
    if addr.chars().count() <= 8 {
        addr.to_string()
    } else {
        let head: String = addr.chars().take(8).collect();
        format!("{head}...")
    }
}

/// Remaining countdown as `MM:SS`; negative inputs clamp to zero.
pub fn fmt_countdown(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Wall-clock time in the configured display offset, 24h `HH:MM:SS`.
pub fn fmt_clock(epoch_secs: i64, offset: FixedOffset) -> String {
    match DateTime::from_timestamp(epoch_secs, 0) {
        Some(utc) => utc.with_timezone(&offset).format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

pub fn fmt_uptime(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Strip ANSI escape sequences and replace remaining control characters so
/// untrusted log text can never move the cursor or recolor the terminal.
/// Already-safe text passes through unchanged.
pub fn sanitize_log(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            if chars.peek() == Some(&'[') {
                chars.next();
                // CSI: consume parameter bytes up to and including the final byte
                while let Some(n) = chars.next() {
                    if ('\u{40}'..='\u{7e}').contains(&n) {
                        break;
                    }
                }
            }
            continue;
        }
        if c.is_control() {
            out.push(' ');
        } else {
            out.push(c);
        }
    }
    out
}

/// Parse a backend wall-clock timestamp (`%Y-%m-%d %H:%M:%S`, optionally
/// with a timezone-name suffix) into epoch seconds, interpreting the wall
/// time in the display offset.
pub fn parse_activity(raw: &str, offset: FixedOffset) -> Option<i64> {
    let mut s = raw.trim();
    for suffix in TZ_SUFFIXES {
        if let Some(stripped) = s.strip_suffix(suffix) {
            s = stripped.trim_end();
            break;
        }
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.timestamp())
}

/// Multi-part process status line: whichever of PID, uptime, memory and
/// last activity are present, absent parts omitted.
pub fn bot_status_line(status: &BotControlStatus) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(pid) = status.pid {
        parts.push(format!("PID {pid}"));
    }
    if let Some(up) = status.uptime_formatted.as_deref() {
        parts.push(format!("Uptime {up}"));
    } else if let Some(secs) = status.uptime {
        parts.push(format!("Uptime {}", fmt_uptime(secs.max(0.0) as u64)));
    }
    if let Some(mem) = status.memory_mb {
        parts.push(format!("{mem:.1} MB"));
    }
    if let Some(act) = status.last_activity.as_deref() {
        parts.push(format!("Aktiv: {act}"));
    }
    if parts.is_empty() {
        "--".to_string()
    } else {
        parts.join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn berlin_summer() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    #[test]
    fn utilization_bands() {
        assert_eq!(util_level(50.0), UtilLevel::Ok);
        assert_eq!(util_level(69.9), UtilLevel::Ok);
        assert_eq!(util_level(70.0), UtilLevel::Warn);
        assert_eq!(util_level(72.0), UtilLevel::Warn);
        assert_eq!(util_level(84.9), UtilLevel::Warn);
        assert_eq!(util_level(85.0), UtilLevel::Critical);
        assert_eq!(util_level(90.0), UtilLevel::Critical);
    }

    #[test]
    fn trade_badges_cover_three_styles() {
        assert_eq!(trade_badge_level("success"), UtilLevel::Ok);
        assert_eq!(trade_badge_level("failed"), UtilLevel::Critical);
        assert_eq!(trade_badge_level("pending"), UtilLevel::Warn);
        assert_eq!(trade_badge_level("whatever"), UtilLevel::Warn);
    }

    #[test]
    fn pnl_sign_and_precision() {
        assert_eq!(fmt_pnl_sol(0.0), "+0.000000 SOL");
        assert_eq!(fmt_pnl_sol(-0.0005), "-0.000500 SOL");
        assert_eq!(fmt_pnl_sol(0.0123456), "+0.012346 SOL");
    }

    #[test]
    fn win_rate_one_decimal() {
        assert_eq!(fmt_win_rate(62.55), "62.5%");
        assert_eq!(fmt_win_rate(0.0), "0.0%");
    }

    #[test]
    fn address_truncation() {
        assert_eq!(truncate_addr("ABCDEFGHIJKLMNOP"), "ABCDEFGH...");
        assert_eq!(truncate_addr("SHORT"), "SHORT");
        assert_eq!(truncate_addr("12345678"), "12345678");
    }

    #[test]
    fn countdown_formatting() {
        assert_eq!(fmt_countdown(10), "00:10");
        assert_eq!(fmt_countdown(300), "05:00");
        assert_eq!(fmt_countdown(0), "00:00");
        assert_eq!(fmt_countdown(-5), "00:00");
    }

    #[test]
    fn clock_uses_display_offset() {
        // 2026-01-07 17:28:05 UTC == 19:28:05 at UTC+2
        let epoch = 1767806885;
        assert_eq!(fmt_clock(epoch, berlin_summer()), "19:28:05");
    }

    #[test]
    fn sanitize_is_fixed_point_on_safe_text() {
        let safe = "2026-01-07 | INFO | Kaufe 0.1 SOL <script>alert(1)</script>";
        assert_eq!(sanitize_log(safe), safe);
        let once = sanitize_log("evil\u{1b}[31mred\u{1b}[0m\ttext");
        assert_eq!(once, "evilred text");
        assert_eq!(sanitize_log(&once), once);
    }

    #[test]
    fn sanitize_strips_bare_escape() {
        assert_eq!(sanitize_log("a\u{1b}b"), "ab");
        assert_eq!(sanitize_log("line\r\n"), "line  ");
    }

    #[test]
    fn activity_parse_strips_tz_suffix() {
        let offset = berlin_summer();
        let plain = parse_activity("2026-01-07 18:28:05", offset).unwrap();
        let suffixed = parse_activity("2026-01-07 18:28:05 CEST", offset).unwrap();
        assert_eq!(plain, suffixed);
        // 18:28:05 at +02:00 is 16:28:05 UTC
        assert_eq!(plain, 1767803285);
    }

    #[test]
    fn activity_parse_rejects_garbage() {
        let offset = berlin_summer();
        assert!(parse_activity("N/A", offset).is_none());
        assert!(parse_activity("", offset).is_none());
        assert!(parse_activity("gestern Abend", offset).is_none());
    }

    #[test]
    fn status_line_omits_absent_parts() {
        let full = BotControlStatus {
            is_running: true,
            pid: Some(4711),
            uptime: Some(8.0 * 3600.0),
            uptime_formatted: Some("8h 0m".into()),
            last_activity: Some("2026-01-07 18:28:05".into()),
            memory_mb: Some(48.25),
            timer: None,
        };
        assert_eq!(
            bot_status_line(&full),
            "PID 4711 | Uptime 8h 0m | 48.2 MB | Aktiv: 2026-01-07 18:28:05"
        );

        let sparse = BotControlStatus {
            is_running: false,
            pid: None,
            uptime: Some(90.0),
            uptime_formatted: None,
            last_activity: None,
            memory_mb: None,
            timer: None,
        };
        assert_eq!(bot_status_line(&sparse), "Uptime 1m");

        assert_eq!(bot_status_line(&BotControlStatus::default()), "--");
    }
}
