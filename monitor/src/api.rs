//! HTTP client for the bot's monitoring API.

use crate::types::{
    BotControlStatus, ControlAction, ControlResponse, LogsResponse, PositionsResponse, Stats,
    SystemStatus, TradesResponse, WalletInfo,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
    /// The backend predates this endpoint (404). Callers skip the section.
    #[error("endpoint not available")]
    Unsupported,
}

/// Thin client over the monitoring endpoints. One shared connection pool,
/// one timeout for every call; a hung backend only delays its own section.
pub struct MonitorApi {
    base: String,
    client: reqwest::Client,
}

impl MonitorApi {
    pub fn new(base: &str, timeout: Duration) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("HTTP client"),
        }
    }

    pub async fn status(&self) -> Result<SystemStatus, ApiError> {
        self.get_json("/api/status", &[]).await
    }

    pub async fn wallet(&self) -> Result<WalletInfo, ApiError> {
        self.get_json("/api/wallet", &[]).await
    }

    pub async fn stats(&self) -> Result<Stats, ApiError> {
        self.get_json("/api/stats", &[]).await
    }

    pub async fn trades(&self, limit: u32) -> Result<TradesResponse, ApiError> {
        self.get_json("/api/trades", &[("limit", limit.to_string())])
            .await
    }

    pub async fn positions(&self) -> Result<PositionsResponse, ApiError> {
        self.get_json("/api/positions", &[]).await
    }

    pub async fn logs(&self, lines: u32) -> Result<LogsResponse, ApiError> {
        self.get_json("/api/logs", &[("lines", lines.to_string())])
            .await
    }

    pub async fn bot_status(&self) -> Result<BotControlStatus, ApiError> {
        self.get_json("/api/bot/status", &[]).await
    }

    /// POST a control command. The backend answers wrong passwords with a
    /// 403 that still carries a `ControlResponse` body; that body is
    /// returned as-is so the server's message reaches the modal.
    pub async fn control(
        &self,
        action: ControlAction,
        password: &str,
        minutes: Option<u64>,
    ) -> Result<ControlResponse, ApiError> {
        let body = match minutes {
            Some(m) => serde_json::json!({ "password": password, "minutes": m }),
            None => serde_json::json!({ "password": password }),
        };
        let url = format!("{}{}", self.base, action.endpoint());
        let resp = self.client.post(&url).json(&body).send().await?;
        let status = resp.status();
        match resp.json::<ControlResponse>().await {
            Ok(parsed) => Ok(parsed),
            Err(e) if status.is_success() => Err(e.into()),
            Err(_) => Err(ApiError::Status(status)),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base, path);
        let mut req = self.client.get(&url);
        if !query.is_empty() {
            req = req.query(query);
        }
        let resp = req.send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Err(ApiError::Unsupported),
            s if !s.is_success() => Err(ApiError::Status(s)),
            _ => Ok(resp.json().await?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let api = MonitorApi::new("http://127.0.0.1:5000/", Duration::from_secs(10));
        assert_eq!(api.base, "http://127.0.0.1:5000");
    }
}
