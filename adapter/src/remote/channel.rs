use async_trait::async_trait;
use kernel::repository::channel::ChannelRepository;
use reqwest::{Client, Url};
use serde_json::{json, Value};
use shared::{
    config::CalendarConfig,
    error::{AppError, AppResult},
};
use std::sync::Arc;

/// Forwards block requests to the channel manager's webhook.
pub struct ChannelClient {
    client: Client,
    calendar: Arc<CalendarConfig>,
}

impl ChannelClient {
    pub fn new(calendar: Arc<CalendarConfig>) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(calendar.fetch_timeout)
            .build()
            .map_err(AppError::UpstreamRequestError)?;
        Ok(Self { client, calendar })
    }

    fn webhook(&self) -> AppResult<Url> {
        let raw = self
            .calendar
            .block_webhook_url
            .as_deref()
            .ok_or_else(|| AppError::NotConfigured("no block webhook is configured".into()))?;
        let url = Url::parse(raw)
            .map_err(|_| AppError::NotConfigured("the block webhook url is invalid".into()))?;
        if url
            .host_str()
            .is_some_and(|host| self.calendar.is_read_only_host(host))
        {
            return Err(AppError::NotConfigured(
                "the block webhook points at a read-only export host".into(),
            ));
        }
        Ok(url)
    }
}

#[async_trait]
impl ChannelRepository for ChannelClient {
    async fn forward_block(&self, reservation: Value) -> AppResult<()> {
        let url = self.webhook()?;
        let res = self
            .client
            .post(url)
            .json(&json!({ "action": "block", "reservation": reservation }))
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("block webhook unreachable: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "block webhook answered {status}"
            )));
        }
        Ok(())
    }
}
