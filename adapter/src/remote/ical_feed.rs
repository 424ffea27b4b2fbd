use async_trait::async_trait;
use kernel::{model::calendar::looks_like_calendar, repository::calendar_feed::CalendarFeedRepository};
use reqwest::{header::ACCEPT, Client};
use shared::{
    config::CalendarConfig,
    error::{AppError, AppResult},
};

use super::parse_web_url;

/// Largest calendar body accepted from an upstream host.
pub const MAX_FEED_BYTES: usize = 4 * 1024 * 1024;

/// Server-side fetcher for external calendar feeds. The browser never talks
/// to the calendar host directly.
pub struct IcalFeedClient {
    client: Client,
    max_body_bytes: usize,
}

impl IcalFeedClient {
    pub fn new(cfg: &CalendarConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(cfg.fetch_timeout)
            .build()
            .map_err(AppError::UpstreamRequestError)?;
        Ok(Self {
            client,
            max_body_bytes: MAX_FEED_BYTES,
        })
    }

    pub fn with_body_limit(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    fn too_large(&self) -> AppError {
        AppError::ExternalServiceError(format!(
            "calendar body exceeds {} bytes",
            self.max_body_bytes
        ))
    }
}

#[async_trait]
impl CalendarFeedRepository for IcalFeedClient {
    async fn fetch_feed(&self, url: &str) -> AppResult<String> {
        let url = parse_web_url(url)?;

        let mut res = self
            .client
            .get(url)
            .header(ACCEPT, "text/calendar")
            .send()
            .await
            .map_err(AppError::UpstreamRequestError)?;

        let status = res.status();
        if !status.is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "calendar host answered {status}"
            )));
        }

        if res
            .content_length()
            .is_some_and(|len| len > self.max_body_bytes as u64)
        {
            return Err(self.too_large());
        }
        let mut raw = Vec::new();
        while let Some(chunk) = res.chunk().await.map_err(AppError::UpstreamRequestError)? {
            if raw.len() + chunk.len() > self.max_body_bytes {
                return Err(self.too_large());
            }
            raw.extend_from_slice(&chunk);
        }

        let body = String::from_utf8(raw).map_err(|_| {
            AppError::NotCalendarContent("upstream response is not UTF-8 text".into())
        })?;
        if !looks_like_calendar(&body) {
            return Err(AppError::NotCalendarContent(
                "upstream response is not an iCal calendar".into(),
            ));
        }
        Ok(body)
    }
}
