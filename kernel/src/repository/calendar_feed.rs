use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait CalendarFeedRepository: Send + Sync {
    /// Fetches an external calendar body through the proxy rules: http(s)
    /// only, 2xx only, and the body must look like iCal.
    async fn fetch_feed(&self, url: &str) -> AppResult<String>;
}
