use async_trait::async_trait;
use serde_json::Value;
use shared::error::AppResult;

#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// Forwards `{ "action": "block", "reservation": .. }` to the channel
    /// manager's block webhook. Answers `NotConfigured` when there is no
    /// writable endpoint.
    async fn forward_block(&self, reservation: Value) -> AppResult<()>;
}
