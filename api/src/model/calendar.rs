use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct FetchIcalQuery {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BlockRequest {
    pub action: String,
    #[serde(default)]
    pub reservation: Value,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}
