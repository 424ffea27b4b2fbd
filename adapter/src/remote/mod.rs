use reqwest::Url;
use shared::error::{AppError, AppResult};

pub mod channel;
pub mod ical_feed;

/// Only plain web URLs may be proxied.
pub fn parse_web_url(raw: &str) -> AppResult<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| AppError::InvalidRequest(format!("invalid url: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::InvalidRequest(format!(
            "unsupported protocol: {other}"
        ))),
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    use axum::Router;
    use tokio::net::TcpListener;

    /// Serves `router` on an ephemeral local port and returns its base URL.
    pub async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_http_urls_pass() {
        assert!(parse_web_url("https://example.com/cal.ics").is_ok());
        assert!(parse_web_url(" http://example.com ").is_ok());
        assert!(matches!(
            parse_web_url("file:///etc/passwd"),
            Err(AppError::InvalidRequest(_))
        ));
        assert!(matches!(
            parse_web_url("not a url"),
            Err(AppError::InvalidRequest(_))
        ));
    }
}
