use anyhow::Result;
use std::collections::HashMap;
use std::env;
use std::time::Duration;

/// Room slugs that may carry an external availability feed.
pub const FEED_ROOM_SLUGS: [&str; 6] = ["room1", "room2", "room3", "room4", "room5", "room6"];

/// Export-only hosts of the booking channel. Pushing a block there is pointless.
const DEFAULT_READ_ONLY_HOSTS: [&str; 2] = ["ical.booking.com", "admin.booking.com"];

#[derive(Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub calendar: CalendarConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: env::var("DATABASE_HOST")?,
            port: env::var("DATABASE_PORT")?.parse::<u16>()?,
            username: env::var("DATABASE_USERNAME")?,
            password: env::var("DATABASE_PASSWORD")?,
            database: env::var("DATABASE_NAME")?,
        };

        let feeds = FEED_ROOM_SLUGS
            .iter()
            .filter_map(|slug| {
                let key = format!("ICAL_FEED_{}", slug.to_uppercase());
                non_empty_var(&key).map(|url| (slug.to_string(), url))
            })
            .collect();

        let read_only_hosts = match non_empty_var("CHANNEL_READ_ONLY_HOSTS") {
            Some(hosts) => hosts
                .split(',')
                .map(|h| h.trim().to_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
            None => DEFAULT_READ_ONLY_HOSTS.iter().map(|h| h.to_string()).collect(),
        };

        let fetch_timeout = match non_empty_var("ICAL_FETCH_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(v.parse::<u64>()?),
            None => Duration::from_secs(10),
        };

        let calendar = CalendarConfig {
            feeds,
            block_webhook_url: non_empty_var("CHANNEL_BLOCK_WEBHOOK_URL"),
            read_only_hosts,
            fetch_timeout,
        };

        let server = ServerConfig {
            port: match non_empty_var("PORT") {
                Some(v) => v.parse::<u16>()?,
                None => 8080,
            },
            admin_token: non_empty_var("ADMIN_TOKEN"),
        };

        Ok(Self {
            database,
            calendar,
            server,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

#[derive(Clone, Debug, Default)]
pub struct CalendarConfig {
    /// External feed URL per room slug (`room1`..`room6`).
    pub feeds: HashMap<String, String>,
    pub block_webhook_url: Option<String>,
    pub read_only_hosts: Vec<String>,
    pub fetch_timeout: Duration,
}

impl CalendarConfig {
    pub fn feed_url(&self, room_slug: &str) -> Option<&str> {
        self.feeds.get(room_slug).map(String::as_str)
    }

    pub fn is_read_only_host(&self, host: &str) -> bool {
        let host = host.to_lowercase();
        self.read_only_hosts
            .iter()
            .any(|ro| host == *ro || host.ends_with(&format!(".{ro}")))
    }
}

#[derive(Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub admin_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_host_matches_subdomains() {
        let cfg = CalendarConfig {
            read_only_hosts: vec!["ical.booking.com".into()],
            ..Default::default()
        };
        assert!(cfg.is_read_only_host("ical.booking.com"));
        assert!(cfg.is_read_only_host("EU.ical.booking.com"));
        assert!(!cfg.is_read_only_host("hooks.example.com"));
    }
}
