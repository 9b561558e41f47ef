//! Runtime configuration of the client
//!
//! Resolved once per page load. The API base comes from the compile-time
//! `INVENTORY_API_URL` variable when the bundle was built with one, otherwise
//! it is derived from the page location on the backend's default port.

use log::Level;

pub const DEFAULT_API_PORT: u16 = 8087;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL without trailing slash, e.g. `http://localhost:8087/api`
    pub api_base: String,
    pub log_level: Level,
}

impl AppConfig {
    pub fn resolve() -> Self {
        let api_base = option_env!("INVENTORY_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(api_base_from_location);

        Self {
            api_base,
            log_level: default_log_level(),
        }
    }
}

thread_local! {
    static CONFIG: AppConfig = AppConfig::resolve();
}

pub fn config() -> AppConfig {
    CONFIG.with(Clone::clone)
}

pub fn api_base() -> String {
    CONFIG.with(|c| c.api_base.clone())
}

fn default_log_level() -> Level {
    if cfg!(debug_assertions) {
        Level::Debug
    } else {
        Level::Info
    }
}

fn api_base_from_location() -> String {
    let Some(window) = web_sys::window() else {
        return format!("http://127.0.0.1:{}/api", DEFAULT_API_PORT);
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    location_base(&protocol, &hostname)
}

fn location_base(protocol: &str, hostname: &str) -> String {
    format!("{}//{}:{}/api", protocol, hostname, DEFAULT_API_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_base() {
        assert_eq!(
            location_base("https:", "stock.tricol.ma"),
            "https://stock.tricol.ma:8087/api"
        );
    }
}
