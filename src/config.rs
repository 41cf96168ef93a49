use std::env;

/// Base URL used when `TODO_API_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

pub const BASE_URL_ENV: &str = "TODO_API_URL";

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        // Endpoints always start with a slash, so drop any trailing one here.
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Reads `TODO_API_URL`, falling back to localhost. Never fails: an
    /// unset or empty variable just means the default backend address.
    pub fn from_env() -> Self {
        let base_url = env::var(BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_stripped() {
        let config = ApiConfig::new("http://localhost:8000/");
        assert_eq!(config.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_default_points_at_localhost() {
        assert_eq!(ApiConfig::default().base_url, DEFAULT_BASE_URL);
    }
}
