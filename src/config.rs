use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// OpenAI API key used for recommendation text
    pub openai_api_key: String,

    /// Chat model used for recommendations
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// OpenAI API base URL
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    /// TMDb API key; lookups are skipped when absent
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDb API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix joined with TMDb poster paths
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Per-lookup timeout for metadata requests
    #[serde(default = "default_metadata_timeout_secs")]
    pub metadata_timeout_secs: u64,

    /// Idle time after which a session is forgotten
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Upper bound on live sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w200".to_string()
}

fn default_metadata_timeout_secs() -> u64 {
    5
}

fn default_session_ttl_secs() -> u64 {
    3600
}

fn default_max_sessions() -> usize {
    10_000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// TMDb key, treating an empty value as unset
    pub fn tmdb_key(&self) -> Option<&str> {
        self.tmdb_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_vars(vars(&[("OPENAI_API_KEY", "sk-test")])).unwrap();

        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.tmdb_image_url, "https://image.tmdb.org/t/p/w200");
        assert_eq!(config.metadata_timeout_secs, 5);
        assert_eq!(config.session_ttl(), Duration::from_secs(3600));
        assert_eq!(config.max_sessions, 10_000);
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert!(config.tmdb_key().is_none());
    }

    #[test]
    fn test_missing_openai_key_fails() {
        let result = Config::from_vars(vars(&[("TMDB_API_KEY", "abc")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_tmdb_key_treated_as_absent() {
        let config = Config::from_vars(vars(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("TMDB_API_KEY", "  "),
        ]))
        .unwrap();
        assert!(config.tmdb_key().is_none());

        let config = Config::from_vars(vars(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("TMDB_API_KEY", "tmdb-key"),
            ("PORT", "8080"),
            ("MAX_SESSIONS", "50"),
        ]))
        .unwrap();
        assert_eq!(config.max_sessions, 50);
        assert_eq!(config.tmdb_key(), Some("tmdb-key"));
        assert_eq!(config.port, 8080);
    }
}
