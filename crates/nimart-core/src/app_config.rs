use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Base URL of the hosted database's REST interface. `None` means the
    /// compiled-in region list is the only source.
    pub regions_url: Option<String>,
    pub regions_api_key: Option<String>,
    pub region_cache_ttl_secs: u64,
    pub http_timeout_secs: u64,
    /// Upper bound on provider records accepted per discovery request.
    pub max_providers: usize,
}

impl AppConfig {
    #[must_use]
    pub fn region_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.region_cache_ttl_secs)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("regions_url", &self.regions_url)
            .field(
                "regions_api_key",
                &self.regions_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("region_cache_ttl_secs", &self.region_cache_ttl_secs)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("max_providers", &self.max_providers)
            .finish()
    }
}
