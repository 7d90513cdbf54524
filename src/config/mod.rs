use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::sync::ResolvePolicy;

pub const DEFAULT_API_URL: &str = "http://localhost:8081";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub navigation: NavigationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub resolve_policy: ResolvePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    pub redirect_delay_ms: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl NavigationConfig {
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    /// Configuration pointing at an explicit backend, ignoring the environment.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        let mut config = Self::defaults();
        config.api.base_url = base_url.into();
        config
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("RECIPES_API_URL") {
            self.api.base_url = v;
        }
        if let Ok(v) = env::var("RECIPES_HTTP_TIMEOUT_SECS") {
            self.api.timeout_secs = v.parse().unwrap_or(self.api.timeout_secs);
        }
        if let Ok(v) = env::var("RECIPES_RESOLVE_POLICY") {
            self.api.resolve_policy = v.parse().unwrap_or(self.api.resolve_policy);
        }
        if let Ok(v) = env::var("RECIPES_SESSION_DIR") {
            self.session.dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("RECIPES_REDIRECT_DELAY_MS") {
            self.navigation.redirect_delay_ms = v.parse().unwrap_or(self.navigation.redirect_delay_ms);
        }

        self
    }

    fn defaults() -> Self {
        let session_dir = env::var("HOME")
            .map(|home| PathBuf::from(home).join(".config").join("recipes").join("sessions"))
            .unwrap_or_else(|_| env::temp_dir().join("recipes").join("sessions"));

        Self {
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                timeout_secs: 10,
                resolve_policy: ResolvePolicy::FirstMatch,
            },
            session: SessionConfig { dir: session_dir },
            navigation: NavigationConfig {
                redirect_delay_ms: 500,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<ClientConfig> = Lazy::new(ClientConfig::from_env);

pub fn config() -> &'static ClientConfig {
    &CONFIG
}
