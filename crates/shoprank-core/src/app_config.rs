use std::net::SocketAddr;

use crate::FallbackMode;

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

/// Naver Open API client id/secret pair.
#[derive(Clone, PartialEq, Eq)]
pub struct NaverCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Coupang Partners access/secret key pair used for HMAC request signing.
#[derive(Clone, PartialEq, Eq)]
pub struct CoupangCredentials {
    pub access_key: String,
    pub secret_key: String,
}

impl std::fmt::Debug for NaverCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NaverCredentials")
            .field("client_id", &preview(&self.client_id))
            .field("client_secret", &"[redacted]")
            .finish()
    }
}

impl std::fmt::Debug for CoupangCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoupangCredentials")
            .field("access_key", &preview(&self.access_key))
            .field("secret_key", &"[redacted]")
            .finish()
    }
}

/// First six characters of a public key id followed by an ellipsis.
#[must_use]
pub fn preview(value: &str) -> String {
    let head: String = value.chars().take(6).collect();
    format!("{head}...")
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub naver: Option<NaverCredentials>,
    pub coupang: Option<CoupangCredentials>,
    pub naver_base_url: String,
    pub coupang_base_url: String,
    pub upstream_timeout_secs: u64,
    pub upstream_user_agent: String,
    pub inter_request_delay_ms: u64,
    pub fallback_mode: FallbackMode,
    pub synthetic_seed: Option<u64>,
    pub image_proxy_hosts: Vec<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("naver", &self.naver)
            .field("coupang", &self.coupang)
            .field("naver_base_url", &self.naver_base_url)
            .field("coupang_base_url", &self.coupang_base_url)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("upstream_user_agent", &self.upstream_user_agent)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("fallback_mode", &self.fallback_mode)
            .field("synthetic_seed", &self.synthetic_seed)
            .field("image_proxy_hosts", &self.image_proxy_hosts)
            .finish()
    }
}
