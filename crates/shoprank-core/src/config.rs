use crate::app_config::{AppConfig, CoupangCredentials, Environment, NaverCredentials};
use crate::{ConfigError, FallbackMode};

/// Upper bound on the upstream request timeout. A slow marketplace must never
/// hold a ranking response longer than this.
pub const MAX_UPSTREAM_TIMEOUT_SECS: u64 = 15;

pub const DEFAULT_NAVER_BASE_URL: &str = "https://openapi.naver.com";
pub const DEFAULT_COUPANG_BASE_URL: &str = "https://api-gateway.coupang.com";

/// Marketplace CDN hosts the image proxy may fetch from.
pub const DEFAULT_IMAGE_PROXY_HOSTS: &[&str] = &[
    "coupangcdn.com",
    "pstatic.net",
    "gmarket.co.kr",
    "auction.co.kr",
    "11st.co.kr",
    "ssgcdn.com",
    "lotteon.com",
    "interpark.com",
    "picsum.photos",
    "via.placeholder.com",
];

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for an unparseable value or an
/// upstream timeout outside 1–15 seconds.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Empty values count as unset so `KEY=` in a .env file disables a credential.
    let non_empty = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("SHOPRANK_ENV", "development"))?;

    let bind_addr = or_default("SHOPRANK_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("SHOPRANK_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("SHOPRANK_LOG_LEVEL", "info");

    let naver = match (non_empty("NAVER_CLIENT_ID"), non_empty("NAVER_CLIENT_SECRET")) {
        (Some(client_id), Some(client_secret)) => Some(NaverCredentials {
            client_id,
            client_secret,
        }),
        _ => None,
    };
    let coupang = match (non_empty("COUPANG_ACCESS_KEY"), non_empty("COUPANG_SECRET_KEY")) {
        (Some(access_key), Some(secret_key)) => Some(CoupangCredentials {
            access_key,
            secret_key,
        }),
        _ => None,
    };

    let naver_base_url = or_default("SHOPRANK_NAVER_BASE_URL", DEFAULT_NAVER_BASE_URL);
    let coupang_base_url = or_default("SHOPRANK_COUPANG_BASE_URL", DEFAULT_COUPANG_BASE_URL);

    let upstream_timeout_secs = parse_u64("SHOPRANK_UPSTREAM_TIMEOUT_SECS", "10")?;
    if upstream_timeout_secs == 0 || upstream_timeout_secs > MAX_UPSTREAM_TIMEOUT_SECS {
        return Err(invalid(
            "SHOPRANK_UPSTREAM_TIMEOUT_SECS",
            format!("must be between 1 and {MAX_UPSTREAM_TIMEOUT_SECS} seconds"),
        ));
    }
    let upstream_user_agent = or_default("SHOPRANK_USER_AGENT", "shoprank/0.1 (ranking-service)");
    let inter_request_delay_ms = parse_u64("SHOPRANK_INTER_REQUEST_DELAY_MS", "300")?;

    let fallback_mode = or_default("SHOPRANK_FALLBACK_MODE", "lenient")
        .parse::<FallbackMode>()
        .map_err(|e| invalid("SHOPRANK_FALLBACK_MODE", e.to_string()))?;

    let synthetic_seed = non_empty("SHOPRANK_SYNTHETIC_SEED")
        .map(|raw| {
            raw.parse::<u64>()
                .map_err(|e| invalid("SHOPRANK_SYNTHETIC_SEED", e.to_string()))
        })
        .transpose()?;

    let image_proxy_hosts = non_empty("SHOPRANK_IMAGE_PROXY_HOSTS").map_or_else(
        || {
            DEFAULT_IMAGE_PROXY_HOSTS
                .iter()
                .map(|h| (*h).to_string())
                .collect()
        },
        |raw| {
            raw.split(',')
                .map(|h| h.trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect()
        },
    );

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        naver,
        coupang,
        naver_base_url,
        coupang_base_url,
        upstream_timeout_secs,
        upstream_user_agent,
        inter_request_delay_ms,
        fallback_mode,
        synthetic_seed,
        image_proxy_hosts,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SHOPRANK_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
