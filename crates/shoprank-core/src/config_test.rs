use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "SHOPRANK_ENV"));
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.port(), 3000);
    assert!(cfg.naver.is_none());
    assert!(cfg.coupang.is_none());
    assert_eq!(cfg.naver_base_url, DEFAULT_NAVER_BASE_URL);
    assert_eq!(cfg.upstream_timeout_secs, 10);
    assert_eq!(cfg.fallback_mode, FallbackMode::Lenient);
    assert_eq!(cfg.synthetic_seed, None);
    assert!(cfg.image_proxy_hosts.iter().any(|h| h == "pstatic.net"));
}

#[test]
fn build_app_config_reads_credentials_pairs() {
    let mut map = HashMap::new();
    map.insert("NAVER_CLIENT_ID", "naver-id");
    map.insert("NAVER_CLIENT_SECRET", "naver-secret");
    map.insert("COUPANG_ACCESS_KEY", "access");
    map.insert("COUPANG_SECRET_KEY", "secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.naver.unwrap().client_id, "naver-id");
    assert_eq!(cfg.coupang.unwrap().secret_key, "secret");
}

#[test]
fn build_app_config_ignores_half_configured_credentials() {
    let mut map = HashMap::new();
    map.insert("NAVER_CLIENT_ID", "naver-id");
    map.insert("NAVER_CLIENT_SECRET", "   ");
    map.insert("COUPANG_ACCESS_KEY", "access");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.naver.is_none());
    assert!(cfg.coupang.is_none());
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("SHOPRANK_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPRANK_BIND_ADDR"),
        "expected InvalidEnvVar(SHOPRANK_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_timeout_out_of_range() {
    for raw in ["0", "16", "ten"] {
        let mut map = HashMap::new();
        map.insert("SHOPRANK_UPSTREAM_TIMEOUT_SECS", raw);
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPRANK_UPSTREAM_TIMEOUT_SECS"),
            "timeout {raw} should be rejected, got: {result:?}"
        );
    }
}

#[test]
fn build_app_config_parses_strict_mode_and_seed() {
    let mut map = HashMap::new();
    map.insert("SHOPRANK_FALLBACK_MODE", "strict");
    map.insert("SHOPRANK_SYNTHETIC_SEED", "42");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.fallback_mode, FallbackMode::Strict);
    assert_eq!(cfg.synthetic_seed, Some(42));
}

#[test]
fn build_app_config_rejects_unknown_fallback_mode() {
    let mut map = HashMap::new();
    map.insert("SHOPRANK_FALLBACK_MODE", "sometimes");
    assert!(build_app_config(lookup_from_map(&map)).is_err());
}

#[test]
fn build_app_config_splits_image_hosts() {
    let mut map = HashMap::new();
    map.insert("SHOPRANK_IMAGE_PROXY_HOSTS", "Example.com, cdn.test ,,");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.image_proxy_hosts, vec!["example.com", "cdn.test"]);
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = HashMap::new();
    map.insert("NAVER_CLIENT_ID", "naver-client-id");
    map.insert("NAVER_CLIENT_SECRET", "super-secret-value");
    map.insert("COUPANG_ACCESS_KEY", "access-key-123");
    map.insert("COUPANG_SECRET_KEY", "coupang-hmac-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("super-secret-value"));
    assert!(!debug.contains("coupang-hmac-secret"));
    assert!(debug.contains("[redacted]"));
}
