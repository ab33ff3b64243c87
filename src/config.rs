//! Configuration loader: .env file, then config.toml, then env vars.

use common::{Error, ServerConfig};
use std::path::{Path, PathBuf};

fn parse_positive<T>(raw: &str, env_name: &str) -> Result<T, Error>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let parsed = raw
        .trim()
        .parse::<T>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed <= T::default() {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn validate_config(config: &ServerConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.host.trim().is_empty() {
        issues.push("host must not be empty".into());
    }
    if config.port == 0 {
        issues.push("port must be > 0".into());
    }
    if config.cache_file.as_os_str().is_empty() {
        issues.push("cache_file must not be empty".into());
    }
    if !config.source.url.starts_with("http://") && !config.source.url.starts_with("https://") {
        issues.push("source.url must be an http(s) URL".into());
    }
    if config.source.season < 2023 {
        issues.push("source.season must be >= 2023 (first bat-tracking season)".into());
    }
    if config.source.timeout_secs == 0 {
        issues.push("source.timeout_secs must be > 0".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Apply environment overrides on top of `config`.
///
/// `lookup` is `std::env::var` in production; tests pass a map.
fn apply_env_overrides<F>(config: &mut ServerConfig, lookup: F) -> Result<(), Error>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        config.port = parse_positive(&port, "PORT")?;
    }
    if let Some(host) = lookup("POWER_PLUS_HOST") {
        config.host = host.trim().to_string();
    }
    if let Some(path) = lookup("POWER_PLUS_CACHE_FILE") {
        config.cache_file = PathBuf::from(path.trim());
    }
    if let Some(season) = lookup("POWER_PLUS_SEASON") {
        config.source.season = parse_positive(&season, "POWER_PLUS_SEASON")?;
    }
    if let Some(url) = lookup("POWER_PLUS_SOURCE_URL") {
        config.source.url = url.trim().to_string();
    }
    if let Some(raw) = lookup("POWER_PLUS_MIN_SWINGS") {
        config.source.min_swings = raw
            .trim()
            .parse()
            .map_err(|_| Error::Config("POWER_PLUS_MIN_SWINGS must be an integer >= 0".into()))?;
    }
    if let Some(raw) = lookup("POWER_PLUS_FETCH_TIMEOUT_SECS") {
        config.source.timeout_secs = parse_positive(&raw, "POWER_PLUS_FETCH_TIMEOUT_SECS")?;
    }
    Ok(())
}

/// Load server configuration from environment and optional config file.
pub fn load_config() -> Result<ServerConfig, Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = ServerConfig::default();

    // 3. Try loading config.toml if it exists.
    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    // 4. Override with environment variables (highest priority).
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;

    validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ServerConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServerConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("PORT", "8080"),
                ("POWER_PLUS_CACHE_FILE", "/tmp/pp.json"),
                ("POWER_PLUS_SEASON", "2024"),
                ("POWER_PLUS_FETCH_TIMEOUT_SECS", "10"),
            ]),
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.cache_file, PathBuf::from("/tmp/pp.json"));
        assert_eq!(config.source.season, 2024);
        assert_eq!(config.source.timeout_secs, 10);
    }

    #[test]
    fn test_bad_port_is_config_error() {
        let mut config = ServerConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = apply_env_overrides(&mut config, env(&[("PORT", "0")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_toml_file_layout() {
        let config: ServerConfig = toml::from_str(
            r#"
            port = 7000
            cache_file = "cache/power.json"

            [source]
            season = 2024
            min_swings = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 7000);
        assert_eq!(config.source.min_swings, 50);
        assert_eq!(config.source.timeout_secs, 30);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_collects_all_issues() {
        let mut config = ServerConfig::default();
        config.source.url = "ftp://example.com".into();
        config.source.timeout_secs = 0;

        let Err(Error::Config(msg)) = validate_config(&config) else {
            panic!("expected config error");
        };
        assert!(msg.contains("source.url"));
        assert!(msg.contains("source.timeout_secs"));
    }
}
