pub mod types;

use crate::error::XError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use std::path::Path;
pub use types::*;

/// Allow-list of group patterns, comma separated.
pub const ENABLED_GROUPS_VAR: &str = "X_ENABLED_GROUPS";
/// Deny-list of exact tool names, comma separated.
pub const DISABLED_TOOLS_VAR: &str = "X_DISABLED_TOOLS";

const CREDENTIAL_VARS: [&str; 4] = [
    "X_API_KEY",
    "X_API_SECRET",
    "X_ACCESS_TOKEN",
    "X_ACCESS_TOKEN_SECRET",
];

/// Load configuration from an optional TOML file plus environment overrides.
///
/// Precedence, lowest first: defaults, the file (skipped when absent),
/// `X_MCP_*` variables (`X_MCP_SERVER__PORT=8080`; lists are comma separated,
/// `X_MCP_SERVER__ALLOWED_ORIGINS=https://a.example,https://b.example`), then
/// the tool policy variables [`ENABLED_GROUPS_VAR`] and [`DISABLED_TOOLS_VAR`].
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();

    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("X_MCP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("server.allowed_origins"),
        )
        .set_override_option("tools.enabled_groups", std::env::var(ENABLED_GROUPS_VAR).ok())
        .context("Failed to apply X_ENABLED_GROUPS")?
        .set_override_option("tools.disabled_tools", std::env::var(DISABLED_TOOLS_VAR).ok())
        .context("Failed to apply X_DISABLED_TOOLS")?
        .build()
        .with_context(|| format!("Failed to load config from: {}", path.display()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate the loaded configuration.
///
/// The tool policy strings are deliberately not checked here: a pattern that
/// matches nothing simply contributes nothing.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.as_str()) {
        anyhow::bail!(
            "Invalid log level '{}'. Valid levels: {}",
            config.logging.level,
            valid_levels.join(", ")
        );
    }

    let valid_formats = ["pretty", "json"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        anyhow::bail!(
            "Invalid log format '{}'. Valid formats: {}",
            config.logging.format,
            valid_formats.join(", ")
        );
    }

    if config.server.transport == Transport::Http && config.server.port == 0 {
        anyhow::bail!("HTTP transport requires a non-zero port");
    }

    for (name, value) in [
        ("api.api_url", &config.api.api_url),
        ("api.upload_url", &config.api.upload_url),
    ] {
        let parsed = url::Url::parse(value)
            .with_context(|| format!("Invalid URL for {}: {}", name, value))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("{} must be an http or https URL, got '{}'", name, value);
        }
    }

    for origin in &config.server.allowed_origins {
        let parsed = url::Url::parse(origin)
            .with_context(|| format!("Invalid allowed origin: {}", origin))?;
        let bare = origin.trim_end_matches('/');
        if !matches!(parsed.scheme(), "http" | "https")
            || parsed.origin().ascii_serialization() != bare
        {
            anyhow::bail!(
                "Allowed origin must be scheme://host[:port] with no path, got '{}'",
                origin
            );
        }
    }

    Ok(())
}

/// Read OAuth 1.0a credentials from the process environment.
pub fn load_credentials() -> crate::Result<Credentials> {
    credentials_from(|name| std::env::var(name).ok())
}

/// Build credentials from a variable lookup; any missing or empty value fails.
pub fn credentials_from<F>(lookup: F) -> crate::Result<Credentials>
where
    F: Fn(&str) -> Option<String>,
{
    let mut values = CREDENTIAL_VARS
        .iter()
        .map(|name| lookup(name).filter(|v| !v.is_empty()));

    let mut next = || values.next().flatten().ok_or(XError::MissingCredentials);

    Ok(Credentials {
        api_key: next()?,
        api_secret: next()?,
        access_token: next()?,
        access_token_secret: next()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn clear_policy_env() {
        std::env::remove_var(ENABLED_GROUPS_VAR);
        std::env::remove_var(DISABLED_TOOLS_VAR);
    }

    #[test]
    #[serial]
    fn test_load_valid_config() {
        clear_policy_env();
        let config_content = r#"
[server]
transport = "http"
host = "0.0.0.0"
port = 8080
allowed_origins = ["http://localhost:5173"]

[logging]
level = "debug"
format = "json"

[tools]
enabled_groups = "tweets,users:get"
disabled_tools = "delete_tweet"

[api]
api_url = "http://localhost:9999"
timeout_secs = 5
"#;

        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.server.transport, Transport::Http);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.allowed_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(
            config.tools.enabled_groups.as_deref(),
            Some("tweets,users:get")
        );
        assert_eq!(config.tools.disabled_tools.as_deref(), Some("delete_tweet"));
        assert_eq!(config.api.api_url, "http://localhost:9999");
        assert_eq!(config.api.upload_url, "https://upload.twitter.com");
        assert_eq!(config.api.timeout_secs, 5);
    }

    #[test]
    #[serial]
    fn test_missing_file_uses_defaults() {
        clear_policy_env();
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.transport, Transport::Stdio);
        assert!(config.server.allowed_origins.is_empty());
        assert_eq!(config.logging.format, "pretty");
        assert!(config.tools.enabled_groups.is_none());
        assert!(config.tools.disabled_tools.is_none());
    }

    #[test]
    #[serial]
    fn test_policy_env_overrides_file() {
        let config_content = r#"
[tools]
enabled_groups = "lists"
"#;
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();

        std::env::set_var(ENABLED_GROUPS_VAR, "tweets:get");
        std::env::set_var(DISABLED_TOOLS_VAR, "get_tweets, search_tweets");
        let result = load_config(temp_file.path());
        clear_policy_env();

        let config = result.unwrap();
        assert_eq!(config.tools.enabled_groups.as_deref(), Some("tweets:get"));
        assert_eq!(
            config.tools.disabled_tools.as_deref(),
            Some("get_tweets, search_tweets")
        );
    }

    #[test]
    #[serial]
    fn test_invalid_log_level_rejected() {
        clear_policy_env();
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        temp_file
            .write_all(b"[logging]\nlevel = \"loud\"\n")
            .unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid log level"));
    }

    #[test]
    fn test_validate_rejects_non_http_api_url() {
        let mut config = AppConfig::default();
        config.api.api_url = "ftp://api.example.com".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_allowed_origins() {
        let mut config = AppConfig::default();
        config.server.allowed_origins = vec![
            "http://localhost:5173".to_string(),
            "https://app.example.com/".to_string(),
        ];
        assert!(validate_config(&config).is_ok());

        for bad in ["*", "https://app.example.com/path", "chrome-extension://abc"] {
            config.server.allowed_origins = vec![bad.to_string()];
            assert!(validate_config(&config).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_validate_rejects_zero_http_port() {
        let mut config = AppConfig::default();
        config.server.transport = Transport::Http;
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_credentials_complete() {
        let env: HashMap<&str, &str> = [
            ("X_API_KEY", "k"),
            ("X_API_SECRET", "s"),
            ("X_ACCESS_TOKEN", "t"),
            ("X_ACCESS_TOKEN_SECRET", "ts"),
        ]
        .into_iter()
        .collect();

        let creds = credentials_from(|name| env.get(name).map(|v| v.to_string())).unwrap();
        assert_eq!(creds.api_key, "k");
        assert_eq!(creds.api_secret, "s");
        assert_eq!(creds.access_token, "t");
        assert_eq!(creds.access_token_secret, "ts");
    }

    #[test]
    fn test_credentials_missing_or_empty() {
        let err = credentials_from(|name| match name {
            "X_ACCESS_TOKEN" => Some(String::new()),
            _ => Some("value".to_string()),
        })
        .unwrap_err();
        assert!(matches!(err, XError::MissingCredentials));

        let err = credentials_from(|_| None).unwrap_err();
        assert!(err.to_string().starts_with("Missing Twitter API credentials"));
    }
}
