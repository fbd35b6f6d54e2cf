//! Configuration management for the Vigil probe

use crate::error::{Result, VigilError};
use crate::models::ScanConfig;
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// File-based configuration structure matching vigil.toml
#[derive(Debug, Deserialize)]
struct FileConfig {
    scan: Option<ScanSection>,
    signatures: Option<SignaturesSection>,
}

#[derive(Debug, Deserialize)]
struct ScanSection {
    threads: Option<usize>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
    follow_redirects: Option<bool>,
    insecure: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct SignaturesSection {
    path: Option<String>,
}

/// Loads configuration from a TOML file and merges with defaults
pub fn load_config(path: &Path) -> Result<ScanConfig> {
    let content = std::fs::read_to_string(path).map_err(VigilError::IoError)?;
    from_toml_str(&content)
}

fn from_toml_str(content: &str) -> Result<ScanConfig> {
    let file_config: FileConfig = toml::from_str(content)?;

    let mut config = ScanConfig::default();

    if let Some(scan) = file_config.scan {
        if let Some(threads) = scan.threads {
            config.threads = threads;
        }
        if let Some(timeout) = scan.timeout_secs {
            config.timeout_secs = timeout;
        }
        if let Some(ua) = scan.user_agent {
            config.user_agent = ua;
        }
        if let Some(follow) = scan.follow_redirects {
            config.follow_redirects = follow;
        }
        if let Some(insecure) = scan.insecure {
            config.insecure = insecure;
        }
    }

    if let Some(signatures) = file_config.signatures {
        config.signatures_path = signatures.path;
    }

    Ok(config)
}

/// Merges CLI arguments into an existing ScanConfig
pub fn merge_cli_args(
    config: &mut ScanConfig,
    target: String,
    timeout: Option<u64>,
    threads: Option<usize>,
    signatures: Option<String>,
    insecure: bool,
) {
    config.target = target;

    if let Some(t) = timeout {
        config.timeout_secs = t;
    }
    if let Some(t) = threads {
        config.threads = t;
    }
    if let Some(s) = signatures {
        config.signatures_path = Some(s);
    }
    if insecure {
        config.insecure = true;
    }
}

/// Validates the target base URL and strips any trailing slash.
///
/// Rejecting a malformed target here is the only fatal path: it happens
/// before any network activity.
pub fn normalize_target(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw)?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(VigilError::ConfigError(format!(
                "unsupported scheme '{other}' in target {raw}"
            )))
        }
    }
    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_trailing_slash() {
        let target = normalize_target("https://example.com/").expect("valid target");
        assert_eq!(target, "https://example.com");
    }

    #[test]
    fn normalize_keeps_clean_target() {
        let target = normalize_target("http://10.0.0.5:8080").expect("valid target");
        assert_eq!(target, "http://10.0.0.5:8080");
    }

    #[test]
    fn normalize_rejects_garbage() {
        assert!(normalize_target("not a url").is_err());
    }

    #[test]
    fn normalize_rejects_non_http_scheme() {
        let err = normalize_target("ftp://example.com").expect_err("ftp must be rejected");
        assert!(matches!(err, VigilError::ConfigError(_)));
    }

    #[test]
    fn file_config_overrides_defaults() {
        let config = from_toml_str(
            r#"
            [scan]
            threads = 4
            timeout_secs = 3
            insecure = true

            [signatures]
            path = "sigs.yaml"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.threads, 4);
        assert_eq!(config.timeout_secs, 3);
        assert!(config.insecure);
        assert_eq!(config.signatures_path.as_deref(), Some("sigs.yaml"));
        // untouched fields keep their defaults
        assert!(config.follow_redirects);
    }

    #[test]
    fn empty_file_config_keeps_defaults() {
        let config = from_toml_str("").expect("empty config is valid");
        assert_eq!(config.threads, 8);
        assert_eq!(config.timeout_secs, 7);
        assert!(!config.insecure);
    }

    #[test]
    fn cli_args_win_over_file_values() {
        let mut config = from_toml_str("[scan]\nthreads = 4\n").expect("valid config");
        merge_cli_args(
            &mut config,
            "https://example.com".to_string(),
            Some(10),
            Some(16),
            None,
            false,
        );
        assert_eq!(config.target, "https://example.com");
        assert_eq!(config.threads, 16);
        assert_eq!(config.timeout_secs, 10);
    }
}
