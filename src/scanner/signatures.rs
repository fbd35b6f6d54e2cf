//! CVE signature phase
//!
//! The signature table maps a CVE identifier to a probe path and an optional
//! keyword expected in the response body when the vulnerability is present.
//! A built-in table ships as a default; real deployments point
//! `--signatures` at a YAML file maintained outside the binary.

use crate::error::{Result, VigilError};
use crate::http::HttpClient;
use crate::models::{Finding, ProbeOutcome, ScanConfig, VulnStatus};
use crate::scanner::pool::{self, PathTask};
use crate::scanner::FindingsLog;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One CVE signature: probe path plus optional body keyword
#[derive(Debug, Clone, Deserialize)]
pub struct Signature {
    pub cve: String,
    pub path: String,
    #[serde(default)]
    pub keyword: Option<String>,
}

/// Default signature table used when no `--signatures` file is given
pub fn builtin_signatures() -> Vec<Signature> {
    vec![
        Signature {
            cve: "CVE-2017-5638".to_string(),
            path: "/struts2-showcase/index.action".to_string(),
            keyword: Some("Apache".to_string()),
        },
        Signature {
            cve: "CVE-2019-19781".to_string(),
            path: "/vpn/../vpns/".to_string(),
            keyword: None,
        },
        Signature {
            cve: "CVE-2021-41773".to_string(),
            path: "/cgi-bin/.%2e/%2e%2e/%2e%2e/%2e%2e/etc/passwd".to_string(),
            keyword: Some("root:".to_string()),
        },
    ]
}

/// Loads a signature table from a YAML file
pub fn load_signatures(path: &Path) -> Result<Vec<Signature>> {
    let content = std::fs::read_to_string(path).map_err(VigilError::IoError)?;
    let signatures = parse_signatures(&content)?;
    info!("Loaded {} signatures from {}", signatures.len(), path.display());
    Ok(signatures)
}

fn parse_signatures(content: &str) -> Result<Vec<Signature>> {
    let signatures: Vec<Signature> = serde_yaml::from_str(content)?;

    for signature in &signatures {
        if signature.cve.is_empty() {
            return Err(VigilError::ConfigError(
                "signature entry with empty cve id".to_string(),
            ));
        }
        if !signature.path.starts_with('/') {
            return Err(VigilError::ConfigError(format!(
                "signature {} has a path not starting with '/': {}",
                signature.cve, signature.path
            )));
        }
    }

    Ok(signatures)
}

/// Verdict of the pure signature classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureVerdict {
    pub status: VulnStatus,
    pub details: String,
}

/// Classifies one probe outcome against a signature keyword.
///
/// A transport failure is distinguished from a tested-and-clean negative in
/// the detail text only; both carry `not_detected`.
pub fn classify_outcome(keyword: Option<&str>, outcome: &ProbeOutcome) -> SignatureVerdict {
    let Some(status) = outcome.status else {
        let err = outcome.error.as_deref().unwrap_or("transport failure");
        return SignatureVerdict {
            status: VulnStatus::NotDetected,
            details: format!("scan failed: {err}"),
        };
    };

    if status != 200 {
        return SignatureVerdict {
            status: VulnStatus::NotDetected,
            details: format!("HTTP {status}"),
        };
    }

    match keyword {
        Some(kw) => {
            if outcome.body_contains(kw) {
                SignatureVerdict {
                    status: VulnStatus::LikelyPresent,
                    details: "Keyword matched in response.".to_string(),
                }
            } else {
                SignatureVerdict {
                    status: VulnStatus::NotDetected,
                    details: "keyword not found".to_string(),
                }
            }
        }
        // Presence of the path alone is a weak signal; known false-positive
        // source.
        None => SignatureVerdict {
            status: VulnStatus::PossiblyDetected,
            details: "Path responded with HTTP 200; no keyword to confirm.".to_string(),
        },
    }
}

/// Probes the CVE signature table
pub struct CveSignatureScanner;

fn classify(task: &PathTask, outcome: &ProbeOutcome, url: &str) -> Option<Finding> {
    let cve = task.cve.as_deref()?;
    let verdict = classify_outcome(task.keyword.as_deref(), outcome);

    match verdict.status {
        VulnStatus::LikelyPresent => {
            info!("{cve} likely present: {url}");
            Some(Finding::cve_test(cve, url, verdict.status, verdict.details))
        }
        VulnStatus::PossiblyDetected => {
            info!("{cve} possibly detected: {url}");
            Some(Finding::cve_test(cve, url, verdict.status, verdict.details))
        }
        VulnStatus::NotDetected => {
            if outcome.status.is_none() {
                warn!("{cve} scan failed: {url}");
            } else {
                debug!("{cve} not detected: {url} ({})", verdict.details);
            }
            None
        }
    }
}

#[async_trait]
impl super::Scanner for CveSignatureScanner {
    fn name(&self) -> &str {
        "signatures"
    }

    fn description(&self) -> &str {
        "Checks known CVE signature paths and response keywords"
    }

    async fn scan(
        &self,
        client: &HttpClient,
        config: &ScanConfig,
        findings: &FindingsLog,
    ) -> Result<usize> {
        let signatures = match &config.signatures_path {
            Some(path) => load_signatures(Path::new(path))?,
            None => builtin_signatures(),
        };

        let tasks: Vec<PathTask> = signatures
            .into_iter()
            .map(|s| PathTask::cve_signature(s.cve, s.path, s.keyword))
            .collect();

        info!(
            "Checking {} CVE signatures against {}",
            tasks.len(),
            config.target
        );

        Ok(pool::run_workers(
            client,
            &config.target,
            tasks,
            config.threads,
            Arc::new(classify),
            findings,
        )
        .await)
    }
}
