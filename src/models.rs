//! Core data models for the Vigil probe

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of check a task performs and a finding reports
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    ExposedPath,
    CveTest,
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingKind::ExposedPath => write!(f, "exposed_path"),
            FindingKind::CveTest => write!(f, "cve_test"),
        }
    }
}

/// Detection status of a CVE signature check
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VulnStatus {
    /// Signature keyword matched the response body
    LikelyPresent,
    /// The probe path answered 200 but no keyword distinguishes the
    /// vulnerability; inherently noisy
    PossiblyDetected,
    NotDetected,
}

impl fmt::Display for VulnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VulnStatus::LikelyPresent => write!(f, "likely_present"),
            VulnStatus::PossiblyDetected => write!(f, "possibly_detected"),
            VulnStatus::NotDetected => write!(f, "not_detected"),
        }
    }
}

/// Normalized outcome of a single probe request.
///
/// Either `status` and `body` are set (the request completed) or `error`
/// carries the transport failure description. Produced fresh per request,
/// never mutated.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub status: Option<u16>,
    pub body: Option<String>,
    pub error: Option<String>,
}

impl ProbeOutcome {
    /// Outcome for a completed request
    pub fn response(status: u16, body: String) -> Self {
        Self {
            status: Some(status),
            body: Some(body),
            error: None,
        }
    }

    /// Outcome for a transport-level failure (connect, DNS, TLS, timeout)
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: None,
            body: None,
            error: Some(error.into()),
        }
    }

    pub fn is_status(&self, code: u16) -> bool {
        self.status == Some(code)
    }

    /// Literal substring match against the response body
    pub fn body_contains(&self, needle: &str) -> bool {
        self.body.as_deref().is_some_and(|b| b.contains(needle))
    }
}

/// A structured record of a detected exposure or possible vulnerability.
///
/// Serializes exactly to the exported JSON shape; absent optionals are
/// omitted rather than null.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Finding {
    #[serde(rename = "type")]
    pub kind: FindingKind,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cve: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VulnStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Finding {
    /// Finding for an accessible sensitive path
    pub fn exposed_path(url: impl Into<String>) -> Self {
        Self {
            kind: FindingKind::ExposedPath,
            url: url.into(),
            cve: None,
            status: None,
            details: None,
        }
    }

    /// Finding for a CVE signature check
    pub fn cve_test(
        cve: impl Into<String>,
        url: impl Into<String>,
        status: VulnStatus,
        details: impl Into<String>,
    ) -> Self {
        Self {
            kind: FindingKind::CveTest,
            url: url.into(),
            cve: Some(cve.into()),
            status: Some(status),
            details: Some(details.into()),
        }
    }
}

/// Result of a complete scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Target base URL, normalized
    pub target: String,
    /// Unique scan identifier
    pub scan_id: String,
    /// Scan start time (local timezone)
    pub started_at: DateTime<Local>,
    /// Scan end time (local timezone)
    pub finished_at: Option<DateTime<Local>>,
    /// All findings collected across phases
    pub findings: Vec<Finding>,
    /// Total HTTP requests made
    pub total_requests: u64,
}

impl ScanReport {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            scan_id: uuid::Uuid::new_v4().to_string(),
            started_at: Local::now(),
            finished_at: None,
            findings: Vec::new(),
            total_requests: 0,
        }
    }

    /// Marks the scan as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Local::now());
    }
}

/// Configuration for a scan session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Target base URL to scan
    pub target: String,
    /// Number of concurrent workers per phase
    pub threads: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header value
    pub user_agent: String,
    /// Whether to follow HTTP redirects
    pub follow_redirects: bool,
    /// Accept invalid TLS certificates. Insecure by choice: only for
    /// scanning self-signed or otherwise untrusted targets.
    pub insecure: bool,
    /// YAML file overriding the built-in CVE signature table
    pub signatures_path: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            threads: 8,
            timeout_secs: 7,
            user_agent: "Vigil-Scanner/0.1.0".to_string(),
            follow_redirects: true,
            insecure: false,
            signatures_path: None,
        }
    }
}
