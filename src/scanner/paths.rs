//! Common sensitive path phase

use crate::error::Result;
use crate::http::HttpClient;
use crate::models::{Finding, ProbeOutcome, ScanConfig};
use crate::scanner::pool::{self, PathTask};
use crate::scanner::FindingsLog;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Paths that commonly expose admin interfaces, credentials, or source
pub const COMMON_PATHS: &[&str] = &[
    "/admin",
    "/login",
    "/.git",
    "/.env",
    "/config",
    "/phpinfo.php",
    "/test",
    "/backup",
    "/.DS_Store",
];

/// Probes the common sensitive path table
pub struct ExposedPathScanner;

fn classify(_task: &PathTask, outcome: &ProbeOutcome, url: &str) -> Option<Finding> {
    if outcome.is_status(200) {
        info!("exposed: {url}");
        return Some(Finding::exposed_path(url));
    }
    match (&outcome.status, &outcome.error) {
        (Some(status), _) => debug!("{url} not exposed (HTTP {status})"),
        (None, Some(err)) => debug!("{url} skipped: {err}"),
        (None, None) => {}
    }
    None
}

#[async_trait]
impl super::Scanner for ExposedPathScanner {
    fn name(&self) -> &str {
        "paths"
    }

    fn description(&self) -> &str {
        "Probes common sensitive paths for exposed resources"
    }

    async fn scan(
        &self,
        client: &HttpClient,
        config: &ScanConfig,
        findings: &FindingsLog,
    ) -> Result<usize> {
        let tasks: Vec<PathTask> = COMMON_PATHS.iter().copied().map(PathTask::exposed).collect();

        info!(
            "Checking {} common sensitive paths on {}",
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
