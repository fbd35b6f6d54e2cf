//! Scan phases, findings aggregation, and the orchestrating engine

pub mod paths;
pub mod pool;
pub mod signatures;

use crate::config;
use crate::error::Result;
use crate::http::HttpClient;
use crate::models::{Finding, ScanConfig, ScanReport};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info;

/// Thread-safe, append-only findings collection.
///
/// Cloning yields another handle to the same collection; workers across all
/// phases append through it. Append is the only mutation.
#[derive(Clone, Default)]
pub struct FindingsLog {
    inner: Arc<Mutex<Vec<Finding>>>,
}

impl FindingsLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one finding; safe under concurrent calls from all workers
    pub fn push(&self, finding: Finding) {
        self.lock().push(finding);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copies out the findings collected so far, in append order
    pub fn snapshot(&self) -> Vec<Finding> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Finding>> {
        // a poisoned lock still yields the findings collected so far
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Trait implemented by each scan phase
#[async_trait]
pub trait Scanner: Send + Sync {
    /// Returns the phase name
    fn name(&self) -> &str;

    /// Returns a description of what this phase checks
    fn description(&self) -> &str;

    /// Drains this phase's task queue through the worker pool, appending
    /// findings to the shared log. Returns the number of tasks processed.
    ///
    /// Only failure to construct the task queue is an error; per-task
    /// failures are contained inside the pool.
    async fn scan(
        &self,
        client: &HttpClient,
        config: &ScanConfig,
        findings: &FindingsLog,
    ) -> Result<usize>;
}

/// Orchestrates the scan phases in strict order
pub struct ScanEngine {
    phases: Vec<Arc<dyn Scanner>>,
}

impl ScanEngine {
    /// Creates a new ScanEngine with no registered phases
    pub fn new() -> Self {
        Self { phases: Vec::new() }
    }

    /// Creates a ScanEngine with the default phases: common sensitive
    /// paths first, then CVE signatures
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.register(Arc::new(paths::ExposedPathScanner));
        engine.register(Arc::new(signatures::CveSignatureScanner));
        engine
    }

    /// Registers a scan phase; phases run in registration order
    pub fn register(&mut self, scanner: Arc<dyn Scanner>) {
        self.phases.push(scanner);
    }

    /// Returns information about all registered phases
    pub fn list_phases(&self) -> Vec<(&str, &str)> {
        self.phases
            .iter()
            .map(|s| (s.name(), s.description()))
            .collect()
    }

    /// Runs all phases in order and collects results.
    ///
    /// Each phase fully drains before the next starts, so later phases can
    /// rely on the log already holding all prior-phase findings. A malformed
    /// target or signature table aborts before any request is sent; nothing
    /// a single task does can abort the scan.
    pub async fn run(&self, config: &ScanConfig) -> Result<ScanReport> {
        let mut config = config.clone();
        config.target = config::normalize_target(&config.target)?;

        let client = HttpClient::from_config(&config)?;
        let mut report = ScanReport::new(&config.target);
        let findings = FindingsLog::new();

        for phase in &self.phases {
            info!("Phase '{}' starting", phase.name());
            let processed = phase.scan(&client, &config, &findings).await?;
            info!(
                "Phase '{}' complete: {} tasks processed, {} findings so far",
                phase.name(),
                processed,
                findings.len()
            );
        }

        report.findings = findings.snapshot();
        report.total_requests = client.request_count();
        report.finish();

        Ok(report)
    }
}

impl Default for ScanEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
