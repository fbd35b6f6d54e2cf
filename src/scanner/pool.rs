//! Fixed-size worker pool draining a shared task queue

use crate::http::HttpClient;
use crate::models::{Finding, FindingKind, ProbeOutcome};
use crate::scanner::FindingsLog;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::error;

/// One unit of probing work: a relative path plus its classification inputs.
/// Immutable once enqueued; consumed by exactly one worker.
#[derive(Debug, Clone)]
pub struct PathTask {
    pub path: String,
    pub keyword: Option<String>,
    pub cve: Option<String>,
    pub kind: FindingKind,
}

impl PathTask {
    /// Task probing a common sensitive path
    pub fn exposed(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            keyword: None,
            cve: None,
            kind: FindingKind::ExposedPath,
        }
    }

    /// Task probing a CVE signature path
    pub fn cve_signature(
        cve: impl Into<String>,
        path: impl Into<String>,
        keyword: Option<String>,
    ) -> Self {
        Self {
            path: path.into(),
            keyword,
            cve: Some(cve.into()),
            kind: FindingKind::CveTest,
        }
    }
}

/// Phase-specific classification of a probe outcome. Returning `Some`
/// appends the finding; `None` records nothing for the task.
pub type Classifier = Arc<dyn Fn(&PathTask, &ProbeOutcome, &str) -> Option<Finding> + Send + Sync>;

/// Drains `tasks` with `workers` concurrent workers and returns the number
/// of tasks processed.
///
/// Every task is delivered to exactly one worker, and the call returns only
/// after each worker has observed queue exhaustion and exited. A transport
/// failure inside one task never aborts the pool; a panicked worker is
/// logged and the remaining workers keep draining.
pub async fn run_workers(
    client: &HttpClient,
    target: &str,
    tasks: Vec<PathTask>,
    workers: usize,
    classify: Classifier,
    findings: &FindingsLog,
) -> usize {
    let total = tasks.len();
    if total == 0 {
        return 0;
    }

    // The buffer holds the whole queue, so enqueueing never blocks; dropping
    // the sender is the exhaustion signal.
    let (tx, rx) = mpsc::channel(total);
    for task in tasks {
        if tx.send(task).await.is_err() {
            break;
        }
    }
    drop(tx);

    let rx = Arc::new(Mutex::new(rx));
    let mut set = JoinSet::new();

    for _ in 0..workers.max(1) {
        let rx = Arc::clone(&rx);
        let client = client.clone();
        let classify = Arc::clone(&classify);
        let findings = findings.clone();
        let target = target.to_string();

        set.spawn(async move {
            let mut processed = 0usize;
            loop {
                // the receiver lock is held for the dequeue only, never
                // across the probe
                let task = { rx.lock().await.recv().await };
                let Some(task) = task else { break };

                let url = format!("{}{}", target, task.path);
                let outcome = client.probe(&url).await;
                if let Some(finding) = classify(&task, &outcome, &url) {
                    findings.push(finding);
                }
                processed += 1;
            }
            processed
        });
    }

    let mut processed = 0;
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(count) => processed += count,
            Err(e) => error!("worker task panicked: {e}"),
        }
    }
    processed
}
