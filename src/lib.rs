//! Vigil - Concurrent Web Exposure and CVE Signature Probe
//!
//! Issues a bounded set of HTTP GET requests against known sensitive paths
//! and known vulnerability-signature paths, classifies each response, and
//! collects structured findings for reporting or JSON export.

pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod report;
pub mod scanner;
