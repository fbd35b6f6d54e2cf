//! Common test utilities

use vigil::models::ScanConfig;

/// Creates a test ScanConfig pointing to a wiremock server
pub fn test_config(target: &str) -> ScanConfig {
    ScanConfig {
        target: target.to_string(),
        threads: 2,
        timeout_secs: 10,
        user_agent: "Vigil-Test/0.1.0".to_string(),
        follow_redirects: true,
        insecure: false,
        signatures_path: None,
    }
}
