//! Integration tests for the exposed-path and CVE signature phases

mod common;

use std::io::Write;
use vigil::http::HttpClient;
use vigil::models::{FindingKind, VulnStatus};
use vigil::scanner::paths::{ExposedPathScanner, COMMON_PATHS};
use vigil::scanner::signatures::CveSignatureScanner;
use vigil::scanner::{FindingsLog, Scanner};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Exposed Path Phase Tests
// ============================================================================

#[tokio::test]
async fn test_admin_path_exposed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>admin panel</html>"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let config = common::test_config(&mock_server.uri());
    let client = HttpClient::from_config(&config).expect("client");
    let findings = FindingsLog::new();

    let processed = ExposedPathScanner
        .scan(&client, &config, &findings)
        .await
        .expect("scan");

    assert_eq!(processed, COMMON_PATHS.len());
    let collected = findings.snapshot();
    assert_eq!(
        collected.len(),
        1,
        "expected only /admin to be flagged, got: {:?}",
        collected.iter().map(|f| &f.url).collect::<Vec<_>>()
    );
    assert_eq!(collected[0].kind, FindingKind::ExposedPath);
    assert!(collected[0].url.ends_with("/admin"));
    assert!(collected[0].cve.is_none());
    assert!(collected[0].status.is_none());
}

#[tokio::test]
async fn test_all_404_yields_no_findings() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let config = common::test_config(&mock_server.uri());
    let client = HttpClient::from_config(&config).expect("client");
    let findings = FindingsLog::new();

    let processed = ExposedPathScanner
        .scan(&client, &config, &findings)
        .await
        .expect("scan");

    assert_eq!(processed, COMMON_PATHS.len());
    assert!(findings.is_empty());
}

#[tokio::test]
async fn test_unreachable_target_completes_without_findings() {
    // closed port: every probe is a transport failure
    let config = vigil::models::ScanConfig {
        timeout_secs: 2,
        ..common::test_config("http://127.0.0.1:1")
    };
    let client = HttpClient::from_config(&config).expect("client");
    let findings = FindingsLog::new();

    let processed = ExposedPathScanner
        .scan(&client, &config, &findings)
        .await
        .expect("scan must complete despite failures");

    assert_eq!(processed, COMMON_PATHS.len());
    assert!(findings.is_empty());
}

// ============================================================================
// CVE Signature Phase Tests
// ============================================================================

#[tokio::test]
async fn test_signature_keyword_match() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/struts2-showcase/index.action"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Powered by Apache Struts"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let config = common::test_config(&mock_server.uri());
    let client = HttpClient::from_config(&config).expect("client");
    let findings = FindingsLog::new();

    CveSignatureScanner
        .scan(&client, &config, &findings)
        .await
        .expect("scan");

    let collected = findings.snapshot();
    assert_eq!(
        collected.len(),
        1,
        "expected one CVE finding, got: {:?}",
        collected.iter().map(|f| &f.cve).collect::<Vec<_>>()
    );
    assert_eq!(collected[0].kind, FindingKind::CveTest);
    assert_eq!(collected[0].cve.as_deref(), Some("CVE-2017-5638"));
    assert_eq!(collected[0].status, Some(VulnStatus::LikelyPresent));
    assert_eq!(
        collected[0].details.as_deref(),
        Some("Keyword matched in response.")
    );
}

#[tokio::test]
async fn test_signature_keyword_absent() {
    let mock_server = MockServer::start().await;

    // 200 on the struts path but without the expected keyword
    Mock::given(method("GET"))
        .and(path("/struts2-showcase/index.action"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>It works!</html>"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let config = common::test_config(&mock_server.uri());
    let client = HttpClient::from_config(&config).expect("client");
    let findings = FindingsLog::new();

    CveSignatureScanner
        .scan(&client, &config, &findings)
        .await
        .expect("scan");

    assert!(
        findings.is_empty(),
        "keyword miss must not produce a finding, got: {:?}",
        findings.snapshot()
    );
}

#[tokio::test]
async fn test_signature_without_keyword_is_possibly_detected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vpn/test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("login page"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let mut sigfile = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(sigfile, "- cve: CVE-2019-19781\n  path: /vpn/test").expect("write");

    let mut config = common::test_config(&mock_server.uri());
    config.signatures_path = Some(sigfile.path().display().to_string());

    let client = HttpClient::from_config(&config).expect("client");
    let findings = FindingsLog::new();

    let processed = CveSignatureScanner
        .scan(&client, &config, &findings)
        .await
        .expect("scan");

    assert_eq!(processed, 1);
    let collected = findings.snapshot();
    assert_eq!(collected.len(), 1);
    assert_eq!(collected[0].status, Some(VulnStatus::PossiblyDetected));
}

#[tokio::test]
async fn test_malformed_signature_file_is_fatal() {
    let mut sigfile = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(sigfile, "this is: [not, a, signature, table").expect("write");

    let mut config = common::test_config("http://127.0.0.1:1");
    config.signatures_path = Some(sigfile.path().display().to_string());

    let client = HttpClient::from_config(&config).expect("client");
    let findings = FindingsLog::new();

    let result = CveSignatureScanner.scan(&client, &config, &findings).await;

    assert!(result.is_err(), "bad signature table must abort the phase");
    assert!(findings.is_empty());
}
