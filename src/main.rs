//! Vigil - Web Exposure and CVE Probe CLI

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing_subscriber::EnvFilter;

use vigil::config;
use vigil::models::{Finding, FindingKind, ScanConfig, VulnStatus};
use vigil::report;
use vigil::scanner::{signatures, ScanEngine};

/// Vigil - Concurrent Web Exposure and CVE Signature Probe
#[derive(Parser)]
#[command(name = "vigil", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a reconnaissance scan against a target
    Scan {
        /// Target base URL (e.g. https://example.com)
        target: String,

        /// HTTP request timeout in seconds
        #[arg(long, default_value_t = 7)]
        timeout: u64,

        /// Number of concurrent workers
        #[arg(long, default_value_t = 8)]
        threads: usize,

        /// Write the findings as a JSON array to this path
        #[arg(long)]
        json: Option<PathBuf>,

        /// YAML file overriding the built-in CVE signature table
        #[arg(long)]
        signatures: Option<String>,

        /// Accept invalid TLS certificates (insecure; for self-signed targets)
        #[arg(long)]
        insecure: bool,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the effective CVE signature table
    Signatures {
        /// YAML file overriding the built-in CVE signature table
        #[arg(long)]
        signatures: Option<String>,
    },

    /// Re-print the findings dump from an exported JSON file
    Report {
        /// Path to a findings JSON file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "vigil=debug" } else { "vigil=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

fn print_banner() {
    let banner = r#"
    ╔═══════════════════════════════════╗
    ║  VIGIL v0.1.0                     ║
    ║  Web Exposure & CVE Probe         ║
    ╚═══════════════════════════════════╝
    "#;
    println!("{}", banner.cyan());
}

fn print_findings(findings: &[Finding]) {
    if findings.is_empty() {
        println!("\n  {}", "No findings.".bold());
        return;
    }

    println!("\n  {}", "Findings".bold());
    println!("  {}", "─".repeat(35));

    for finding in findings {
        match finding.kind {
            FindingKind::ExposedPath => {
                println!("  {} {}", "exposed_path".red().bold(), finding.url);
            }
            FindingKind::CveTest => {
                let cve = finding.cve.as_deref().unwrap_or("-");
                let status = finding
                    .status
                    .map(|s| s.to_string())
                    .unwrap_or_default();
                println!(
                    "  {} {} [{}] {}",
                    "cve_test".yellow().bold(),
                    cve,
                    status,
                    finding.url
                );
            }
        }
    }
}

fn print_summary(findings: &[Finding]) {
    let exposed = findings
        .iter()
        .filter(|f| f.kind == FindingKind::ExposedPath)
        .count();
    let likely = findings
        .iter()
        .filter(|f| f.status == Some(VulnStatus::LikelyPresent))
        .count();
    let possible = findings
        .iter()
        .filter(|f| f.status == Some(VulnStatus::PossiblyDetected))
        .count();

    println!("\n  {}", "Scan Summary".bold());

    let mut builder = Builder::default();
    builder.push_record(["Result", "Count"]);
    builder.push_record(["Exposed paths".to_string(), exposed.to_string()]);
    builder.push_record(["CVE likely present".to_string(), likely.to_string()]);
    builder.push_record(["CVE possibly detected".to_string(), possible.to_string()]);
    builder.push_record(["Total".to_string(), findings.len().to_string()]);

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            target,
            timeout,
            threads,
            json,
            signatures,
            insecure,
            config: config_path,
            verbose,
        } => {
            init_tracing(verbose);
            print_banner();

            let mut scan_config = if let Some(ref path) = config_path {
                config::load_config(path)?
            } else {
                ScanConfig::default()
            };

            config::merge_cli_args(
                &mut scan_config,
                target,
                Some(timeout),
                Some(threads),
                signatures,
                insecure,
            );

            println!("  {} {}", "Target:".bold(), scan_config.target.green());
            println!(
                "  {} {}",
                "Workers:".bold(),
                scan_config.threads.to_string().cyan()
            );
            println!(
                "  {} {}s\n",
                "Timeout:".bold(),
                scan_config.timeout_secs.to_string().cyan()
            );

            let engine = ScanEngine::with_defaults();
            let result = engine.run(&scan_config).await?;

            print_findings(&result.findings);
            print_summary(&result.findings);

            if let Some(ref path) = json {
                report::json::export(&result.findings, path)?;
                println!(
                    "\n  {} {}",
                    "Findings saved to:".bold(),
                    path.display().to_string().green()
                );
            }

            println!(
                "\n  {} {} requests made.",
                "Scan complete.".bold(),
                result.total_requests
            );
        }

        Commands::Signatures {
            signatures: signatures_path,
        } => {
            init_tracing(false);
            print_banner();

            let table = match signatures_path {
                Some(ref path) => signatures::load_signatures(Path::new(path))?,
                None => signatures::builtin_signatures(),
            };

            println!("  {}\n", "CVE signature table:".bold());
            for signature in &table {
                let keyword = signature.keyword.as_deref().unwrap_or("-");
                println!(
                    "    {} {} (keyword: {})",
                    format!("{:16}", signature.cve).cyan().bold(),
                    signature.path,
                    keyword
                );
            }
            println!();
        }

        Commands::Report { input } => {
            init_tracing(false);
            print_banner();

            let findings = report::json::load(&input)?;
            print_findings(&findings);
            print_summary(&findings);
        }
    }

    Ok(())
}
