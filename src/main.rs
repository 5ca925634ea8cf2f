//! APK Screen CLI
//!
//! Runs the same read → evaluate pipeline as the API against local files.
//!
//! Exit codes:
//!   0 - every file is SAFE
//!   1 - at least one file is LIKELY_FAKE
//!   2 - at least one file could not be scanned

use apk_screen::{is_apk_filename, ApkAnalyzer, ScanReport};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "apk_screen", version, about = "Heuristic fake-APK screening")]
struct Cli {
    /// APK files to scan
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Print one JSON report per line instead of a summary
    #[arg(long)]
    json: bool,
}

fn main() -> eyre::Result<ExitCode> {
    // Logs go to stderr so `--json` output stays clean
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let analyzer = ApkAnalyzer::default();

    let mut any_fake = false;
    let mut any_error = false;

    for path in &cli.paths {
        let name = path.to_string_lossy();
        if !is_apk_filename(&name) {
            warn!(path = %name, "Skipping file without .apk extension");
            eprintln!("{}: not an .apk file", name);
            any_error = true;
            continue;
        }

        match analyzer.scan(path) {
            Ok(report) => {
                any_fake |= report.result.verdict.is_fake();
                if cli.json {
                    println!("{}", serde_json::to_string(&report)?);
                } else {
                    print!("{}", render(&name, &report));
                }
            }
            Err(e) => {
                any_error = true;
                eprintln!("{}: {}", name, e);
            }
        }
    }

    Ok(if any_error {
        ExitCode::from(2)
    } else if any_fake {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

fn render(name: &str, report: &ScanReport) -> String {
    let features = &report.features;
    let mut output = format!("\n📦 {}\n", name);
    output.push_str(&format!(
        "   App:         {}\n",
        features.app_name.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!("   Package:     {}\n", features.package_name));
    output.push_str(&format!(
        "   Version:     {}\n",
        features.version.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!("   Size:        {:.2} KB\n", features.file_size_kb));
    output.push_str(&format!("   Permissions: {}\n", features.permissions.len()));
    output.push_str(&format!("   Verdict:     {}", report.result.summary()));
    output
}
