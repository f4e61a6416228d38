//! Build and backend probe for vecmath-core.
//!
//! Prints the compiled build configuration as JSON, then runs the runtime
//! self check against the active register backend.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin vecmath-probe
//! cargo run --bin vecmath-probe -- --expect expected.json
//! RUST_LOG=debug cargo run --bin vecmath-probe
//! ```
//!
//! `--expect` takes a (possibly partial) JSON `BuildConfig`; the probe fails
//! if this build cannot satisfy it.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;
use vecmath_core::config::CONFIG;
use vecmath_core::diagnostics::self_check;
use vecmath_core::BuildConfig;

#[derive(Parser)]
#[command(name = "vecmath-probe")]
#[command(about = "Report the vecmath-core build configuration and run the backend self check")]
struct Args {
    /// JSON `BuildConfig` this build must satisfy.
    #[arg(long, value_name = "CONFIG_JSON")]
    expect: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let args = Args::parse();

    println!("{}", CONFIG.to_json()?);

    match &args.expect {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let expected = BuildConfig::from_json(&json)?;
            CONFIG
                .ensure_compatible(&expected)
                .with_context(|| format!("Build does not satisfy {}", path.display()))?;
            info!("Build satisfies {}", path.display());
        }
        None => info!("No --expect file given, skipping compatibility check"),
    }

    let report = self_check().context("Backend self check failed")?;
    println!("self check: {} checks passed", report.passed.len());
    Ok(())
}
