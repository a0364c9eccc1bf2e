//! Scan command - Normalize IaC files and directories.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Map, Value};
use tracing::{info, warn};

use iacnorm_core::{Executor, NormalizedTree, ScanRequest};

use crate::config::ScanConfig;

#[derive(Args, Debug, Default)]
pub struct ScanArgs {
    /// IaC type (terraform, k8s, cft)
    #[arg(short = 't', long = "iac-type", env = "IACNORM_TYPE")]
    pub iac_type: Option<String>,

    /// IaC version (v1, v12, v14)
    #[arg(long = "iac-version", env = "IACNORM_VERSION")]
    pub iac_version: Option<String>,

    /// Cloud target label (aws, azure, gcp)
    #[arg(short, long, env = "IACNORM_CLOUD")]
    pub cloud: Option<String>,

    /// IaC file to scan (repeatable)
    #[arg(short, long = "file")]
    pub files: Vec<PathBuf>,

    /// IaC directory to scan (repeatable)
    #[arg(short, long = "dir")]
    pub dirs: Vec<PathBuf>,

    /// Config file (default: ./.iacnorm.yaml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the JSON result to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print compact JSON
    #[arg(long)]
    pub compact: bool,
}

pub async fn execute(args: ScanArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config = ScanConfig::resolve(args.config.as_deref(), &cwd)?;
    let requests = build_requests(&args, &config);

    info!(
        "Scanning {} target(s) as {}/{}",
        requests.len(),
        requests[0].iac_type,
        requests[0].iac_version
    );

    let mut handles = Vec::new();
    for request in requests {
        let label = target_label(&request);
        handles.push((label, tokio::task::spawn_blocking(move || scan_one(request))));
    }

    let mut results = Vec::new();
    for (label, handle) in handles {
        let tree = handle
            .await
            .context("Scan task panicked")?
            .with_context(|| format!("Failed to scan {}", label))?;
        results.push((label, tree));
    }

    let combined = combine(results);
    let rendered = if args.compact {
        serde_json::to_string(&combined)?
    } else {
        serde_json::to_string_pretty(&combined)?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            info!("Wrote normalized output to {:?}", path);
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

/// One request per distinct file and directory; flags override config values.
///
/// With no paths at all a single path-less request is returned so that
/// validation reports the missing path.
pub fn build_requests(args: &ScanArgs, config: &ScanConfig) -> Vec<ScanRequest> {
    let base = ScanRequest::new(
        args.iac_type.clone().unwrap_or_else(|| config.iac_type.clone()),
        args.iac_version
            .clone()
            .unwrap_or_else(|| config.iac_version.clone()),
    )
    .with_cloud(args.cloud.clone().unwrap_or_else(|| config.cloud.clone()));

    let mut requests: Vec<ScanRequest> = args
        .files
        .iter()
        .map(|file| base.clone().with_file(file.to_string_lossy()))
        .chain(
            args.dirs
                .iter()
                .map(|dir| base.clone().with_dir(dir.to_string_lossy())),
        )
        .collect();

    let mut seen = HashSet::new();
    requests.retain(|request| {
        let label = target_label(request);
        if seen.insert(label.clone()) {
            true
        } else {
            warn!("Target {} given more than once, scanning it once", label);
            false
        }
    });

    if requests.is_empty() {
        requests.push(base);
    }
    requests
}

fn target_label(request: &ScanRequest) -> String {
    if request.dir_path.trim().is_empty() {
        request.file_path.clone()
    } else {
        request.dir_path.clone()
    }
}

fn scan_one(request: ScanRequest) -> Result<NormalizedTree> {
    let executor = Executor::new(
        request.iac_type,
        request.iac_version,
        request.cloud_target,
        request.file_path,
        request.dir_path,
    )?;
    Ok(executor.execute()?)
}

/// A single result is printed as-is; several are keyed by target path.
fn combine(mut results: Vec<(String, NormalizedTree)>) -> Value {
    if results.len() == 1 {
        if let Some((_, tree)) = results.pop() {
            return tree;
        }
    }
    let map: Map<String, Value> = results.into_iter().collect();
    Value::Object(map)
}
