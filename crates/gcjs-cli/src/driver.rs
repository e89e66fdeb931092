//! Rewrite driver: runs every input file concurrently on the tokio runtime.
//!
//! All files share one lookup handle, so the namespace map is resolved once
//! per run. A failure is recorded against its file and never stops the
//! others.

use anyhow::{Context, Result, bail};
use gcjs_common::RawSourceMap;
use gcjs_rewriter::{LoaderConfig, NamespaceLookup, RewriteOptions, rewrite_with_lookup};
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Output options that do not affect rewriting itself.
#[derive(Debug, Clone, Default)]
pub struct DriverOptions {
    /// Write results here; `None` returns the code to the caller.
    pub out_dir: Option<PathBuf>,
    /// Read `<input>.map` and produce a re-based map.
    pub source_maps: bool,
}

/// A successfully rewritten file.
#[derive(Debug, Clone)]
pub struct RewrittenFile {
    pub code: String,
    pub map: Option<RawSourceMap>,
    /// Where the code was written, when an output directory was given.
    pub written: Option<PathBuf>,
}

/// Outcome for one input, in input order.
#[derive(Debug)]
pub struct FileReport {
    pub input: PathBuf,
    pub result: Result<RewrittenFile>,
}

impl FileReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Rewrite every file in `inputs`.
///
/// Returns an error only for problems that affect the whole run; per-file
/// failures are in the reports.
pub async fn run<L>(
    inputs: &[PathBuf],
    config: Arc<LoaderConfig>,
    lookup: Arc<L>,
    options: &DriverOptions,
) -> Result<Vec<FileReport>>
where
    L: NamespaceLookup + 'static,
{
    match &options.out_dir {
        Some(out_dir) => {
            check_unique_names(inputs)?;
            tokio::fs::create_dir_all(out_dir)
                .await
                .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;
        }
        None if inputs.len() > 1 => bail!("--out-dir is required when rewriting more than one file"),
        None => {}
    }

    let options = Arc::new(options.clone());
    let mut tasks = JoinSet::new();
    for (index, input) in inputs.iter().enumerate() {
        let input = input.clone();
        let config = Arc::clone(&config);
        let lookup = Arc::clone(&lookup);
        let options = Arc::clone(&options);
        tasks.spawn(async move {
            let result = rewrite_file(&input, &config, lookup.as_ref(), &options).await;
            (index, FileReport { input, result })
        });
    }

    let mut reports: Vec<Option<FileReport>> = inputs.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        let (index, report) = joined.context("rewrite task panicked")?;
        reports[index] = Some(report);
    }

    let reports: Vec<FileReport> = reports.into_iter().flatten().collect();
    info!(
        files = reports.len(),
        failed = reports.iter().filter(|r| !r.is_ok()).count(),
        "rewrite finished"
    );
    Ok(reports)
}

/// Rewrite a single file and write its outputs.
pub async fn rewrite_file<L: NamespaceLookup>(
    input: &Path,
    config: &LoaderConfig,
    lookup: &L,
    options: &DriverOptions,
) -> Result<RewrittenFile> {
    let source = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("failed to read {}", input.display()))?;
    let input_map = if options.source_maps {
        read_input_map(input).await?
    } else {
        None
    };

    let absolute = std::path::absolute(input)
        .with_context(|| format!("failed to resolve {}", input.display()))?;
    let context = absolute.parent().unwrap_or(Path::new("/"));
    let file_name = output_name(input)?;

    let mut rewrite_options = RewriteOptions::new(config).with_context(context);
    if options.out_dir.is_some() {
        rewrite_options = rewrite_options.with_output_file(&file_name);
    }
    let output = rewrite_with_lookup(lookup, &source, input_map.as_ref(), &rewrite_options).await?;
    debug!(
        input = %input.display(),
        provides = output.provides.len(),
        requires = output.requires.len(),
        "rewrote file"
    );

    let written = match &options.out_dir {
        Some(out_dir) => {
            let target = out_dir.join(&file_name);
            tokio::fs::write(&target, &output.code)
                .await
                .with_context(|| format!("failed to write {}", target.display()))?;
            if let Some(map) = &output.map {
                let map_path = out_dir.join(format!("{file_name}.map"));
                tokio::fs::write(&map_path, map.to_json())
                    .await
                    .with_context(|| format!("failed to write {}", map_path.display()))?;
            }
            Some(target)
        }
        None => None,
    };

    Ok(RewrittenFile {
        code: output.code,
        map: output.map,
        written,
    })
}

/// `<input>.map`, if it exists.
async fn read_input_map(input: &Path) -> Result<Option<RawSourceMap>> {
    let mut map_path = input.as_os_str().to_owned();
    map_path.push(".map");
    let map_path = PathBuf::from(map_path);
    if !tokio::fs::try_exists(&map_path).await.unwrap_or(false) {
        return Ok(None);
    }
    let text = tokio::fs::read_to_string(&map_path)
        .await
        .with_context(|| format!("failed to read {}", map_path.display()))?;
    let map = RawSourceMap::from_json(&text)
        .with_context(|| format!("invalid source map {}", map_path.display()))?;
    Ok(Some(map))
}

fn output_name(input: &Path) -> Result<String> {
    input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} is not a file path", input.display()))
}

/// Outputs are flattened into one directory, so names must not collide.
fn check_unique_names(inputs: &[PathBuf]) -> Result<()> {
    let mut seen = FxHashSet::default();
    for input in inputs {
        let name = output_name(input)?;
        if !seen.insert(name.clone()) {
            bail!("two inputs would both be written as {name}");
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod tests;
