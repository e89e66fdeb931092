#![allow(clippy::print_stderr)]

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::{IsTerminal, Write};
use std::process::ExitCode;
use std::sync::Arc;

use gcjs_cli::args::CliArgs;
use gcjs_cli::driver::{self, DriverOptions};
use gcjs_cli::reporter::Reporter;
use gcjs_cli::{config, tracing_config};
use gcjs_lookup::DirectoryLookup;

fn main() -> Result<ExitCode> {
    // Initialize tracing if GCJS_LOG or RUST_LOG is set (zero cost otherwise).
    tracing_config::init_tracing();

    let args = CliArgs::parse();
    let config = config::resolve_config(&args)?;

    if args.show_config {
        let json = serde_json::to_string_pretty(&config).context("failed to serialize configuration")?;
        println!("{json}");
        return Ok(ExitCode::SUCCESS);
    }

    if args.files.is_empty() {
        bail!("no input files");
    }

    let options = DriverOptions {
        out_dir: args.out_dir.clone(),
        source_maps: args.source_map,
    };
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let reports = runtime.block_on(driver::run(
        &args.files,
        Arc::new(config),
        Arc::new(DirectoryLookup::shared()),
        &options,
    ))?;

    if options.out_dir.is_none()
        && let [report] = reports.as_slice()
        && let Ok(file) = &report.result
    {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(file.code.as_bytes())
            .context("failed to write to stdout")?;
        stdout.flush().context("failed to write to stdout")?;
    }

    let pretty = args.pretty.unwrap_or_else(|| std::io::stderr().is_terminal());
    let output = Reporter::new(pretty).render(&reports);
    if !output.is_empty() {
        eprint!("{output}");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
