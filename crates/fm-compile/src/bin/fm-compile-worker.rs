//! fm-compile-worker - compiles one Forma project in an isolated process
//!
//! Reads a base64 compile config from stdin (or `--config`), prints the
//! result to stdout and exits non-zero on failure.

use anyhow::{Context, Result};
use clap::Parser;
use fm_compile::run_worker;
use std::io::{Read, Write};

/// Forma compile worker
#[derive(Parser, Debug)]
#[command(name = "fm-compile-worker")]
#[command(version, about, long_about = None)]
struct Args {
    /// Base64 compile config. Read from stdin when omitted
    #[arg(long, env = "FORMA_COMPILE_CONFIG")]
    config: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let encoded = match args.config {
        Some(config) => config,
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read compile config from stdin")?;
            input
        }
    };

    let result = run_worker(&encoded)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(result.as_bytes())
        .context("Failed to write compile result")?;
    stdout.flush()?;
    Ok(())
}
