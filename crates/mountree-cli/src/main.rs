//! mountree CLI entry point.
//!
//! Usage:
//!   mountree [--manifest <file>] ls [path]     # List a directory
//!   mountree [--manifest <file>] cat <path>    # Print file content
//!   mountree [--manifest <file>] tree [path]   # Draw the subtree
//!   mountree [--manifest <file>] stat <path>   # Describe one entry

use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use mountree_cli::{MountManifest, commands};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> ExitCode {
    // Logs go to stderr so `cat` output stays clean. Respects RUST_LOG.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut manifest_path: Option<PathBuf> = None;
    if let Some(first) = args.first() {
        if let Some(path) = first.strip_prefix("--manifest=") {
            manifest_path = Some(PathBuf::from(path));
            args.remove(0);
        } else if first == "--manifest" {
            let path = args.get(1).context("--manifest requires a file argument")?;
            manifest_path = Some(PathBuf::from(path));
            args.drain(..2);
        }
    }

    let command = args.first().map(|s| s.as_str());
    let target = args.get(1).map(|s| s.as_str());

    match command {
        None | Some("--help" | "-h") => {
            print_help();
            Ok(ExitCode::SUCCESS)
        }

        Some("--version" | "-V") => {
            println!("mountree {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }

        Some(cmd @ ("ls" | "cat" | "tree" | "stat")) => {
            let manifest = match &manifest_path {
                Some(path) => MountManifest::load_from(path)?,
                None => MountManifest::load()?,
            };
            let ns = manifest.build()?;
            let target = target.unwrap_or("/");

            let mut stdout = std::io::stdout().lock();
            match cmd {
                "ls" => stdout.write_all(commands::ls(&ns, target)?.as_bytes())?,
                "tree" => stdout.write_all(commands::tree(&ns, target)?.as_bytes())?,
                "stat" => stdout.write_all(commands::stat(&ns, target)?.as_bytes())?,
                _ => stdout.write_all(&commands::cat(&ns, target)?)?,
            }
            stdout.flush()?;
            Ok(ExitCode::SUCCESS)
        }

        Some(other) => {
            eprintln!("Unknown command: {other}");
            eprintln!("Try 'mountree --help' for usage.");
            Ok(ExitCode::from(2))
        }
    }
}

fn print_help() {
    println!(
        r#"mountree - browse a virtual namespace built from a mount manifest

USAGE:
    mountree [--manifest <file>] <command> [path]

COMMANDS:
    ls [path]      List a directory (default: /)
    cat <path>     Print file content
    tree [path]    Draw the subtree (default: /)
    stat <path>    Describe one entry

OPTIONS:
    --manifest <file>   Mount manifest (default: <config dir>/mountree/mounts.toml)
    -h, --help          Show this help
    -V, --version       Show version

ENVIRONMENT:
    RUST_LOG            Log filter, e.g. RUST_LOG=mountree=debug"#
    );
}
