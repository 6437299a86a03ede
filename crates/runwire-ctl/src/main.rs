//! runwire — command-line client for the remote run service.

use std::path::PathBuf;

use anyhow::{Context, Result};

use runwire_core::config::RunwireConfig;

mod cmd;
mod render;

fn print_usage() {
    println!("Usage: runwire [--config <path>] <command>");
    println!();
    println!("Commands:");
    println!("  run <service> <action> [<field>=<value>]... [--<field> <value>]...");
    println!("                Invoke an action. Prefix a value with @ to send a");
    println!("                local file or URL as the file part (one per call).");
    println!("      --team <name>   Run under a team instead of the personal team");
    println!("      --out <path>    Write the first file in the response to <path>");
    println!("  config        Write the default config file (or --config path) if missing");
    println!("                and print its path");
    println!("  help          Show this message");
    println!();
    println!("Options:");
    println!("  --config <path>   Config file (default: {})", RunwireConfig::file_path().display());
}

fn load_config(path: Option<PathBuf>) -> Result<RunwireConfig> {
    let config = match path {
        Some(path) => RunwireConfig::load_from(&path),
        None => RunwireConfig::load(),
    };
    config.context("failed to load config")
}

/// Write the default config to `--config <path>` or the default location.
fn init_config(path: Option<PathBuf>) -> Result<(PathBuf, bool)> {
    let path = path.unwrap_or_else(RunwireConfig::file_path);
    let created = RunwireConfig::write_default_to(&path)?;
    Ok((path, created))
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    // Global options come before the command word.
    let mut config_path = None;
    let mut i = 0;
    while i < args.len() && args[i].starts_with("--") {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                config_path = Some(PathBuf::from(
                    args.get(i).context("--config requires a value")?,
                ));
            }
            "--help" => break,
            other => anyhow::bail!("unknown option: {other}"),
        }
        i += 1;
    }
    let remaining: Vec<&str> = args[i..].iter().map(String::as_str).collect();

    match remaining.as_slice() {
        ["run", rest @ ..] => {
            let config = load_config(config_path)?;
            cmd::run::cmd_run(&config, rest).await
        }
        ["config"] => {
            let (path, created) = init_config(config_path)?;
            if created {
                println!("Created {}", path.display());
            } else {
                println!("{}", path.display());
            }
            Ok(())
        }
        ["help"] | ["--help"] | ["-h"] | [] => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Command not found: {}", other.join(" "));
            eprintln!("Type `runwire help` to see all commands");
            std::process::exit(1);
        }
    }
}
