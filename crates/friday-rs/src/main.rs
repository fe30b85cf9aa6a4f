//! `friday` command-line entry point.

use anyhow::Context;
use clap::{Parser, Subcommand};
use friday_rs::config::{FridayConfig, LayeredConfigOptions};
use friday_rs::{AssistantSession, SessionBuilder, init_logging, serve};
use log::{debug, info};
use serde_json::Value;
use std::path::PathBuf;
use tokio::io::BufReader;

/// Command-line options for the Friday assistant.
#[derive(Parser)]
#[command(name = "friday", version)]
struct Cli {
    /// Optional path to a friday.json5 config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Working directory for relative paths and the memory file
    #[arg(long, global = true)]
    cwd: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the registered capabilities
    Tools {
        /// Print name, description, and schema as JSON
        #[arg(long)]
        json: bool,
    },
    /// Invoke one capability and print its result
    Invoke {
        /// Capability name
        name: String,
        /// Arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
    /// Serve capabilities as JSON lines over stdin and stdout
    Serve,
    /// Print the persisted memory document
    Memory,
    /// Print the persona instructions for the current memory
    Prompt,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let cwd = match cli.cwd {
        Some(cwd) => cwd,
        None => std::env::current_dir().context("cwd")?,
    };
    info!(
        "friday starting (cwd={}, config={:?})",
        cwd.display(),
        cli.config
    );

    let mut options = LayeredConfigOptions::new(&cwd);
    if let Some(path) = cli.config.as_ref() {
        options = options.with_runtime_path(path);
    }
    let layered = FridayConfig::load_layered_with_options(options)
        .context("failed to load layered config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());

    let session = SessionBuilder::new(layered.config).cwd(&cwd).build();
    run(&session, cli.command).await
}

async fn run(session: &AssistantSession, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Tools { json } => {
            let descriptors = session.descriptors();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&descriptors).context("encode tools")?
                );
            } else {
                for descriptor in descriptors {
                    println!("{}: {}", descriptor.name, descriptor.description);
                }
            }
        }
        Command::Invoke { name, args } => {
            let arguments: Value =
                serde_json::from_str(&args).context("--args must be a JSON value")?;
            println!("{}", session.invoke(&name, arguments).await);
        }
        Command::Serve => {
            let stdin = BufReader::new(tokio::io::stdin());
            serve(session, stdin, tokio::io::stdout())
                .await
                .context("stdio host failed")?;
        }
        Command::Memory => {
            println!(
                "{}",
                serde_json::to_string_pretty(&session.memory().snapshot())
                    .context("encode memory")?
            );
        }
        Command::Prompt => {
            println!("{}\n\n{}", session.instructions(), session.session_instruction());
        }
    }
    Ok(())
}
