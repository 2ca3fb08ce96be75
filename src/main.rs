//! combo - CLI entry point.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use combo::action::ActionKind;
use combo::config::{ConfigStore, Settings};
use combo::confirm::terminal::TerminalPrompter;
use combo::git::GitCli;
use combo::llm::{OpenAiClient, completion_timeout};
use combo::pipeline;

/// Generate commit messages and branch names from staged changes.
#[derive(Parser, Debug)]
#[command(name = "combo")]
#[command(about = "Generate commit messages and branch names from staged changes")]
#[command(version)]
struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Suggest a commit message for the staged changes and commit on approval
    Commit,
    /// Suggest a branch name for the staged changes and switch to it on approval
    Branch,
    /// Read or edit ~/.combo/config
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Print the combo version
    Version,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print `key=value` for one key
    Get { key: String },
    /// Set a key, creating the file if needed
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "warn,combo=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn execute(command: Command) -> Result<()> {
    match command {
        Command::Commit => generate(ActionKind::Commit).await,
        Command::Branch => generate(ActionKind::Branch).await,
        Command::Config { action } => {
            let store = ConfigStore::default_location().context("Failed to locate config file")?;
            match action {
                ConfigAction::Get { key } => {
                    let value = store.get(&key)?;
                    println!("{}={}", key, value);
                }
                ConfigAction::Set { key, value } => {
                    store.set(&key, &value)?;
                    println!("Set {} in {}", key, store.path().display());
                }
            }
            Ok(())
        }
        Command::Version => {
            println!("combo {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn generate(kind: ActionKind) -> Result<()> {
    let store = ConfigStore::default_location().context("Failed to locate config file")?;
    let settings = Settings::load(&store).context("Failed to load configuration")?;

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let vcs = GitCli::discover(&cwd)?;
    let client = OpenAiClient::new(&settings.api_key, &settings.model, &settings.base_url);
    let mut prompter = TerminalPrompter::new();

    eprintln!("Generating {} with {}...", kind.noun(), client.model());
    let result = pipeline::run(kind, &settings, &vcs, &client, &mut prompter, completion_timeout()).await?;
    if let Some(output) = result.applied.output() {
        print!("{}", output);
    }
    Ok(())
}
