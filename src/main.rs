//! Binary entrypoint for the termquest terminal.
//!
//! Commands:
//! - `start` - run the interactive terminal on stdin/stdout
//! - `init` - create a starter `config.toml` and `data/rooms.json`
//!
//! See the library crate docs for module-level details: `termquest::`.

use std::io::Write;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use termquest::config::Config;
use termquest::game::world::LocationGraph;
use termquest::game::GameEngine;
use termquest::render::{start_output_queue, TerminalSink};

#[derive(Parser)]
#[command(name = "termquest")]
#[command(about = "A retro text-console adventure terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive terminal
    Start,
    /// Initialize a starter configuration and rooms seed
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Start => {
            let config = match Config::load(&cli.config).await {
                Ok(config) => config,
                Err(e) => {
                    warn!("{}; using defaults (run 'termquest init' to create one)", e);
                    Config::default()
                }
            };
            run_terminal(config).await
        }
        Commands::Init => init_workspace(&cli.config).await,
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

/// Write a default `config.toml` and rooms seed next to it.
async fn init_workspace(config_path: &str) -> Result<()> {
    Config::create_default(config_path).await?;
    println!("Created {}", config_path);

    let rooms_path = "data/rooms.json";
    if !tokio::fs::try_exists(rooms_path).await.unwrap_or(false) {
        tokio::fs::create_dir_all("data").await?;
        tokio::fs::write(rooms_path, LocationGraph::builtin_seed_json()).await?;
        println!("Created {}", rooms_path);
    }
    println!("Run 'termquest start' to begin.");
    Ok(())
}

/// The interactive loop: read a line, dispatch it, and wait for the queue to
/// finish revealing before showing the next prompt.
async fn run_terminal(config: Config) -> Result<()> {
    let graph = termquest::world_graph(&config)?;
    let queue = start_output_queue(config.render.clone(), Box::new(TerminalSink::new()));
    let mut engine =
        GameEngine::new(graph, queue).with_hostname(config.terminal.hostname.clone());

    info!("terminal ready");
    if config.terminal.greeting {
        engine.greet();
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        engine.output().flush().await;
        print!("\n{}", engine.prompt());
        std::io::stdout().flush()?;

        match lines.next_line().await? {
            Some(line) => engine.dispatch(&line)?,
            None => break, // EOF
        }
    }

    engine.output().flush().await;
    engine.output().shutdown().await;
    println!();
    Ok(())
}
