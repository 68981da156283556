//! `cashconfig` command line tool.
//!
//! Reads and edits cashconfig files by dotted path:
//!
//! ```text
//! cashconfig show config.json
//! cashconfig get config.json server.port
//! cashconfig set config.json server.port 8080
//! cashconfig remove config.json server.tags
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

#[macro_use]
extern crate log;

mod cmd;

#[derive(Parser)]
#[command(
    name = "cashconfig",
    version,
    about = "Inspect and edit cashconfig files"
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: SubCommands,
}

#[derive(Subcommand)]
enum SubCommands {
    /// Create an empty config file if it does not exist
    Init { file: PathBuf },
    /// Print every leaf with its path and kind
    Show { file: PathBuf },
    /// Print the JSON value at a path
    Get { file: PathBuf, path: String },
    /// Store a value at a path (JSON, or a plain string)
    Set {
        file: PathBuf,
        path: String,
        value: String,
        /// Replace an existing item even if its kind changes
        #[arg(long)]
        force: bool,
    },
    /// Remove the item at a path
    Remove { file: PathBuf, path: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(level);
    env_logger::Builder::from_env(env).init();

    match cli.command {
        SubCommands::Init { file } => {
            if cmd::init(&file)? {
                println!("{}", format!("created {}", file.display()).green());
            } else {
                info!("{} already exists", file.display());
            }
        }
        SubCommands::Show { file } => {
            let store = cmd::open(&file)?;
            cmd::show(&store);
        }
        SubCommands::Get { file, path } => {
            let store = cmd::open(&file)?;
            println!("{}", cmd::get(&store, &path)?);
        }
        SubCommands::Set {
            file,
            path,
            value,
            force,
        } => {
            let mut store = cmd::open(&file)?;
            cmd::set(&mut store, &path, &value, force)?;
            store.save()?;
        }
        SubCommands::Remove { file, path } => {
            let mut store = cmd::open(&file)?;
            let removed = cmd::remove(&mut store, &path)?;
            store.save()?;
            println!("removed {} ({})", path.yellow(), removed.kind());
        }
    }
    Ok(())
}
