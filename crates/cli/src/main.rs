//! course-nav command-line entry point.
//!
//! # Commands
//!
//! - `check <URL>`: show every term of a course with its availability
//! - `lookup <URL>`: show the cached availability of one term URL
//! - `purge`: drop expired cache entries (or the whole cache with `--all`)

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use coursenav_client::{Navigator, ResolutionSource};
use coursenav_core::AppConfig;
use coursenav_core::cache::AVAILABILITY_SLOT;
use tracing_subscriber::EnvFilter;

mod render;

/// Jump between academic terms of a catalog course.
#[derive(Parser)]
#[command(name = "course-nav", version)]
struct Cli {
    /// SQLite cache path (overrides the configured db_path)
    #[arg(long, global = true, env = "COURSE_NAV_DB_PATH")]
    db: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every term of a course and whether a page exists for it
    Check {
        /// URL of a course page
        url: String,
        /// Print the annotated grid as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the cached availability of a term URL without probing
    Lookup {
        /// Term URL
        url: String,
    },
    /// Remove expired cache entries
    Purge {
        /// Delete the whole cache instead of only expired entries
        #[arg(long)]
        all: bool,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = AppConfig::load()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    let navigator = Navigator::open(config).await?;

    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Commands::Check { url, json } => {
            let terms = navigator
                .check(&url, |r| {
                    if !json {
                        let source = match r.source {
                            ResolutionSource::Cache => "cached",
                            ResolutionSource::Probe => "probed",
                        };
                        eprintln!("  {} {} ({source})", render::mark(r.exists), r.id);
                    }
                })
                .await?;

            if json {
                writeln!(stdout, "{}", serde_json::to_string_pretty(&terms)?)?;
            } else {
                write!(stdout, "{}", render::grid(&terms))?;
            }
        }
        Commands::Lookup { url } => {
            let line = match navigator.lookup(&url) {
                Some(entry) => render::entry(&url, &entry),
                None => format!("{url}: not cached\n"),
            };
            write!(stdout, "{line}")?;
        }
        Commands::Purge { all } => {
            if all {
                let existed = navigator.db().delete_slot(AVAILABILITY_SLOT).await?;
                writeln!(stdout, "{}", if existed { "cache deleted" } else { "cache was already empty" })?;
            } else {
                let removed = navigator.purge_expired().await;
                writeln!(stdout, "removed {removed} expired entries ({} remaining)", navigator.cache().len())?;
            }
        }
    }

    Ok(())
}
