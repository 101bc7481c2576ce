//! mysqlsim CLI
//!
//! Parses SQL migration files and prints the resulting schema as canonical
//! `CREATE TABLE` statements.

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use mysqlsim::{discover_migrations, replay_file, ReplayError};
use mysqlsim_core::render_database;
use mysqlsim_core::schema::Database;

/// Replays SQL migration files and outputs the resulting DB state.
#[derive(Parser)]
#[command(name = "mysqlsim")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Migration directories to replay, in order.
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Dump the schema after every migration file.
    #[arg(long)]
    step: bool,

    /// Replay only the first N migration files of each directory.
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Dump only these tables (repeatable).
    #[arg(short, long)]
    table: Vec<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout carries only the schema dump.
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut db = Database::new();
    for dir in &cli.paths {
        let mut files = discover_migrations(dir)?;
        if let Some(limit) = cli.limit {
            files.truncate(limit);
        }

        for file in &files {
            debug!("===> {}", file.display());
            db = replay_file(&db, file)?.database;

            if cli.step {
                print!("\n{}", render_database(&db, &cli.table).map_err(ReplayError::Render)?);
            }
        }
    }

    print!("\n{}", render_database(&db, &cli.table).map_err(ReplayError::Render)?);
    Ok(())
}
