mod cli;
mod config;
mod db;
mod error;
mod insights;
mod models;
mod prayer_times;
mod quran;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::migrations::run_migrations;
use db::repository::MetaRepo;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Loading config")?;

    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    run_migrations(&conn)?;

    match cli.command {
        Some(Commands::Setup { reset }) => {
            handlers::handle_setup(&conn, &mut config, reset)?;
        }

        Some(cmd) => {
            ensure_setup(&conn, &mut config)?;
            match cmd {
                Commands::Locate { save } => {
                    handlers::handle_locate(&mut config, save)?;
                }
                Commands::Times { month, refresh } => {
                    handlers::handle_times(&conn, &config, month, refresh)?;
                }
                Commands::Mark {
                    prayer,
                    late,
                    skipped,
                    clear,
                    date,
                } => {
                    let status = handlers::status_from_flags(late, skipped, clear);
                    handlers::handle_mark(&conn, &prayer, status, date.as_deref())?;
                }
                Commands::Fast { status, note, date } => {
                    handlers::handle_fast(&conn, &status, note.as_deref(), date.as_deref())?;
                }
                Commands::Quran { action } => {
                    handlers::handle_quran(&conn, &config, &action)?;
                }
                Commands::Charity {
                    amount,
                    channel,
                    note,
                } => {
                    handlers::handle_charity(&conn, &config, amount, &channel, note.as_deref())?;
                }
                Commands::Stats { week, heatmap } => {
                    handlers::handle_stats(&conn, &config, week, heatmap)?;
                }
                Commands::Setup { .. } => unreachable!(),
            }
        }

        // No subcommand → dashboard
        None => {
            ensure_setup(&conn, &mut config)?;
            tui::app::run(conn, config)?;
        }
    }

    Ok(())
}

/// Run the setup prompts once if they have never completed.
fn ensure_setup(conn: &Connection, config: &mut AppConfig) -> Result<()> {
    if MetaRepo::get(conn, "setup_done")?.as_deref() != Some("1") {
        eprintln!("No configuration found. Running setup...");
        eprintln!();
        handlers::handle_setup(conn, config, false)?;
    }
    Ok(())
}
