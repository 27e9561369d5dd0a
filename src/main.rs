//! MasterList CLI - categories of items with JSON backups.

use chrono::{Local, Utc};
use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use masterlist::{AutoImport, Config, ListError, Outcome, Session, bootstrap, report};
use std::fs;
use std::path::PathBuf;

mod cli;

use cli::{Cli, Command};

fn setup_logging() -> Result<()> {
    let log_dir = Config::log_dir();

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("masterlist.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn get_config(cli: &Cli) -> Config {
    let root = cli.dir.clone().unwrap_or_else(Config::default_root);
    Config::new(root).with_overwrite(cli.overwrite)
}

fn print_warning(warning: &ListError) {
    eprintln!("{} {}", "⚠".yellow(), warning.to_string().yellow());
}

fn print_outcome(outcome: &Outcome) {
    let mark = match outcome.count {
        Some(0) => "·".dimmed(),
        _ => "✓".green(),
    };
    println!("{} {}", mark, outcome.message);
    if let Some(warning) = &outcome.warning {
        print_warning(warning);
    }
}

fn start_session(config: &Config) -> Result<Session> {
    let rt = tokio::runtime::Runtime::new().context("Failed to create runtime")?;
    let startup = rt.block_on(bootstrap::start(config));

    if let Some(warning) = startup.session.startup_warning() {
        print_warning(warning);
    }
    if let AutoImport::Imported(outcome) = &startup.auto_import {
        println!(
            "{} Auto-imported {} ({} categories).",
            "→".blue(),
            config.auto_import_path().display(),
            outcome.count.unwrap_or(0)
        );
    }
    if let Some(warning) = &startup.loaded.warning {
        print_warning(warning);
    }

    Ok(startup.session)
}

fn run(cli: Cli) -> Result<()> {
    let config = get_config(&cli);
    let mut session = start_session(&config)?;

    match cli.command {
        Command::AddCategory { name } => {
            print_outcome(&session.add_category(&name)?);
        }

        Command::DeleteCategory { name } => {
            print_outcome(&session.delete_category(&name)?);
        }

        Command::AddItem { category, item } => {
            print_outcome(&session.add_item(&category, &item)?);
        }

        Command::RemoveItem { category, item } => {
            print_outcome(&session.remove_item(&category, &item)?);
        }

        Command::EditItem { category, old, new } => {
            print_outcome(&session.edit_item(&category, &old, &new)?);
        }

        Command::ClearItems { category } => {
            print_outcome(&session.clear_items(&category)?);
        }

        Command::Categories => {
            let names = session.store().names();
            if names.is_empty() {
                println!("{}", "No categories yet.".dimmed());
            } else {
                for name in names {
                    println!("{}", name.cyan());
                }
            }
        }

        Command::Show { category } => match category {
            Some(name) => {
                let cat = session
                    .store()
                    .get(&name)
                    .ok_or_else(|| ListError::CategoryNotFound(name.trim().to_string()))?;
                println!("{}", format!("[{}]", cat.name).bold());
                print!("{}", report::render_items(cat));
                if cat.items.is_empty() {
                    println!();
                }
            }
            None => {
                if session.store().is_empty() {
                    println!("{}", "No categories yet.".dimmed());
                } else {
                    print!("{}", report::render_all(session.store().categories()));
                }
            }
        },

        Command::Import { file } => {
            let raw = fs::read(&file).with_context(|| format!("Failed to read {}", file.display()))?;
            let outcome = session.import_document(&raw)?;
            let name = file.file_name().map(PathBuf::from).unwrap_or_else(|| file.clone());
            println!(
                "{} Imported {} categories from {}. Now showing {} categories.",
                "✓".green(),
                outcome.count.unwrap_or(0),
                name.display(),
                session.store().len()
            );
            if let Some(warning) = &outcome.warning {
                print_warning(warning);
            }
        }

        Command::Export { out } => {
            let doc = session.prepare_export(Local::now());
            fs::create_dir_all(&out).with_context(|| format!("Failed to create {}", out.display()))?;
            let path = out.join(&doc.filename);
            fs::write(&path, &doc.contents).with_context(|| format!("Failed to write {}", path.display()))?;

            println!("{} {}", "✓".green(), doc.message());
            if let Some(warning) = doc.warning.as_ref() {
                print_warning(warning);
            }
            if let Some(warning) = session.finish_export(Utc::now()) {
                print_warning(&warning);
            }
        }

        Command::Status => {
            let storage = if session.is_durable() {
                config.db_path().display().to_string().green()
            } else {
                "memory only (changes will not be saved)".yellow()
            };
            println!("{}: {}", "Storage".bold(), storage);
            println!("{}: {}", "Categories".bold(), session.store().len());

            let status = session.export_status();
            let line = if status.recommends_export() {
                status.to_string().yellow()
            } else {
                status.to_string().normal()
            };
            println!("{}: {}", "Export".bold(), line);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
