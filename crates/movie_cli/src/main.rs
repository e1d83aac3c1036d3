//! Interactive movie catalog entry point.
//!
//! # Responsibility
//! - Resolve configuration from `.env`, environment and flags.
//! - Bootstrap logging and storage, then hand control to the menu.
//!
//! # Invariants
//! - Only startup failures (config, logging, store) end the process early,
//!   always with a printed reason and a non-zero exit code.

mod args;
mod menu;
mod prompt;

use args::Cli;
use clap::Parser;
use log::{info, warn};
use movie_core::db::open_db;
use movie_core::{
    init_logging, AppConfig, CatalogService, MovieLookup, NoLookup, OmdbClient,
    SqliteMovieRepository,
};
use prompt::Prompter;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    // A missing .env file is normal; the environment may already be set.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => apply_flags(config, &cli),
        Err(err) => {
            eprintln!("movies: {err}");
            return ExitCode::from(2);
        }
    };

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("movies: cannot start logging: {err}");
        return ExitCode::FAILURE;
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!(
                "movies: cannot open database `{}`: {err}",
                config.db_path.display()
            );
            return ExitCode::FAILURE;
        }
    };
    let repo = match SqliteMovieRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("movies: {err}");
            return ExitCode::FAILURE;
        }
    };

    let service = CatalogService::new(repo, build_lookup(&config, cli.offline), config.limits);
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    menu::run(&service, &mut prompter, &config);
    info!("event=app_exit module=cli status=ok");
    ExitCode::SUCCESS
}

fn apply_flags(mut config: AppConfig, cli: &Cli) -> AppConfig {
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(template) = &cli.template {
        config.template_path = template.clone();
    }
    if let Some(output) = &cli.output {
        config.output_path = output.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = log_dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config
}

fn build_lookup(config: &AppConfig, offline: bool) -> Box<dyn MovieLookup> {
    if offline {
        info!("event=lookup_init module=cli status=ok mode=offline");
        return Box::new(NoLookup);
    }

    match OmdbClient::new(
        config.api_key.clone(),
        config.api_url.clone(),
        config.lookup_timeout,
    ) {
        Ok(client) => {
            info!(
                "event=lookup_init module=cli status=ok mode=omdb credential={}",
                client.has_credential()
            );
            Box::new(client)
        }
        Err(err) => {
            warn!("event=lookup_init module=cli status=error mode=offline error={err}");
            Box::new(NoLookup)
        }
    }
}
