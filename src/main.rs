mod config;
mod db;
mod gallery;
mod logging;
mod models;
mod report;
mod run;
mod store;
mod ui;

use anyhow::Result;
use tracing::info;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::load()?;
    logging::init_logger(&config.log_path())?;

    let db_path = config.db_path();
    let db = db::Database::open(&db_path)?;
    info!(db = %db_path.display(), version = env!("CARGO_PKG_VERSION"), "Starting");

    match args.len() {
        1 => run::as_tui(&db, &config),
        _ => run::as_cli(&args, &db, &config),
    }
}
