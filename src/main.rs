use crate::config::Config;
use crate::db::import::import_csv;
use crate::db::{init_db, Database, Dataset};
use crate::domain::livability::LinearScaler;
use crate::errors::ServerError;
use crate::router::respond;
use crate::scraper::WalkScoreScraper;
use crate::state::AppState;
use astra::Server;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

mod config;
mod db;
mod domain;
mod errors;
mod handlers;
mod logger;
mod responses;
mod router;
mod scraper;
mod state;

#[cfg(test)]
mod tests;

fn main() {
    let config = Config::parse();
    logger::init_logger(config.verbose);

    let state = match build_state(&config) {
        Ok(state) => state,
        Err(e) => {
            error!("❌ Startup failed: {e}");
            std::process::exit(1);
        }
    };

    info!(addr = %config.bind, workers = config.workers, "starting server");

    let server = Server::bind(&config.bind).max_workers(config.workers);

    let result = server.serve(move |req, _info| respond(req, &state));

    if let Err(e) = result {
        error!("Server ended with error: {e}");
        std::process::exit(1);
    }

    info!("Server shut down cleanly.");
}

fn build_state(config: &Config) -> Result<AppState, ServerError> {
    config.validate()?;

    // 1️⃣ Dataset: schema, then an optional CSV load
    let db = Database::new(config.database.clone());
    init_db(&db, &config.schema)?;
    if let Some(csv) = &config.import_csv {
        import_csv(&db, csv)?;
    }

    // 2️⃣ Scaler artifact, loaded once for the life of the process
    let scaler = LinearScaler::load(&config.scaler)?;
    info!(path = %config.scaler.display(), "livability scaler loaded");

    // 3️⃣ Walkscore scraper
    let scores = WalkScoreScraper::new(&config.walkscore_url, config.walkscore_timeout())
        .map_err(|e| ServerError::Config(e.to_string()))?;

    Ok(AppState::new(
        Dataset::new(db),
        Arc::new(scaler),
        Arc::new(scores),
    ))
}
