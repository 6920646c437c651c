use crate::db::Dataset;
use crate::domain::livability::Rescale;
use crate::scraper::ScoreProvider;
use std::sync::Arc;

/// Everything a request needs, built once at startup and shared read-only
/// across worker threads.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Dataset,
    pub scaler: Arc<dyn Rescale>,
    pub scores: Arc<dyn ScoreProvider>,
}

impl AppState {
    pub fn new(dataset: Dataset, scaler: Arc<dyn Rescale>, scores: Arc<dyn ScoreProvider>) -> Self {
        Self {
            dataset,
            scaler,
            scores,
        }
    }
}
