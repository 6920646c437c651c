use crate::db::connection::{init_db, Database};
use crate::db::Dataset;
use crate::domain::city::CityKey;
use crate::domain::livability::LinearScaler;
use crate::errors::ServerError;
use crate::scraper::{ScoreProvider, WalkScoreTriple};
use crate::state::AppState;
use rusqlite::params;
use std::sync::Arc;
use tempfile::TempDir;

pub const SCHEMA_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql");

/// A seeded dataset in its own temp directory. Keep the fixture alive for as
/// long as the dataset is used.
pub struct TestDb {
    _dir: TempDir,
    pub dataset: Dataset,
}

pub struct TestState {
    _dir: TempDir,
    pub state: AppState,
}

/// Walk score provider that never touches the network.
pub struct StubScores {
    triple: Option<WalkScoreTriple>,
}

impl StubScores {
    pub fn fixed(walk: u8) -> Self {
        Self {
            triple: Some(WalkScoreTriple {
                walk,
                bus: Some(50),
                bike: Some(60),
            }),
        }
    }

    pub fn unavailable() -> Self {
        Self { triple: None }
    }
}

impl ScoreProvider for StubScores {
    fn fetch_walkscore(&self, key: &CityKey) -> Result<WalkScoreTriple, ServerError> {
        self.triple.ok_or_else(|| key.score_unavailable())
    }
}

// id, city, state, rent, crime rating, crime/1000, AQI, good days,
// population, diversity, lat, lon, nearest
type Row = (
    i64,
    &'static str,
    &'static str,
    f64,
    &'static str,
    f64,
    &'static str,
    f64,
    i64,
    f64,
    f64,
    f64,
    &'static str,
);

const ROWS: &[Row] = &[
    (1, "New York", "NY", 3500.0, "High", 60.0, "Moderate", 220.0, 8336817, 0.8, 40.7128, -74.006, "3,7,9"),
    (3, "Austin", "TX", 1800.0, "Medium", 40.0, "Good", 250.0, 961855, 0.6, 30.2672, -97.7431, "1,9"),
    (7, "Portland", "OR", 1700.0, "Medium", 45.0, "Good", 240.0, 652503, 0.4, 45.5152, -122.6784, "9,42"),
    (9, "Boulder", "CO", 2000.0, "Low", 50.0, "Good", 200.0, 105485, 0.5, 40.015, -105.2705, "3,7"),
];

/// Fresh database with the production schema and four cities.
pub fn seeded_dataset() -> TestDb {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir failed: {e}"));
    let db = Database::new(dir.path().join("cities.sqlite3").to_string_lossy());

    init_db(&db, SCHEMA_PATH).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    db.with_conn(|conn| {
        for r in ROWS {
            conn.execute(
                "INSERT INTO cities (
                    id, city, state, rent, crime_rating, crime_rate_per_1000,
                    air_quality_index, good_days, population, diversity_index,
                    latitude, longitude, nearest
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![r.0, r.1, r.2, r.3, r.4, r.5, r.6, r.7, r.8, r.9, r.10, r.11, r.12],
            )?;
        }
        Ok(())
    })
    .unwrap_or_else(|e| panic!("seeding failed: {e}"));

    TestDb {
        _dir: dir,
        dataset: Dataset::new(db),
    }
}

/// Seeded dataset, a fixed scaler and a stub walk score of 88.
///
/// The scaler maps rent 2000 -> 0.4, good days 200 -> 0.5, crime 50 -> 0.5.
pub fn seeded_state() -> TestState {
    let TestDb { _dir, dataset } = seeded_dataset();
    let scaler = LinearScaler::new([-3000.0, 100.0, -100.0], [2500.0, 200.0, 100.0])
        .unwrap_or_else(|e| panic!("scaler: {e}"));

    TestState {
        _dir,
        state: AppState::new(dataset, Arc::new(scaler), Arc::new(StubScores::fixed(88))),
    }
}
