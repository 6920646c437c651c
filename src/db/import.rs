use crate::db::connection::Database;
use crate::errors::ServerError;
use rusqlite::params;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// One row of the exported city dataset, headers as written by the export.
#[derive(Debug, Deserialize)]
struct CsvCity {
    #[serde(rename = "index")]
    id: i64,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "Rent")]
    rent: f64,
    #[serde(rename = "Crime Rating")]
    crime_rating: String,
    #[serde(rename = "Crime Rate per 1000")]
    crime_rate_per_1000: f64,
    #[serde(rename = "Air Quality Index")]
    air_quality_index: String,
    #[serde(rename = "Good Days")]
    good_days: f64,
    #[serde(rename = "Population")]
    population: f64,
    #[serde(rename = "Diversity Index")]
    diversity_index: f64,
    lat: f64,
    lon: f64,
    #[serde(rename = "Nearest", default)]
    nearest: String,
}

/// Load a CSV export into the `cities` table, replacing rows with the same id.
/// All rows land in one transaction or none do.
pub fn import_csv(db: &Database, path: impl AsRef<Path>) -> Result<usize, ServerError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| ServerError::Config(format!("Failed to open {}: {e}", path.display())))?;

    let rows = reader
        .deserialize::<CsvCity>()
        .enumerate()
        .map(|(n, row)| {
            row.map_err(|e| {
                ServerError::Config(format!("{} row {}: {e}", path.display(), n + 1))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    db.with_conn(|conn| {
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO cities (
                    id, city, state, rent, crime_rating, crime_rate_per_1000,
                    air_quality_index, good_days, population, diversity_index,
                    latitude, longitude, nearest
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            )?;

            for row in &rows {
                stmt.execute(params![
                    row.id,
                    row.city,
                    row.state,
                    row.rent,
                    row.crime_rating,
                    row.crime_rate_per_1000,
                    row.air_quality_index,
                    row.good_days,
                    row.population.round() as i64,
                    row.diversity_index,
                    row.lat,
                    row.lon,
                    row.nearest,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    })?;

    info!(rows = rows.len(), source = %path.display(), "imported city dataset");
    Ok(rows.len())
}
