use crate::db::connection::Database;
use crate::domain::city::CityKey;
use crate::errors::ServerError;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Every column a handler may ask for. Column names only ever come from here,
/// city and state are always bound parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Rent,
    CrimeRating,
    CrimeRatePer1000,
    AirQualityIndex,
    GoodDays,
    Population,
    DiversityIndex,
    Latitude,
    Longitude,
    Nearest,
}

impl Signal {
    pub const fn column(self) -> &'static str {
        match self {
            Signal::Rent => "rent",
            Signal::CrimeRating => "crime_rating",
            Signal::CrimeRatePer1000 => "crime_rate_per_1000",
            Signal::AirQualityIndex => "air_quality_index",
            Signal::GoodDays => "good_days",
            Signal::Population => "population",
            Signal::DiversityIndex => "diversity_index",
            Signal::Latitude => "latitude",
            Signal::Longitude => "longitude",
            Signal::Nearest => "nearest",
        }
    }
}

/// A single column value, serialized as the bare JSON scalar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SignalValue {
    Integer(i64),
    Real(f64),
    Text(String),
    Null,
}

impl SignalValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SignalValue::Integer(i) => Some(*i as f64),
            SignalValue::Real(r) => Some(*r),
            _ => None,
        }
    }
}

impl From<Value> for SignalValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Integer(i) => SignalValue::Integer(i),
            Value::Real(r) => SignalValue::Real(r),
            Value::Text(t) => SignalValue::Text(t),
            Value::Blob(_) | Value::Null => SignalValue::Null,
        }
    }
}

/// One dataset row.
#[derive(Debug, Clone, PartialEq)]
pub struct CityRecord {
    pub id: i64,
    pub key: CityKey,
    pub rent: f64,
    pub crime_rating: String,
    pub crime_rate_per_1000: f64,
    pub air_quality_index: String,
    pub good_days: f64,
    pub population: i64,
    pub diversity_index: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub nearest: Vec<i64>,
}

const RECORD_SQL: &str = "
    SELECT id, city, state, rent, crime_rating, crime_rate_per_1000,
           air_quality_index, good_days, population, diversity_index,
           latitude, longitude, nearest
    FROM cities
    WHERE city = ?1 AND state = ?2
    LIMIT 2";

/// Read-only view of the city dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    db: Database,
}

impl Dataset {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    #[cfg(test)]
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Fetch the requested columns for one city, in the order requested.
    pub fn fetch(&self, key: &CityKey, signals: &[Signal]) -> Result<Vec<SignalValue>, ServerError> {
        if signals.is_empty() {
            return Ok(Vec::new());
        }

        let columns: Vec<&str> = signals.iter().map(|s| s.column()).collect();
        let sql = format!(
            "SELECT {} FROM cities WHERE city = ?1 AND state = ?2 LIMIT 2",
            columns.join(", ")
        );
        debug!(%key, ?columns, "dataset fetch");

        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(&sql)?;
            let rows = stmt
                .query_map(params![key.city(), key.state()], |row| {
                    (0..signals.len())
                        .map(|i| row.get::<_, Value>(i).map(SignalValue::from))
                        .collect::<Result<Vec<_>, _>>()
                })?
                .collect::<Result<Vec<_>, _>>()?;

            single_row(rows, key)
        })
    }

    /// Fetch the whole row for one city in a single query.
    pub fn fetch_record(&self, key: &CityKey) -> Result<CityRecord, ServerError> {
        debug!(%key, "dataset record fetch");

        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(RECORD_SQL)?;
            let rows = stmt
                .query_map(params![key.city(), key.state()], record_from_row)?
                .collect::<Result<Vec<_>, _>>()?;

            let (record, nearest) = single_row(rows, key)?;
            Ok(CityRecord {
                nearest: parse_nearest(&nearest, key)?,
                ..record
            })
        })
    }

    /// Resolve row ids to cities with one batched lookup. Ids with no row are
    /// absent from the returned map.
    pub fn resolve_ids(&self, ids: &[i64]) -> Result<HashMap<i64, CityKey>, ServerError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        self.db.with_conn(|conn| lookup_ids(conn, ids))
    }
}

fn lookup_ids(conn: &Connection, ids: &[i64]) -> Result<HashMap<i64, CityKey>, ServerError> {
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("SELECT id, city, state FROM cities WHERE id IN ({placeholders})");

    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params_from_iter(ids.iter()), |row| {
        Ok((
            row.get::<_, i64>(0)?,
            CityKey::from_row(row.get(1)?, row.get(2)?),
        ))
    })?;

    let mut found = HashMap::with_capacity(ids.len());
    for row in rows {
        let (id, key) = row?;
        found.insert(id, key);
    }
    Ok(found)
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<(CityRecord, String)> {
    let record = CityRecord {
        id: row.get(0)?,
        key: CityKey::from_row(row.get(1)?, row.get(2)?),
        rent: row.get(3)?,
        crime_rating: row.get(4)?,
        crime_rate_per_1000: row.get(5)?,
        air_quality_index: row.get(6)?,
        good_days: row.get(7)?,
        population: row.get(8)?,
        diversity_index: row.get(9)?,
        latitude: row.get(10)?,
        longitude: row.get(11)?,
        nearest: Vec::new(),
    };
    Ok((record, row.get(12)?))
}

/// Zero rows is the client's problem, more than one is the dataset's.
fn single_row<T>(mut rows: Vec<T>, key: &CityKey) -> Result<T, ServerError> {
    match rows.len() {
        0 => Err(key.not_found()),
        1 => Ok(rows.remove(0)),
        _ => Err(ServerError::DatasetInvariant(format!(
            "more than one row for {key}"
        ))),
    }
}

/// `"12, 45,3"` -> `[12, 45, 3]`
pub fn parse_nearest(raw: &str, key: &CityKey) -> Result<Vec<i64>, ServerError> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse::<i64>().map_err(|_| {
                ServerError::DatasetInvariant(format!("bad neighbor id '{id}' for {key}"))
            })
        })
        .collect()
}
