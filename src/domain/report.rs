// src/domain/report.rs

use crate::db::{CityRecord, Signal, SignalValue};
use crate::domain::city::{City, CityKey};
use crate::domain::livability::{aggregate, LivabilityWeights, RawSignals, ScaledSignals};
use crate::domain::recommendations::{self, Recommendations};
use crate::errors::ServerError;
use crate::state::AppState;
use serde::Serialize;
use std::thread::{self, ScopedJoinHandle};
use tracing::debug;

/// Everything the service knows about one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityReport {
    pub city: City,
    pub latitude: f64,
    pub longitude: f64,
    pub rental_price: f64,
    pub crime: String,
    pub air_quality_index: String,
    pub population: i64,
    pub diversity_index: f64,
    pub walkability: u8,
    pub livability: i64,
    pub recommendations: Vec<City>,
    pub missing_recommendations: Vec<i64>,
}

/// Livability for a single city: one dataset read, one walkscore fetch.
pub fn livability(
    state: &AppState,
    key: &CityKey,
    weights: Option<&LivabilityWeights>,
) -> Result<i64, ServerError> {
    // Reject bad weights before spending a network round trip.
    if let Some(w) = weights {
        w.validate()?;
    }

    let values = state.dataset.fetch(
        key,
        &[
            Signal::Rent,
            Signal::GoodDays,
            Signal::CrimeRatePer1000,
            Signal::DiversityIndex,
        ],
    )?;
    let walk = state.scores.fetch_walkscore(key)?.walk;

    let raw = RawSignals {
        rent: number(&values, 0, Signal::Rent, key)?,
        good_days: number(&values, 1, Signal::GoodDays, key)?,
        crime_rate_per_1000: number(&values, 2, Signal::CrimeRatePer1000, key)?,
        diversity_index: number(&values, 3, Signal::DiversityIndex, key)?,
        walk_score: walk,
    };
    score(state, &raw, weights)
}

fn livability_for_record(state: &AppState, record: &CityRecord) -> Result<i64, ServerError> {
    let walk = state.scores.fetch_walkscore(&record.key)?.walk;
    let raw = RawSignals {
        rent: record.rent,
        good_days: record.good_days,
        crime_rate_per_1000: record.crime_rate_per_1000,
        diversity_index: record.diversity_index,
        walk_score: walk,
    };
    score(state, &raw, None)
}

fn score(
    state: &AppState,
    raw: &RawSignals,
    weights: Option<&LivabilityWeights>,
) -> Result<i64, ServerError> {
    let scaled = ScaledSignals::from_raw(raw, state.scaler.as_ref());
    debug!(?raw, ?scaled, "livability signals");
    aggregate(&scaled, weights)
}

/// The full-detail report. One dataset read up front, then the walkscore
/// driven livability, the standalone walkability fetch and the
/// recommendation lookup run side by side. Any failure fails the report.
pub fn build_report(state: &AppState, key: &CityKey) -> Result<CityReport, ServerError> {
    let record = state.dataset.fetch_record(key)?;

    let (livability, walkability, recommendations) = thread::scope(|s| {
        let livability = s.spawn(|| livability_for_record(state, &record));
        let walkability = s.spawn(|| state.scores.fetch_walkscore(key));
        let recommendations =
            s.spawn(|| recommendations::resolve(&state.dataset, &record.nearest));

        (
            join(livability, "livability"),
            join(walkability, "walkability"),
            join(recommendations, "recommendations"),
        )
    });

    let livability = livability?;
    let walkability = walkability?;
    let Recommendations {
        recommendations,
        missing,
    } = recommendations?;

    Ok(CityReport {
        city: City::from(key),
        latitude: record.latitude,
        longitude: record.longitude,
        rental_price: record.rent,
        crime: record.crime_rating,
        air_quality_index: record.air_quality_index,
        population: record.population,
        diversity_index: record.diversity_index,
        walkability: walkability.walk,
        livability,
        recommendations,
        missing_recommendations: missing,
    })
}

fn join<T>(
    handle: ScopedJoinHandle<'_, Result<T, ServerError>>,
    task: &str,
) -> Result<T, ServerError> {
    handle
        .join()
        .map_err(|_| ServerError::Internal(format!("{task} task panicked")))?
}

/// Numeric value at `i`, or an invariant error naming the column.
pub fn number(
    values: &[SignalValue],
    i: usize,
    signal: Signal,
    key: &CityKey,
) -> Result<f64, ServerError> {
    values.get(i).and_then(SignalValue::as_f64).ok_or_else(|| {
        ServerError::DatasetInvariant(format!(
            "{} for {key} is not a number",
            signal.column()
        ))
    })
}
