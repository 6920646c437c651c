// handlers.rs
use crate::db::cities::parse_nearest;
use crate::db::{Signal, SignalValue};
use crate::domain::city::{City, CityKey};
use crate::domain::livability::LivabilityWeights;
use crate::domain::{recommendations, report};
use crate::errors::{ResultResp, ServerError};
use crate::responses::json_response;
use crate::state::AppState;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

/// Body of `/api/livability`: a city plus optional per-signal weights.
#[derive(Debug, Deserialize)]
pub struct LivabilityRequest {
    #[serde(flatten)]
    pub city: City,
    #[serde(default)]
    pub weights: Option<LivabilityWeights>,
}

pub fn get_data(city: City, state: &AppState) -> ResultResp {
    let key = CityKey::normalize(&city)?;
    let report = report::build_report(state, &key)?;
    json_response(200, &report)
}

pub fn coordinates(city: City, state: &AppState) -> ResultResp {
    let key = CityKey::normalize(&city)?;
    let [latitude, longitude] = fetch_n(state, &key, [Signal::Latitude, Signal::Longitude])?;
    json_response(200, &json!({ "latitude": latitude, "longitude": longitude }))
}

pub fn crime(city: City, state: &AppState) -> ResultResp {
    let key = CityKey::normalize(&city)?;
    let [crime] = fetch_n(state, &key, [Signal::CrimeRating])?;
    json_response(200, &json!({ "crime": crime }))
}

pub fn rental_price(city: City, state: &AppState) -> ResultResp {
    let key = CityKey::normalize(&city)?;
    let [rent] = fetch_n(state, &key, [Signal::Rent])?;
    json_response(200, &json!({ "rental_price": rent }))
}

pub fn pollution(city: City, state: &AppState) -> ResultResp {
    let key = CityKey::normalize(&city)?;
    let [aqi] = fetch_n(state, &key, [Signal::AirQualityIndex])?;
    json_response(200, &json!({ "air_quality_index": aqi }))
}

pub fn population(city: City, state: &AppState) -> ResultResp {
    let key = CityKey::normalize(&city)?;
    let [population] = fetch_n(state, &key, [Signal::Population])?;
    json_response(200, &json!({ "population": population }))
}

pub fn diversity(city: City, state: &AppState) -> ResultResp {
    let key = CityKey::normalize(&city)?;
    let [diversity] = fetch_n(state, &key, [Signal::DiversityIndex])?;
    json_response(200, &json!({ "diversity_index": diversity }))
}

pub fn walkability(city: City, state: &AppState) -> ResultResp {
    let key = CityKey::normalize(&city)?;
    let scores = state.scores.fetch_walkscore(&key)?;
    json_response(200, &json!({ "walkability": scores.walk }))
}

pub fn livability(req: LivabilityRequest, state: &AppState) -> ResultResp {
    let key = CityKey::normalize(&req.city)?;
    let livability = report::livability(state, &key, req.weights.as_ref())?;
    json_response(200, &json!({ "livability": livability }))
}

pub fn nearest(city: City, state: &AppState) -> ResultResp {
    let key = CityKey::normalize(&city)?;
    let [nearest] = fetch_n(state, &key, [Signal::Nearest])?;

    let ids = match nearest {
        SignalValue::Text(raw) => parse_nearest(&raw, &key)?,
        SignalValue::Integer(id) => vec![id],
        SignalValue::Null => Vec::new(),
        SignalValue::Real(_) => {
            return Err(ServerError::DatasetInvariant(format!(
                "nearest for {key} is not an id list"
            )))
        }
    };

    let recs = recommendations::resolve(&state.dataset, &ids)?;
    if !recs.is_complete() {
        warn!(%key, missing = ?recs.missing, "neighbor ids without a dataset row");
    }
    json_response(200, &recs)
}

fn fetch_n<const N: usize>(
    state: &AppState,
    key: &CityKey,
    signals: [Signal; N],
) -> Result<[SignalValue; N], ServerError> {
    let values = state.dataset.fetch(key, &signals)?;
    <[SignalValue; N]>::try_from(values).map_err(|v| {
        ServerError::Internal(format!("expected {N} columns, got {}", v.len()))
    })
}
