// src/domain/recommendations.rs

use crate::db::Dataset;
use crate::domain::city::City;
use crate::errors::ServerError;
use serde::Serialize;

/// Nearby cities in neighbor-list order. Ids with no dataset row are reported
/// in `missing` rather than silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub recommendations: Vec<City>,
    pub missing: Vec<i64>,
}

impl Recommendations {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

pub fn resolve(dataset: &Dataset, neighbor_ids: &[i64]) -> Result<Recommendations, ServerError> {
    let found = dataset.resolve_ids(neighbor_ids)?;

    let mut recommendations = Vec::with_capacity(neighbor_ids.len());
    let mut missing = Vec::new();
    for id in neighbor_ids {
        match found.get(id) {
            Some(key) => recommendations.push(City::from(key)),
            None => missing.push(*id),
        }
    }

    Ok(Recommendations {
        recommendations,
        missing,
    })
}
