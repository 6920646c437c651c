// src/domain/city.rs

use crate::domain::states::abbreviation_for;
use crate::errors::ServerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// City as sent by (and returned to) API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub city: String,
    pub state: String,
}

/// Canonical lookup key: title-cased city, two-letter state.
///
/// Only constructed through [`CityKey::normalize`] (or by reading a row back
/// out of the dataset), so every key in flight has already been validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CityKey {
    city: String,
    state: String,
}

impl CityKey {
    pub fn normalize(raw: &City) -> Result<Self, ServerError> {
        let city = title_case(raw.city.trim());
        if city.is_empty() {
            return Err(ServerError::InvalidInput {
                field: "city",
                value: raw.city.clone(),
            });
        }

        let state = normalize_state(raw.state.trim())?;
        Ok(Self { city, state })
    }

    /// Key for a row that already lives in the dataset.
    pub(crate) fn from_row(city: String, state: String) -> Self {
        Self { city, state }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn not_found(&self) -> ServerError {
        ServerError::NotFound {
            city: self.city.clone(),
            state: self.state.clone(),
        }
    }

    pub fn score_unavailable(&self) -> ServerError {
        ServerError::ScoreUnavailable {
            city: self.city.clone(),
            state: self.state.clone(),
        }
    }
}

impl From<&CityKey> for City {
    fn from(key: &CityKey) -> Self {
        City {
            city: key.city.clone(),
            state: key.state.clone(),
        }
    }
}

impl fmt::Display for CityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.state)
    }
}

fn normalize_state(state: &str) -> Result<String, ServerError> {
    let invalid = || ServerError::InvalidInput {
        field: "state",
        value: state.to_string(),
    };

    // Anything this short is a code attempt; only two ASCII letters qualify.
    if state.chars().count() <= 2 {
        if state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }
        return Ok(state.to_ascii_uppercase());
    }

    abbreviation_for(&title_case(state))
        .map(str::to_string)
        .ok_or_else(invalid)
}

/// Upper-cases the first letter of every word and lower-cases the rest.
/// A "word" starts after any non-alphabetic character, so "winston-salem"
/// becomes "Winston-Salem".
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_alpha = false;

    for c in input.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }

    out
}
