// src/domain/livability.rs

use crate::errors::ServerError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A pre-fitted linear transform over `[-rent, good_days, -crime_rate]`.
///
/// The service never fits or inspects the transform, it only applies it.
pub trait Rescale: Send + Sync {
    fn rescale(&self, features: [f64; 3]) -> [f64; 3];
}

/// Scaler artifact as persisted on disk: `y[i] = (x[i] - center[i]) / scale[i]`.
///
/// For a min-max scaler `center` is the fitted minimum and `scale` the fitted
/// range, for a standard scaler they are the mean and standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearScaler {
    pub center: [f64; 3],
    pub scale: [f64; 3],
}

impl LinearScaler {
    pub fn new(center: [f64; 3], scale: [f64; 3]) -> Result<Self, ServerError> {
        for (i, s) in scale.iter().enumerate() {
            if !s.is_finite() || *s == 0.0 {
                return Err(ServerError::Scaler(format!(
                    "scale[{i}] must be finite and non-zero, got {s}"
                )));
            }
        }
        if center.iter().any(|c| !c.is_finite()) {
            return Err(ServerError::Scaler("center must be finite".into()));
        }
        Ok(Self { center, scale })
    }

    /// Load the artifact once at startup.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ServerError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            ServerError::Scaler(format!("Failed to read {}: {e}", path.display()))
        })?;
        let raw: LinearScaler = serde_json::from_str(&text).map_err(|e| {
            ServerError::Scaler(format!("Failed to parse {}: {e}", path.display()))
        })?;
        Self::new(raw.center, raw.scale)
    }
}

impl Rescale for LinearScaler {
    fn rescale(&self, features: [f64; 3]) -> [f64; 3] {
        let mut out = [0.0; 3];
        for i in 0..3 {
            out[i] = (features[i] - self.center[i]) / self.scale[i];
        }
        out
    }
}

/// Caller-supplied importance of each signal. Missing fields default to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LivabilityWeights {
    pub walkability: f64,
    pub diversity: f64,
    pub low_rent: f64,
    pub low_pollution: f64,
    pub low_crime: f64,
}

impl Default for LivabilityWeights {
    fn default() -> Self {
        Self {
            walkability: 1.0,
            diversity: 1.0,
            low_rent: 1.0,
            low_pollution: 1.0,
            low_crime: 1.0,
        }
    }
}

impl LivabilityWeights {
    /// Weights in signal-vector order.
    fn as_array(&self) -> [f64; 5] {
        [
            self.walkability,
            self.diversity,
            self.low_rent,
            self.low_pollution,
            self.low_crime,
        ]
    }

    /// Every weight must be a finite, non-negative number and the sum must be
    /// positive.
    pub fn validate(&self) -> Result<f64, ServerError> {
        let names = ["walkability", "diversity", "low_rent", "low_pollution", "low_crime"];
        for (name, w) in names.iter().zip(self.as_array()) {
            if !w.is_finite() || w < 0.0 {
                return Err(ServerError::InvalidWeights(format!(
                    "{name} must be a non-negative number, got {w}"
                )));
            }
        }

        let sum: f64 = self.as_array().iter().sum();
        if sum <= 0.0 {
            return Err(ServerError::InvalidWeights(
                "weights must not all be zero".into(),
            ));
        }
        Ok(sum)
    }
}

/// Raw dataset and walkscore inputs to the livability score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSignals {
    pub rent: f64,
    pub good_days: f64,
    pub crime_rate_per_1000: f64,
    pub diversity_index: f64,
    pub walk_score: u8,
}

/// Signals on a common 0..100-ish scale, ready for aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledSignals {
    pub walk: f64,
    pub diversity_index: f64,
    pub rent: f64,
    pub good_days: f64,
    pub crime: f64,
}

impl ScaledSignals {
    /// Negate the "lower is better" signals, run them through the scaler, and
    /// lift everything onto the walk score's 0..100 scale.
    pub fn from_raw(raw: &RawSignals, scaler: &dyn Rescale) -> Self {
        let [rent, good_days, crime] =
            scaler.rescale([-raw.rent, raw.good_days, -raw.crime_rate_per_1000]);

        Self {
            walk: f64::from(raw.walk_score),
            diversity_index: raw.diversity_index,
            rent: rent * 100.0,
            good_days: good_days * 100.0,
            crime: crime * 100.0,
        }
    }

    /// `[walk, diversity*100, rent, good_days, crime]`
    pub fn vector(&self) -> [f64; 5] {
        [
            self.walk,
            self.diversity_index * 100.0,
            self.rent,
            self.good_days,
            self.crime,
        ]
    }
}

/// Composite livability: plain mean of the signal vector, or the weighted mean
/// when weights are given. Rounded half away from zero.
pub fn aggregate(
    signals: &ScaledSignals,
    weights: Option<&LivabilityWeights>,
) -> Result<i64, ServerError> {
    let vector = signals.vector();

    let score = match weights {
        None => vector.iter().sum::<f64>() / vector.len() as f64,
        Some(w) => {
            let total = w.validate()?;
            let weighted: f64 = vector
                .iter()
                .zip(w.as_array())
                .map(|(v, w)| v * w)
                .sum();
            weighted / total
        }
    };

    if !score.is_finite() {
        return Err(ServerError::Internal(format!(
            "livability score is not finite: {score}"
        )));
    }

    Ok(score.round() as i64)
}
