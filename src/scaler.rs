//! Numeric column normalisation with a pre-fitted scaler.

use serde::Deserialize;

use crate::error::{PricingError, Result};
use crate::features::{FeatureRecord, N_NUMERIC, NUMERIC_COLUMNS};

/// Fitted parameters exported from the training run.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl Scaler {
    /// Reject parameter vectors that were not fitted on the six numeric columns.
    pub fn validate(&self) -> Result<()> {
        let (name, a, b) = match self {
            Scaler::Standard { mean, scale } => ("standard", mean, scale),
            Scaler::MinMax { min, scale } => ("min_max", min, scale),
        };
        if a.len() != N_NUMERIC || b.len() != N_NUMERIC {
            return Err(PricingError::Artifact(format!(
                "{name} scaler fitted on {}/{} columns, expected {} ({})",
                a.len(),
                b.len(),
                N_NUMERIC,
                NUMERIC_COLUMNS.join(", ")
            )));
        }
        if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
            return Err(PricingError::Artifact(format!(
                "{name} scaler has non-finite parameters"
            )));
        }
        Ok(())
    }

    pub fn transform(&self, x: [f64; N_NUMERIC]) -> [f64; N_NUMERIC] {
        let mut out = x;
        match self {
            Scaler::Standard { mean, scale } => {
                for i in 0..N_NUMERIC {
                    // constant columns were fitted with scale 0; treat as 1
                    let s = if scale[i] == 0.0 { 1.0 } else { scale[i] };
                    out[i] = (x[i] - mean[i]) / s;
                }
            }
            Scaler::MinMax { min, scale } => {
                for i in 0..N_NUMERIC {
                    out[i] = x[i] * scale[i] + min[i];
                }
            }
        }
        out
    }
}

/// Normalise the numeric columns of `record` in place.
pub fn scale_record(scaler: &Scaler, record: &mut FeatureRecord) {
    let scaled = scaler.transform(record.numeric());
    record.set_numeric(scaled);
}
