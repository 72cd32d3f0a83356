//! Regressors and model selection.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::artifacts::read_json;
use crate::error::{PricingError, Result};
use crate::features::N_FEATURES;

mod tree;
#[cfg(feature = "torch")]
mod torch;

pub use tree::TreeEnsemble;
#[cfg(feature = "torch")]
pub use torch::TorchRegressor;

/// A fitted model mapping one feature row to a log1p-scaled price.
pub trait Regressor: Send + Sync {
    /// Short human-readable summary for startup logs.
    fn describe(&self) -> String;
    fn n_features(&self) -> usize;
    fn predict(&self, row: &[f64]) -> Result<f64>;
}

/// Which of the two loaded models to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelChoice {
    #[serde(rename = "Random Forest")]
    RandomForest,
    #[serde(rename = "Gradient Boosting")]
    GradientBoosting,
}

impl ModelChoice {
    /// Only the exact gradient boosting label selects it; anything else is the forest.
    pub fn from_label(label: &str) -> Self {
        if label == ModelChoice::GradientBoosting.label() {
            ModelChoice::GradientBoosting
        } else {
            ModelChoice::RandomForest
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ModelChoice::RandomForest => "Random Forest",
            ModelChoice::GradientBoosting => "Gradient Boosting",
        }
    }
}

/// Load a regressor. `.pt` files are TorchScript, everything else is a JSON ensemble.
pub fn load_regressor(path: &Path) -> Result<Box<dyn Regressor>> {
    let model: Box<dyn Regressor> = match path.extension().and_then(|e| e.to_str()) {
        Some("pt") => load_torchscript(path)?,
        _ => {
            let ensemble: TreeEnsemble = read_json(path)?;
            Box::new(ensemble)
        }
    };
    if model.n_features() != N_FEATURES {
        return Err(PricingError::Artifact(format!(
            "{} expects {} features, pipeline produces {}",
            path.display(),
            model.n_features(),
            N_FEATURES
        )));
    }
    Ok(model)
}

#[cfg(feature = "torch")]
fn load_torchscript(path: &Path) -> Result<Box<dyn Regressor>> {
    Ok(Box::new(TorchRegressor::load(path, N_FEATURES)?))
}

#[cfg(not(feature = "torch"))]
fn load_torchscript(path: &Path) -> Result<Box<dyn Regressor>> {
    Err(PricingError::Artifact(format!(
        "{} is a TorchScript model but this build lacks the `torch` feature",
        path.display()
    )))
}
