//! The three fitted artifacts, loaded once at startup and shared read-only.

use std::{fs, path::Path};

use serde::de::DeserializeOwned;

use crate::error::{PricingError, Result};
use crate::features::N_FEATURES;
use crate::model::{load_regressor, ModelChoice, Regressor};
use crate::scaler::Scaler;

pub const RF_MODEL_FILE: &str = "rf_model.json";
pub const GB_MODEL_FILE: &str = "gb_model.json";
pub const SCALER_FILE: &str = "scaler.json";

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let txt = fs::read_to_string(path).map_err(|source| PricingError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&txt).map_err(|source| PricingError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Both regressors and the scaler.
pub struct Artifacts {
    pub random_forest: Box<dyn Regressor>,
    pub gradient_boosting: Box<dyn Regressor>,
    pub scaler: Scaler,
}

impl Artifacts {
    /// Load `rf_model.json`, `gb_model.json` and `scaler.json` from `dir`.
    ///
    /// A `.pt` file with the same stem takes precedence over the JSON model
    /// when it exists.
    pub fn load(dir: &Path) -> Result<Self> {
        let random_forest = load_regressor(&pick_model_file(dir, RF_MODEL_FILE))?;
        let gradient_boosting = load_regressor(&pick_model_file(dir, GB_MODEL_FILE))?;

        let scaler: Scaler = read_json(&dir.join(SCALER_FILE))?;
        scaler.validate()?;

        tracing::info!(
            rf = %random_forest.describe(),
            gb = %gradient_boosting.describe(),
            dir = %dir.display(),
            "loaded artifacts"
        );

        Ok(Self {
            random_forest,
            gradient_boosting,
            scaler,
        })
    }

    pub fn from_parts(
        random_forest: Box<dyn Regressor>,
        gradient_boosting: Box<dyn Regressor>,
        scaler: Scaler,
    ) -> Self {
        Self {
            random_forest,
            gradient_boosting,
            scaler,
        }
    }

    pub fn select(&self, choice: ModelChoice) -> &dyn Regressor {
        match choice {
            ModelChoice::RandomForest => self.random_forest.as_ref(),
            ModelChoice::GradientBoosting => self.gradient_boosting.as_ref(),
        }
    }

    /// Run both models once on an all-zero row so a broken artifact fails
    /// startup instead of the first request.
    pub fn warmup(&self) -> Result<()> {
        let zeros = [0.0; N_FEATURES];
        for choice in [ModelChoice::RandomForest, ModelChoice::GradientBoosting] {
            let y = self.select(choice).predict(&zeros)?;
            if !y.is_finite() {
                return Err(PricingError::Artifact(format!(
                    "{} warmup produced {y}",
                    choice.label()
                )));
            }
        }
        Ok(())
    }
}

fn pick_model_file(dir: &Path, json_name: &str) -> std::path::PathBuf {
    let json = dir.join(json_name);
    let pt = json.with_extension("pt");
    if cfg!(feature = "torch") && pt.exists() {
        pt
    } else {
        json
    }
}
