//! encode -> assemble -> scale -> predict -> decode

use crate::artifacts::Artifacts;
use crate::error::{PricingError, Result};
use crate::features::{EncodedVehicle, FeatureRecord};
use crate::model::ModelChoice;
use crate::scaler::scale_record;

/// Inverse of the log1p applied to prices at training time.
pub fn decode_price(log_price: f64) -> f64 {
    log_price.exp_m1()
}

/// Result of one pass through the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct Estimate {
    pub choice: ModelChoice,
    /// Row as assembled, before scaling.
    pub raw: FeatureRecord,
    /// Row as the model saw it.
    pub scaled: FeatureRecord,
    pub log_price: f64,
    pub price: f64,
}

pub fn predict_price(
    artifacts: &Artifacts,
    vehicle: &EncodedVehicle,
    choice: ModelChoice,
) -> Result<Estimate> {
    let raw = FeatureRecord::assemble(vehicle);
    let mut scaled = raw;
    scale_record(&artifacts.scaler, &mut scaled);

    let log_price = artifacts.select(choice).predict(&scaled.as_row())?;
    let price = decode_price(log_price);
    if !price.is_finite() {
        return Err(PricingError::Inference(format!(
            "{} produced non-finite price from log value {log_price}",
            choice.label()
        )));
    }

    tracing::debug!(model = choice.label(), log_price, price, "prediction");
    Ok(Estimate {
        choice,
        raw,
        scaled,
        log_price,
        price,
    })
}
