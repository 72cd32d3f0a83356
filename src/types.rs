use serde::{de, Deserialize, Deserializer, Serialize};

use crate::category::{BodyType, Category, FuelType, OwnerType, TransmissionType};
use crate::features::EncodedVehicle;
use crate::model::ModelChoice;

// ---------- Field helpers ----------

#[derive(Deserialize)]
#[serde(untagged)]
enum WholeNumber {
    Int(i64),
    Float(f64),
}

/// Integers may arrive as whole-valued floats (`2015.0`); fractions are rejected.
fn whole_i32<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    let n = match WholeNumber::deserialize(d)? {
        WholeNumber::Int(i) => i,
        WholeNumber::Float(f) if f.fract() == 0.0 && f.abs() <= i64::MAX as f64 => f as i64,
        WholeNumber::Float(f) => {
            return Err(de::Error::custom(format!("expected an integer, got {f}")))
        }
    };
    i32::try_from(n).map_err(|_| de::Error::custom(format!("integer {n} out of range")))
}

/// Any label other than the boosting one selects the forest, on every path.
fn lenient_model<'de, D: Deserializer<'de>>(d: D) -> Result<ModelChoice, D::Error> {
    let label = String::deserialize(d)?;
    Ok(ModelChoice::from_label(&label))
}

// ---------- JSON service ----------

/// Body of `POST /predict`. Categoricals are free strings here.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictRequest {
    #[serde(deserialize_with = "whole_i32")]
    pub registered_year: i32,
    pub engine_capacity: f64,
    pub kms_driven: f64,
    pub owner_type: String,
    pub max_power: f64,
    #[serde(deserialize_with = "whole_i32")]
    pub seats: i32,
    pub mileage: f64,
    pub transmission_type: String,
    pub fuel_type: String,
    pub body_type: String,
    pub brand_encoded: f64,
    pub model_freq: f64,
    pub model_choice: String,
}

impl PredictRequest {
    /// Unknown labels resolve to each field's fallback code, never an error.
    pub fn encode(&self) -> EncodedVehicle {
        EncodedVehicle {
            registered_year: self.registered_year,
            engine_capacity: self.engine_capacity,
            kms_driven: self.kms_driven,
            owner_type: OwnerType::code_or_default(&self.owner_type),
            max_power: self.max_power,
            seats: self.seats,
            mileage: self.mileage,
            transmission_type: TransmissionType::code_or_default(&self.transmission_type),
            fuel_type: FuelType::code_or_default(&self.fuel_type),
            body_type: BodyType::code_or_default(&self.body_type),
            brand_encoded: self.brand_encoded,
            model_freq: self.model_freq,
        }
    }

    pub fn choice(&self) -> ModelChoice {
        ModelChoice::from_label(&self.model_choice)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    /// The caller's `model_choice`, echoed verbatim.
    pub model: String,
    pub predicted_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

// ---------- HTML form ----------

/// Fields posted by the form on `/`. Every categorical is a closed choice.
#[derive(Debug, Clone, Deserialize)]
pub struct FormInput {
    pub registered_year: i32,
    pub engine_capacity: f64,
    pub kms_driven: f64,
    pub owner_type: OwnerType,
    pub max_power: f64,
    pub seats: i32,
    pub mileage: f64,
    pub transmission_type: TransmissionType,
    pub fuel_type: FuelType,
    pub body_type: BodyType,
    pub brand_encoded: f64,
    pub model_freq: f64,
    #[serde(deserialize_with = "lenient_model")]
    pub model_choice: ModelChoice,
}

impl FormInput {
    pub fn encode(&self) -> EncodedVehicle {
        EncodedVehicle {
            registered_year: self.registered_year,
            engine_capacity: self.engine_capacity,
            kms_driven: self.kms_driven,
            owner_type: self.owner_type.code(),
            max_power: self.max_power,
            seats: self.seats,
            mileage: self.mileage,
            transmission_type: self.transmission_type.code(),
            fuel_type: self.fuel_type.code(),
            body_type: self.body_type.code(),
            brand_encoded: self.brand_encoded,
            model_freq: self.model_freq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body() -> serde_json::Value {
        json!({
            "registered_year": 2015, "engine_capacity": 1200.0, "kms_driven": 30000.0,
            "owner_type": "First Owner", "max_power": 85.0, "seats": 5, "mileage": 18.0,
            "transmission_type": "Manual", "fuel_type": "Diesel", "body_type": "Hatchback",
            "brand_encoded": 500000.0, "model_freq": 0.01, "model_choice": "Random Forest"
        })
    }

    #[test]
    fn whole_floats_accepted_for_integer_fields() {
        let mut b = body();
        b["registered_year"] = json!(2015.0);
        b["seats"] = json!(7.0);
        let req: PredictRequest = serde_json::from_value(b).unwrap();
        assert_eq!((req.registered_year, req.seats), (2015, 7));
    }

    #[test]
    fn fractional_or_huge_integers_rejected() {
        let mut b = body();
        b["seats"] = json!(5.5);
        assert!(serde_json::from_value::<PredictRequest>(b).is_err());

        let mut b = body();
        b["registered_year"] = json!(1e12);
        assert!(serde_json::from_value::<PredictRequest>(b).is_err());
    }
}
