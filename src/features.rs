//! Fixed-order feature rows.
//!
//! Column order matches the frame the scaler and both models were fitted on.
//! Reordering anything here silently corrupts every prediction.

use serde::Serialize;

/// Model input columns, in training order.
pub const COLUMNS: [&str; 12] = [
    "registered_year",
    "engine_capacity",
    "kms_driven",
    "owner_type",
    "max_power",
    "seats",
    "mileage",
    "transmission_type_encoded",
    "fuel_type_encoded",
    "body_type_encoded",
    "brand_encoded",
    "model_freq",
];

/// Columns passed through the scaler, in scaler order.
pub const NUMERIC_COLUMNS: [&str; 6] = [
    "registered_year",
    "engine_capacity",
    "kms_driven",
    "max_power",
    "seats",
    "mileage",
];

/// Positions of [`NUMERIC_COLUMNS`] inside [`COLUMNS`].
pub const NUMERIC_INDICES: [usize; 6] = [0, 1, 2, 4, 5, 6];

pub const N_FEATURES: usize = COLUMNS.len();
pub const N_NUMERIC: usize = NUMERIC_COLUMNS.len();

/// One vehicle with its categoricals already encoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodedVehicle {
    pub registered_year: i32,
    pub engine_capacity: f64,
    pub kms_driven: f64,
    pub owner_type: u8,
    pub max_power: f64,
    pub seats: i32,
    pub mileage: f64,
    pub transmission_type: u8,
    pub fuel_type: u8,
    pub body_type: u8,
    pub brand_encoded: f64,
    pub model_freq: f64,
}

/// A single model input row. Built per request, scaled once, consumed once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub registered_year: f64,
    pub engine_capacity: f64,
    pub kms_driven: f64,
    pub owner_type: f64,
    pub max_power: f64,
    pub seats: f64,
    pub mileage: f64,
    pub transmission_type_encoded: f64,
    pub fuel_type_encoded: f64,
    pub body_type_encoded: f64,
    pub brand_encoded: f64,
    pub model_freq: f64,
}

impl FeatureRecord {
    pub fn assemble(v: &EncodedVehicle) -> Self {
        Self {
            registered_year: f64::from(v.registered_year),
            engine_capacity: v.engine_capacity,
            kms_driven: v.kms_driven,
            owner_type: f64::from(v.owner_type),
            max_power: v.max_power,
            seats: f64::from(v.seats),
            mileage: v.mileage,
            transmission_type_encoded: f64::from(v.transmission_type),
            fuel_type_encoded: f64::from(v.fuel_type),
            body_type_encoded: f64::from(v.body_type),
            brand_encoded: v.brand_encoded,
            model_freq: v.model_freq,
        }
    }

    /// The row in [`COLUMNS`] order.
    pub fn as_row(&self) -> [f64; N_FEATURES] {
        [
            self.registered_year,
            self.engine_capacity,
            self.kms_driven,
            self.owner_type,
            self.max_power,
            self.seats,
            self.mileage,
            self.transmission_type_encoded,
            self.fuel_type_encoded,
            self.body_type_encoded,
            self.brand_encoded,
            self.model_freq,
        ]
    }

    /// The scaled subset in [`NUMERIC_COLUMNS`] order.
    pub fn numeric(&self) -> [f64; N_NUMERIC] {
        [
            self.registered_year,
            self.engine_capacity,
            self.kms_driven,
            self.max_power,
            self.seats,
            self.mileage,
        ]
    }

    /// Overwrite the scaled subset; every other column is left alone.
    pub fn set_numeric(&mut self, values: [f64; N_NUMERIC]) {
        let [year, engine, kms, power, seats, mileage] = values;
        self.registered_year = year;
        self.engine_capacity = engine;
        self.kms_driven = kms;
        self.max_power = power;
        self.seats = seats;
        self.mileage = mileage;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EncodedVehicle {
        EncodedVehicle {
            registered_year: 2015,
            engine_capacity: 1200.0,
            kms_driven: 30000.0,
            owner_type: 1,
            max_power: 85.0,
            seats: 5,
            mileage: 18.0,
            transmission_type: 1,
            fuel_type: 4,
            body_type: 2,
            brand_encoded: 500000.0,
            model_freq: 0.01,
        }
    }

    #[test]
    fn assembles_in_training_order() {
        let rec = FeatureRecord::assemble(&sample());
        assert_eq!(
            rec.as_row(),
            [2015.0, 1200.0, 30000.0, 1.0, 85.0, 5.0, 18.0, 1.0, 4.0, 2.0, 500000.0, 0.01]
        );
    }

    #[test]
    fn serialized_field_order_matches_columns() {
        let rec = FeatureRecord::assemble(&sample());
        let json = serde_json::to_string(&rec).unwrap();
        let mut last = 0;
        for col in COLUMNS {
            let pos = json.find(&format!("\"{col}\"")).unwrap();
            assert!(pos >= last, "{col} out of order");
            last = pos;
        }
    }

    #[test]
    fn numeric_indices_point_at_numeric_columns() {
        for (i, idx) in NUMERIC_INDICES.iter().enumerate() {
            assert_eq!(COLUMNS[*idx], NUMERIC_COLUMNS[i]);
        }
        let rec = FeatureRecord::assemble(&sample());
        let row = rec.as_row();
        let numeric = rec.numeric();
        for (i, idx) in NUMERIC_INDICES.iter().enumerate() {
            assert_eq!(row[*idx], numeric[i]);
        }
    }

    #[test]
    fn set_numeric_only_touches_numeric_columns() {
        let before = FeatureRecord::assemble(&sample());
        let mut after = before;
        after.set_numeric([-1.0, -2.0, -3.0, -4.0, -5.0, -6.0]);
        let (b, a) = (before.as_row(), after.as_row());
        for i in 0..N_FEATURES {
            if NUMERIC_INDICES.contains(&i) {
                assert!(a[i] < 0.0);
            } else {
                assert_eq!(a[i].to_bits(), b[i].to_bits());
            }
        }
    }
}
