//! Server-rendered form for interactive use.
//!
//! The widgets carry the same bounds and defaults the price model was built
//! around, so a request that fails [`validate`] did not come from this page.

use num_format::{Locale, ToFormattedString};

use crate::category::{BodyType, Category, FuelType, OwnerType, TransmissionType};
use crate::error::{PricingError, Result};
use crate::model::ModelChoice;
use crate::types::FormInput;

/// Inclusive widget bounds and default value.
#[derive(Debug, Clone, Copy)]
pub struct Bound {
    pub field: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

const fn bound(
    field: &'static str,
    label: &'static str,
    min: f64,
    max: f64,
    default: f64,
    step: f64,
) -> Bound {
    Bound { field, label, min, max, default, step }
}

pub const YEAR: Bound = bound("registered_year", "Registered Year", 2000.0, 2025.0, 2015.0, 1.0);
pub const ENGINE: Bound = bound("engine_capacity", "Engine Capacity (cc)", 500.0, 5000.0, 1200.0, 1.0);
pub const KMS: Bound = bound("kms_driven", "Kilometers Driven", 0.0, 500000.0, 30000.0, 1.0);
pub const POWER: Bound = bound("max_power", "Max Power (bhp)", 20.0, 500.0, 85.0, 0.01);
pub const SEATS: Bound = bound("seats", "Seats", 2.0, 10.0, 5.0, 1.0);
pub const MILEAGE: Bound = bound("mileage", "Mileage (kmpl)", 5.0, 40.0, 18.0, 0.01);

const DEFAULT_BRAND_VALUE: f64 = 500000.0;
const DEFAULT_MODEL_FREQ: f64 = 0.01;

fn check(b: &Bound, v: f64) -> Result<()> {
    if v.is_finite() && v >= b.min && v <= b.max {
        Ok(())
    } else {
        Err(PricingError::Validation(format!(
            "{} = {} outside [{}, {}]",
            b.field, v, b.min, b.max
        )))
    }
}

/// Enforce the widget bounds. Brand value and model frequency are unbounded.
pub fn validate(input: &FormInput) -> Result<()> {
    check(&YEAR, f64::from(input.registered_year))?;
    check(&ENGINE, input.engine_capacity)?;
    check(&KMS, input.kms_driven)?;
    check(&POWER, input.max_power)?;
    check(&SEATS, f64::from(input.seats))?;
    check(&MILEAGE, input.mileage)?;
    for (field, v) in [("brand_encoded", input.brand_encoded), ("model_freq", input.model_freq)] {
        if !v.is_finite() {
            return Err(PricingError::Validation(format!("{field} must be a number")));
        }
    }
    Ok(())
}

/// `₹ 1,234,567`, rounded to whole rupees.
pub fn format_rupees(price: f64) -> String {
    let whole = price.round() as i64;
    format!("₹ {}", whole.to_formatted_string(&Locale::en))
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn number_input(b: &Bound) -> String {
    format!(
        r#"<label>{label} <input type="number" name="{field}" min="{min}" max="{max}" step="{step}" value="{default}" required></label>"#,
        label = b.label,
        field = b.field,
        min = b.min,
        max = b.max,
        step = b.step,
        default = b.default,
    )
}

fn select<C: Category>(label: &str) -> String {
    let options: String = C::ALL
        .iter()
        .map(|c| format!(r#"<option value="{0}">{0}</option>"#, c.label()))
        .collect();
    format!(r#"<label>{label} <select name="{}">{options}</select></label>"#, C::FIELD)
}

/// What to show under the form.
pub enum Outcome {
    Empty,
    Price(f64),
    Error(String),
}

pub fn render_page(outcome: &Outcome) -> String {
    let result = match outcome {
        Outcome::Empty => String::new(),
        Outcome::Price(p) => format!(
            r#"<p class="success">💰 Estimated Resale Price: {}</p>"#,
            format_rupees(*p)
        ),
        Outcome::Error(msg) => format!(r#"<p class="error">{}</p>"#, escape(msg)),
    };

    let models: String = [ModelChoice::RandomForest, ModelChoice::GradientBoosting]
        .iter()
        .enumerate()
        .map(|(i, m)| {
            format!(
                r#"<label><input type="radio" name="model_choice" value="{0}"{1}> {0}</label>"#,
                m.label(),
                if i == 0 { " checked" } else { "" }
            )
        })
        .collect();

    let fields = [
        number_input(&YEAR),
        number_input(&ENGINE),
        number_input(&KMS),
        select::<OwnerType>("Owner Type"),
        number_input(&POWER),
        number_input(&SEATS),
        number_input(&MILEAGE),
        select::<TransmissionType>("Transmission Type"),
        select::<FuelType>("Fuel Type"),
        select::<BodyType>("Body Type"),
        format!(
            r#"<label>Brand Avg Resale Price <input type="number" name="brand_encoded" step="any" value="{DEFAULT_BRAND_VALUE}" required></label>"#
        ),
        format!(
            r#"<label>Model Popularity (Frequency) <input type="number" name="model_freq" step="any" value="{DEFAULT_MODEL_FREQ}" required></label>"#
        ),
        format!("<fieldset><legend>Select Prediction Model</legend>{models}</fieldset>"),
    ]
    .join("\n");

    format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Vehicle Resale Price Predictor</title></head>
<body>
<h1>🚗 Vehicle Resale Price Predictor</h1>
<p>Fill in the car details to get the predicted resale price.</p>
<form method="post" action="/form">
{fields}
<button type="submit">Predict</button>
</form>
{result}
</body>
</html>
"#
    )
}
