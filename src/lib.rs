//! Used-vehicle resale price estimation over two pre-trained tree ensembles.

pub mod artifacts;
pub mod category;
pub mod config;
pub mod error;
pub mod features;
pub mod form;
pub mod model;
pub mod pipeline;
pub mod scaler;
pub mod server;
pub mod types;

pub use artifacts::Artifacts;
pub use error::{PricingError, Result};
pub use model::{ModelChoice, Regressor};
pub use pipeline::{decode_price, predict_price, Estimate};
