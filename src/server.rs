use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::json;

use crate::artifacts::Artifacts;
use crate::error::PricingError;
use crate::form::{self, Outcome};
use crate::pipeline::{predict_price, Estimate};
use crate::types::{FormInput, Health, PredictRequest, PredictResponse};

// ---------- Server state ----------

#[derive(Clone)]
pub struct AppState {
    pub artifacts: Arc<Artifacts>,
    pub log_vectors: bool,
}

impl AppState {
    pub fn new(artifacts: Artifacts, log_vectors: bool) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
            log_vectors,
        }
    }

    fn trace(&self, est: &Estimate) {
        if self.log_vectors {
            tracing::info!(
                model = est.choice.label(),
                raw = ?est.raw.as_row(),
                scaled = ?est.scaled.as_row(),
                log_price = est.log_price,
                "feature vector"
            );
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/", get(form_page))
        .route("/form", post(form_submit))
        .with_state(state)
}

fn status_of(e: &PricingError) -> StatusCode {
    if e.is_client_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

// ---------- JSON handlers ----------

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}

async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, (StatusCode, Json<serde_json::Value>)> {
    let est = predict_price(&state.artifacts, &req.encode(), req.choice()).map_err(|e| {
        tracing::error!(error = %e, "prediction failed");
        (status_of(&e), Json(json!({ "error": e.to_string() })))
    })?;
    state.trace(&est);

    Ok(Json(PredictResponse {
        model: req.model_choice,
        predicted_price: est.price,
    }))
}

// ---------- Form handlers ----------

async fn form_page() -> Html<String> {
    Html(form::render_page(&Outcome::Empty))
}

async fn form_submit(
    State(state): State<AppState>,
    input: Result<Form<FormInput>, FormRejection>,
) -> (StatusCode, Html<String>) {
    let Form(input) = match input {
        Ok(f) => f,
        Err(rej) => {
            tracing::warn!(error = %rej, "form rejected");
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(form::render_page(&Outcome::Error(rej.body_text()))),
            );
        }
    };

    let result = form::validate(&input)
        .and_then(|_| predict_price(&state.artifacts, &input.encode(), input.model_choice));

    match result {
        Ok(est) => {
            state.trace(&est);
            (StatusCode::OK, Html(form::render_page(&Outcome::Price(est.price))))
        }
        Err(e) => {
            if e.is_client_error() {
                tracing::warn!(error = %e, "form input outside widget bounds");
            } else {
                tracing::error!(error = %e, "prediction failed");
            }
            (status_of(&e), Html(form::render_page(&Outcome::Error(e.to_string()))))
        }
    }
}
