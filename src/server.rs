//! HTTP surface: form domains, dependent model filtering, and prediction.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::dataset::ReferenceData;
use crate::error::AppError;
use crate::pipeline::ScoringPipeline;
use crate::schema::NO_MODELS_SENTINEL;
use crate::selection::{
    Selection, BODY_TYPES, FUEL_TYPES, INSURANCE_TYPES, KMS_RANGE, MILEAGE_RANGE,
    MODEL_YEAR_RANGE, OWNER_RANGE, TRANSMISSIONS,
};

/// Read-only shared state: both parts are loaded once at startup and never
/// mutated, so plain `Arc`s are enough.
#[derive(Clone)]
pub struct AppState {
    pub data: Arc<ReferenceData>,
    pub pipeline: Arc<ScoringPipeline>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/form", get(form_options))
        .route("/models", get(model_options))
        .route("/predict", post(predict))
        .with_state(state)
}

// ---------- Form domains ----------

#[derive(Serialize)]
struct FormOptions {
    brands: Vec<String>,
    fuel_types: Vec<&'static str>,
    body_types: Vec<&'static str>,
    transmissions: Vec<&'static str>,
    seats: Vec<i64>,
    insurance_types: Vec<&'static str>,
    colors: Vec<String>,
    cities: Vec<String>,
    model_year_range: (i64, i64),
    mileage_range: (f64, f64),
    owner_range: (i64, i64),
    kms_range: (i64, i64),
}

async fn form_options(State(state): State<AppState>) -> Json<FormOptions> {
    Json(FormOptions {
        brands: state.data.brands(),
        fuel_types: FUEL_TYPES.to_vec(),
        body_types: BODY_TYPES.to_vec(),
        transmissions: TRANSMISSIONS.to_vec(),
        seats: state.data.seats(),
        insurance_types: INSURANCE_TYPES.to_vec(),
        colors: state.data.colors(),
        cities: state.data.cities(),
        model_year_range: MODEL_YEAR_RANGE,
        mileage_range: MILEAGE_RANGE,
        owner_range: OWNER_RANGE,
        kms_range: KMS_RANGE,
    })
}

// ---------- Dependent model filter ----------

#[derive(Deserialize)]
struct ModelQuery {
    brand: String,
    body_type: String,
    fuel_type: String,
}

#[derive(Serialize)]
struct ModelOptions {
    models: Vec<String>,
    /// True when no reference record matches the keys and `models` holds
    /// only the sentinel placeholder.
    sentinel: bool,
}

async fn model_options(
    State(state): State<AppState>,
    Query(query): Query<ModelQuery>,
) -> Json<ModelOptions> {
    let models = state
        .data
        .models_for(&query.brand, &query.body_type, &query.fuel_type);
    if models.is_empty() {
        return Json(ModelOptions {
            models: vec![NO_MODELS_SENTINEL.to_string()],
            sentinel: true,
        });
    }
    Json(ModelOptions {
        models,
        sentinel: false,
    })
}

// ---------- Prediction ----------

#[derive(Serialize)]
struct PredictionOut {
    price: f64,
    message: String,
}

async fn predict(
    State(state): State<AppState>,
    Json(selection): Json<Selection>,
) -> Result<Json<PredictionOut>, AppError> {
    selection.validate(&state.data)?;
    let record = selection.assemble()?;
    let price = state.pipeline.predict(&record).map_err(|e| {
        error!("prediction failed: {e}");
        AppError::Prediction
    })?;
    info!(price, model = %selection.model, "prediction served");
    Ok(Json(PredictionOut {
        message: format!("Estimated Price: ₹ {}", format_price(price)),
        price,
    }))
}

/// Two decimals, comma-grouped thousands.
pub fn format_price(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}
