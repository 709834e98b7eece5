//! HTTP request handlers for web adapter.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::adapters::output::{self, Row};
use crate::domain::calculation::{CalculationRequest, run_calculation};
use crate::domain::function::{Constant, Function};
use crate::domain::range::RangeSpec;

use super::{AppState, WebError};

#[derive(Debug, Deserialize)]
pub struct CalculateBody {
    pub equation: String,
    pub range: Option<String>,
    pub interval: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FunctionEntry {
    pub name: &'static str,
    pub signature: &'static str,
    pub summary: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ConstantEntry {
    pub name: &'static str,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct Registry {
    pub functions: Vec<FunctionEntry>,
    pub constants: Vec<ConstantEntry>,
}

pub async fn calculate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CalculateBody>,
) -> Result<Json<Vec<Row>>, WebError> {
    if body.equation.trim().is_empty() {
        return Err(WebError::bad_request("equation must not be empty"));
    }

    let range = match body.range.as_deref() {
        Some(range) => {
            RangeSpec::from_parts(range, body.start_date.as_deref(), body.end_date.as_deref())?
        }
        None => state.settings.default_range,
    };
    let interval = body
        .interval
        .unwrap_or_else(|| state.settings.default_interval.clone());

    tracing::info!(equation = %body.equation, range = %range, interval = %interval, "calculate");

    let request = CalculationRequest {
        equation: body.equation,
        range,
        interval,
    };

    let worker = Arc::clone(&state);
    let (calc, request) = tokio::task::spawn_blocking(move || {
        let result = run_calculation(
            worker.data_port.as_ref(),
            &request,
            &worker.settings.default_symbol,
        );
        (result, request)
    })
    .await
    .map_err(|e| WebError::internal(format!("calculation task failed: {e}")))?;

    let calc = calc.inspect_err(|e| tracing::warn!(error = %e, "calculation failed"))?;
    Ok(Json(output::rows(&calc.outcome, &request.interval)))
}

pub async fn functions() -> Json<Registry> {
    Json(Registry {
        functions: Function::ALL
            .iter()
            .map(|f| FunctionEntry {
                name: f.name(),
                signature: f.signature(),
                summary: f.summary(),
            })
            .collect(),
        constants: Constant::ALL
            .iter()
            .map(|c| ConstantEntry {
                name: c.name(),
                value: c.value(),
            })
            .collect(),
    })
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn not_found() -> WebError {
    WebError::not_found("not found")
}
