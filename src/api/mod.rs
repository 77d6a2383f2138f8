use axum::{
    Router,
    body::Bytes,
    extract::Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    CalculationInput, CalculationResult, DEFAULT_EMERGENCY_FUND_MONTHS,
    DEFAULT_EMERGENCY_MATURITY_WINDOW_MONTHS, DEFAULT_GAP_INVARIANT_TOLERANCE,
    DEFAULT_LIFE_COVER_MULTIPLE, DEFAULT_LOAN_FREEDOM_WINDOW_YEARS,
    DEFAULT_UNDERFUNDED_GOAL_NAMES_SHOWN, EngineConfig, EngineError, calculate,
};

#[derive(Parser, Debug)]
#[command(
    name = "corpus-plan",
    about = "Retirement corpus reconciliation: merged timeline, goal shortfalls and alerts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON API over HTTP
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Run one calculation over a JSON input file and print the result
    Calculate(CalculateArgs),
}

#[derive(Args, Debug)]
pub struct CalculateArgs {
    /// Path to a CalculationInput JSON document
    pub input: PathBuf,
    #[arg(long, help = "Date the date windows are measured from (YYYY-MM-DD); defaults to today")]
    pub as_of: Option<NaiveDate>,
    #[arg(long, help = "Pretty-print the result JSON")]
    pub pretty: bool,
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args, Debug, Clone, Copy, PartialEq)]
pub struct ConfigArgs {
    #[arg(
        long,
        default_value_t = DEFAULT_EMERGENCY_FUND_MONTHS,
        help = "Emergency fund target in months of expenses"
    )]
    pub emergency_fund_months: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_LOAN_FREEDOM_WINDOW_YEARS,
        help = "Loans ending within this many years trigger the freed-EMI tip"
    )]
    pub loan_freedom_window_years: u32,
    #[arg(
        long,
        default_value_t = DEFAULT_EMERGENCY_MATURITY_WINDOW_MONTHS,
        help = "Emergency instruments maturing within this many months trigger a warning"
    )]
    pub emergency_maturity_window_months: u32,
    #[arg(
        long,
        default_value_t = DEFAULT_UNDERFUNDED_GOAL_NAMES_SHOWN,
        help = "Number of underfunded goal names listed before the ellipsis"
    )]
    pub underfunded_goal_names_shown: usize,
    #[arg(
        long,
        default_value_t = DEFAULT_LIFE_COVER_MULTIPLE,
        help = "Recommended life cover as a multiple of annual income"
    )]
    pub life_cover_multiple: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_GAP_INVARIANT_TOLERANCE,
        help = "Tolerance before a corpus-gap mismatch is logged"
    )]
    pub gap_invariant_tolerance: f64,
}

impl Default for ConfigArgs {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            emergency_fund_months: config.emergency_fund_months,
            loan_freedom_window_years: config.loan_freedom_window_years,
            emergency_maturity_window_months: config.emergency_maturity_window_months,
            underfunded_goal_names_shown: config.underfunded_goal_names_shown,
            life_cover_multiple: config.life_cover_multiple,
            gap_invariant_tolerance: config.gap_invariant_tolerance,
        }
    }
}

/// Overrides accepted in the `config` object of an API request.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ConfigPayload {
    emergency_fund_months: Option<f64>,
    loan_freedom_window_years: Option<u32>,
    emergency_maturity_window_months: Option<u32>,
    underfunded_goal_names_shown: Option<usize>,
    life_cover_multiple: Option<f64>,
    gap_invariant_tolerance: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CalculatePayload {
    #[serde(flatten)]
    input: CalculationInput,
    as_of: Option<NaiveDate>,
    config: Option<ConfigPayload>,
}

#[derive(Debug)]
struct ApiRequest {
    input: CalculationInput,
    config: EngineConfig,
    as_of: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
    kind: Option<&'static str>,
}

impl ApiError {
    fn bad_request(message: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
            kind: Some("invalid-input"),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: err.to_string(),
            kind: Some(err.kind()),
        }
    }
}

pub fn build_config(args: ConfigArgs) -> Result<EngineConfig, String> {
    if !args.emergency_fund_months.is_finite() || args.emergency_fund_months <= 0.0 {
        return Err("--emergency-fund-months must be > 0".to_string());
    }
    if args.loan_freedom_window_years == 0 {
        return Err("--loan-freedom-window-years must be > 0".to_string());
    }
    if args.emergency_maturity_window_months == 0 {
        return Err("--emergency-maturity-window-months must be > 0".to_string());
    }
    if args.underfunded_goal_names_shown == 0 {
        return Err("--underfunded-goal-names-shown must be > 0".to_string());
    }
    if !args.life_cover_multiple.is_finite() || args.life_cover_multiple < 0.0 {
        return Err("--life-cover-multiple must be >= 0".to_string());
    }
    if !args.gap_invariant_tolerance.is_finite() || args.gap_invariant_tolerance < 0.0 {
        return Err("--gap-invariant-tolerance must be >= 0".to_string());
    }

    Ok(EngineConfig {
        emergency_fund_months: args.emergency_fund_months,
        loan_freedom_window_years: args.loan_freedom_window_years,
        emergency_maturity_window_months: args.emergency_maturity_window_months,
        underfunded_goal_names_shown: args.underfunded_goal_names_shown,
        life_cover_multiple: args.life_cover_multiple,
        gap_invariant_tolerance: args.gap_invariant_tolerance,
    })
}

/// Reads the input file, runs one calculation and renders the result as JSON.
pub fn run_calculate(args: &CalculateArgs) -> Result<String, String> {
    let config = build_config(args.config)?;
    let raw = std::fs::read_to_string(&args.input)
        .map_err(|e| format!("Cannot read {}: {e}", args.input.display()))?;
    let input: CalculationInput =
        serde_json::from_str(&raw).map_err(|e| format!("Invalid input JSON: {e}"))?;
    let as_of = args.as_of.unwrap_or_else(today);

    let result = calculate(&input, &config, as_of).map_err(|e| format!("[{}] {e}", e.kind()))?;
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    };
    rendered.map_err(|e| format!("Cannot serialize result: {e}"))
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/config", get(config_handler))
        .route("/api/calculate", post(calculate_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!("corpus-plan HTTP API listening on http://{addr}");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, serde_json::json!({ "status": "ok" }))
}

async fn config_handler() -> Response {
    json_response(StatusCode::OK, EngineConfig::default())
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found", None)
}

async fn calculate_handler(body: Bytes) -> Response {
    match calculate_from_json(&body, today()) {
        Ok(result) => json_response(StatusCode::OK, result),
        Err(err) => {
            warn!(kind = err.kind.unwrap_or("unknown"), "calculation request rejected: {}", err.message);
            error_response(err.status, &err.message, err.kind)
        }
    }
}

fn calculate_from_json(body: &[u8], today: NaiveDate) -> Result<CalculationResult, ApiError> {
    let request = api_request_from_json(body).map_err(ApiError::bad_request)?;
    let as_of = request.as_of.unwrap_or(today);
    Ok(calculate(&request.input, &request.config, as_of)?)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str, kind: Option<&'static str>) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
            kind,
        },
    )
}

fn api_request_from_json(body: &[u8]) -> Result<ApiRequest, String> {
    let payload = serde_json::from_slice::<CalculatePayload>(body)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: CalculatePayload) -> Result<ApiRequest, String> {
    let mut args = ConfigArgs::default();

    if let Some(overrides) = payload.config {
        if let Some(v) = overrides.emergency_fund_months {
            args.emergency_fund_months = v;
        }
        if let Some(v) = overrides.loan_freedom_window_years {
            args.loan_freedom_window_years = v;
        }
        if let Some(v) = overrides.emergency_maturity_window_months {
            args.emergency_maturity_window_months = v;
        }
        if let Some(v) = overrides.underfunded_goal_names_shown {
            args.underfunded_goal_names_shown = v;
        }
        if let Some(v) = overrides.life_cover_multiple {
            args.life_cover_multiple = v;
        }
        if let Some(v) = overrides.gap_invariant_tolerance {
            args.gap_invariant_tolerance = v;
        }
    }

    let config = build_config(args)?;
    Ok(ApiRequest {
        input: payload.input,
        config,
        as_of: payload.as_of,
    })
}
