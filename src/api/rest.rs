// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/` and are public. Symbol lookups always
// answer with data: when the live provider fails the response carries a
// synthetic series and says so in its `source` field.
//
// CORS is configured permissively for the browser frontend.
// =============================================================================

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Json, Path, Query, State,
    },
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tower::Layer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tracing::{info, warn};

use crate::api::error::ApiError;
use crate::api::projection::{project_indicators, project_series};
use crate::app_state::AppState;
use crate::catalog::{self, StockListing};
use crate::indicators::{compute, compute_by_name, IndicatorKind};
use crate::market_data::{DataSource, FallbackEvent, IndexSnapshot};
use crate::prediction::{self, ModelKind, PredictedPoint};

const FIELD_LEN: RangeInclusive<usize> = 1..=20;
const DEFAULT_TIMEFRAME: &str = "1y";
const DEFAULT_DAYS_TO_PREDICT: u32 = 30;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
///
/// Trailing slashes are trimmed before routing, so `/api/predict/` and
/// `/api/predict` reach the same handler.
pub fn router(state: Arc<AppState>) -> NormalizePath<Router> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        .route("/api/health", get(health))
        .route("/api/stock-symbols", get(stock_symbols))
        .route("/api/stock-data/:symbol", get(stock_data))
        .route("/api/technical-indicators", post(technical_indicators))
        .route("/api/prediction-models", get(prediction_models))
        .route("/api/predict", post(predict))
        .route("/api/market-overview", get(market_overview))
        .route("/api/search-stocks", get(search_stocks))
        .layer(cors)
        .with_state(state);

    NormalizePathLayer::trim_trailing_slash().layer(routes)
}

/// Reject empty or overlong free-text fields.
fn validate_field(name: &str, value: &str) -> Result<(), ApiError> {
    let len = value.trim().chars().count();
    if FIELD_LEN.contains(&len) {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!(
            "{name} must be between {} and {} characters",
            FIELD_LEN.start(),
            FIELD_LEN.end()
        )))
    }
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    live_data: bool,
    recent_fallbacks: Vec<FallbackEvent>,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        uptime_secs: state.uptime_secs(),
        live_data: state.market_data.live_enabled(),
        recent_fallbacks: state.recent_fallbacks(),
        server_time: chrono::Utc::now().timestamp_millis(),
    };
    Json(resp)
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Deserialize)]
struct SymbolsQuery {
    exchange: Option<String>,
}

async fn stock_symbols(
    query: Result<Query<SymbolsQuery>, QueryRejection>,
) -> Result<Json<Vec<&'static StockListing>>, ApiError> {
    let Query(query) = query?;
    let listings = match query.exchange.as_deref() {
        Some(exchange) => catalog::by_exchange(exchange),
        None => catalog::POPULAR_STOCKS.iter().collect(),
    };
    Ok(Json(listings))
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Serialize)]
struct SearchHit {
    symbol: String,
    company_name: &'static str,
    exchange: &'static str,
    sector: &'static str,
}

async fn search_stocks(
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let q = query.q.as_str();
    if q.chars().count() == 1 {
        return Err(ApiError::bad_request("Search query must be at least 2 characters"));
    }

    let hits: Vec<SearchHit> = catalog::search(q)
        .into_iter()
        .map(|s| SearchHit {
            symbol: s.symbol.trim_end_matches(".NS").to_string(),
            company_name: s.name,
            exchange: s.exchange,
            sector: s.sector,
        })
        .collect();
    Ok(Json(hits))
}

// =============================================================================
// Price history
// =============================================================================

#[derive(Deserialize)]
struct StockDataQuery {
    timeframe: Option<String>,
}

#[derive(Serialize)]
struct StockDataResponse {
    symbol: String,
    source: DataSource,
    data: Vec<serde_json::Map<String, serde_json::Value>>,
}

async fn stock_data(
    State(state): State<Arc<AppState>>,
    symbol: Result<Path<String>, PathRejection>,
    query: Result<Query<StockDataQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let (Path(symbol), Query(query)) = (symbol?, query?);
    let timeframe = query.timeframe.as_deref().unwrap_or(DEFAULT_TIMEFRAME);
    validate_field("symbol", &symbol)?;
    validate_field("timeframe", timeframe)?;

    let loaded = state.market_data.load(&symbol, timeframe).await?;
    Ok(Json(StockDataResponse {
        symbol: loaded.series.symbol().to_string(),
        source: loaded.source,
        data: project_series(&loaded.series),
    }))
}

// =============================================================================
// Indicators
// =============================================================================

#[derive(Deserialize)]
struct IndicatorsRequest {
    symbol: String,
    #[serde(default = "default_timeframe")]
    timeframe: String,
    /// Omitted means every indicator.
    indicators: Option<Vec<String>>,
}

fn default_timeframe() -> String {
    DEFAULT_TIMEFRAME.to_string()
}

#[derive(Serialize)]
struct IndicatorsResponse {
    symbol: String,
    source: DataSource,
    indicators: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

async fn technical_indicators(
    State(state): State<Arc<AppState>>,
    req: Result<Json<IndicatorsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = req?;
    validate_field("symbol", &req.symbol)?;
    validate_field("timeframe", &req.timeframe)?;

    let loaded = state.market_data.load(&req.symbol, &req.timeframe).await?;
    let result = match &req.indicators {
        Some(names) => compute_by_name(&loaded.series, names),
        None => compute(&loaded.series, &IndicatorKind::ALL),
    };

    Ok(Json(IndicatorsResponse {
        symbol: loaded.series.symbol().to_string(),
        source: loaded.source,
        indicators: project_indicators(&result),
    }))
}

// =============================================================================
// Prediction
// =============================================================================

#[derive(Serialize)]
struct ModelInfo {
    id: &'static str,
    model_type: &'static str,
    name: &'static str,
    description: &'static str,
}

async fn prediction_models() -> Json<Vec<ModelInfo>> {
    let models = ModelKind::ALL
        .into_iter()
        .map(|k| ModelInfo {
            id: k.id(),
            model_type: k.id(),
            name: k.display_name(),
            description: k.description(),
        })
        .collect();
    Json(models)
}

#[derive(Deserialize)]
struct PredictRequest {
    symbol: String,
    model_type: String,
    #[serde(default = "default_days_to_predict")]
    days_to_predict: u32,
    #[serde(default)]
    features: Vec<String>,
}

fn default_days_to_predict() -> u32 {
    DEFAULT_DAYS_TO_PREDICT
}

#[derive(Serialize)]
struct PredictResponse {
    symbol: String,
    model_type: ModelKind,
    source: DataSource,
    days_predicted: usize,
    predictions: Vec<PredictedPoint>,
}

async fn predict(
    State(state): State<Arc<AppState>>,
    req: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = req?;
    validate_field("symbol", &req.symbol)?;
    let kind: ModelKind = req.model_type.parse()?;

    let loaded = state
        .market_data
        .load(&req.symbol, &state.config.prediction_timeframe)
        .await?;
    let data = compute(&loaded.series, &IndicatorKind::ALL);
    let predictions = prediction::predict(kind, &data, req.days_to_predict, &req.features)?;

    info!(
        symbol = %loaded.series.symbol(),
        model = %kind,
        days = predictions.len(),
        source = %loaded.source,
        "prediction served"
    );

    Ok(Json(PredictResponse {
        symbol: loaded.series.symbol().to_string(),
        model_type: kind,
        source: loaded.source,
        days_predicted: predictions.len(),
        predictions,
    }))
}

// =============================================================================
// Market overview
// =============================================================================

#[derive(Serialize)]
struct MarketOverviewResponse {
    indices: Vec<IndexSnapshot>,
    /// ISO 8601 timestamp.
    last_updated: String,
}

async fn market_overview(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let fetches = catalog::NSE_INDICES.iter().map(|index| {
        let state = state.clone();
        async move {
            match state.market_data.index_snapshot(index).await {
                Ok(snap) => Some(snap),
                Err(e) => {
                    warn!(symbol = index.symbol, error = %format!("{e:#}"), "index snapshot failed");
                    None
                }
            }
        }
    });

    let snapshots: Vec<IndexSnapshot> = join_all(fetches).await.into_iter().flatten().collect();
    if snapshots.is_empty() {
        return Err(ApiError::not_found("Could not fetch market overview data"));
    }
    Ok(Json(MarketOverviewResponse {
        indices: snapshots,
        last_updated: chrono::Utc::now().to_rfc3339(),
    }))
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::market_data::{Bar, MarketDataProvider};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::NaiveDate;
    use futures_util::future::{BoxFuture, FutureExt};
    use serde_json::Value;
    use tower::ServiceExt;

    /// Two recent bars for any symbol.
    struct RecentBars;

    impl MarketDataProvider for RecentBars {
        fn name(&self) -> &'static str {
            "recent"
        }

        fn fetch_daily<'a>(
            &'a self,
            _symbol: &'a str,
            _start: NaiveDate,
            end: NaiveDate,
        ) -> BoxFuture<'a, anyhow::Result<Vec<Bar>>> {
            let bar = |date: NaiveDate, close: f64| Bar {
                date,
                open: close,
                high: close,
                low: close,
                close,
                adj_close: close,
                volume: 5,
            };
            let bars = vec![
                bar(end - chrono::Duration::days(2), 100.0),
                bar(end - chrono::Duration::days(1), 101.0),
            ];
            async move { Ok(bars) }.boxed()
        }
    }

    fn offline_app() -> NormalizePath<Router> {
        router(Arc::new(AppState::new(AppConfig::default(), None)))
    }

    async fn send(app: NormalizePath<Router>, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_offline_mode() {
        let (status, body) = send(offline_app(), get_req("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["live_data"], false);
        assert_eq!(body["recent_fallbacks"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn stock_data_serves_synthetic_records() {
        let (status, body) = send(offline_app(), get_req("/api/stock-data/tcs?timeframe=1m")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "TCS.NS");
        assert_eq!(body["source"], "synthetic");
        let data = body["data"].as_array().unwrap();
        assert!(!data.is_empty());
        assert!(data[0].get("Adj Close").is_some());
        assert!(data[0].get("Cumulative Returns").is_some());
    }

    #[tokio::test]
    async fn stock_data_rejects_long_symbol_and_bad_timeframe() {
        let long = "X".repeat(21);
        let (status, _) = send(offline_app(), get_req(&format!("/api/stock-data/{long}"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(offline_app(), get_req("/api/stock-data/TCS?timeframe=xm")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("xm"));
    }

    #[tokio::test]
    async fn indicators_are_keyed_by_date() {
        let req = post_json(
            "/api/technical-indicators",
            serde_json::json!({ "symbol": "INFY", "timeframe": "6m", "indicators": ["SMA", "RSI"] }),
        );
        let (status, body) = send(offline_app(), req).await;
        assert_eq!(status, StatusCode::OK);
        let indicators = body["indicators"].as_object().unwrap();
        let mut keys: Vec<&str> = indicators.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["Date", "RSI", "SMA_20", "SMA_200", "SMA_50"]);
        assert!(indicators["SMA_200"].as_object().unwrap().is_empty());
    }

    #[tokio::test]
    async fn prediction_models_are_listed() {
        let (status, body) = send(offline_app(), get_req("/api/prediction-models")).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body.as_array().unwrap().iter().map(|m| m["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["linear", "random_forest", "svm", "lstm"]);
    }

    #[tokio::test]
    async fn predict_returns_requested_horizon() {
        let req = post_json(
            "/api/predict",
            serde_json::json!({ "symbol": "RELIANCE", "model_type": "lstm", "days_to_predict": 7 }),
        );
        let (status, body) = send(offline_app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model_type"], "lstm");
        assert_eq!(body["days_predicted"], 7);
        let preds = body["predictions"].as_array().unwrap();
        assert_eq!(preds.len(), 7);
        assert!(preds[0]["Predicted_Price"].as_f64().unwrap() >= 0.0);
    }

    #[tokio::test]
    async fn predict_rejects_unknown_model() {
        let req = post_json(
            "/api/predict",
            serde_json::json!({ "symbol": "TCS", "model_type": "xgboost", "days_to_predict": 7 }),
        );
        let (status, body) = send(offline_app(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unknown model type: xgboost");
    }

    #[tokio::test]
    async fn market_overview_offline_is_not_found() {
        let (status, body) = send(offline_app(), get_req("/api/market-overview")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn market_overview_lists_indices() {
        let provider: Arc<dyn MarketDataProvider> = Arc::new(RecentBars);
        let app = router(Arc::new(AppState::new(AppConfig::default(), Some(provider))));
        let (status, body) = send(app, get_req("/api/market-overview")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(chrono::DateTime::parse_from_rfc3339(body["last_updated"].as_str().unwrap()).is_ok());
        let rows = body["indices"].as_array().unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0]["name"], "NIFTY 50");
        assert_eq!(rows[0]["change"], 1.0);
    }

    #[tokio::test]
    async fn search_rules() {
        let (status, _) = send(offline_app(), get_req("/api/search-stocks?q=a")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(offline_app(), get_req("/api/search-stocks")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 10);
        assert_eq!(body[0]["symbol"], "RELIANCE");

        let (_, body) = send(offline_app(), get_req("/api/search-stocks?q=tata%20consultancy")).await;
        assert_eq!(body[0]["symbol"], "TCS");
        assert_eq!(body[0]["company_name"], "Tata Consultancy Services Ltd.");
    }

    #[tokio::test]
    async fn symbols_filter_by_exchange() {
        let (_, body) = send(offline_app(), get_req("/api/stock-symbols?exchange=nse")).await;
        assert_eq!(body.as_array().unwrap().len(), catalog::POPULAR_STOCKS.len());

        let (_, body) = send(offline_app(), get_req("/api/stock-symbols?exchange=BSE")).await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn trailing_slash_paths_are_routed() {
        let (status, body) = send(offline_app(), get_req("/api/stock-data/TCS/?timeframe=1m")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "TCS.NS");

        let (status, body) = send(offline_app(), get_req("/api/search-stocks/?q=tcs")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["symbol"], "TCS");

        let (status, _) = send(offline_app(), get_req("/api/prediction-models/")).await;
        assert_eq!(status, StatusCode::OK);

        let req = post_json(
            "/api/predict/",
            serde_json::json!({ "symbol": "TCS", "model_type": "linear", "days_to_predict": 2 }),
        );
        let (status, _) = send(offline_app(), req).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn negative_horizon_is_a_json_bad_request() {
        let req = post_json(
            "/api/predict",
            serde_json::json!({ "symbol": "TCS", "model_type": "linear", "days_to_predict": -3 }),
        );
        let (status, body) = send(offline_app(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn malformed_bodies_are_json_bad_requests() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/technical-indicators")
            .header("content-type", "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let (status, body) = send(offline_app(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        // Missing required `symbol`.
        let req = post_json("/api/technical-indicators", serde_json::json!({ "timeframe": "1y" }));
        let (status, body) = send(offline_app(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn search_length_uses_the_raw_query() {
        // Three characters with the spaces, so it is searched rather than rejected.
        let (status, body) = send(offline_app(), get_req("/api/search-stocks?q=%20a%20")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_array());
    }
}
