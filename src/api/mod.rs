use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{FixedOffset, NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, warn};

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::mlb_stats::ScheduleProvider;
use crate::pipeline::{self, RequestContext, DOC_DATE_FMT};
use crate::transform::AllSpark;

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ScheduleProvider>,
    pub store: Arc<dyn Store>,
    pub ctx: RequestContext,
    /// Zone that decides "today" when no date is requested.
    pub utc_offset: FixedOffset,
}

/// Build the Axum router for the function endpoint.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(game_data_by_day_handler))
        .route("/GetGameDataByDay", post(game_data_by_day_handler))
        .route("/games/:date", get(stored_games_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// `{"date": "MM-DD-YYYY"}`, or the same wrapped in a callable `data` envelope.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DateRequest {
    date: Option<String>,
    data: Option<DateEnvelope>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DateEnvelope {
    date: Option<String>,
}

/// Resolve the requested day from a request body. Anything missing or
/// unparsable falls back to `today`.
pub fn requested_date(body: &[u8], today: NaiveDate) -> NaiveDate {
    if body.iter().all(u8::is_ascii_whitespace) {
        debug!("empty request body, using {}", today);
        return today;
    }
    let req: DateRequest = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "unreadable request body, using {}", today);
            return today;
        }
    };
    let raw = req
        .date
        .filter(|d| !d.trim().is_empty())
        .or_else(|| req.data.and_then(|d| d.date))
        .unwrap_or_default();
    let raw = raw.trim();
    if raw.is_empty() {
        debug!("no date requested, using {}", today);
        return today;
    }
    match NaiveDate::parse_from_str(raw, DOC_DATE_FMT) {
        Ok(date) => date,
        Err(e) => {
            warn!(error = %e, "unparsable date '{}', using {}", raw, today);
            today
        }
    }
}

/// POST /GetGameDataByDay
async fn game_data_by_day_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AllSpark>> {
    let today = Utc::now().with_timezone(&state.utc_offset).date_naive();
    let date = requested_date(&body, today);
    debug!("date requested: {}", date);

    pipeline::game_data_by_day(state.provider.as_ref(), state.store.as_ref(), &state.ctx, date)
        .await
        .map(Json)
}

/// GET /games/:date
async fn stored_games_handler(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let day = NaiveDate::parse_from_str(&date, DOC_DATE_FMT)
        .map_err(|_| AppError::BadDate(date.clone()))?;
    let key = pipeline::doc_key(day);
    state
        .store
        .get(&state.ctx.collection, &key)
        .map_err(AppError::Store)?
        .map(Json)
        .ok_or(AppError::MissingDocument(key))
}

/// GET /health
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "function": state.ctx.function_name,
        "version": state.ctx.version,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::pipeline::tests::{ctx, FakeProvider, OPENING_DAY};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn march_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, 1).unwrap()
    }

    fn app(provider: FakeProvider, db: Database) -> Router {
        router(AppState {
            provider: Arc::new(provider),
            store: Arc::new(db),
            ctx: ctx(),
            utc_offset: FixedOffset::west_opt(7 * 3600).unwrap(),
        })
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn test_requested_date_plain_body() {
        let d = requested_date(br#"{"date":"03-01-2020"}"#, NaiveDate::MIN);
        assert_eq!(d, march_first());
    }

    #[test]
    fn test_requested_date_data_envelope() {
        let d = requested_date(br#"{"data":{"date":"03-01-2020"}}"#, NaiveDate::MIN);
        assert_eq!(d, march_first());
    }

    #[test]
    fn test_requested_date_defaults_to_today() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(requested_date(b"", today), today);
        assert_eq!(requested_date(b"  \n", today), today);
        assert_eq!(requested_date(b"{}", today), today);
        assert_eq!(requested_date(br#"{"date":""}"#, today), today);
        assert_eq!(requested_date(br#"{"date":null}"#, today), today);
        assert_eq!(requested_date(br#"{"date":"2020-03-01"}"#, today), today);
        assert_eq!(requested_date(br#"{"date":"13-45-2020"}"#, today), today);
        assert_eq!(requested_date(b"not json", today), today);
    }

    #[tokio::test]
    async fn test_post_reduces_and_stores() {
        let db = Database::open(":memory:").unwrap();
        let resp = app(FakeProvider::with(OPENING_DAY), db.clone())
            .oneshot(post("/GetGameDataByDay", r#"{"date":"03-01-2020"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["games"][0]["mlbID"], 12345);
        assert_eq!(json["games"][0]["mlbTVLink"], "https://www.mlb.com/tv/g12345");
        assert_eq!(json["games"][0]["status"]["inProgress"], true);

        let stored = db.get("game-data-by-day", "03-01-2020").unwrap();
        assert_eq!(stored, Some(json));
    }

    #[tokio::test]
    async fn test_post_unmatched_date_is_404() {
        let db = Database::open(":memory:").unwrap();
        let resp = app(FakeProvider::with(OPENING_DAY), db.clone())
            .oneshot(post("/", r#"{"date":"03-02-2020"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(db.get("game-data-by-day", "03-02-2020").unwrap(), None);
    }

    #[tokio::test]
    async fn test_post_upstream_failure_is_502() {
        let db = Database::open(":memory:").unwrap();
        let resp = app(FakeProvider::failing(), db)
            .oneshot(post("/GetGameDataByDay", r#"{"date":"03-01-2020"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_get_stored_games() {
        let db = Database::open(":memory:").unwrap();
        db.put("game-data-by-day", "03-01-2020", &serde_json::json!({"games": []}))
            .unwrap();
        let app = app(FakeProvider::failing(), db);

        let resp = app.clone().oneshot(get_req("/games/03-01-2020")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::json!({"games": []}));

        let resp = app.clone().oneshot(get_req("/games/03-02-2020")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = app.oneshot(get_req("/games/2020-03-01")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health() {
        let db = Database::open(":memory:").unwrap();
        let resp = app(FakeProvider::failing(), db)
            .oneshot(get_req("/health"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "ok");
    }
}
