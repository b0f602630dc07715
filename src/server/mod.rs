// src/server/mod.rs

use std::{convert::Infallible, sync::Arc};

use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use warp::{
    http::StatusCode,
    reply::{Reply, Response},
    Filter, Rejection,
};

use crate::config::Config;
use crate::failure::ClassifiedFailure;
use crate::fetch::GridFetcher;
use crate::inventory;

/// Everything a request handler needs; shared read-only across requests.
pub struct AppState<F> {
    pub config: Config,
    pub fetcher: F,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// All HTTP routes:
///
/// - `GET /health`
/// - `GET /api/vehicles`
/// - `GET /api/vehicles/search?q=`
/// - `GET /api/vehicles/<id>`
pub fn routes<F>(
    state: Arc<AppState<F>>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone
where
    F: GridFetcher + Send + Sync + 'static,
{
    let with_state = warp::any().map(move || state.clone());

    let health = warp::path!("health")
        .and(warp::get())
        .and_then(health_check);

    let list = warp::path!("api" / "vehicles")
        .and(warp::get())
        .and(with_state.clone())
        .and_then(list_vehicles::<F>);

    let search = warp::path!("api" / "vehicles" / "search")
        .and(warp::get())
        .and(warp::query::<SearchParams>())
        .and(with_state.clone())
        .and_then(search_vehicles::<F>);

    let detail = warp::path!("api" / "vehicles" / u32)
        .and(warp::get())
        .and(with_state)
        .and_then(vehicle_detail::<F>);

    health
        .or(list)
        .or(search)
        .or(detail)
        .recover(handle_rejection)
        .with(warp::trace::request())
}

async fn health_check() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&json!({
        "status": "healthy",
        "service": "sheetfleet"
    })))
}

async fn list_vehicles<F: GridFetcher>(state: Arc<AppState<F>>) -> Result<Response, Rejection> {
    match inventory::load_vehicles(&state.config, &state.fetcher).await {
        Ok(records) => Ok(warp::reply::json(&records).into_response()),
        Err(failure) => Ok(failure_reply(&failure)),
    }
}

async fn search_vehicles<F: GridFetcher>(
    params: SearchParams,
    state: Arc<AppState<F>>,
) -> Result<Response, Rejection> {
    let records = match inventory::load_vehicles(&state.config, &state.fetcher).await {
        Ok(records) => records,
        Err(failure) => return Ok(failure_reply(&failure)),
    };
    let hits = inventory::search(&records, &params.q);
    debug!(query = %params.q, hits = hits.len(), "vehicle search");
    Ok(warp::reply::json(&hits).into_response())
}

async fn vehicle_detail<F: GridFetcher>(
    id: u32,
    state: Arc<AppState<F>>,
) -> Result<Response, Rejection> {
    let records = match inventory::load_vehicles(&state.config, &state.fetcher).await {
        Ok(records) => records,
        Err(failure) => return Ok(failure_reply(&failure)),
    };
    match inventory::find_listed(&records, id) {
        Some(record) => Ok(warp::reply::json(record).into_response()),
        None => Ok(error_reply(
            StatusCode::NOT_FOUND,
            "Vehicle not found",
            &format!("no vehicle with id {}", id),
        )),
    }
}

fn failure_reply(failure: &ClassifiedFailure) -> Response {
    let status = StatusCode::from_u16(failure.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    warp::reply::with_status(warp::reply::json(&failure.body()), status).into_response()
}

fn error_reply(status: StatusCode, error: &str, details: &str) -> Response {
    warp::reply::with_status(
        warp::reply::json(&json!({ "error": error, "details": details })),
        status,
    )
    .into_response()
}

/// Keep even routing failures in the `{error, details}` shape.
async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let (status, error) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, "Invalid query")
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
    };
    Ok(error_reply(status, error, &format!("{:?}", err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::tests::{full_config, sample_grid, FakeFetcher};
    use serde_json::Value;
    use std::sync::atomic::Ordering;

    fn state(config: Config, fetcher: FakeFetcher) -> Arc<AppState<FakeFetcher>> {
        Arc::new(AppState { config, fetcher })
    }

    fn body_json(body: &[u8]) -> Value {
        serde_json::from_slice(body).expect("json body")
    }

    #[tokio::test]
    async fn health() {
        let api = routes(state(full_config(), FakeFetcher::grid(Vec::new())));
        let res = warp::test::request().path("/health").reply(&api).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res.body())["status"], "healthy");
    }

    #[tokio::test]
    async fn lists_every_record() {
        let api = routes(state(full_config(), FakeFetcher::grid(sample_grid())));
        let res = warp::test::request().path("/api/vehicles").reply(&api).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res.body());
        let list = body.as_array().expect("array");
        assert_eq!(list.len(), 4);
        assert_eq!(list[0]["id"], 1);
        assert_eq!(list[0]["vno"], "KA01AB1234");
        assert_eq!(list[2]["product"], "");
        assert_eq!(list[3]["soldPrice"], "");
    }

    #[tokio::test]
    async fn empty_sheet_lists_nothing() {
        let api = routes(state(full_config(), FakeFetcher::grid(Vec::new())));
        let res = warp::test::request().path("/api/vehicles").reply(&api).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res.body()), serde_json::json!([]));
    }

    #[tokio::test]
    async fn fetch_failure_becomes_error_body() {
        let api = routes(state(
            full_config(),
            FakeFetcher::failing("Resource not found (404)"),
        ));
        let res = warp::test::request().path("/api/vehicles").reply(&api).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = body_json(res.body());
        assert!(body["error"].as_str().unwrap().contains("sheet-123"));
        assert_eq!(body["details"], "Resource not found (404)");
    }

    #[tokio::test]
    async fn missing_config_is_500_without_fetch() {
        let mut config = full_config();
        config.client_email = None;
        let shared = state(config, FakeFetcher::grid(sample_grid()));
        let api = routes(shared.clone());

        let res = warp::test::request().path("/api/vehicles").reply(&api).await;

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(res.body())["error"],
            "GOOGLE_CLIENT_EMAIL is not set"
        );
        assert_eq!(shared.fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn search_by_query() {
        let api = routes(state(full_config(), FakeFetcher::grid(sample_grid())));
        let res = warp::test::request()
            .path("/api/vehicles/search?q=TATA")
            .reply(&api)
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        let ids: Vec<u64> = body_json(res.body())
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[tokio::test]
    async fn search_without_query_lists_listable() {
        let api = routes(state(full_config(), FakeFetcher::grid(sample_grid())));
        let res = warp::test::request()
            .path("/api/vehicles/search")
            .reply(&api)
            .await;
        assert_eq!(body_json(res.body()).as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn detail_by_id() {
        let api = routes(state(full_config(), FakeFetcher::grid(sample_grid())));

        let res = warp::test::request().path("/api/vehicles/2").reply(&api).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res.body())["name"], "Suresh");

        let res = warp::test::request().path("/api/vehicles/3").reply(&api).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = body_json(res.body());
        assert_eq!(body["error"], "Vehicle not found");
        assert_eq!(body["details"], "no vehicle with id 3");
    }

    #[tokio::test]
    async fn unknown_route_keeps_error_shape() {
        let api = routes(state(full_config(), FakeFetcher::grid(Vec::new())));
        let res = warp::test::request().path("/api/trucks").reply(&api).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(res.body())["error"], "Not found");
    }
}
