//! HTTP dispatch for synthesized routes.
//!
//! Each route is registered for `GET` (variables from the query string) and
//! `POST` (variables from a JSON object body, an empty body counting as `{}`).
//! Handlers answer with the rendered operation, or with
//! `400 {"message": …}` when the request cannot be bound:
//!
//! ```json
//! { "query": "query Product($id: ID!) { … }", "operationName": "Product", "variables": { "id": "42" } }
//! ```

mod bind;

pub use bind::{bind_body, bind_query};

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{MatchedPath, Query, RawPathParams, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::error::BindError;
use crate::query::{Variables, render};
use crate::routes::{RouteDescriptor, RouteMap, from_axum_path};

#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteMap>,
}

/// Build the axum router with one handler pair per route.
pub fn build_router(routes: Arc<RouteMap>) -> Router {
    let mut router = Router::new();
    for route in routes.iter() {
        router = router.route(&route.axum_path(), get(handle_get).post(handle_post));
    }
    router.fallback(not_found).with_state(AppState { routes })
}

/// Serve `router` on `host:port` until the process is stopped. `host` may be
/// a name such as `localhost`.
pub async fn run_server(router: Router, host: &str, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");
    axum::serve(listener, router).await
}

async fn handle_get(
    State(state): State<AppState>,
    matched: MatchedPath,
    params: RawPathParams,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    tracing::info!(route = %matched.as_str(), "GET - Handler called");
    let Some(route) = lookup(&state, &matched) else {
        return not_found().await.into_response();
    };
    let variables = query
        .map_err(|e| BindError::MalformedQuery(e.body_text()))
        .and_then(|Query(query)| bind_query(route, &path_params(&params), &query));
    respond(route, variables)
}

async fn handle_post(
    State(state): State<AppState>,
    matched: MatchedPath,
    params: RawPathParams,
    body: Bytes,
) -> Response {
    tracing::info!(route = %matched.as_str(), "POST - Handler called");
    let Some(route) = lookup(&state, &matched) else {
        return not_found().await.into_response();
    };
    let variables = parse_body(&body)
        .and_then(|body| bind_body(route, &path_params(&params), body));
    respond(route, variables)
}

/// Decode a POST body regardless of its content type. Blank bodies are `{}`.
fn parse_body(body: &[u8]) -> Result<Value, BindError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Variables::new()));
    }
    serde_json::from_slice(body).map_err(|e| BindError::MalformedBody(e.to_string()))
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "No such route." })),
    )
}

fn lookup<'a>(state: &'a AppState, matched: &MatchedPath) -> Option<&'a RouteDescriptor> {
    let route = state.routes.get(&from_axum_path(matched.as_str()));
    if route.is_none() {
        tracing::error!(route = %matched.as_str(), "Route not found");
    }
    route
}

fn path_params(params: &RawPathParams) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

fn respond(route: &RouteDescriptor, variables: Result<Variables, BindError>) -> Response {
    let variables = match variables {
        Ok(variables) => variables,
        Err(e) => {
            tracing::warn!(route = %route.path, error = %e, "Cannot bind request");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": e.to_string() })),
            )
                .into_response();
        }
    };

    let rendered = render(route, &variables);
    tracing::info!(route = %route.path, operation = %rendered.operation_name, "Route found, building GQL");
    tracing::debug!("{}", rendered.query);

    Json(json!({
        "query": rendered.query,
        "operationName": rendered.operation_name,
        "variables": variables,
    }))
    .into_response()
}
