//! Web Router & Dispatch
//! Mission: Gate every route behind the session check and fan /api calls
//! out to the controller client

pub mod api;
pub mod pages;

use crate::auth::{session_id_from_cookie, AuthError, Authenticator, Session};
use crate::controller::ControllerClient;
use crate::web::api::ApiRoute;
use axum::{
    body::Bytes,
    extract::{Path, Request, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{any, get},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<Authenticator>,
    pub controller: Arc<ControllerClient>,
}

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/", get(dashboard))
        .route("/index.html", get(dashboard))
        .route("/api/*rest", any(api_dispatch))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    Router::new()
        .route("/login", get(login_page).post(login_post))
        .route("/logout", get(logout))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Protected-route gate. Validates the session cookie before the handler
/// runs; on failure the browser is bounced to the login form with the
/// originally requested path carried along (literally, unescaped).
async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    let cookie = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok());

    match state.auth.check_request(cookie) {
        Ok(session) => {
            req.extensions_mut().insert::<Session>(session);
            next.run(req).await
        }
        Err(_) => found(&format!("/login?redirect={}", path)).into_response(),
    }
}

async fn dashboard() -> Html<&'static str> {
    Html(pages::DASHBOARD_PAGE)
}

async fn not_found(uri: Uri) -> Response {
    // "/api/" itself misses the wildcard route and lands here, but it is
    // still part of the JSON API surface, not a browser page
    if uri.path().starts_with("/api/") {
        return json_error(StatusCode::NOT_FOUND, "API endpoint not found");
    }
    (StatusCode::NOT_FOUND, Html(pages::NOT_FOUND_PAGE)).into_response()
}

async fn login_page() -> Html<&'static str> {
    Html(pages::LOGIN_PAGE)
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login_post(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match state.auth.authenticate(&form.username, &form.password) {
        Ok(session) => {
            let cookie = format!("session={}; Path=/; HttpOnly", session.session_id);
            (
                StatusCode::FOUND,
                [
                    (header::SET_COOKIE, cookie),
                    (header::LOCATION, "/".to_string()),
                ],
            )
                .into_response()
        }
        Err(e @ (AuthError::LoadUsers | AuthError::SaveUsers)) => {
            warn!("Login aborted, credential store failure: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
        Err(e @ AuthError::SessionLimit) => {
            warn!("Login rejected: {}", e);
            json_error(StatusCode::SERVICE_UNAVAILABLE, &e.to_string())
        }
        Err(_) => {
            (StatusCode::UNAUTHORIZED, Html(pages::LOGIN_FAILED_PAGE)).into_response()
        }
    }
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(session_id) = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(session_id_from_cookie)
    {
        // Best effort; an already-dead session still clears the cookie
        let _ = state.auth.logout(&session_id);
    }

    (
        StatusCode::FOUND,
        [
            (
                header::SET_COOKIE,
                "session=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT".to_string(),
            ),
            (header::LOCATION, "/login".to_string()),
        ],
    )
        .into_response()
}

/// Everything under /api/. Resolution happens before any outbound call, so
/// malformed paths never reach the controller.
async fn api_dispatch(
    State(state): State<AppState>,
    Path(rest): Path<String>,
    method: Method,
    body: Bytes,
) -> Response {
    let Some(route) = api::resolve(&method, &rest) else {
        return json_error(StatusCode::NOT_FOUND, "API endpoint not found");
    };

    let ctl = &state.controller;
    match route {
        ApiRoute::Status => match ctl.status().await {
            Ok(v) => Json(v).into_response(),
            Err(e) => controller_error("Failed to get ZeroTier status", e),
        },

        ApiRoute::NetworkList => match ctl.list_networks().await {
            Ok(v) => Json(v).into_response(),
            Err(e) => controller_error("Failed to get networks", e),
        },

        ApiRoute::NetworkCreate => {
            let req = match parse_body(&body) {
                Ok(v) => v,
                Err(resp) => return resp,
            };
            let name = req["name"].as_str().unwrap_or("");
            let description = req["description"].as_str().unwrap_or("");
            match ctl.create_network(name, description).await {
                Ok(v) => (StatusCode::CREATED, Json(v)).into_response(),
                Err(e) => controller_error("Failed to create network", e),
            }
        }

        ApiRoute::NetworkDetail(id) => match ctl.get_network(&id).await {
            Ok(v) => Json(v).into_response(),
            Err(_) => json_error(StatusCode::NOT_FOUND, "Network not found"),
        },

        ApiRoute::NetworkUpdate(id) => {
            let config = match parse_body(&body) {
                Ok(v) => v,
                Err(resp) => return resp,
            };
            match ctl.update_network(&id, &config).await {
                Ok(v) => Json(v).into_response(),
                Err(e) => controller_error("Failed to update network", e),
            }
        }

        ApiRoute::NetworkDelete(id) => match ctl.delete_network(&id).await {
            Ok(()) => Json(json!({
                "message": "Network deleted successfully",
                "deleted": true,
            }))
            .into_response(),
            Err(e) => controller_error("Failed to delete network", e),
        },

        ApiRoute::MemberList(id) => match ctl.list_members(&id).await {
            Ok(v) => Json(v).into_response(),
            Err(e) => controller_error("Failed to get members", e),
        },

        ApiRoute::MemberDetail(id, member) => match ctl.get_member(&id, &member).await {
            Ok(v) => Json(v).into_response(),
            Err(_) => json_error(StatusCode::NOT_FOUND, "Member not found"),
        },

        ApiRoute::MemberUpdate(id, member) => {
            let config = match parse_body(&body) {
                Ok(v) => v,
                Err(resp) => return resp,
            };
            match ctl.update_member(&id, &member, &config).await {
                Ok(v) => Json(v).into_response(),
                Err(e) => controller_error("Failed to update member", e),
            }
        }

        ApiRoute::MemberDelete(id, member) => match ctl.delete_member(&id, &member).await {
            Ok(()) => Json(json!({
                "message": "Member deleted successfully",
                "deleted": true,
            }))
            .into_response(),
            Err(e) => controller_error("Failed to delete member", e),
        },
    }
}

fn parse_body(body: &Bytes) -> Result<Value, Response> {
    if body.is_empty() {
        return Err(json_error(StatusCode::BAD_REQUEST, "Request body required"));
    }
    serde_json::from_slice(body)
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "Invalid JSON"))
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn controller_error(message: &str, err: anyhow::Error) -> Response {
    warn!("Controller call failed: {:#}", err);
    json_error(StatusCode::INTERNAL_SERVER_ERROR, message)
}

// 302, matching the redirects browsers get from the reference UI
fn found(location: &str) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}
