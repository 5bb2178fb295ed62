use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue, Method},
    routing::{get, post, put, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, user, token, me, role, user_role, bundle, song, setlist, setlist_role};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
    cors::{AllowOrigin, CorsLayer},
};
use tracing::{info_span, Span, error, info, warn};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(state.config.cors_allowed_origin.as_deref());

    Router::new()
        .route("/health", get(health::health_check))

        // Users & tokens
        .route("/api/v1/users", post(user::register).get(user::list_users))
        .route("/api/v1/users/login", post(user::login))
        .route("/api/v1/users/{id}", delete(user::delete_user))
        .route("/api/v1/users/{id}/permission", put(user::set_permission))
        .route("/api/v1/tokens/renew", post(token::renew_access))

        // Current user
        .route("/api/v1/me", get(me::get_me).put(me::update_me).delete(me::delete_me))
        .route("/api/v1/me/logout", post(me::logout))

        // Roles
        .route("/api/v1/roles", get(role::list_roles).post(role::create_role))
        .route("/api/v1/roles/{id}", put(role::update_role).delete(role::delete_role))
        .route("/api/v1/userroles", get(user_role::list_user_roles))
        .route("/api/v1/userroles/me", get(user_role::list_my_user_roles).patch(user_role::set_active_roles))

        // Catalogue
        .route("/api/v1/bundles", get(bundle::list_bundles).post(bundle::create_bundle))
        .route("/api/v1/bundles/{id}", get(bundle::get_bundle).put(bundle::update_bundle).delete(bundle::delete_bundle))
        .route("/api/v1/songs", get(song::list_songs).post(song::create_song))
        .route("/api/v1/songs/{id}", get(song::get_song).put(song::update_song).delete(song::delete_song))

        // Setlists
        .route("/api/v1/setlists", get(setlist::list_setlists).post(setlist::create_setlist))
        .route("/api/v1/setlists/{id}", get(setlist::get_setlist).put(setlist::update_setlist).delete(setlist::delete_setlist))
        .route(
            "/api/v1/setlistroles",
            get(setlist_role::list_setlist_roles)
                .post(setlist_role::create_setlist_roles)
                .delete(setlist_role::delete_setlist_roles),
        )

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => layer.allow_origin(AllowOrigin::exact(value)),
        Some(Err(_)) => {
            warn!("CORS_ALLOWED_ORIGIN is not a valid header value, cross-origin requests are disabled");
            layer
        }
        None => layer,
    }
}
