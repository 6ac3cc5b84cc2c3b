pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod types;
pub mod utils;
pub mod validation;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Authenticated API routes with request ids, without transport layers.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/ticket",
            get(handlers::tickets::list_tickets).post(handlers::tickets::create_ticket),
        )
        .route("/ticket/edit", post(handlers::tickets::update_ticket))
        .route("/ticket/assign", post(handlers::tickets::assign_ticket))
        .route(
            "/ticket/status",
            post(handlers::tickets::update_ticket_status),
        )
        .route(
            "/ticket/{id}",
            get(handlers::tickets::show_ticket).delete(handlers::tickets::delete_ticket),
        )
        .route("/ticket/{id}/logs", get(handlers::tickets::ticket_history))
        .route("/notif", get(handlers::notifications::list_notifications))
        .route(
            "/notif/{id}",
            get(handlers::notifications::view_notification),
        )
        .route("/user", get(handlers::users::current_user))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth,
        ));

    Router::new()
        .nest("/api", api)
        .layer(axum_middleware::from_fn(middleware::request_id))
        .with_state(state)
}
