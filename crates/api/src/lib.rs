pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh))
        .route("/me", get(routes::auth::me))
        .route("/me", put(routes::auth::update_me));

    // Collaboration management: student-side link ownership plus
    // collaborator-side invites and student selection.
    let collaboration_routes = Router::new()
        .route("/link", get(routes::collaboration::list_links))
        .route("/link", post(routes::collaboration::invite))
        .route(
            "/link/{link_id}/permissions",
            patch(routes::collaboration::update_permissions),
        )
        .route("/link/{link_id}", delete(routes::collaboration::revoke))
        .route("/invite", get(routes::collaboration::pending_invites))
        .route(
            "/invite/{link_id}/accept",
            post(routes::collaboration::accept_invite),
        )
        .route("/student", get(routes::collaboration::list_students))
        .route(
            "/active-student",
            put(routes::collaboration::set_active_student),
        );

    // College routes
    let college_routes = Router::new()
        .route("/", get(routes::college::list))
        .route("/", post(routes::college::create))
        .route("/{college_id}", get(routes::college::get))
        .route("/{college_id}", put(routes::college::update))
        .route("/{college_id}", delete(routes::college::delete));

    // Task routes
    let task_routes = Router::new()
        .route("/", get(routes::task::list))
        .route("/", post(routes::task::create))
        .route("/{task_id}", get(routes::task::get))
        .route("/{task_id}", put(routes::task::update))
        .route("/{task_id}", delete(routes::task::delete));

    // Essay routes
    let essay_routes = Router::new()
        .route("/", get(routes::essay::list))
        .route("/", post(routes::essay::create))
        .route("/{essay_id}", get(routes::essay::get))
        .route("/{essay_id}", put(routes::essay::update))
        .route("/{essay_id}", delete(routes::essay::delete))
        .route("/{essay_id}/critique", post(routes::essay::critique));

    // Document routes
    let document_routes = Router::new()
        .route("/", get(routes::document::list))
        .route("/", post(routes::document::create))
        .route("/{document_id}", get(routes::document::get))
        .route("/{document_id}", put(routes::document::update))
        .route("/{document_id}", delete(routes::document::delete));

    // Scholarship routes
    let scholarship_routes = Router::new()
        .route("/", get(routes::scholarship::list))
        .route("/", post(routes::scholarship::create))
        .route("/{scholarship_id}", get(routes::scholarship::get))
        .route("/{scholarship_id}", put(routes::scholarship::update))
        .route("/{scholarship_id}", delete(routes::scholarship::delete));

    // Compose API
    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/collaboration", collaboration_routes)
        .nest("/college", college_routes)
        .nest("/task", task_routes)
        .nest("/essay", essay_routes)
        .nest("/document", document_routes)
        .nest("/scholarship", scholarship_routes)
        .route("/workspace", get(routes::workspace::get))
        .route("/calendar/feed.ics", get(routes::calendar::feed));

    // Health check
    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
