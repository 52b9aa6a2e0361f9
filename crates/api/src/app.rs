use axum::{
    middleware,
    routing::get,
    Router,
};
use persistence::repositories::UserRepository;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware};
use crate::routes::{health, users};

#[derive(Clone)]
pub struct AppState {
    pub users: UserRepository,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, users: UserRepository) -> Router {
    let config = Arc::new(config);
    let prefix = config.server.api_prefix.trim_end_matches('/').to_string();

    let state = AppState {
        users,
        config: config.clone(),
    };

    // The API serves a separately hosted frontend, so CORS is wide
    // open: any origin, method, and header.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health::home))
        .route("/metrics", get(metrics_handler))
        .route(
            &format!("{prefix}/users"),
            get(users::list_users).post(users::create_user),
        )
        .route(&format!("{prefix}/users/search"), get(users::search_users))
        .route(
            &format!("{prefix}/users/:id"),
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
