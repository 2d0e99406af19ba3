//! API module for handling HTTP requests and responses

pub mod authentication;
pub mod cities;
pub mod files;
pub mod points_of_interest;
pub(crate) mod responses;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::{AppState, MAX_UPLOAD_SIZE};

/// Create the application router with all routes.
///
/// Cities and files are exposed under `/api/v1` and `/api/v2`; points of
/// interest only under `/api/v2`. Authentication is unversioned.
pub fn create_router() -> Router<Arc<AppState>> {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let cities = Router::new()
        .route("/cities", get(cities::list_cities))
        .route("/cities/:city_id", get(cities::get_city));

    let points_of_interest = Router::new()
        .route(
            "/cities/:city_id/pointsofinterest",
            get(points_of_interest::list_points_of_interest)
                .post(points_of_interest::create_point_of_interest),
        )
        .route(
            "/cities/:city_id/pointsofinterest/:point_id",
            get(points_of_interest::get_point_of_interest)
                .put(points_of_interest::update_point_of_interest)
                .patch(points_of_interest::patch_point_of_interest)
                .delete(points_of_interest::delete_point_of_interest),
        );

    let files = Router::new()
        .route("/files", post(files::upload_file))
        .route("/files/:file_id", get(files::get_file))
        // allow some slack for the multipart framing around the payload cap
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE + 16 * 1024));

    let v1 = Router::new().merge(cities.clone()).merge(files.clone());
    let v2 = Router::new()
        .merge(cities)
        .merge(points_of_interest)
        .merge(files);

    Router::new()
        // Public health check
        .route("/api/health", get(health_check))
        .route(
            "/api/authentication/authenticate",
            post(authentication::authenticate),
        )
        .nest("/api/v1", v1)
        .nest("/api/v2", v2)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}
