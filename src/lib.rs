#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unreachable_pub)]

//! # CityInfo
//!
//! A REST API exposing cities and their points of interest as CRUD resources,
//! with JWT bearer authentication, URL versioning, pagination, patch-document
//! partial updates and PDF file upload/download.
//!
//! ## Features
//!
//! - **Cities**: filtered, paged listing (exact name match plus substring
//!   search) with pagination metadata in the `X-Pagination` header
//! - **Points of interest**: full CRUD under a parent city, including
//!   JSON-patch partial updates applied to a detached copy and re-validated
//!   before persistence
//! - **Authentication**: HS256 bearer tokens with a `city` claim, enforced by
//!   an explicit guard instead of declarative policies
//! - **Files**: PDF upload and a fixed-file download endpoint
//!
//! ## Quick Start
//!
//! ```no_run
//! use cityinfo::{api, db, AppState, Config, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     cityinfo::init()?;
//!     let config = Config::from_env()?;
//!     let pool = db::connect(&config.database_url).await?;
//!     db::migrate(&pool).await?;
//!
//!     let state = AppState::new(config, pool);
//!     let app = api::create_router().with_state(state);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

// Internal modules
pub mod api;
pub mod auth;
pub mod core;
pub mod db;
/// Defines the application's error types and result aliases.
pub mod error;
pub mod models;
pub mod notify;
pub mod state;
mod utils;

// Public API exports
pub use crate::{
    api::create_router,
    core::repository::CityInfoRepository,
    error::{AppError, Result},
    models::{City, CityDto, CitySummaryDto, PaginationMetadata, PointOfInterest},
    state::{AppState, Config, MAX_CITIES_PAGE_SIZE, MAX_UPLOAD_SIZE},
};

/// Initialize the application with default settings
///
/// Sets up logging; call early in application startup.
///
/// # Errors
///
/// Returns an error if logging initialization fails.
pub fn init() -> Result<()> {
    // Initialize logging with sensible defaults
    let env = env_logger::Env::default()
        .default_filter_or("info")
        .default_write_style_or("auto");

    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .format_module_path(false)
        .format_target(false)
        .try_init()
        .ok();

    log::info!("Initializing CityInfo");
    Ok(())
}
