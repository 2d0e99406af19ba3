use cityinfo::{api, db, AppError, AppState, Config, Result};

use std::net::SocketAddr;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize the application
    cityinfo::init()?;

    let config = Config::from_env()?;

    let pool = db::connect(&config.database_url).await?;
    db::migrate(&pool).await?;

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .map_err(|e| AppError::Config(format!("invalid bind address: {}", e)))?;

    // Initialize application state
    let state = AppState::new(config, pool);

    // Build our application with routes
    let app = api::create_router().with_state(state);

    log::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
