//! Database pool construction, schema bootstrap and first-run seeding

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::Result;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS cities (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS points_of_interest (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    city_id     INTEGER NOT NULL REFERENCES cities(id) ON DELETE CASCADE,
    name        TEXT NOT NULL,
    description TEXT
);
"#;

/// Open a connection pool against the configured SQLite database.
///
/// The database file is created on first use and foreign keys are enforced so
/// that deleting a city cascades to its points of interest.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Create the schema if needed and seed the initial data set once.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;

    let city_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cities")
        .fetch_one(pool)
        .await?;

    if city_count == 0 {
        seed(pool).await?;
        log::info!("Seeded initial cities and points of interest");
    }

    Ok(())
}

/// Insert the well-known starter rows: three cities, three points of interest.
async fn seed(pool: &SqlitePool) -> Result<()> {
    let cities: [(i64, &str, &str); 3] = [
        (1, "New York City", "The one with that big park"),
        (
            2,
            "Antwerp",
            "The one with the cathedral that was never really finished",
        ),
        (3, "Paris", "The one with that big tower"),
    ];

    let points: [(i64, i64, &str, &str); 3] = [
        (1, 1, "Central Park", "The most visited urban park in the USA"),
        (
            2,
            1,
            "Empire State Building",
            "A 102-story skyscrapper located in Midtown Manhattan",
        ),
        (
            3,
            2,
            "Cathedral",
            "A Gothic style cathedral, conceived by architects...",
        ),
    ];

    let mut tx = pool.begin().await?;

    for (id, name, description) in cities {
        sqlx::query("INSERT INTO cities (id, name, description) VALUES (?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(description)
            .execute(&mut *tx)
            .await?;
    }

    for (id, city_id, name, description) in points {
        sqlx::query(
            "INSERT INTO points_of_interest (id, city_id, name, description) VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(city_id)
        .bind(name)
        .bind(description)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}
