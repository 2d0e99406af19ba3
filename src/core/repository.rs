//! Query/command facade over the city store.
//!
//! Reads are plain pool queries; each mutating request commits exactly once,
//! either implicitly (single-statement writes) or through an explicit
//! transaction handed out by [`CityInfoRepository::begin`].

use sqlx::sqlite::SqlitePool;
use sqlx::{Sqlite, Transaction};

use crate::error::Result;
use crate::models::{City, PaginationMetadata, PointOfInterest, PointOfInterestUpsert};
use crate::utils::non_blank;

/// Filter clause shared by the city page query and its companion count query.
///
/// `?1` is the exact-match name filter, `?2` the substring search. A NULL
/// description never matches the search branch.
const CITY_FILTER: &str = "(?1 IS NULL OR name = ?1) \
     AND (?2 IS NULL OR instr(name, ?2) > 0 \
          OR (description IS NOT NULL AND instr(description, ?2) > 0))";

/// Repository over cities and their points of interest.
#[derive(Debug, Clone)]
pub struct CityInfoRepository {
    pool: SqlitePool,
}

impl CityInfoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Start a request-scoped transaction for multi-step mutations.
    pub async fn begin(&self) -> Result<Transaction<'_, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    /// List cities filtered by exact `name` and/or substring `search_query`,
    /// ordered by name (id as tiebreak so pages stay stable for duplicate
    /// names), paged with `LIMIT/OFFSET`.
    ///
    /// The caller clamps `page_size`; a `page_number` beyond the filtered set
    /// yields an empty page, not an error. The metadata's total reflects the
    /// filtered set before paging.
    pub async fn list_cities(
        &self,
        name: Option<&str>,
        search_query: Option<&str>,
        page_number: u32,
        page_size: u32,
    ) -> Result<(Vec<City>, PaginationMetadata)> {
        let name = non_blank(name);
        let search_query = non_blank(search_query);

        let total_item_count: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM cities WHERE {}", CITY_FILTER))
                .bind(name.as_deref())
                .bind(search_query.as_deref())
                .fetch_one(&self.pool)
                .await?;

        let metadata = PaginationMetadata::new(total_item_count, page_size, page_number);

        let offset = i64::from(page_size) * (i64::from(page_number) - 1).max(0);
        let cities = sqlx::query_as::<_, City>(&format!(
            "SELECT id, name, description FROM cities WHERE {} \
             ORDER BY name ASC, id ASC LIMIT ?3 OFFSET ?4",
            CITY_FILTER
        ))
        .bind(name.as_deref())
        .bind(search_query.as_deref())
        .bind(i64::from(page_size))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((cities, metadata))
    }

    /// Single-row city lookup; absent is `None`, not an error.
    pub async fn get_city(&self, city_id: i64) -> Result<Option<City>> {
        let city =
            sqlx::query_as::<_, City>("SELECT id, name, description FROM cities WHERE id = ?")
                .bind(city_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(city)
    }

    /// City lookup with its points of interest eagerly loaded.
    pub async fn get_city_with_points(
        &self,
        city_id: i64,
    ) -> Result<Option<(City, Vec<PointOfInterest>)>> {
        let Some(city) = self.get_city(city_id).await? else {
            return Ok(None);
        };
        let points = self.points_of_interest_for_city(city_id).await?;
        Ok(Some((city, points)))
    }

    pub async fn city_exists(&self, city_id: i64) -> Result<bool> {
        let exists: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM cities WHERE id = ?)")
            .bind(city_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists != 0)
    }

    /// Authorization check: does the caller's claimed city name own `city_id`?
    pub async fn city_name_matches_city_id(
        &self,
        city_name: Option<&str>,
        city_id: i64,
    ) -> Result<bool> {
        let Some(city_name) = city_name else {
            return Ok(false);
        };
        let matches: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM cities WHERE id = ? AND name = ?)")
                .bind(city_id)
                .bind(city_name)
                .fetch_one(&self.pool)
                .await?;
        Ok(matches != 0)
    }

    pub async fn points_of_interest_for_city(&self, city_id: i64) -> Result<Vec<PointOfInterest>> {
        let points = sqlx::query_as::<_, PointOfInterest>(
            "SELECT id, city_id, name, description FROM points_of_interest \
             WHERE city_id = ? ORDER BY id ASC",
        )
        .bind(city_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(points)
    }

    /// Item lookup scoped to `(city_id, point_id)`; a point owned by another
    /// city is absent, not an error.
    pub async fn point_of_interest_for_city(
        &self,
        city_id: i64,
        point_id: i64,
    ) -> Result<Option<PointOfInterest>> {
        let point = sqlx::query_as::<_, PointOfInterest>(
            "SELECT id, city_id, name, description FROM points_of_interest \
             WHERE city_id = ? AND id = ?",
        )
        .bind(city_id)
        .bind(point_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(point)
    }

    /// Insert a new point of interest under a city and return the stored row.
    pub async fn add_point_of_interest(
        &self,
        city_id: i64,
        payload: &PointOfInterestUpsert,
    ) -> Result<PointOfInterest> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO points_of_interest (city_id, name, description) \
             VALUES (?, ?, ?) RETURNING id",
        )
        .bind(city_id)
        .bind(&payload.name)
        .bind(payload.description.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(PointOfInterest {
            id,
            city_id,
            name: payload.name.clone(),
            description: payload.description.clone(),
        })
    }

    /// Full replace of an existing point of interest.
    pub async fn update_point_of_interest(
        &self,
        city_id: i64,
        point_id: i64,
        payload: &PointOfInterestUpsert,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE points_of_interest SET name = ?, description = ? \
             WHERE city_id = ? AND id = ?",
        )
        .bind(&payload.name)
        .bind(payload.description.as_deref())
        .bind(city_id)
        .bind(point_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Delete inside a caller-owned transaction; the commit is the caller's
    /// single persistence step.
    pub async fn delete_point_of_interest(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        city_id: i64,
        point_id: i64,
    ) -> Result<()> {
        sqlx::query("DELETE FROM points_of_interest WHERE city_id = ? AND id = ?")
            .bind(city_id)
            .bind(point_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn seeded_repo() -> CityInfoRepository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::raw_sql("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await
            .unwrap();
        crate::db::migrate(&pool).await.unwrap();
        CityInfoRepository::new(pool)
    }

    #[tokio::test]
    async fn test_list_cities_orders_by_name() {
        let repo = seeded_repo().await;
        let (cities, metadata) = repo.list_cities(None, None, 1, 10).await.unwrap();

        let names: Vec<&str> = cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Antwerp", "New York City", "Paris"]);
        assert_eq!(metadata.total_item_count, 3);
        assert_eq!(metadata.total_page_count, 1);
    }

    #[tokio::test]
    async fn test_name_filter_is_exact_match() {
        let repo = seeded_repo().await;

        let (cities, metadata) = repo.list_cities(Some("Paris"), None, 1, 10).await.unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(metadata.total_item_count, 1);

        // Substrings of a stored name must not match
        let (cities, _) = repo.list_cities(Some("Pari"), None, 1, 10).await.unwrap();
        assert!(cities.is_empty());
    }

    #[tokio::test]
    async fn test_name_filter_is_trimmed() {
        let repo = seeded_repo().await;
        let (cities, _) = repo
            .list_cities(Some("  Paris  "), None, 1, 10)
            .await
            .unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].name, "Paris");
    }

    #[tokio::test]
    async fn test_search_matches_name_or_description() {
        let repo = seeded_repo().await;

        // "tower" appears only in Paris's description
        let (cities, _) = repo.list_cities(None, Some("tower"), 1, 10).await.unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].name, "Paris");

        // "Antwerp" matches by name
        let (cities, _) = repo
            .list_cities(None, Some("Antwerp"), 1, 10)
            .await
            .unwrap();
        assert_eq!(cities.len(), 1);
    }

    #[tokio::test]
    async fn test_filters_combine_with_and() {
        let repo = seeded_repo().await;
        let (cities, _) = repo
            .list_cities(Some("Paris"), Some("cathedral"), 1, 10)
            .await
            .unwrap();
        assert!(cities.is_empty());
    }

    #[tokio::test]
    async fn test_pagination_skip_take() {
        let repo = seeded_repo().await;

        let (page_two, metadata) = repo.list_cities(None, None, 2, 1).await.unwrap();
        assert_eq!(page_two.len(), 1);
        assert_eq!(page_two[0].name, "New York City");
        assert_eq!(metadata.total_item_count, 3);
        assert_eq!(metadata.total_page_count, 3);
        assert_eq!(metadata.current_page, 2);
    }

    #[tokio::test]
    async fn test_page_beyond_range_is_empty_not_error() {
        let repo = seeded_repo().await;
        let (cities, metadata) = repo.list_cities(None, None, 99, 10).await.unwrap();
        assert!(cities.is_empty());
        assert_eq!(metadata.total_item_count, 3);
    }

    #[tokio::test]
    async fn test_total_reflects_filtered_set() {
        let repo = seeded_repo().await;
        let (_, metadata) = repo.list_cities(None, Some("tower"), 1, 1).await.unwrap();
        assert_eq!(metadata.total_item_count, 1);
    }

    #[tokio::test]
    async fn test_get_city_with_points_nests_children() {
        let repo = seeded_repo().await;
        let (city, points) = repo.get_city_with_points(1).await.unwrap().unwrap();
        assert_eq!(city.name, "New York City");
        assert_eq!(points.len(), 2);
    }

    #[tokio::test]
    async fn test_point_lookup_is_scoped_to_city() {
        let repo = seeded_repo().await;

        // Point 1 belongs to city 1, not city 2
        assert!(repo
            .point_of_interest_for_city(2, 1)
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .point_of_interest_for_city(1, 1)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_city_name_matches_city_id() {
        let repo = seeded_repo().await;

        assert!(repo
            .city_name_matches_city_id(Some("Antwerp"), 2)
            .await
            .unwrap());
        assert!(!repo
            .city_name_matches_city_id(Some("Paris"), 2)
            .await
            .unwrap());
        assert!(!repo.city_name_matches_city_id(None, 2).await.unwrap());
    }

    #[tokio::test]
    async fn test_add_update_delete_point() {
        let repo = seeded_repo().await;

        let created = repo
            .add_point_of_interest(
                3,
                &PointOfInterestUpsert {
                    name: "Eiffel Tower".to_string(),
                    description: Some("Iron lattice tower".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(created.city_id, 3);

        repo.update_point_of_interest(
            3,
            created.id,
            &PointOfInterestUpsert {
                name: "Eiffel Tower (updated)".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

        let updated = repo
            .point_of_interest_for_city(3, created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Eiffel Tower (updated)");
        assert!(updated.description.is_none());

        let mut tx = repo.begin().await.unwrap();
        repo.delete_point_of_interest(&mut tx, 3, created.id)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert!(repo
            .point_of_interest_for_city(3, created.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_uncommitted_delete_is_not_persisted() {
        let repo = seeded_repo().await;

        let mut tx = repo.begin().await.unwrap();
        repo.delete_point_of_interest(&mut tx, 1, 1).await.unwrap();
        tx.rollback().await.unwrap();

        assert!(repo
            .point_of_interest_for_city(1, 1)
            .await
            .unwrap()
            .is_some());
    }
}
