use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::error::{AppError, Result};
use crate::models::{CityDto, CitySummaryDto};
use crate::state::{AppState, MAX_CITIES_PAGE_SIZE};

use super::responses::pagination_header;

fn default_page_number() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

/// Query parameters for the city listing.
#[derive(Debug, Deserialize)]
pub struct CitiesQuery {
    pub name: Option<String>,
    #[serde(rename = "searchQuery")]
    pub search_query: Option<String>,
    #[serde(rename = "pageNumber", default = "default_page_number")]
    pub page_number: u32,
    #[serde(rename = "pageSize", default = "default_page_size")]
    pub page_size: u32,
}

#[derive(Debug, Deserialize)]
pub struct GetCityQuery {
    #[serde(rename = "includePointsOfInterest", default)]
    pub include_points_of_interest: bool,
}

/// `GET /cities` — filtered, paged summary list with an `X-Pagination`
/// response header. Requested page sizes above the maximum are silently
/// clamped before the query runs.
pub async fn list_cities(
    State(state): State<Arc<AppState>>,
    CurrentUser(_claims): CurrentUser,
    Query(query): Query<CitiesQuery>,
) -> Result<Response> {
    let page_size = query.page_size.min(MAX_CITIES_PAGE_SIZE);
    let page_number = query.page_number.max(1);

    let (cities, metadata) = state
        .repo
        .list_cities(
            query.name.as_deref(),
            query.search_query.as_deref(),
            page_number,
            page_size,
        )
        .await?;

    let header = pagination_header(&metadata)?;
    let body: Vec<CitySummaryDto> = cities.into_iter().map(CitySummaryDto::from_entity).collect();

    Ok(([header], Json(body)).into_response())
}

/// `GET /cities/{city_id}` — full shape when `includePointsOfInterest=true`,
/// summary shape otherwise.
pub async fn get_city(
    State(state): State<Arc<AppState>>,
    CurrentUser(_claims): CurrentUser,
    Path(city_id): Path<i64>,
    Query(query): Query<GetCityQuery>,
) -> Result<Response> {
    if query.include_points_of_interest {
        let (city, points) = state
            .repo
            .get_city_with_points(city_id)
            .await?
            .ok_or_else(|| city_not_found(city_id))?;
        Ok(Json(CityDto::from_entity(city, points)).into_response())
    } else {
        let city = state
            .repo
            .get_city(city_id)
            .await?
            .ok_or_else(|| city_not_found(city_id))?;
        Ok(Json(CitySummaryDto::from_entity(city)).into_response())
    }
}

fn city_not_found(city_id: i64) -> AppError {
    AppError::NotFound(format!("city with id {} was not found", city_id))
}
