//! Handlers for the points of interest sub-resource.
//!
//! Every mutating flow follows the same sequence: confirm the parent city,
//! load the target scoped to `(city_id, point_id)`, apply the change, commit
//! once. All handlers pass the explicit city-claim guard; the list handler
//! additionally re-checks the claim against the live city name.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::auth::{require_city, CurrentUser};
use crate::core::patch;
use crate::error::{AppError, Result};
use crate::models::{PointOfInterestDto, PointOfInterestUpsert};
use crate::state::AppState;

/// `GET /cities/{city_id}/pointsofinterest`
pub async fn list_points_of_interest(
    State(state): State<Arc<AppState>>,
    CurrentUser(claims): CurrentUser,
    Path(city_id): Path<i64>,
) -> Result<Json<Vec<PointOfInterestDto>>> {
    require_city(&claims, &state.config.policy_city)?;

    // Defense in depth: the claim must also match the live city name, not
    // just the configured policy city.
    if !state
        .repo
        .city_name_matches_city_id(Some(&claims.city), city_id)
        .await?
    {
        return Err(AppError::Forbidden(format!(
            "caller's city claim does not match city {}",
            city_id
        )));
    }

    if !state.repo.city_exists(city_id).await? {
        log::info!(
            "City with id {} wasn't found when accessing points of interest",
            city_id
        );
        return Err(city_not_found(city_id));
    }

    let points = state.repo.points_of_interest_for_city(city_id).await?;
    Ok(Json(
        points
            .into_iter()
            .map(PointOfInterestDto::from_entity)
            .collect(),
    ))
}

/// `GET /cities/{city_id}/pointsofinterest/{point_id}`
pub async fn get_point_of_interest(
    State(state): State<Arc<AppState>>,
    CurrentUser(claims): CurrentUser,
    Path((city_id, point_id)): Path<(i64, i64)>,
) -> Result<Json<PointOfInterestDto>> {
    require_city(&claims, &state.config.policy_city)?;

    if !state.repo.city_exists(city_id).await? {
        log::info!(
            "City with id {} wasn't found when accessing points of interest",
            city_id
        );
        return Err(city_not_found(city_id));
    }

    let point = state
        .repo
        .point_of_interest_for_city(city_id, point_id)
        .await?
        .ok_or_else(|| point_not_found(city_id, point_id))?;

    Ok(Json(PointOfInterestDto::from_entity(point)))
}

/// `POST /cities/{city_id}/pointsofinterest` — 201 with a `Location` header
/// pointing at the created resource.
pub async fn create_point_of_interest(
    State(state): State<Arc<AppState>>,
    CurrentUser(claims): CurrentUser,
    Path(city_id): Path<i64>,
    Json(payload): Json<PointOfInterestUpsert>,
) -> Result<impl IntoResponse> {
    require_city(&claims, &state.config.policy_city)?;
    payload.validate()?;

    if !state.repo.city_exists(city_id).await? {
        return Err(city_not_found(city_id));
    }

    let created = state.repo.add_point_of_interest(city_id, &payload).await?;
    let dto = PointOfInterestDto::from_entity(created);
    let location = format!("/api/v2/cities/{}/pointsofinterest/{}", city_id, dto.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(dto),
    ))
}

/// `PUT /cities/{city_id}/pointsofinterest/{point_id}` — full replace.
pub async fn update_point_of_interest(
    State(state): State<Arc<AppState>>,
    CurrentUser(claims): CurrentUser,
    Path((city_id, point_id)): Path<(i64, i64)>,
    Json(payload): Json<PointOfInterestUpsert>,
) -> Result<StatusCode> {
    require_city(&claims, &state.config.policy_city)?;
    payload.validate()?;

    if !state.repo.city_exists(city_id).await? {
        return Err(city_not_found(city_id));
    }

    if state
        .repo
        .point_of_interest_for_city(city_id, point_id)
        .await?
        .is_none()
    {
        return Err(point_not_found(city_id, point_id));
    }

    state
        .repo
        .update_point_of_interest(city_id, point_id, &payload)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /cities/{city_id}/pointsofinterest/{point_id}` — partial update.
///
/// The stored entity is projected into the updatable shape, the patch
/// document is applied to that detached copy, and the result is re-validated
/// with the full-update rules before anything is written back. A failing
/// patch or validation leaves the stored entity untouched.
pub async fn patch_point_of_interest(
    State(state): State<Arc<AppState>>,
    CurrentUser(claims): CurrentUser,
    Path((city_id, point_id)): Path<(i64, i64)>,
    Json(body): Json<serde_json::Value>,
) -> Result<StatusCode> {
    require_city(&claims, &state.config.policy_city)?;

    if !state.repo.city_exists(city_id).await? {
        return Err(city_not_found(city_id));
    }

    let entity = state
        .repo
        .point_of_interest_for_city(city_id, point_id)
        .await?
        .ok_or_else(|| point_not_found(city_id, point_id))?;

    let document = patch::parse_document(body)?;
    let mut projected = PointOfInterestUpsert::from_entity(&entity);
    patch::apply(&document, &mut projected)?;
    projected.validate()?;

    state
        .repo
        .update_point_of_interest(city_id, point_id, &projected)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /cities/{city_id}/pointsofinterest/{point_id}`
///
/// The mail notifier fires after the delete is applied but before it is
/// committed; a notifier panic aborts the request along with the pending
/// persistence.
pub async fn delete_point_of_interest(
    State(state): State<Arc<AppState>>,
    CurrentUser(claims): CurrentUser,
    Path((city_id, point_id)): Path<(i64, i64)>,
) -> Result<StatusCode> {
    require_city(&claims, &state.config.policy_city)?;

    if !state.repo.city_exists(city_id).await? {
        return Err(city_not_found(city_id));
    }

    let entity = state
        .repo
        .point_of_interest_for_city(city_id, point_id)
        .await?
        .ok_or_else(|| point_not_found(city_id, point_id))?;

    let mut tx = state.repo.begin().await?;
    state
        .repo
        .delete_point_of_interest(&mut tx, city_id, point_id)
        .await?;

    state.mail.send_email(
        "Point of interest deleted.",
        &format!(
            "Point of interest {} with id {} was deleted.",
            entity.name, entity.id
        ),
    );

    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

fn city_not_found(city_id: i64) -> AppError {
    AppError::NotFound(format!("city with id {} was not found", city_id))
}

fn point_not_found(city_id: i64, point_id: i64) -> AppError {
    AppError::NotFound(format!(
        "point of interest {} was not found in city {}",
        point_id, city_id
    ))
}
