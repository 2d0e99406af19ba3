use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::auth::{issue_token, validate_user_credentials};
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AuthenticationRequest {
    #[serde(rename = "userName")]
    pub user_name: Option<String>,
    pub password: Option<String>,
}

/// `POST /authentication/authenticate` — validate credentials (stubbed) and
/// return a signed token as the raw response body.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AuthenticationRequest>,
) -> Result<String> {
    let user = validate_user_credentials(body.user_name.as_deref(), body.password.as_deref())
        .ok_or_else(|| AppError::Unauthorized("invalid credentials".to_string()))?;

    issue_token(&state.config.auth, &user)
}
