use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Maximum length accepted for a point of interest name.
pub const MAX_NAME_LEN: usize = 50;
/// Maximum length accepted for a point of interest description.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// A point of interest row, always owned by exactly one city.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PointOfInterest {
    pub id: i64,
    pub city_id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Outbound point of interest shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointOfInterestDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Inbound shape shared by create (POST), full replace (PUT) and the patch
/// projection (PATCH).
///
/// Patch documents are applied to a detached instance of this type, which is
/// then re-validated before anything touches the stored entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointOfInterestUpsert {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl PointOfInterestDto {
    pub fn from_entity(point: PointOfInterest) -> Self {
        Self {
            id: point.id,
            name: point.name,
            description: point.description,
        }
    }
}

impl PointOfInterestUpsert {
    /// Project a stored entity into the updatable shape.
    pub fn from_entity(point: &PointOfInterest) -> Self {
        Self {
            name: point.name.clone(),
            description: point.description.clone(),
        }
    }

    /// Validate the payload with the same rules for create, replace and
    /// post-patch revalidation.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation(
                "name is required and must not be blank".to_string(),
            ));
        }
        if self.name.len() > MAX_NAME_LEN {
            return Err(AppError::Validation(format!(
                "name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }
        if let Some(description) = &self.description {
            if description.len() > MAX_DESCRIPTION_LEN {
                return Err(AppError::Validation(format!(
                    "description must be at most {} characters",
                    MAX_DESCRIPTION_LEN
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_minimal_payload() {
        let payload = PointOfInterestUpsert {
            name: "Central Park".to_string(),
            description: None,
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let payload = PointOfInterestUpsert {
            name: "   ".to_string(),
            description: Some("still described".to_string()),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_overlong_name() {
        let payload = PointOfInterestUpsert {
            name: "x".repeat(MAX_NAME_LEN + 1),
            description: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_projection_round_trip() {
        let entity = PointOfInterest {
            id: 7,
            city_id: 2,
            name: "Cathedral".to_string(),
            description: Some("Gothic".to_string()),
        };
        let projected = PointOfInterestUpsert::from_entity(&entity);
        assert_eq!(projected.name, "Cathedral");
        assert_eq!(projected.description.as_deref(), Some("Gothic"));
    }
}
