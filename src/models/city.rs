use serde::{Deserialize, Serialize};

use super::point_of_interest::{PointOfInterest, PointOfInterestDto};

/// A city row as stored in the database.
///
/// Deleting a city cascades to its points of interest at the store level.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Full city shape, with its points of interest nested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "pointsOfInterest")]
    pub points_of_interest: Vec<PointOfInterestDto>,
}

/// Summary city shape, without the points collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitySummaryDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl CityDto {
    /// Map a city entity plus its loaded children into the full shape.
    pub fn from_entity(city: City, points: Vec<PointOfInterest>) -> Self {
        Self {
            id: city.id,
            name: city.name,
            description: city.description,
            points_of_interest: points
                .into_iter()
                .map(PointOfInterestDto::from_entity)
                .collect(),
        }
    }
}

impl CitySummaryDto {
    pub fn from_entity(city: City) -> Self {
        Self {
            id: city.id,
            name: city.name,
            description: city.description,
        }
    }
}
