//! Entities, DTOs and the hand-written mappings between them

pub mod city;
pub mod pagination;
pub mod point_of_interest;

pub use city::{City, CityDto, CitySummaryDto};
pub use pagination::PaginationMetadata;
pub use point_of_interest::{PointOfInterest, PointOfInterestDto, PointOfInterestUpsert};
