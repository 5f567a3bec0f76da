use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::GeoPoint;

/// Database row for the farmers table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Farmer {
    pub id: i64,
    pub full_name: String,
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Farmer {
    /// Location on file, if both coordinates are recorded and in range.
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon).ok(),
            _ => None,
        }
    }
}

/// A crop a farmer has on hand, joined with its reference data.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FarmerCrop {
    pub id: i64,
    pub farmer_id: i64,
    pub crop_id: i64,
    pub crop_name: String,
    pub category: String,
    pub shelf_life_days: i32,
    pub weight_kg: Decimal,
    pub harvest_date: NaiveDate,
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /api/farmers/:farmer_id/crops`. Harvest date defaults to
/// today.
#[derive(Debug, Clone, Deserialize)]
pub struct AddCropRequest {
    pub crop_id: i64,
    pub weight_kg: Decimal,
    pub harvest_date: Option<NaiveDate>,
}
