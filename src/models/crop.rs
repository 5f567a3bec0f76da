use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database row for the crops reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CropInfo {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub shelf_life_days: i32,
}
