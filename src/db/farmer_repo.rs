use sqlx::PgPool;

use crate::models::{AddCropRequest, Farmer, FarmerCrop};

pub async fn get_farmer(pool: &PgPool, id: i64) -> anyhow::Result<Option<Farmer>> {
    let farmer = sqlx::query_as::<_, Farmer>("SELECT * FROM farmers WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(farmer)
}

/// Insert a farmer profile.
pub async fn create_farmer(pool: &PgPool, full_name: &str) -> anyhow::Result<Farmer> {
    let farmer = sqlx::query_as::<_, Farmer>(
        "INSERT INTO farmers (full_name) VALUES ($1) RETURNING *",
    )
    .bind(full_name)
    .fetch_one(pool)
    .await?;

    Ok(farmer)
}

/// Record the farmer's current location. Returns `None` for an unknown farmer.
pub async fn update_location(
    pool: &PgPool,
    id: i64,
    location_name: &str,
    latitude: f64,
    longitude: f64,
) -> anyhow::Result<Option<Farmer>> {
    let farmer = sqlx::query_as::<_, Farmer>(
        r#"
        UPDATE farmers
        SET location_name = $2, latitude = $3, longitude = $4, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(location_name)
    .bind(latitude)
    .bind(longitude)
    .fetch_optional(pool)
    .await?;

    Ok(farmer)
}

/// Record a crop on hand for a farmer, returning the new row id.
pub async fn add_crop(pool: &PgPool, farmer_id: i64, req: &AddCropRequest) -> anyhow::Result<i64> {
    let row: (i64,) = sqlx::query_as(
        r#"
        INSERT INTO farmer_crops (farmer_id, crop_id, weight_kg, harvest_date)
        VALUES ($1, $2, $3, COALESCE($4, CURRENT_DATE))
        RETURNING id
        "#,
    )
    .bind(farmer_id)
    .bind(req.crop_id)
    .bind(req.weight_kg)
    .bind(req.harvest_date)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

/// A farmer's crops on hand, newest first.
pub async fn get_crops(pool: &PgPool, farmer_id: i64) -> anyhow::Result<Vec<FarmerCrop>> {
    let crops = sqlx::query_as::<_, FarmerCrop>(
        r#"
        SELECT fc.id, fc.farmer_id, fc.weight_kg, fc.harvest_date, fc.created_at,
               c.id AS crop_id, c.name AS crop_name, c.category, c.shelf_life_days
        FROM farmer_crops fc
        JOIN crops c ON c.id = fc.crop_id
        WHERE fc.farmer_id = $1
        ORDER BY fc.created_at DESC, fc.id DESC
        "#,
    )
    .bind(farmer_id)
    .fetch_all(pool)
    .await?;

    Ok(crops)
}

/// Remove a crop from the farmer's inventory. Returns false if it did not exist.
pub async fn delete_crop(pool: &PgPool, farmer_id: i64, id: i64) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM farmer_crops WHERE id = $1 AND farmer_id = $2")
        .bind(id)
        .bind(farmer_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
