use sqlx::PgPool;

use crate::models::CropInfo;

/// List crops, optionally restricted to one category, ordered by name.
pub async fn get_crops(pool: &PgPool, category: Option<&str>) -> anyhow::Result<Vec<CropInfo>> {
    let crops = sqlx::query_as::<_, CropInfo>(
        r#"
        SELECT id, name, category, shelf_life_days
        FROM crops
        WHERE ($1::TEXT IS NULL OR category = $1)
        ORDER BY name
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await?;

    Ok(crops)
}

/// Distinct crop categories, alphabetically.
pub async fn get_categories(pool: &PgPool) -> anyhow::Result<Vec<String>> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT DISTINCT category FROM crops ORDER BY category")
            .fetch_all(pool)
            .await?;

    Ok(rows.into_iter().map(|r| r.0).collect())
}

/// Case-insensitive substring search on crop name.
pub async fn search_crops(pool: &PgPool, query: &str, limit: i64) -> anyhow::Result<Vec<CropInfo>> {
    let pattern = format!("%{}%", query.trim());

    let crops = sqlx::query_as::<_, CropInfo>(
        r#"
        SELECT id, name, category, shelf_life_days
        FROM crops
        WHERE name ILIKE $1
        ORDER BY name
        LIMIT $2
        "#,
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(crops)
}

/// Fetch the crops with the given ids. Unknown ids are simply absent.
pub async fn get_crops_by_ids(pool: &PgPool, ids: &[i64]) -> anyhow::Result<Vec<CropInfo>> {
    let crops = sqlx::query_as::<_, CropInfo>(
        "SELECT id, name, category, shelf_life_days FROM crops WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(crops)
}
