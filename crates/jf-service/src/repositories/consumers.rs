use crate::errors::AuthError;
use crate::models::Consumer;
use sqlx::PgPool;
use uuid::Uuid;

/// Fetch a consumer by id.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Consumer>, AuthError> {
    let consumer = sqlx::query_as::<_, Consumer>(
        r#"
        SELECT id, custom_id, username, created_at
        FROM consumers
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| AuthError::Database(format!("Failed to fetch consumer: {}", e)))?;

    Ok(consumer)
}
