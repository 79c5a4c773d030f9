use crate::errors::AuthError;
use crate::models::JwtSecret;
use sqlx::PgPool;

/// Fetch a JWT credential by its lookup key.
///
/// A missing row is a normal `None`, not an error; only transport/query
/// failures surface as `AuthError::Database`.
pub async fn get_by_key(pool: &PgPool, key: &str) -> Result<Option<JwtSecret>, AuthError> {
    let secret = sqlx::query_as::<_, JwtSecret>(
        r#"
        SELECT id, key, algorithm, secret, rsa_public_key, consumer_id, created_at
        FROM jwt_secrets
        WHERE key = $1
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await
    .map_err(|e| AuthError::Database(format!("Failed to fetch jwt secret: {}", e)))?;

    Ok(secret)
}
