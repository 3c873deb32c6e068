use crate::common::error::AppError;
use crate::config::AppState;
use crate::middleware::auth::AuthenticatedUser;

// ---
// RLS helper: hands the database the caller's identity
// ---
/// Acquires a pooled connection and sets `app.user_id`, which the row-level
/// security policies compare against each row's `user_id`.
pub async fn get_rls_connection(
    app_state: &AppState,
    user: &AuthenticatedUser,
) -> Result<sqlx::pool::PoolConnection<sqlx::Postgres>, AppError> {
    let mut conn = app_state.db_pool.acquire().await?;

    // Session scope: the setting must survive across the statements and
    // transactions run on this connection. Every checkout overwrites it.
    sqlx::query("SELECT set_config('app.user_id', $1, false)")
        .bind(user.0.id.to_string())
        .execute(&mut *conn)
        .await?;

    Ok(conn)
}
