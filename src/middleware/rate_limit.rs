use axum::{http::StatusCode, Json};
use serde_json::json;

/// Per-key attempt limit stored in Redis with INCR + EXPIRE: the TTL is
/// only set on the first increment so the window is not pushed back on
/// every attempt. Past `max_attempts`, 429.
pub async fn check_rate_limit(
    redis: &mut redis::aio::MultiplexedConnection,
    key: &str,
    max_attempts: u64,
    window_secs: u64,
) -> Result<(), (StatusCode, Json<serde_json::Value>)> {
    let count: u64 = redis::cmd("INCR")
        .arg(key)
        .query_async(redis)
        .await
        .unwrap_or(0);

    if count == 1 {
        let _: Result<(), _> = redis::cmd("EXPIRE")
            .arg(key)
            .arg(window_secs)
            .query_async(redis)
            .await;
    }

    if count > max_attempts {
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "Trop de tentatives. Réessayez dans quelques minutes." })),
        ));
    }

    Ok(())
}
