use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    models::{
        account::{Account, AccountProfile, RegisterAccountRequest, UpdateAccountRequest},
        auth::CurrentAccount,
    },
    services::policy::{require_owner_or_admin, require_role_change_allowed},
    AppState,
};

/// POST /accounts — public registration. The role is always candidate: only
/// an admin may promote an account, through the update.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterAccountRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let password_hash = bcrypt::hash(&body.password, 12)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    let account = sqlx::query_as::<_, Account>(
        "INSERT INTO accounts (email, password_hash, first_name, last_name, phone)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(&body.email)
    .bind(&password_hash)
    .bind(&body.first_name)
    .bind(&body.last_name)
    .bind(body.phone.as_deref().unwrap_or(""))
    .fetch_one(&state.db)
    .await
    // Generic message: a unique-constraint violation must not confirm that
    // an email is already registered
    .map_err(|_| (StatusCode::BAD_REQUEST, Json(json!({ "error": "Impossible de créer le compte" }))))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Compte créé avec succès",
            "account": AccountProfile::from(account),
        })),
    ))
}

/// GET /accounts — admins see every active account, a candidate only sees
/// their own.
pub async fn list_accounts(
    State(state): State<AppState>,
    current: CurrentAccount,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let accounts = if current.role.is_admin() {
        sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE is_active = TRUE ORDER BY created_at DESC",
        )
        .fetch_all(&state.db)
        .await
    } else {
        sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE id = $1 AND is_active = TRUE",
        )
        .bind(current.id())
        .fetch_all(&state.db)
        .await
    }
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    let profiles: Vec<AccountProfile> = accounts.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "count": profiles.len(), "accounts": profiles })))
}

async fn fetch_account(
    state: &AppState,
    id: Uuid,
) -> Result<Account, (StatusCode, Json<Value>)> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1 AND is_active = TRUE")
        .bind(id)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?
        .ok_or((StatusCode::NOT_FOUND, Json(json!({ "error": "Compte introuvable" }))))
}

/// GET /accounts/{id} — owner or admin.
pub async fn get_account(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let account = fetch_account(&state, id).await?;
    require_owner_or_admin(&current, &account)?;
    Ok(Json(serde_json::to_value(AccountProfile::from(account)).unwrap()))
}

/// PUT /accounts/{id} — partial update, owner or admin. Owning the account
/// never grants the right to change its role.
pub async fn update_account(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAccountRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let account = fetch_account(&state, id).await?;
    require_owner_or_admin(&current, &account)?;

    require_role_change_allowed(&current, body.role)?;

    let password_hash = match &body.password {
        Some(p) => Some(bcrypt::hash(p, 12).map_err(|e| {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() })))
        })?),
        None => None,
    };

    let updated = sqlx::query_as::<_, Account>(
        "UPDATE accounts
         SET email         = COALESCE($1, email),
             password_hash = COALESCE($2, password_hash),
             first_name    = COALESCE($3, first_name),
             last_name     = COALESCE($4, last_name),
             phone         = COALESCE($5, phone),
             role          = COALESCE($6, role),
             updated_at    = NOW()
         WHERE id = $7
         RETURNING *",
    )
    .bind(&body.email)
    .bind(&password_hash)
    .bind(&body.first_name)
    .bind(&body.last_name)
    .bind(&body.phone)
    .bind(body.role.map(|r| r.to_string()))
    .bind(id)
    .fetch_one(&state.db)
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    Ok(Json(json!({
        "message": "Compte mis à jour avec succès",
        "account": AccountProfile::from(updated),
    })))
}

/// DELETE /accounts/{id} — soft delete (is_active = FALSE), owner or admin.
pub async fn delete_account(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let account = fetch_account(&state, id).await?;
    require_owner_or_admin(&current, &account)?;

    sqlx::query("UPDATE accounts SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    Ok(Json(json!({ "message": "Compte supprimé avec succès" })))
}
