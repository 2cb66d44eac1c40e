use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    middleware::auth::MaybeAccount,
    models::{
        auth::{AuthError, CurrentAccount},
        job::{CreateJobRequest, JobOffer, UpdateJobRequest},
    },
    services::policy::require_admin,
    AppState,
};

const STATUSES: [&str; 3] = ["draft", "published", "closed"];

/// GET /jobs — readable by any authenticated principal: admins see every
/// status, everyone else only published offers. An anonymous request flows
/// through the pipeline and is denied here.
pub async fn list_jobs(
    State(state): State<AppState>,
    MaybeAccount(maybe): MaybeAccount,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let current = maybe.ok_or(AuthError::AuthenticationRequired)?;

    let jobs = if current.role.is_admin() {
        sqlx::query_as::<_, JobOffer>("SELECT * FROM job_offers ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await
    } else {
        sqlx::query_as::<_, JobOffer>(
            "SELECT * FROM job_offers WHERE status = 'published' ORDER BY created_at DESC",
        )
        .fetch_all(&state.db)
        .await
    }
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    Ok(Json(serde_json::to_value(jobs).unwrap()))
}

async fn fetch_job(state: &AppState, id: Uuid) -> Result<JobOffer, (StatusCode, Json<Value>)> {
    sqlx::query_as::<_, JobOffer>("SELECT * FROM job_offers WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?
        .ok_or((StatusCode::NOT_FOUND, Json(json!({ "error": "Offre introuvable" }))))
}

/// GET /jobs/{id} — an unpublished offer is invisible to a non-admin.
pub async fn get_job(
    State(state): State<AppState>,
    MaybeAccount(maybe): MaybeAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let current = maybe.ok_or(AuthError::AuthenticationRequired)?;
    let job = fetch_job(&state, id).await?;

    if !current.role.is_admin() && job.status != "published" {
        return Err((StatusCode::NOT_FOUND, Json(json!({ "error": "Offre introuvable" }))));
    }

    Ok(Json(serde_json::to_value(job).unwrap()))
}

/// POST /jobs — admin only; the creator is recorded.
pub async fn create_job(
    State(state): State<AppState>,
    current: CurrentAccount,
    Json(body): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    require_admin(&current)?;

    let status = body.status.as_deref().unwrap_or("published");
    if !STATUSES.contains(&status) {
        return Err((StatusCode::BAD_REQUEST, Json(json!({ "error": "Statut invalide" }))));
    }

    let job = sqlx::query_as::<_, JobOffer>(
        "INSERT INTO job_offers
            (title, company, location, contract_type, salary, application_deadline,
             description, skills, status, created_by)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         RETURNING *",
    )
    .bind(&body.title)
    .bind(&body.company)
    .bind(&body.location)
    .bind(&body.contract_type)
    .bind(&body.salary)
    .bind(body.application_deadline)
    .bind(&body.description)
    .bind(&body.skills)
    .bind(status)
    .bind(current.id())
    .fetch_one(&state.db)
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    Ok((StatusCode::CREATED, Json(serde_json::to_value(job).unwrap())))
}

/// PUT /jobs/{id} — partial update, admin only.
pub async fn update_job(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateJobRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&current)?;
    fetch_job(&state, id).await?;

    if let Some(ref status) = body.status {
        if !STATUSES.contains(&status.as_str()) {
            return Err((StatusCode::BAD_REQUEST, Json(json!({ "error": "Statut invalide" }))));
        }
    }

    let job = sqlx::query_as::<_, JobOffer>(
        "UPDATE job_offers
         SET title                = COALESCE($1, title),
             company              = COALESCE($2, company),
             location             = COALESCE($3, location),
             contract_type        = COALESCE($4, contract_type),
             salary               = COALESCE($5, salary),
             application_deadline = COALESCE($6, application_deadline),
             description          = COALESCE($7, description),
             skills               = COALESCE($8, skills),
             status               = COALESCE($9, status),
             updated_at           = NOW()
         WHERE id = $10
         RETURNING *",
    )
    .bind(&body.title)
    .bind(&body.company)
    .bind(&body.location)
    .bind(&body.contract_type)
    .bind(&body.salary)
    .bind(body.application_deadline)
    .bind(&body.description)
    .bind(&body.skills)
    .bind(&body.status)
    .bind(id)
    .fetch_one(&state.db)
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    Ok(Json(serde_json::to_value(job).unwrap()))
}

/// DELETE /jobs/{id} — admin only.
pub async fn delete_job(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&current)?;
    fetch_job(&state, id).await?;

    sqlx::query("DELETE FROM job_offers WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    Ok(Json(json!({ "message": "Offre supprimée" })))
}

async fn set_status(
    state: &AppState,
    id: Uuid,
    status: &str,
) -> Result<(), (StatusCode, Json<Value>)> {
    let updated = sqlx::query("UPDATE job_offers SET status = $1, updated_at = NOW() WHERE id = $2")
        .bind(status)
        .bind(id)
        .execute(&state.db)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    if updated.rows_affected() == 0 {
        return Err((StatusCode::NOT_FOUND, Json(json!({ "error": "Offre introuvable" }))));
    }
    Ok(())
}

/// POST /jobs/{id}/publish — admin only.
pub async fn publish_job(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&current)?;
    set_status(&state, id, "published").await?;
    Ok(Json(json!({ "status": "Offre publiée" })))
}

/// POST /jobs/{id}/close — admin only.
pub async fn close_job(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&current)?;
    set_status(&state, id, "closed").await?;
    Ok(Json(json!({ "status": "Offre fermée" })))
}

/// GET /jobs/my-offers — offers created by the requesting admin.
pub async fn my_offers(
    State(state): State<AppState>,
    current: CurrentAccount,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&current)?;

    let jobs = sqlx::query_as::<_, JobOffer>(
        "SELECT * FROM job_offers WHERE created_by = $1 ORDER BY created_at DESC",
    )
    .bind(current.id())
    .fetch_all(&state.db)
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    Ok(Json(serde_json::to_value(jobs).unwrap()))
}
