use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    models::{
        application::{Application, CreateApplicationRequest, UpdateApplicationRequest},
        auth::CurrentAccount,
    },
    services::policy::{require_admin, require_candidate, require_owner_or_admin},
    AppState,
};

/// POST /applications — only candidates apply; the application is always
/// attached to the requesting account, never to a candidate in the payload.
pub async fn create_application(
    State(state): State<AppState>,
    current: CurrentAccount,
    Json(body): Json<CreateApplicationRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    require_candidate(&current)?;

    let is_spontaneous = body.is_spontaneous || body.job_id.is_none();

    let application = sqlx::query_as::<_, Application>(
        "INSERT INTO applications
            (candidate_id, job_id, is_spontaneous, civility, first_name, last_name,
             email, phone, country, address, contract_type_sought, experience,
             education_level, current_salary, expected_salary)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
         RETURNING *",
    )
    .bind(current.id())
    .bind(body.job_id)
    .bind(is_spontaneous)
    .bind(&body.civility)
    .bind(&body.first_name)
    .bind(&body.last_name)
    .bind(&body.email)
    .bind(&body.phone)
    .bind(&body.country)
    .bind(&body.address)
    .bind(&body.contract_type_sought)
    .bind(&body.experience)
    .bind(&body.education_level)
    .bind(body.current_salary)
    .bind(body.expected_salary)
    .fetch_one(&state.db)
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    Ok((StatusCode::CREATED, Json(serde_json::to_value(application).unwrap())))
}

/// GET /applications — admins see everything, a candidate their own.
pub async fn list_applications(
    State(state): State<AppState>,
    current: CurrentAccount,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let applications = if current.role.is_admin() {
        sqlx::query_as::<_, Application>("SELECT * FROM applications ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await
    } else {
        sqlx::query_as::<_, Application>(
            "SELECT * FROM applications WHERE candidate_id = $1 ORDER BY created_at DESC",
        )
        .bind(current.id())
        .fetch_all(&state.db)
        .await
    }
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    Ok(Json(serde_json::to_value(applications).unwrap()))
}

async fn fetch_application(
    state: &AppState,
    id: Uuid,
) -> Result<Application, (StatusCode, Json<Value>)> {
    sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?
        .ok_or((StatusCode::NOT_FOUND, Json(json!({ "error": "Candidature introuvable" }))))
}

/// GET /applications/{id} — owner or admin.
pub async fn get_application(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let application = fetch_application(&state, id).await?;
    require_owner_or_admin(&current, &application)?;
    Ok(Json(serde_json::to_value(application).unwrap()))
}

/// PUT /applications/{id} — a candidate may only edit their application
/// while it is pending, and never its status; an admin edits everything.
pub async fn update_application(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateApplicationRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let application = fetch_application(&state, id).await?;
    require_owner_or_admin(&current, &application)?;

    let status = if current.role.is_admin() {
        body.status.clone()
    } else {
        if application.status != "pending" {
            return Err((
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "Vous ne pouvez plus modifier cette candidature" })),
            ));
        }
        None
    };

    let updated = sqlx::query_as::<_, Application>(
        "UPDATE applications
         SET civility             = COALESCE($1, civility),
             first_name           = COALESCE($2, first_name),
             last_name            = COALESCE($3, last_name),
             email                = COALESCE($4, email),
             phone                = COALESCE($5, phone),
             country              = COALESCE($6, country),
             address              = COALESCE($7, address),
             contract_type_sought = COALESCE($8, contract_type_sought),
             experience           = COALESCE($9, experience),
             education_level      = COALESCE($10, education_level),
             current_salary       = COALESCE($11, current_salary),
             expected_salary      = COALESCE($12, expected_salary),
             status               = COALESCE($13, status),
             updated_at           = NOW()
         WHERE id = $14
         RETURNING *",
    )
    .bind(&body.civility)
    .bind(&body.first_name)
    .bind(&body.last_name)
    .bind(&body.email)
    .bind(&body.phone)
    .bind(&body.country)
    .bind(&body.address)
    .bind(&body.contract_type_sought)
    .bind(&body.experience)
    .bind(&body.education_level)
    .bind(body.current_salary)
    .bind(body.expected_salary)
    .bind(&status)
    .bind(id)
    .fetch_one(&state.db)
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    Ok(Json(serde_json::to_value(updated).unwrap()))
}

/// DELETE /applications/{id} — a candidate may only delete their pending
/// applications; an admin deletes without restriction.
pub async fn delete_application(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let application = fetch_application(&state, id).await?;
    require_owner_or_admin(&current, &application)?;

    if !current.role.is_admin() && application.status != "pending" {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Vous ne pouvez supprimer que les candidatures en attente" })),
        ));
    }

    sqlx::query("DELETE FROM applications WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    Ok(Json(json!({ "message": "Candidature supprimée" })))
}

async fn set_status(
    state: &AppState,
    current: &CurrentAccount,
    id: Uuid,
    status: &str,
) -> Result<(), (StatusCode, Json<Value>)> {
    require_admin(current)?;

    let updated = sqlx::query("UPDATE applications SET status = $1, updated_at = NOW() WHERE id = $2")
        .bind(status)
        .bind(id)
        .execute(&state.db)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    if updated.rows_affected() == 0 {
        return Err((StatusCode::NOT_FOUND, Json(json!({ "error": "Candidature introuvable" }))));
    }
    Ok(())
}

/// POST /applications/{id}/review — admin only.
pub async fn review_application(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    set_status(&state, &current, id, "reviewed").await?;
    Ok(Json(json!({ "status": "Candidature marquée comme revue" })))
}

/// POST /applications/{id}/accept — admin only.
pub async fn accept_application(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    set_status(&state, &current, id, "accepted").await?;
    Ok(Json(json!({ "status": "Candidature acceptée" })))
}

/// POST /applications/{id}/reject — admin only.
pub async fn reject_application(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    set_status(&state, &current, id, "rejected").await?;
    Ok(Json(json!({ "status": "Candidature rejetée" })))
}

/// GET /applications/stats — admin dashboard counters.
pub async fn dashboard_stats(
    State(state): State<AppState>,
    current: CurrentAccount,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&current)?;

    let row: (i64, i64, i64, i64, i64) = sqlx::query_as(
        "SELECT COUNT(*),
                COUNT(*) FILTER (WHERE is_spontaneous),
                COUNT(*) FILTER (WHERE NOT is_spontaneous),
                COUNT(*) FILTER (WHERE contract_type_sought = 'interim'),
                COUNT(*) FILTER (WHERE status = 'reviewed')
         FROM applications",
    )
    .fetch_one(&state.db)
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    Ok(Json(json!({
        "total": row.0,
        "spontanees": row.1,
        "sur_offres": row.2,
        "interim": row.3,
        "evaluations": row.4,
    })))
}
