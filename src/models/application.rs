use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Job application. Status: pending | reviewed | accepted | rejected.
/// `job_id` is NULL for a spontaneous application.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub job_id: Option<Uuid>,
    pub is_spontaneous: bool,
    pub civility: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub address: String,
    pub contract_type_sought: String,
    pub experience: Value,
    pub education_level: String,
    pub current_salary: Option<i64>,
    pub expected_salary: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    pub job_id: Option<Uuid>,
    #[serde(default)]
    pub is_spontaneous: bool,
    pub civility: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub address: String,
    pub contract_type_sought: String,
    #[serde(default = "empty_experience")]
    pub experience: Value,
    pub education_level: String,
    pub current_salary: Option<i64>,
    pub expected_salary: i64,
}

fn empty_experience() -> Value {
    Value::Array(vec![])
}

/// Partial update. `status` is only applied for an admin; the handler
/// discards it for an owning candidate.
#[derive(Debug, Deserialize)]
pub struct UpdateApplicationRequest {
    pub civility: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub contract_type_sought: Option<String>,
    pub experience: Option<Value>,
    pub education_level: Option<String>,
    pub current_salary: Option<i64>,
    pub expected_salary: Option<i64>,
    pub status: Option<String>,
}
