use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Job offer. Status: draft | published | closed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobOffer {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub contract_type: String,
    pub salary: Option<String>,
    pub application_deadline: NaiveDate,
    pub description: String,
    pub skills: Vec<String>,
    pub status: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub company: String,
    pub location: String,
    pub contract_type: String,
    pub salary: Option<String>,
    pub application_deadline: NaiveDate,
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub contract_type: Option<String>,
    pub salary: Option<String>,
    pub application_deadline: Option<NaiveDate>,
    pub description: Option<String>,
    pub skills: Option<Vec<String>>,
    pub status: Option<String>,
}
