use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account role. Exactly three values; any other string in the store is a
/// data defect and falls back to Candidate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Candidate,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn is_superadmin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    /// Admin in the broad sense: admin or superadmin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    pub fn is_candidate(&self) -> bool {
        matches!(self, Role::Candidate)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Candidate => "candidate",
            Role::Admin => "admin",
            Role::SuperAdmin => "superadmin",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "candidate" => Ok(Role::Candidate),
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::SuperAdmin),
            _ => Err(anyhow::anyhow!("Unknown role: {s}")),
        }
    }
}

/// DB row struct — role stored as TEXT, parsed on demand.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or(Role::Candidate)
    }
}

/// Public view of an account (never the password hash).
#[derive(Debug, Serialize)]
pub struct AccountProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: Role,
}

impl From<Account> for AccountProfile {
    fn from(a: Account) -> Self {
        let role = a.role();
        Self {
            id: a.id,
            email: a.email,
            first_name: a.first_name,
            last_name: a.last_name,
            phone: a.phone,
            role,
        }
    }
}

// Request DTOs

#[derive(Debug, Deserialize)]
pub struct RegisterAccountRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// Partial update. `role` is only applied when the requester is an admin.
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
}

/// Both fields are optional so a missing one yields an explicit 400 instead
/// of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_roundtrip() {
        for role in [Role::Candidate, Role::Admin, Role::SuperAdmin] {
            let parsed: Role = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("manager".parse::<Role>().is_err());
    }

    #[test]
    fn role_predicates() {
        assert!(Role::SuperAdmin.is_admin());
        assert!(Role::SuperAdmin.is_superadmin());
        assert!(Role::Admin.is_admin());
        assert!(!Role::Admin.is_superadmin());
        assert!(Role::Candidate.is_candidate());
        assert!(!Role::Candidate.is_admin());
    }
}
