use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::account::{Account, AccountProfile, Role};

/// Token kind: only an `access` token may authenticate a request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims embedded in the JWTs. One struct covers both token kinds: the
/// display fields are absent from the refresh token, hence the Options.
/// The access/refresh check happens in the verifier, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub account_id: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub role: Role,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub iat: usize,
    pub exp: usize,
}

/// Token pair returned by login and by the refresh exchange.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub account: AccountProfile,
}

/// Live account resolved from a valid token — re-read from the store on
/// every request, never a cached claims snapshot.
#[derive(Debug, Clone)]
pub struct CurrentAccount {
    pub account: Account,
    pub role: Role,
    pub token: String,
}

impl CurrentAccount {
    pub fn id(&self) -> Uuid {
        self.account.id
    }
}

/// Authentication and authorization failure taxonomy. All authentication
/// failures surface as 401 with messages that do not allow account
/// enumeration; authorization refusals surface as 403.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email et mot de passe requis")]
    MissingCredentials,

    #[error("Email ou mot de passe incorrect")]
    InvalidCredentials,

    #[error("Token expiré")]
    TokenExpired,

    #[error("Token invalide")]
    TokenInvalid,

    #[error("Type de token invalide")]
    WrongTokenType,

    #[error("Compte introuvable ou inactif")]
    AccountNotFound,

    #[error("Authentification requise")]
    AuthenticationRequired,

    #[error("Accès refusé")]
    PermissionDenied,

    #[error("Erreur interne")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::TokenInvalid
            | AuthError::WrongTokenType
            | AuthError::AccountNotFound
            | AuthError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            AuthError::PermissionDenied => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthError> for (StatusCode, Json<serde_json::Value>) {
    fn from(e: AuthError) -> Self {
        if let AuthError::Internal(ref err) = e {
            tracing::error!("internal error: {err:#}");
        }
        (e.status(), Json(json!({ "error": e.to_string() })))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, body): (StatusCode, Json<serde_json::Value>) = self.into();
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_per_failure() {
        assert_eq!(AuthError::MissingCredentials.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::TokenExpired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::TokenInvalid.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::WrongTokenType.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::AccountNotFound.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::PermissionDenied.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn uniform_credentials_message() {
        // The same message covers unknown email and wrong password
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Email ou mot de passe incorrect"
        );
    }
}
