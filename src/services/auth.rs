use sqlx::PgPool;

use crate::models::{
    account::Account,
    auth::{AuthError, LoginResponse, TokenKind},
};
use crate::services::token::{self, TokenError};

pub struct AuthService;

impl AuthService {
    /// Verifies the credentials and issues a token pair. The failure
    /// message is identical for an unknown email and a wrong password so
    /// accounts cannot be enumerated.
    pub async fn login(
        pool: &PgPool,
        email: &str,
        password: &str,
        secret: &str,
    ) -> Result<LoginResponse, AuthError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE email = $1 AND is_active = TRUE",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(|e| AuthError::Internal(e.into()))?
        .ok_or(AuthError::InvalidCredentials)?;

        let valid = bcrypt::verify(password, &account.password_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        let pair = token::issue_token_pair(&account, secret)?;
        Ok(LoginResponse {
            access: pair.access,
            refresh: pair.refresh,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
            account: account.into(),
        })
    }

    /// Exchanges a refresh token for a new pair. Stateless: validity is a
    /// function of the signature, the expiry and the referenced account
    /// still being active at exchange time.
    pub async fn refresh(
        pool: &PgPool,
        refresh_token: &str,
        secret: &str,
    ) -> Result<LoginResponse, AuthError> {
        let claims = token::decode_token(refresh_token, secret).map_err(|e| match e {
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Invalid => AuthError::TokenInvalid,
        })?;

        token::require_kind(&claims, TokenKind::Refresh)?;

        let account = sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE id = $1 AND is_active = TRUE",
        )
        .bind(claims.account_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| AuthError::Internal(e.into()))?
        .ok_or(AuthError::AccountNotFound)?;

        let pair = token::issue_token_pair(&account, secret)?;
        Ok(LoginResponse {
            access: pair.access,
            refresh: pair.refresh,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
            account: account.into(),
        })
    }
}
