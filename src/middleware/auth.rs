use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::models::{
    account::Account,
    auth::{AuthError, CurrentAccount, TokenKind},
};
use crate::services::token::{decode_token, require_kind, TokenError};
use crate::AppState;

/// Extracts the token from an `Authorization: Bearer <token>` header.
///
/// A missing header, unknown scheme or malformed value yields `None` (no
/// credential presented) and never an error: public routes share the same
/// pipeline.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token)
}

impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or(AuthError::AuthenticationRequired)?
            .to_string();

        let claims = decode_token(&token, &state.config.jwt_secret).map_err(|e| match e {
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Invalid => AuthError::TokenInvalid,
        })?;

        require_kind(&claims, TokenKind::Access)?;

        // Re-read the account on every request: a deactivated account stops
        // authenticating even while its tokens are still unexpired.
        let account = sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE id = $1 AND is_active = TRUE",
        )
        .bind(claims.account_id)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| AuthError::Internal(e.into()))?
        .ok_or(AuthError::AccountNotFound)?;

        let role = account.role();
        Ok(CurrentAccount { account, role, token })
    }
}

/// Soft-fail variant: no credential presented yields `None` and the request
/// proceeds as anonymous. A present-but-invalid credential is still a hard
/// failure.
pub struct MaybeAccount(pub Option<CurrentAccount>);

impl FromRequestParts<AppState> for MaybeAccount {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if bearer_token(&parts.headers).is_none() {
            return Ok(MaybeAccount(None));
        }
        CurrentAccount::from_request_parts(parts, state)
            .await
            .map(|account| MaybeAccount(Some(account)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: Option<&str>) -> HeaderMap {
        let mut h = HeaderMap::new();
        if let Some(v) = value {
            h.insert(header::AUTHORIZATION, HeaderValue::from_str(v).unwrap());
        }
        h
    }

    #[test]
    fn absent_header_is_anonymous() {
        assert_eq!(bearer_token(&headers(None)), None);
    }

    #[test]
    fn wrong_scheme_is_anonymous() {
        assert_eq!(bearer_token(&headers(Some("Basic abc"))), None);
    }

    #[test]
    fn malformed_value_is_anonymous() {
        assert_eq!(bearer_token(&headers(Some("Bearer"))), None);
        assert_eq!(bearer_token(&headers(Some("Bearer a b"))), None);
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(bearer_token(&headers(Some("bearer tok"))), Some("tok"));
        assert_eq!(bearer_token(&headers(Some("Bearer tok"))), Some("tok"));
    }
}
