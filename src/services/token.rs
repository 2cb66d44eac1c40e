use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::models::{
    account::Account,
    auth::{AuthError, Claims, TokenKind, TokenPair},
};

/// Fixed lifetimes: 1 hour for access tokens, 7 days for refresh tokens.
pub const ACCESS_TTL_SECS: u64 = 3600;
pub const REFRESH_TTL_DAYS: u64 = 7;

/// Token decode failure. Expired and invalid are kept apart because they
/// surface as distinct 401 reasons at the protocol level.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expiré")]
    Expired,
    #[error("token invalide")]
    Invalid,
}

/// Signs a claims set as an HS256 JWT. The secret is injected as a
/// parameter, never read from ambient global state.
pub fn encode_token(claims: &Claims, secret: &str) -> anyhow::Result<String> {
    let token = encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Decodes and verifies a JWT. Expiry is strict (no leeway); any structure
/// or signature error is `Invalid`.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })?;
    let claims = data.claims;

    // jsonwebtoken still accepts the exact exp second; the contract is
    // "expired when now >= exp"
    let now = Utc::now().timestamp() as usize;
    if claims.exp <= now {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}

/// A refresh token must never authenticate a request, and the refresh
/// exchange must never accept an access token.
pub fn require_kind(claims: &Claims, expected: TokenKind) -> Result<(), AuthError> {
    if claims.kind == expected {
        Ok(())
    } else {
        Err(AuthError::WrongTokenType)
    }
}

fn access_claims(account: &Account, now: usize) -> Claims {
    Claims {
        account_id: account.id,
        email: account.email.clone(),
        first_name: Some(account.first_name.clone()),
        last_name: Some(account.last_name.clone()),
        role: account.role(),
        kind: TokenKind::Access,
        iat: now,
        exp: now + ACCESS_TTL_SECS as usize,
    }
}

fn refresh_claims(account: &Account, now: usize) -> Claims {
    Claims {
        account_id: account.id,
        email: account.email.clone(),
        first_name: None,
        last_name: None,
        role: account.role(),
        kind: TokenKind::Refresh,
        iat: now,
        exp: now + (REFRESH_TTL_DAYS * 86400) as usize,
    }
}

/// Issues the access + refresh pair from an account snapshot. No side
/// effects: no token registry is written.
pub fn issue_token_pair(account: &Account, secret: &str) -> anyhow::Result<TokenPair> {
    let now = Utc::now().timestamp() as usize;
    let access = encode_token(&access_claims(account, now), secret)?;
    let refresh = encode_token(&refresh_claims(account, now), secret)?;
    Ok(TokenPair {
        access,
        refresh,
        token_type: "Bearer",
        expires_in: ACCESS_TTL_SECS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::Role;
    use chrono::Utc;
    use uuid::Uuid;

    const SECRET: &str = "test-secret";

    fn account(role: &str) -> Account {
        let now = Utc::now();
        Account {
            id: Uuid::new_v4(),
            email: "jean.dupont@example.com".into(),
            password_hash: "x".into(),
            first_name: "Jean".into(),
            last_name: "Dupont".into(),
            phone: "".into(),
            role: role.into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn access_token_roundtrip() {
        let acc = account("admin");
        let pair = issue_token_pair(&acc, SECRET).unwrap();

        let claims = decode_token(&pair.access, SECRET).unwrap();
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.account_id, acc.id);
        assert_eq!(claims.first_name.as_deref(), Some("Jean"));
        assert!(claims.exp > claims.iat);
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 3600);
    }

    #[test]
    fn refresh_token_omits_display_fields() {
        let acc = account("candidate");
        let pair = issue_token_pair(&acc, SECRET).unwrap();

        let claims = decode_token(&pair.refresh, SECRET).unwrap();
        assert_eq!(claims.kind, TokenKind::Refresh);
        assert_eq!(claims.role, Role::Candidate);
        assert!(claims.first_name.is_none());
        assert!(claims.last_name.is_none());
    }

    #[test]
    fn expired_token_fails_with_expired() {
        let acc = account("candidate");
        let now = Utc::now().timestamp() as usize;
        let mut claims = access_claims(&acc, now - 7200);
        claims.exp = now - 3600;

        let token = encode_token(&claims, SECRET).unwrap();
        assert_eq!(decode_token(&token, SECRET).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn tampered_token_fails_with_invalid() {
        let acc = account("candidate");
        let pair = issue_token_pair(&acc, SECRET).unwrap();

        // Flipping one payload character breaks the signature
        let mut bytes = pair.access.into_bytes();
        let idx = bytes.len() / 2;
        bytes[idx] = if bytes[idx] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert_eq!(decode_token(&tampered, SECRET).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn wrong_secret_fails_with_invalid() {
        let acc = account("candidate");
        let pair = issue_token_pair(&acc, SECRET).unwrap();
        assert_eq!(
            decode_token(&pair.access, "autre-secret").unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn garbage_fails_with_invalid() {
        assert_eq!(decode_token("pas-un-jwt", SECRET).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn token_expiring_this_instant_is_expired() {
        let acc = account("candidate");
        let now = Utc::now().timestamp() as usize;
        let mut claims = access_claims(&acc, now - 3600);
        claims.exp = now;

        let token = encode_token(&claims, SECRET).unwrap();
        assert_eq!(decode_token(&token, SECRET).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn refresh_token_rejected_as_access_credential() {
        let acc = account("candidate");
        let pair = issue_token_pair(&acc, SECRET).unwrap();

        // A refresh token decodes fine but must not pass the access check
        let claims = decode_token(&pair.refresh, SECRET).unwrap();
        assert!(matches!(
            require_kind(&claims, TokenKind::Access),
            Err(AuthError::WrongTokenType)
        ));

        let access = decode_token(&pair.access, SECRET).unwrap();
        assert!(require_kind(&access, TokenKind::Access).is_ok());
    }

    #[test]
    fn access_token_rejected_by_refresh_exchange() {
        let acc = account("candidate");
        let pair = issue_token_pair(&acc, SECRET).unwrap();

        let access = decode_token(&pair.access, SECRET).unwrap();
        assert!(matches!(
            require_kind(&access, TokenKind::Refresh),
            Err(AuthError::WrongTokenType)
        ));

        let refresh = decode_token(&pair.refresh, SECRET).unwrap();
        assert!(require_kind(&refresh, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn issuance_is_pure_given_same_instant() {
        let acc = account("admin");
        let now = Utc::now().timestamp() as usize;
        let a = access_claims(&acc, now);
        let b = access_claims(&acc, now);
        // Same account, same instant: identical logical content
        assert_eq!(serde_json::to_value(&a).unwrap(), serde_json::to_value(&b).unwrap());
    }
}
