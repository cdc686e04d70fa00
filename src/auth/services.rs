use crate::auth::claims::Claims;
use crate::auth::dto::RegisterRequest;
use crate::config::JwtConfig;
use crate::state::AppState;
use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use time::{Duration, OffsetDateTime};
use tracing::{debug, error, warn};
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 6;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("Please fill in all fields")]
    MissingField,
    #[error("Password must be at least {} characters long", MIN_PASSWORD_LEN)]
    PasswordTooShort,
    #[error("Invalid email")]
    InvalidEmail,
}

/// Field checks that run before the store is touched. Expects the username
/// and email to be trimmed already.
pub fn validate_registration(req: &RegisterRequest) -> Result<(), RegistrationError> {
    if [&req.username, &req.email, &req.password]
        .iter()
        .any(|f| f.is_empty())
    {
        return Err(RegistrationError::MissingField);
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(RegistrationError::PasswordTooShort);
    }
    if !EMAIL_RE.is_match(&req.email) {
        return Err(RegistrationError::InvalidEmail);
    }
    Ok(())
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| {
            error!(error = %e, "argon2 hash failed");
            anyhow::anyhow!("password hashing failed: {e}")
        })
}

/// `Ok(false)` on a wrong password; `Err` only when the stored hash is
/// unreadable.
pub fn verify_password(plain: &str, stored_hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow::anyhow!("stored password hash is unreadable: {e}"))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// A freshly signed access token.
#[derive(Debug)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

/// Signing and verification keys for access tokens.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::minutes(cfg.ttl_minutes.max(1)),
        }
    }

    pub fn sign(&self, user_id: Uuid) -> anyhow::Result<IssuedToken> {
        let issued_at = OffsetDateTime::now_utc();
        let expires_at = issued_at + self.ttl;
        let claims = Claims {
            sub: user_id,
            iat: issued_at.unix_timestamp() as usize,
            exp: expires_at.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(%user_id, "access token signed");
        Ok(IssuedToken { token, expires_at })
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);
        let claims = decode::<Claims>(token, &self.decoding, &validation)?.claims;
        Ok(claims)
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        JwtKeys::new(&state.config.jwt)
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
        .filter(|t| !t.is_empty())
}

/// The caller behind a valid `Bearer` access token. Handlers that take this
/// extractor see the user id explicitly; there is no ambient session.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                "Missing or malformed bearer token".to_string(),
            )
        })?;

        match JwtKeys::from_ref(state).verify(token) {
            Ok(claims) => Ok(AuthUser(claims.sub)),
            Err(e) => {
                warn!(error = %e, "rejected access token");
                Err((
                    StatusCode::UNAUTHORIZED,
                    "Invalid or expired token".to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod credential_tests {
    use super::*;

    fn req(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("grilled-salmon").expect("hash");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("grilled-salmon", &hash).expect("verify"));
        assert!(!verify_password("boiled-salmon", &hash).expect("verify"));
    }

    #[test]
    fn unreadable_hash_is_an_error() {
        assert!(verify_password("anything", "plaintext").is_err());
    }

    #[test]
    fn registration_requires_every_field() {
        assert_eq!(
            validate_registration(&req("", "a@b.co", "secret1")),
            Err(RegistrationError::MissingField)
        );
    }

    #[test]
    fn registration_password_length() {
        assert_eq!(
            validate_registration(&req("sam", "sam@example.com", "12345")),
            Err(RegistrationError::PasswordTooShort)
        );
        assert!(validate_registration(&req("sam", "sam@example.com", "123456")).is_ok());
        assert_eq!(
            RegistrationError::PasswordTooShort.to_string(),
            "Password must be at least 6 characters long"
        );
    }

    #[test]
    fn registration_email_shape() {
        assert_eq!(
            validate_registration(&req("sam", "sam@example", "longenough")),
            Err(RegistrationError::InvalidEmail)
        );
        assert_eq!(
            validate_registration(&req("sam", "no at sign.com", "longenough")),
            Err(RegistrationError::InvalidEmail)
        );
    }
}

#[cfg(test)]
mod token_tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder();
        if let Some(h) = header {
            builder = builder.header(AUTHORIZATION, h);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn signed_token_verifies() {
        let keys = JwtKeys::from_ref(&AppState::fake());
        let user_id = Uuid::new_v4();
        let issued = keys.sign(user_id).expect("sign");
        assert!(issued.expires_at > OffsetDateTime::now_utc());

        let claims = keys.verify(&issued.token).expect("verify");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
    }

    #[tokio::test]
    async fn tampered_token_is_rejected() {
        let keys = JwtKeys::from_ref(&AppState::fake());
        let mut token = keys.sign(Uuid::new_v4()).expect("sign").token;
        token.push('x');
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(bearer_token(&parts_with(Some("Bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&parts_with(Some("bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&parts_with(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&parts_with(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts_with(None)), None);
    }

    #[tokio::test]
    async fn extractor_yields_user_id() {
        let state = AppState::fake();
        let user_id = Uuid::new_v4();
        let token = JwtKeys::from_ref(&state).sign(user_id).unwrap().token;

        let mut parts = parts_with(Some(&format!("Bearer {token}")));
        let AuthUser(got) = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .expect("authorized");
        assert_eq!(got, user_id);
    }

    #[tokio::test]
    async fn extractor_rejects_missing_header() {
        let state = AppState::fake();
        let mut parts = parts_with(None);
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("rejected");
        assert_eq!(err.0, StatusCode::UNAUTHORIZED);
    }
}
