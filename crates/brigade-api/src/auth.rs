//! Token-based authentication: argon2 password verification, HS256 access
//! tokens, and the extractor that gates protected routes.
//!
//! The login flow exchanges credentials for a short-lived bearer token
//! carrying the account's username and role. Handlers take an [`AuthUser`]
//! argument, which fails extraction with 401 for a missing or bad token;
//! role checks are explicit calls inside each handler.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::{header, request::Parts},
};
use brigade_core::{mapper::PasswordEncoder, store::SchoolStore, user::Role};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

// ─── Password hashing ─────────────────────────────────────────────────────────

/// [`PasswordEncoder`] backed by argon2id with a per-password random salt.
pub struct Argon2Encoder;

impl PasswordEncoder for Argon2Encoder {
  fn encode(&self, raw: &str) -> brigade_core::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(raw.as_bytes(), &salt)
      .map(|hash| hash.to_string())
      .map_err(|e| brigade_core::Error::Hash(e.to_string()))
  }

  fn matches(&self, raw: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
      .map(|parsed| {
        Argon2::default()
          .verify_password(raw.as_bytes(), &parsed)
          .is_ok()
      })
      .unwrap_or(false)
  }
}

// ─── Tokens ───────────────────────────────────────────────────────────────────

/// HS256 key material plus the token lifetime.
pub struct AuthKeys {
  encoding:       EncodingKey,
  decoding:       DecodingKey,
  token_ttl_secs: i64,
}

impl AuthKeys {
  pub fn new(secret: &str, token_ttl_secs: u64) -> Self {
    AuthKeys {
      encoding:       EncodingKey::from_secret(secret.as_bytes()),
      decoding:       DecodingKey::from_secret(secret.as_bytes()),
      token_ttl_secs: token_ttl_secs as i64,
    }
  }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  /// Username of the authenticated account.
  pub sub:  String,
  pub role: String,
  pub iat:  i64,
  pub exp:  i64,
}

/// Mint a token for `username`/`role`, valid from now for the configured
/// lifetime.
pub fn issue_token(
  keys: &AuthKeys,
  username: &str,
  role: Role,
) -> Result<String, jsonwebtoken::errors::Error> {
  let now = chrono::Utc::now().timestamp();
  let claims = Claims {
    sub:  username.to_string(),
    role: role.as_str().to_string(),
    iat:  now,
    exp:  now + keys.token_ttl_secs,
  };
  jsonwebtoken::encode(&Header::default(), &claims, &keys.encoding)
}

/// Verify signature and expiry, returning the embedded claims.
pub fn decode_token(
  keys: &AuthKeys,
  token: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
  jsonwebtoken::decode::<Claims>(token, &keys.decoding, &Validation::default())
    .map(|data| data.claims)
}

fn role_from_claim(role: &str) -> Option<Role> {
  match role {
    "ADMIN" => Some(Role::Admin),
    "INSTRUCTOR" => Some(Role::Instructor),
    _ => None,
  }
}

// ─── Extractor ────────────────────────────────────────────────────────────────

/// The authenticated caller, extracted from the `Authorization` header.
pub struct AuthUser {
  pub username: String,
  pub role:     Role,
}

impl AuthUser {
  /// Write operations are admin-only.
  pub fn require_admin(&self) -> Result<(), ApiError> {
    if self.role == Role::Admin {
      Ok(())
    } else {
      Err(ApiError::Forbidden("admin role required".to_string()))
    }
  }

  /// Read operations are open to admins and instructors alike.
  pub fn require_staff(&self) -> Result<(), ApiError> {
    match self.role {
      Role::Admin | Role::Instructor => Ok(()),
    }
  }
}

impl<S> FromRequestParts<AppState<S>> for AuthUser
where
  S: SchoolStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let header_val = parts
      .headers
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .ok_or(ApiError::Unauthorized)?;
    let token = header_val
      .strip_prefix("Bearer ")
      .ok_or(ApiError::Unauthorized)?;
    let claims =
      decode_token(&state.auth, token).map_err(|_| ApiError::Unauthorized)?;
    let role = role_from_claim(&claims.role).ok_or(ApiError::Unauthorized)?;
    Ok(AuthUser { username: claims.sub, role })
  }
}

// ─── Login handler ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
  pub username: String,
  pub password: String,
}

/// Token plus enough profile data for the client to greet the caller. The
/// name fields are present only for accounts owned by an instructor.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
  pub token:     String,
  pub vat:       String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub firstname: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub lastname:  Option<String>,
  pub role:      Role,
}

/// `POST /api/auth/authenticate`
///
/// A wrong username and a wrong password are indistinguishable in the
/// response.
pub async fn authenticate<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<AuthRequest>,
) -> Result<Json<AuthResponse>, ApiError>
where
  S: SchoolStore + 'static,
{
  let user = state
    .store
    .find_user_by_username(&body.username)
    .await
    .map_err(brigade_core::Error::storage)?
    .ok_or(ApiError::Unauthorized)?;

  if !user.is_active || !state.encoder.matches(&body.password, &user.password_hash) {
    return Err(ApiError::Unauthorized);
  }

  let instructor = state
    .store
    .get_instructor_by_user_id(user.id)
    .await
    .map_err(brigade_core::Error::storage)?;

  let token = issue_token(&state.auth, &user.username, user.role)?;
  tracing::info!(username = %user.username, "authenticated");

  Ok(Json(AuthResponse {
    token,
    vat: user.vat,
    firstname: instructor.as_ref().map(|i| i.firstname.clone()),
    lastname: instructor.as_ref().map(|i| i.lastname.clone()),
    role: user.role,
  }))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tokens_round_trip() {
    let keys = AuthKeys::new("test-secret", 3600);
    let token = issue_token(&keys, "mpapadaki", Role::Instructor).unwrap();
    let claims = decode_token(&keys, &token).unwrap();
    assert_eq!(claims.sub, "mpapadaki");
    assert_eq!(claims.role, "INSTRUCTOR");
    assert!(claims.exp > claims.iat);
  }

  #[test]
  fn a_token_signed_with_another_secret_is_rejected() {
    let keys = AuthKeys::new("test-secret", 3600);
    let other = AuthKeys::new("other-secret", 3600);
    let token = issue_token(&other, "admin", Role::Admin).unwrap();
    assert!(decode_token(&keys, &token).is_err());
  }

  #[test]
  fn an_expired_token_is_rejected() {
    let keys = AuthKeys::new("test-secret", 3600);
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
      sub:  "admin".to_string(),
      role: "ADMIN".to_string(),
      iat:  now - 7200,
      exp:  now - 3600,
    };
    let token =
      jsonwebtoken::encode(&Header::default(), &claims, &keys.encoding).unwrap();
    assert!(decode_token(&keys, &token).is_err());
  }

  #[test]
  fn garbage_is_not_a_token() {
    let keys = AuthKeys::new("test-secret", 3600);
    assert!(decode_token(&keys, "not-a-token").is_err());
  }

  #[test]
  fn argon2_encode_and_matches_agree() {
    let encoder = Argon2Encoder;
    let hash = encoder.encode("Str0ng!pass").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(encoder.matches("Str0ng!pass", &hash));
    assert!(!encoder.matches("wrong", &hash));
    assert!(!encoder.matches("Str0ng!pass", "not-a-phc-string"));
  }

  #[test]
  fn unknown_role_claims_are_rejected() {
    assert!(role_from_claim("ADMIN").is_some());
    assert!(role_from_claim("STUDENT").is_none());
  }
}
