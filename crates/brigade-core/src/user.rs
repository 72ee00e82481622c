//! Account records and roles.

use serde::{Deserialize, Serialize};

/// Capability role carried by every account and by every access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
  Admin,
  Instructor,
}

impl Role {
  pub fn as_str(self) -> &'static str {
    match self {
      Role::Admin => "ADMIN",
      Role::Instructor => "INSTRUCTOR",
    }
  }
}

/// An account. The password is stored only as a one-way hash; plaintext never
/// enters this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
  pub id:            i64,
  pub is_active:     bool,
  pub username:      String,
  pub password_hash: String,
  pub role:          Role,
  pub vat:           String,
}

/// Account data as handed to the store for first persistence. The
/// `password_hash` is already hashed by the mapper.
#[derive(Debug, Clone)]
pub struct UserDraft {
  pub is_active:     bool,
  pub username:      String,
  pub password_hash: String,
  pub role:          Role,
  pub vat:           String,
}
