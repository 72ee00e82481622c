//! Contact details — the owned 1–1 sub-entity of instructors and students.
//!
//! A contact-details record never exists on its own: it is created inside the
//! owner's insert transaction and updated in place inside the owner's update
//! transaction.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
  pub id:            i64,
  pub city:          String,
  pub street:        Option<String>,
  pub street_number: Option<String>,
  pub postal_code:   Option<String>,
  pub email:         String,
  pub phone_number:  String,
}

/// Contact details as handed to the store for first persistence.
#[derive(Debug, Clone)]
pub struct ContactDetailsDraft {
  pub city:          String,
  pub street:        Option<String>,
  pub street_number: Option<String>,
  pub postal_code:   Option<String>,
  pub email:         String,
  pub phone_number:  String,
}
