//! Instructor — owns exactly one account and one contact-details record.

use serde::{Deserialize, Serialize};

use crate::{
  contact::{ContactDetails, ContactDetailsDraft},
  user::{User, UserDraft},
};

/// Gender discriminant shared by instructors and students.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
  Male,
  Female,
  Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instructor {
  pub id:              i64,
  /// External identifier, store-assigned at first persistence and never
  /// reassigned.
  pub uuid:            String,
  pub is_active:       bool,
  pub firstname:       String,
  pub lastname:        String,
  pub identity_number: String,
  pub gender:          Gender,
  pub user:            User,
  pub contact_details: ContactDetails,
}

/// An instructor as handed to the store for first persistence. The owned
/// user and contact-details records are created in the same transaction.
#[derive(Debug, Clone)]
pub struct InstructorDraft {
  pub is_active:       bool,
  pub firstname:       String,
  pub lastname:        String,
  pub identity_number: String,
  pub gender:          Gender,
  pub user:            UserDraft,
  pub contact_details: ContactDetailsDraft,
}
