//! Student — owns one contact-details record and the owning side of the
//! student↔course enrollment relation.

use chrono::NaiveDate;

use crate::{
  contact::{ContactDetails, ContactDetailsDraft},
  instructor::Gender,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
  pub id:              i64,
  /// External identifier, store-assigned at first persistence and never
  /// reassigned.
  pub uuid:            String,
  pub is_active:       bool,
  pub firstname:       String,
  pub lastname:        String,
  pub date_of_birth:   NaiveDate,
  pub vat:             String,
  pub identity_number: String,
  pub gender:          Gender,
  pub contact_details: ContactDetails,
  /// Enrolled course ids, sorted ascending. Empty when not enrolled.
  pub course_ids:      Vec<i64>,
}

/// A student as handed to the store for first persistence. Every id in
/// `course_ids` has already passed the referential check.
#[derive(Debug, Clone)]
pub struct StudentDraft {
  pub is_active:       bool,
  pub firstname:       String,
  pub lastname:        String,
  pub date_of_birth:   NaiveDate,
  pub vat:             String,
  pub identity_number: String,
  pub gender:          Gender,
  pub contact_details: ContactDetailsDraft,
  pub course_ids:      Vec<i64>,
}
