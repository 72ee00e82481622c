//! Wire-level data objects.
//!
//! Insert/update DTOs are what the boundary deserialises from request bodies;
//! read-only DTOs are what goes back out. Required fields are required at the
//! type level — a body missing one is rejected during deserialisation —
//! while format rules (blank strings, VAT digits, password complexity) are
//! checked by [`crate::validate`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{instructor::Gender, user::Role};

// ─── Contact details ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetailsInsertDto {
  pub city:          String,
  pub street:        Option<String>,
  pub street_number: Option<String>,
  pub postal_code:   Option<String>,
  pub email:         String,
  pub phone_number:  String,
}

/// Update DTOs carry the sub-entity id so the owned row keeps its identity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetailsUpdateDto {
  pub id:            i64,
  pub city:          String,
  pub street:        Option<String>,
  pub street_number: Option<String>,
  pub postal_code:   Option<String>,
  pub email:         String,
  pub phone_number:  String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetailsReadOnlyDto {
  pub id:            i64,
  pub city:          String,
  pub street:        Option<String>,
  pub street_number: Option<String>,
  pub postal_code:   Option<String>,
  pub email:         String,
  pub phone_number:  String,
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInsertDto {
  pub is_active: bool,
  pub username:  String,
  pub password:  String,
  pub role:      Role,
  pub vat:       String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateDto {
  pub id:        i64,
  pub is_active: bool,
  pub username:  String,
  /// A missing or blank password keeps the stored hash unchanged.
  pub password:  Option<String>,
  pub role:      Role,
  pub vat:       String,
}

/// The password hash never leaves the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReadOnlyDto {
  pub id:       i64,
  pub username: String,
  pub role:     Role,
  pub vat:      String,
}

// ─── Courses ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInsertDto {
  pub is_active:     bool,
  pub name:          String,
  pub description:   String,
  pub instructor_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseUpdateDto {
  pub id:            i64,
  pub is_active:     bool,
  pub name:          String,
  pub description:   String,
  /// `None` detaches the course from any instructor.
  pub instructor_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseReadOnlyDto {
  pub id:            i64,
  pub is_active:     bool,
  pub name:          String,
  pub description:   String,
  pub instructor_id: Option<i64>,
}

// ─── Instructors ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorInsertDto {
  pub is_active:       bool,
  pub firstname:       String,
  pub lastname:        String,
  pub identity_number: String,
  pub gender:          Gender,
  pub user:            UserInsertDto,
  pub contact_details: ContactDetailsInsertDto,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorUpdateDto {
  pub id:              i64,
  pub uuid:            String,
  pub is_active:       bool,
  pub firstname:       String,
  pub lastname:        String,
  pub identity_number: String,
  pub gender:          Gender,
  pub user:            UserUpdateDto,
  pub contact_details: ContactDetailsUpdateDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorReadOnlyDto {
  pub id:              i64,
  pub uuid:            String,
  pub is_active:       bool,
  pub firstname:       String,
  pub lastname:        String,
  pub identity_number: String,
  pub gender:          Gender,
  pub user:            UserReadOnlyDto,
  pub contact_details: ContactDetailsReadOnlyDto,
}

// ─── Students ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInsertDto {
  pub is_active:       bool,
  pub firstname:       String,
  pub lastname:        String,
  pub date_of_birth:   NaiveDate,
  pub vat:             String,
  pub identity_number: String,
  pub gender:          Gender,
  pub contact_details: ContactDetailsInsertDto,
  pub course_ids:      Option<Vec<i64>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentUpdateDto {
  pub id:              i64,
  pub uuid:            String,
  pub is_active:       bool,
  pub firstname:       String,
  pub lastname:        String,
  pub date_of_birth:   NaiveDate,
  pub vat:             String,
  pub identity_number: String,
  pub gender:          Gender,
  pub contact_details: ContactDetailsUpdateDto,
  /// Full target enrollment set; replaces the previous one. `None` is
  /// equivalent to an empty list.
  pub course_ids:      Option<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentReadOnlyDto {
  pub id:              i64,
  pub uuid:            String,
  pub is_active:       bool,
  pub firstname:       String,
  pub lastname:        String,
  pub date_of_birth:   NaiveDate,
  pub vat:             String,
  pub identity_number: String,
  pub gender:          Gender,
  pub contact_details: ContactDetailsReadOnlyDto,
  /// Absent (not `[]`) when the student has zero enrollments.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub course_ids:      Option<Vec<i64>>,
}
