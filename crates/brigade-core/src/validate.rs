//! Field-format validation for incoming DTOs.
//!
//! Violations are collected into a [`ValidationErrors`] map rather than
//! failing on the first one, so a response can report every bad field at
//! once. These checks run before the uniqueness guard; the corpus carries no
//! validation framework, so the rules are plain character checks.

use crate::{
  dto::{
    ContactDetailsInsertDto, ContactDetailsUpdateDto, CourseInsertDto,
    CourseUpdateDto, InstructorInsertDto, InstructorUpdateDto,
    StudentInsertDto, StudentUpdateDto, UserInsertDto, UserUpdateDto,
  },
  error::ValidationErrors,
};

// ─── Field rules ─────────────────────────────────────────────────────────────

fn require_not_blank(errors: &mut ValidationErrors, field: &str, value: &str) {
  if value.trim().is_empty() {
    errors.push(field, format!("{field} is required"));
  }
}

fn check_vat(errors: &mut ValidationErrors, field: &str, value: &str) {
  if value.len() != 9 || !value.bytes().all(|b| b.is_ascii_digit()) {
    errors.push(field, "VAT must be a 9-digit number");
  }
}

/// Structural email check: one `@` with a non-empty local part and a domain
/// containing a dot.
fn check_email(errors: &mut ValidationErrors, field: &str, value: &str) {
  let valid = match value.split_once('@') {
    Some((local, domain)) => {
      !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.contains(char::is_whitespace)
    }
    None => false,
  };
  if !valid {
    errors.push(field, "invalid email");
  }
}

/// At least 8 characters with a lowercase, an uppercase, a digit and one of
/// `@#$!%&*`.
fn check_password(errors: &mut ValidationErrors, field: &str, value: &str) {
  let strong = value.chars().count() >= 8
    && value.chars().any(|c| c.is_ascii_lowercase())
    && value.chars().any(|c| c.is_ascii_uppercase())
    && value.chars().any(|c| c.is_ascii_digit())
    && value.chars().any(|c| "@#$!%&*".contains(c));
  if !strong {
    errors.push(field, "invalid password");
  }
}

fn check_contact_fields(
  errors: &mut ValidationErrors,
  city: &str,
  email: &str,
  phone_number: &str,
) {
  require_not_blank(errors, "contactDetails.city", city);
  require_not_blank(errors, "contactDetails.phoneNumber", phone_number);
  check_email(errors, "contactDetails.email", email);
}

fn check_user_insert(errors: &mut ValidationErrors, user: &UserInsertDto) {
  require_not_blank(errors, "user.username", &user.username);
  check_password(errors, "user.password", &user.password);
  check_vat(errors, "user.vat", &user.vat);
}

fn check_user_update(errors: &mut ValidationErrors, user: &UserUpdateDto) {
  require_not_blank(errors, "user.username", &user.username);
  // Blank means "keep the stored hash", so only a supplied password is
  // held to the complexity rule.
  if let Some(password) = user.password.as_deref()
    && !password.trim().is_empty()
  {
    check_password(errors, "user.password", password);
  }
  check_vat(errors, "user.vat", &user.vat);
}

// ─── Per-DTO entry points ────────────────────────────────────────────────────

pub fn course_insert(dto: &CourseInsertDto) -> Result<(), ValidationErrors> {
  let mut errors = ValidationErrors::default();
  require_not_blank(&mut errors, "name", &dto.name);
  require_not_blank(&mut errors, "description", &dto.description);
  errors.into_result()
}

pub fn course_update(dto: &CourseUpdateDto) -> Result<(), ValidationErrors> {
  let mut errors = ValidationErrors::default();
  require_not_blank(&mut errors, "name", &dto.name);
  require_not_blank(&mut errors, "description", &dto.description);
  errors.into_result()
}

pub fn instructor_insert(dto: &InstructorInsertDto) -> Result<(), ValidationErrors> {
  let mut errors = ValidationErrors::default();
  require_not_blank(&mut errors, "firstname", &dto.firstname);
  require_not_blank(&mut errors, "lastname", &dto.lastname);
  require_not_blank(&mut errors, "identityNumber", &dto.identity_number);
  check_user_insert(&mut errors, &dto.user);
  check_contact_dto_insert(&mut errors, &dto.contact_details);
  errors.into_result()
}

pub fn instructor_update(dto: &InstructorUpdateDto) -> Result<(), ValidationErrors> {
  let mut errors = ValidationErrors::default();
  require_not_blank(&mut errors, "firstname", &dto.firstname);
  require_not_blank(&mut errors, "lastname", &dto.lastname);
  require_not_blank(&mut errors, "identityNumber", &dto.identity_number);
  check_user_update(&mut errors, &dto.user);
  check_contact_dto_update(&mut errors, &dto.contact_details);
  errors.into_result()
}

pub fn student_insert(dto: &StudentInsertDto) -> Result<(), ValidationErrors> {
  let mut errors = ValidationErrors::default();
  require_not_blank(&mut errors, "firstname", &dto.firstname);
  require_not_blank(&mut errors, "lastname", &dto.lastname);
  check_vat(&mut errors, "vat", &dto.vat);
  require_not_blank(&mut errors, "identityNumber", &dto.identity_number);
  check_contact_dto_insert(&mut errors, &dto.contact_details);
  errors.into_result()
}

pub fn student_update(dto: &StudentUpdateDto) -> Result<(), ValidationErrors> {
  let mut errors = ValidationErrors::default();
  require_not_blank(&mut errors, "firstname", &dto.firstname);
  require_not_blank(&mut errors, "lastname", &dto.lastname);
  check_vat(&mut errors, "vat", &dto.vat);
  require_not_blank(&mut errors, "identityNumber", &dto.identity_number);
  check_contact_dto_update(&mut errors, &dto.contact_details);
  errors.into_result()
}

/// `pageSize` is a caller contract: zero never reaches the pagination
/// engine.
pub fn page_size(size: u32) -> Result<(), ValidationErrors> {
  let mut errors = ValidationErrors::default();
  if size == 0 {
    errors.push("pageSize", "pageSize must be positive");
  }
  errors.into_result()
}

fn check_contact_dto_insert(
  errors: &mut ValidationErrors,
  contact: &ContactDetailsInsertDto,
) {
  check_contact_fields(errors, &contact.city, &contact.email, &contact.phone_number);
}

fn check_contact_dto_update(
  errors: &mut ValidationErrors,
  contact: &ContactDetailsUpdateDto,
) {
  check_contact_fields(errors, &contact.city, &contact.email, &contact.phone_number);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{instructor::Gender, user::Role};

  fn contact_insert() -> ContactDetailsInsertDto {
    ContactDetailsInsertDto {
      city:          "Athens".into(),
      street:        None,
      street_number: None,
      postal_code:   None,
      email:         "someone@example.com".into(),
      phone_number:  "2101234567".into(),
    }
  }

  #[test]
  fn valid_student_insert_passes() {
    let dto = StudentInsertDto {
      is_active:       true,
      firstname:       "Maria".into(),
      lastname:        "Papadopoulou".into(),
      date_of_birth:   chrono::NaiveDate::from_ymd_opt(1999, 4, 2).unwrap(),
      vat:             "123456789".into(),
      identity_number: "AK123456".into(),
      gender:          Gender::Female,
      contact_details: contact_insert(),
      course_ids:      None,
    };
    assert!(student_insert(&dto).is_ok());
  }

  #[test]
  fn bad_vat_and_blank_lastname_are_both_reported() {
    let dto = StudentInsertDto {
      is_active:       true,
      firstname:       "Maria".into(),
      lastname:        "  ".into(),
      date_of_birth:   chrono::NaiveDate::from_ymd_opt(1999, 4, 2).unwrap(),
      vat:             "12345".into(),
      identity_number: "AK123456".into(),
      gender:          Gender::Female,
      contact_details: contact_insert(),
      course_ids:      None,
    };
    let errors = student_insert(&dto).unwrap_err();
    assert!(errors.0.contains_key("lastname"));
    assert!(errors.0.contains_key("vat"));
  }

  #[test]
  fn weak_password_is_rejected_on_insert() {
    let mut errors = ValidationErrors::default();
    check_user_insert(&mut errors, &UserInsertDto {
      is_active: true,
      username:  "dimitris.chef".into(),
      password:  "weak".into(),
      role:      Role::Instructor,
      vat:       "111222333".into(),
    });
    assert!(errors.0.contains_key("user.password"));
  }

  #[test]
  fn blank_password_is_allowed_on_update() {
    let mut errors = ValidationErrors::default();
    check_user_update(&mut errors, &UserUpdateDto {
      id:        1,
      is_active: true,
      username:  "dimitris.chef".into(),
      password:  Some("".into()),
      role:      Role::Instructor,
      vat:       "111222333".into(),
    });
    assert!(errors.is_empty());
  }

  #[test]
  fn email_shape_is_checked() {
    let mut errors = ValidationErrors::default();
    check_email(&mut errors, "contactDetails.email", "not-an-email");
    assert!(errors.0.contains_key("contactDetails.email"));
  }

  #[test]
  fn zero_page_size_is_rejected() {
    assert!(page_size(0).is_err());
    assert!(page_size(10).is_ok());
  }
}
