//! Entity↔DTO translation.
//!
//! Mapping is total and field-by-field with two effectful exceptions: the
//! plaintext password is hashed through [`PasswordEncoder`] on insert, and on
//! update a missing/blank password keeps the stored hash unchanged. Nested
//! owned objects are mapped by a nested call, never partially.

use crate::{
  contact::{ContactDetails, ContactDetailsDraft},
  course::{Course, CourseDraft},
  dto::{
    ContactDetailsInsertDto, ContactDetailsReadOnlyDto, ContactDetailsUpdateDto,
    CourseInsertDto, CourseReadOnlyDto, CourseUpdateDto, InstructorInsertDto,
    InstructorReadOnlyDto, InstructorUpdateDto, StudentInsertDto,
    StudentReadOnlyDto, StudentUpdateDto, UserInsertDto, UserReadOnlyDto,
    UserUpdateDto,
  },
  error::Result,
  instructor::{Instructor, InstructorDraft},
  student::{Student, StudentDraft},
  user::{User, UserDraft},
};

/// One-way password hashing seam. The concrete implementation (argon2) lives
/// at the boundary; the core only ever sees hashes.
pub trait PasswordEncoder: Send + Sync {
  /// Hash a plaintext password into its at-rest representation.
  fn encode(&self, raw: &str) -> Result<String>;

  /// Check a plaintext password against a stored hash.
  fn matches(&self, raw: &str, hash: &str) -> bool;
}

// ─── Contact details ─────────────────────────────────────────────────────────

pub fn to_contact_draft(dto: &ContactDetailsInsertDto) -> ContactDetailsDraft {
  ContactDetailsDraft {
    city:          dto.city.clone(),
    street:        dto.street.clone(),
    street_number: dto.street_number.clone(),
    postal_code:   dto.postal_code.clone(),
    email:         dto.email.clone(),
    phone_number:  dto.phone_number.clone(),
  }
}

pub fn to_contact_entity(dto: &ContactDetailsUpdateDto) -> ContactDetails {
  ContactDetails {
    id:            dto.id,
    city:          dto.city.clone(),
    street:        dto.street.clone(),
    street_number: dto.street_number.clone(),
    postal_code:   dto.postal_code.clone(),
    email:         dto.email.clone(),
    phone_number:  dto.phone_number.clone(),
  }
}

pub fn contact_read(contact: &ContactDetails) -> ContactDetailsReadOnlyDto {
  ContactDetailsReadOnlyDto {
    id:            contact.id,
    city:          contact.city.clone(),
    street:        contact.street.clone(),
    street_number: contact.street_number.clone(),
    postal_code:   contact.postal_code.clone(),
    email:         contact.email.clone(),
    phone_number:  contact.phone_number.clone(),
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

pub fn to_user_draft(
  dto: &UserInsertDto,
  encoder: &dyn PasswordEncoder,
) -> Result<UserDraft> {
  Ok(UserDraft {
    is_active:     dto.is_active,
    username:      dto.username.clone(),
    password_hash: encoder.encode(&dto.password)?,
    role:          dto.role,
    vat:           dto.vat.clone(),
  })
}

/// A supplied non-blank password is re-hashed; otherwise the existing hash is
/// carried over unchanged.
pub fn to_user_entity(
  dto: &UserUpdateDto,
  existing_hash: &str,
  encoder: &dyn PasswordEncoder,
) -> Result<User> {
  let password_hash = match dto.password.as_deref() {
    Some(raw) if !raw.trim().is_empty() => encoder.encode(raw)?,
    _ => existing_hash.to_string(),
  };
  Ok(User {
    id: dto.id,
    is_active: dto.is_active,
    username: dto.username.clone(),
    password_hash,
    role: dto.role,
    vat: dto.vat.clone(),
  })
}

pub fn user_read(user: &User) -> UserReadOnlyDto {
  UserReadOnlyDto {
    id:       user.id,
    username: user.username.clone(),
    role:     user.role,
    vat:      user.vat.clone(),
  }
}

// ─── Courses ─────────────────────────────────────────────────────────────────

pub fn to_course_draft(dto: &CourseInsertDto) -> CourseDraft {
  CourseDraft {
    is_active:     dto.is_active,
    name:          dto.name.clone(),
    description:   dto.description.clone(),
    instructor_id: dto.instructor_id,
  }
}

pub fn to_course_entity(dto: &CourseUpdateDto) -> Course {
  Course {
    id:            dto.id,
    is_active:     dto.is_active,
    name:          dto.name.clone(),
    description:   dto.description.clone(),
    instructor_id: dto.instructor_id,
  }
}

pub fn course_read(course: &Course) -> CourseReadOnlyDto {
  CourseReadOnlyDto {
    id:            course.id,
    is_active:     course.is_active,
    name:          course.name.clone(),
    description:   course.description.clone(),
    instructor_id: course.instructor_id,
  }
}

// ─── Instructors ─────────────────────────────────────────────────────────────

pub fn to_instructor_draft(
  dto: &InstructorInsertDto,
  encoder: &dyn PasswordEncoder,
) -> Result<InstructorDraft> {
  Ok(InstructorDraft {
    is_active:       dto.is_active,
    firstname:       dto.firstname.clone(),
    lastname:        dto.lastname.clone(),
    identity_number: dto.identity_number.clone(),
    gender:          dto.gender,
    user:            to_user_draft(&dto.user, encoder)?,
    contact_details: to_contact_draft(&dto.contact_details),
  })
}

pub fn to_instructor_entity(
  dto: &InstructorUpdateDto,
  existing_password_hash: &str,
  encoder: &dyn PasswordEncoder,
) -> Result<Instructor> {
  Ok(Instructor {
    id:              dto.id,
    uuid:            dto.uuid.clone(),
    is_active:       dto.is_active,
    firstname:       dto.firstname.clone(),
    lastname:        dto.lastname.clone(),
    identity_number: dto.identity_number.clone(),
    gender:          dto.gender,
    user:            to_user_entity(&dto.user, existing_password_hash, encoder)?,
    contact_details: to_contact_entity(&dto.contact_details),
  })
}

pub fn instructor_read(instructor: &Instructor) -> InstructorReadOnlyDto {
  InstructorReadOnlyDto {
    id:              instructor.id,
    uuid:            instructor.uuid.clone(),
    is_active:       instructor.is_active,
    firstname:       instructor.firstname.clone(),
    lastname:        instructor.lastname.clone(),
    identity_number: instructor.identity_number.clone(),
    gender:          instructor.gender,
    user:            user_read(&instructor.user),
    contact_details: contact_read(&instructor.contact_details),
  }
}

// ─── Students ────────────────────────────────────────────────────────────────

pub fn to_student_draft(dto: &StudentInsertDto) -> StudentDraft {
  StudentDraft {
    is_active:       dto.is_active,
    firstname:       dto.firstname.clone(),
    lastname:        dto.lastname.clone(),
    date_of_birth:   dto.date_of_birth,
    vat:             dto.vat.clone(),
    identity_number: dto.identity_number.clone(),
    gender:          dto.gender,
    contact_details: to_contact_draft(&dto.contact_details),
    course_ids:      dto.course_ids.clone().unwrap_or_default(),
  }
}

pub fn to_student_entity(dto: &StudentUpdateDto) -> Student {
  Student {
    id:              dto.id,
    uuid:            dto.uuid.clone(),
    is_active:       dto.is_active,
    firstname:       dto.firstname.clone(),
    lastname:        dto.lastname.clone(),
    date_of_birth:   dto.date_of_birth,
    vat:             dto.vat.clone(),
    identity_number: dto.identity_number.clone(),
    gender:          dto.gender,
    contact_details: to_contact_entity(&dto.contact_details),
    course_ids:      dto.course_ids.clone().unwrap_or_default(),
  }
}

/// Zero enrollments map to an absent list, not an empty one.
pub fn student_read(student: &Student) -> StudentReadOnlyDto {
  let course_ids = if student.course_ids.is_empty() {
    None
  } else {
    Some(student.course_ids.clone())
  };
  StudentReadOnlyDto {
    id:              student.id,
    uuid:            student.uuid.clone(),
    is_active:       student.is_active,
    firstname:       student.firstname.clone(),
    lastname:        student.lastname.clone(),
    date_of_birth:   student.date_of_birth,
    vat:             student.vat.clone(),
    identity_number: student.identity_number.clone(),
    gender:          student.gender,
    contact_details: contact_read(&student.contact_details),
    course_ids,
  }
}
