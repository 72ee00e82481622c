//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as ISO 8601 (`YYYY-MM-DD`) strings, booleans as
//! integers, enums as their uppercase wire names.

use brigade_core::{instructor::Gender, user::Role};
use chrono::NaiveDate;

use crate::{Error, Result};

// ─── Booleans ────────────────────────────────────────────────────────────────

pub fn encode_bool(b: bool) -> i64 { i64::from(b) }

pub fn decode_bool(n: i64) -> bool { n != 0 }

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(format!("bad date {s:?}: {e}")))
}

// ─── Gender ──────────────────────────────────────────────────────────────────

pub fn encode_gender(g: Gender) -> &'static str {
  match g {
    Gender::Male => "MALE",
    Gender::Female => "FEMALE",
    Gender::Other => "OTHER",
  }
}

pub fn decode_gender(s: &str) -> Result<Gender> {
  match s {
    "MALE" => Ok(Gender::Male),
    "FEMALE" => Ok(Gender::Female),
    "OTHER" => Ok(Gender::Other),
    other => Err(Error::Decode(format!("unknown gender: {other:?}"))),
  }
}

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn encode_role(r: Role) -> &'static str {
  match r {
    Role::Admin => "ADMIN",
    Role::Instructor => "INSTRUCTOR",
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "ADMIN" => Ok(Role::Admin),
    "INSTRUCTOR" => Ok(Role::Instructor),
    other => Err(Error::Decode(format!("unknown role: {other:?}"))),
  }
}

// ─── Raw rows ────────────────────────────────────────────────────────────────
//
// Row shapes as read straight out of SQLite, before fallible decoding into
// domain types. Queries build these inside `conn.call` closures; conversion
// happens afterwards so decode failures surface as typed errors.

use brigade_core::{contact::ContactDetails, instructor::Instructor, student::Student, user::User};

pub struct RawContact {
  pub id:            i64,
  pub city:          String,
  pub street:        Option<String>,
  pub street_number: Option<String>,
  pub postal_code:   Option<String>,
  pub email:         String,
  pub phone_number:  String,
}

impl RawContact {
  pub fn into_contact(self) -> ContactDetails {
    ContactDetails {
      id:            self.id,
      city:          self.city,
      street:        self.street,
      street_number: self.street_number,
      postal_code:   self.postal_code,
      email:         self.email,
      phone_number:  self.phone_number,
    }
  }
}

pub struct RawUser {
  pub id:            i64,
  pub is_active:     i64,
  pub username:      String,
  pub password_hash: String,
  pub role:          String,
  pub vat:           String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            self.id,
      is_active:     decode_bool(self.is_active),
      username:      self.username,
      password_hash: self.password_hash,
      role:          decode_role(&self.role)?,
      vat:           self.vat,
    })
  }
}

pub struct RawInstructor {
  pub id:              i64,
  pub uuid:            String,
  pub is_active:       i64,
  pub firstname:       String,
  pub lastname:        String,
  pub identity_number: String,
  pub gender:          String,
  pub user:            RawUser,
  pub contact:         RawContact,
}

impl RawInstructor {
  pub fn into_instructor(self) -> Result<Instructor> {
    Ok(Instructor {
      id:              self.id,
      uuid:            self.uuid,
      is_active:       decode_bool(self.is_active),
      firstname:       self.firstname,
      lastname:        self.lastname,
      identity_number: self.identity_number,
      gender:          decode_gender(&self.gender)?,
      user:            self.user.into_user()?,
      contact_details: self.contact.into_contact(),
    })
  }
}

pub struct RawStudent {
  pub id:              i64,
  pub uuid:            String,
  pub is_active:       i64,
  pub firstname:       String,
  pub lastname:        String,
  pub date_of_birth:   String,
  pub vat:             String,
  pub identity_number: String,
  pub gender:          String,
  pub contact:         RawContact,
  /// Enrollment ids, already sorted ascending by the query.
  pub course_ids:      Vec<i64>,
}

impl RawStudent {
  pub fn into_student(self) -> Result<Student> {
    Ok(Student {
      id:              self.id,
      uuid:            self.uuid,
      is_active:       decode_bool(self.is_active),
      firstname:       self.firstname,
      lastname:        self.lastname,
      date_of_birth:   decode_date(&self.date_of_birth)?,
      vat:             self.vat,
      identity_number: self.identity_number,
      gender:          decode_gender(&self.gender)?,
      contact_details: self.contact.into_contact(),
      course_ids:      self.course_ids,
    })
  }
}
