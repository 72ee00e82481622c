//! Course — the unit a student enrolls in and an instructor teaches.
//!
//! The instructor association is a plain foreign key; the enrolled-student
//! set is the inverse side of the join table and is resolved through queries,
//! never held in memory.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
  pub id:            i64,
  pub is_active:     bool,
  pub name:          String,
  pub description:   String,
  /// Owning instructor, at most one at a time. `None` means detached.
  pub instructor_id: Option<i64>,
}

/// A course as handed to the store for first persistence.
#[derive(Debug, Clone)]
pub struct CourseDraft {
  pub is_active:     bool,
  pub name:          String,
  pub description:   String,
  pub instructor_id: Option<i64>,
}
