//! The `SchoolStore` trait — the persistence abstraction the services run
//! against.
//!
//! The trait is implemented by storage backends (e.g. `brigade-store-sqlite`).
//! Higher layers depend on this abstraction, not on any concrete backend.
//! Lookups return `None` on a miss, never an error. Every insert/update is a
//! single atomic unit of work: a failure partway through rolls back all rows
//! written so far, including owned sub-entities and enrollment links.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use crate::{
  course::{Course, CourseDraft},
  filters::{CourseFilters, InstructorFilters, Paginated, StudentFilters},
  instructor::{Instructor, InstructorDraft},
  student::{Student, StudentDraft},
  user::{User, UserDraft},
};

pub trait SchoolStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Courses ───────────────────────────────────────────────────────────

  fn insert_course(
    &self,
    draft: CourseDraft,
  ) -> impl Future<Output = Result<Course, Self::Error>> + Send + '_;

  /// Replace every mutable field of the course identified by `course.id`.
  /// The enrolled-student set is not touched; it belongs to the students.
  fn update_course(
    &self,
    course: Course,
  ) -> impl Future<Output = Result<Course, Self::Error>> + Send + '_;

  fn get_course(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Course>, Self::Error>> + Send + '_;

  /// Unique-field lookup for the uniqueness guard. Returns the id of the
  /// record currently holding `name`, if any.
  fn find_course_id_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + 'a;

  fn list_courses(
    &self,
  ) -> impl Future<Output = Result<Vec<Course>, Self::Error>> + Send + '_;

  fn search_courses<'a>(
    &'a self,
    filters: &'a CourseFilters,
  ) -> impl Future<Output = Result<Paginated<Course>, Self::Error>> + Send + 'a;

  // ── Instructors ───────────────────────────────────────────────────────

  /// Persist a new instructor together with its owned user and contact
  /// details, assigning the external uuid.
  fn insert_instructor(
    &self,
    draft: InstructorDraft,
  ) -> impl Future<Output = Result<Instructor, Self::Error>> + Send + '_;

  /// Replace the instructor's mutable fields and update the owned user and
  /// contact-details rows in place. The uuid is never rewritten.
  fn update_instructor(
    &self,
    instructor: Instructor,
  ) -> impl Future<Output = Result<Instructor, Self::Error>> + Send + '_;

  fn get_instructor(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Instructor>, Self::Error>> + Send + '_;

  fn get_instructor_by_uuid<'a>(
    &'a self,
    uuid: &'a str,
  ) -> impl Future<Output = Result<Option<Instructor>, Self::Error>> + Send + 'a;

  /// The instructor owning the given account, if any. Used by the login
  /// flow to surface the person behind a token.
  fn get_instructor_by_user_id(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<Option<Instructor>, Self::Error>> + Send + '_;

  fn find_instructor_id_by_identity_number<'a>(
    &'a self,
    identity_number: &'a str,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + 'a;

  fn list_instructors(
    &self,
  ) -> impl Future<Output = Result<Vec<Instructor>, Self::Error>> + Send + '_;

  fn search_instructors<'a>(
    &'a self,
    filters: &'a InstructorFilters,
  ) -> impl Future<Output = Result<Paginated<Instructor>, Self::Error>> + Send + 'a;

  // ── Students ──────────────────────────────────────────────────────────

  /// Persist a new student together with its owned contact details and
  /// enrollment links, assigning the external uuid.
  fn insert_student(
    &self,
    draft: StudentDraft,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  /// Replace the student's mutable fields, update the owned contact-details
  /// row in place, and replace the full enrollment set with
  /// `student.course_ids`. The uuid is never rewritten.
  fn update_student(
    &self,
    student: Student,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  fn get_student(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  fn get_student_by_uuid<'a>(
    &'a self,
    uuid: &'a str,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + 'a;

  fn find_student_id_by_vat<'a>(
    &'a self,
    vat: &'a str,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + 'a;

  fn find_student_id_by_identity_number<'a>(
    &'a self,
    identity_number: &'a str,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + 'a;

  fn list_students(
    &self,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  fn search_students<'a>(
    &'a self,
    filters: &'a StudentFilters,
  ) -> impl Future<Output = Result<Paginated<Student>, Self::Error>> + Send + 'a;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a standalone account (one not owned by an instructor).
  /// Used for bootstrap admin seeding.
  fn insert_user(
    &self,
    draft: UserDraft,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn find_user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;
}
