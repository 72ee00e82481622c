//! The entity services — validation, uniqueness guarding, referential
//! checks, relationship maintenance and translation, in that order.
//!
//! Services are stateless: each holds an `Arc` to the store (and, for
//! instructors, the password encoder) and is constructed once at process
//! start, then passed explicitly to the boundary.

mod course;
mod instructor;
mod student;

pub use course::CourseService;
pub use instructor::InstructorService;
pub use student::StudentService;
