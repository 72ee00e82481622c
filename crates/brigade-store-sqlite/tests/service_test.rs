//! End-to-end service tests: the real services running against an in-memory
//! SQLite store, with password hashing stubbed out.

use std::sync::Arc;

use brigade_core::{
  Error,
  dto::{
    ContactDetailsInsertDto, ContactDetailsUpdateDto, CourseInsertDto,
    CourseUpdateDto, InstructorInsertDto, InstructorUpdateDto, StudentInsertDto,
    StudentUpdateDto, UserInsertDto, UserUpdateDto,
  },
  filters::{CourseFilters, StudentFilters},
  instructor::Gender,
  mapper::PasswordEncoder,
  service::{CourseService, InstructorService, StudentService},
  store::SchoolStore,
  user::Role,
};
use brigade_store_sqlite::SqliteStore;
use chrono::NaiveDate;

struct PlainEncoder;

impl PasswordEncoder for PlainEncoder {
  fn encode(&self, raw: &str) -> brigade_core::Result<String> {
    Ok(format!("hashed:{raw}"))
  }

  fn matches(&self, raw: &str, hash: &str) -> bool {
    hash == format!("hashed:{raw}")
  }
}

async fn store() -> Arc<SqliteStore> {
  Arc::new(SqliteStore::open_in_memory().await.unwrap())
}

fn course_dto(name: &str) -> CourseInsertDto {
  CourseInsertDto {
    is_active:     true,
    name:          name.to_string(),
    description:   format!("All about {name}"),
    instructor_id: None,
  }
}

fn contact_dto(email: &str) -> ContactDetailsInsertDto {
  ContactDetailsInsertDto {
    city:          "Athens".to_string(),
    street:        None,
    street_number: None,
    postal_code:   Some("10431".to_string()),
    email:         email.to_string(),
    phone_number:  "2101234567".to_string(),
  }
}

fn instructor_dto(identity_number: &str, username: &str) -> InstructorInsertDto {
  InstructorInsertDto {
    is_active:       true,
    firstname:       "Maria".to_string(),
    lastname:        "Papadaki".to_string(),
    identity_number: identity_number.to_string(),
    gender:          Gender::Female,
    user:            UserInsertDto {
      is_active: true,
      username:  username.to_string(),
      password:  "Str0ng!pass".to_string(),
      role:      Role::Instructor,
      vat:       "112233445".to_string(),
    },
    contact_details: contact_dto(&format!("{username}@school.test")),
  }
}

fn student_dto(vat: &str, course_ids: Option<Vec<i64>>) -> StudentInsertDto {
  StudentInsertDto {
    is_active: true,
    firstname: "Nikos".to_string(),
    lastname: "Karras".to_string(),
    date_of_birth: NaiveDate::from_ymd_opt(2001, 5, 17).unwrap(),
    vat: vat.to_string(),
    identity_number: format!("ID{vat}"),
    gender: Gender::Male,
    contact_details: contact_dto(&format!("s{vat}@school.test")),
    course_ids,
  }
}

// ─── Courses ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn saving_a_course_with_a_taken_name_is_a_conflict() {
  let courses = CourseService::new(store().await);
  courses.save(course_dto("Fresh Pasta")).await.unwrap();

  let err = courses.save(course_dto("Fresh Pasta")).await.unwrap_err();
  match err {
    Error::AlreadyExists { field, message } => {
      assert_eq!(field, "Course name");
      assert_eq!(message, "Course with name Fresh Pasta already exists");
    }
    other => panic!("expected AlreadyExists, got {other:?}"),
  }
}

#[tokio::test]
async fn saving_a_course_with_an_unknown_instructor_is_not_found() {
  let courses = CourseService::new(store().await);
  let mut dto = course_dto("Fresh Pasta");
  dto.instructor_id = Some(42);

  let err = courses.save(dto).await.unwrap_err();
  assert!(
    matches!(err, Error::NotFound { entity: "Instructor", .. }),
    "got {err:?}"
  );
}

#[tokio::test]
async fn renaming_a_course_to_itself_passes_the_uniqueness_guard() {
  let courses = CourseService::new(store().await);
  let saved = courses.save(course_dto("Fresh Pasta")).await.unwrap();

  // Same name, changed description; the self-match must not count as a
  // collision.
  let updated = courses
    .update(CourseUpdateDto {
      id:            saved.id,
      is_active:     true,
      name:          "Fresh Pasta".to_string(),
      description:   "Now with eggs".to_string(),
      instructor_id: None,
    })
    .await
    .unwrap();
  assert_eq!(updated.description, "Now with eggs");
}

#[tokio::test]
async fn renaming_a_course_onto_another_is_a_conflict() {
  let courses = CourseService::new(store().await);
  courses.save(course_dto("Fresh Pasta")).await.unwrap();
  let wine = courses.save(course_dto("Wine")).await.unwrap();

  let err = courses
    .update(CourseUpdateDto {
      id:            wine.id,
      is_active:     true,
      name:          "Fresh Pasta".to_string(),
      description:   wine.description,
      instructor_id: None,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::AlreadyExists { .. }), "got {err:?}");
}

#[tokio::test]
async fn a_zero_page_size_fails_validation() {
  let courses = CourseService::new(store().await);
  let filters = CourseFilters { page_size: 0, ..Default::default() };

  let err = courses.search(filters).await.unwrap_err();
  match err {
    Error::Validation(errors) => assert!(errors.0.contains_key("pageSize")),
    other => panic!("expected Validation, got {other:?}"),
  }
}

// ─── Instructors ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn instructor_identity_collision_wins_over_username_collision() {
  let store = store().await;
  let instructors = InstructorService::new(store, Arc::new(PlainEncoder));
  instructors.save(instructor_dto("AX111222", "mpapadaki")).await.unwrap();

  // Both fields collide; the identity number is checked first.
  let mut dto = instructor_dto("AX111222", "mpapadaki");
  dto.user.vat = "998877665".to_string();
  dto.contact_details = contact_dto("other@school.test");
  let err = instructors.save(dto).await.unwrap_err();
  match err {
    Error::AlreadyExists { field, .. } => assert_eq!(field, "IdentityNumber"),
    other => panic!("expected AlreadyExists, got {other:?}"),
  }
}

#[tokio::test]
async fn instructor_username_collision_is_reported_by_field() {
  let store = store().await;
  let instructors = InstructorService::new(store, Arc::new(PlainEncoder));
  instructors.save(instructor_dto("AX111222", "mpapadaki")).await.unwrap();

  let mut dto = instructor_dto("AX999888", "mpapadaki");
  dto.user.vat = "998877665".to_string();
  dto.contact_details = contact_dto("other@school.test");
  let err = instructors.save(dto).await.unwrap_err();
  match err {
    Error::AlreadyExists { field, .. } => assert_eq!(field, "Username"),
    other => panic!("expected AlreadyExists, got {other:?}"),
  }
}

fn update_from(read: &brigade_core::dto::InstructorReadOnlyDto) -> InstructorUpdateDto {
  InstructorUpdateDto {
    id:              read.id,
    uuid:            read.uuid.clone(),
    is_active:       read.is_active,
    firstname:       read.firstname.clone(),
    lastname:        read.lastname.clone(),
    identity_number: read.identity_number.clone(),
    gender:          read.gender,
    user:            UserUpdateDto {
      id:        read.user.id,
      is_active: true,
      username:  read.user.username.clone(),
      password:  None,
      role:      read.user.role,
      vat:       read.user.vat.clone(),
    },
    contact_details: ContactDetailsUpdateDto {
      id:            read.contact_details.id,
      city:          read.contact_details.city.clone(),
      street:        read.contact_details.street.clone(),
      street_number: read.contact_details.street_number.clone(),
      postal_code:   read.contact_details.postal_code.clone(),
      email:         read.contact_details.email.clone(),
      phone_number:  read.contact_details.phone_number.clone(),
    },
  }
}

#[tokio::test]
async fn a_blank_password_on_update_keeps_the_stored_hash() {
  let store = store().await;
  let instructors = InstructorService::new(Arc::clone(&store), Arc::new(PlainEncoder));
  let saved = instructors.save(instructor_dto("AX111222", "mpapadaki")).await.unwrap();

  let mut dto = update_from(&saved);
  dto.user.password = Some("   ".to_string());
  instructors.update(dto).await.unwrap();

  let user = store.find_user_by_username("mpapadaki").await.unwrap().unwrap();
  assert_eq!(user.password_hash, "hashed:Str0ng!pass");

  let mut dto = update_from(&saved);
  dto.user.password = Some("N3w!password".to_string());
  instructors.update(dto).await.unwrap();

  let user = store.find_user_by_username("mpapadaki").await.unwrap().unwrap();
  assert_eq!(user.password_hash, "hashed:N3w!password");
}

#[tokio::test]
async fn an_unchanged_instructor_update_is_idempotent() {
  let store = store().await;
  let instructors = InstructorService::new(store, Arc::new(PlainEncoder));
  let saved = instructors.save(instructor_dto("AX111222", "mpapadaki")).await.unwrap();

  // Re-submitting the same identity number and username must not trip the
  // uniqueness guard on the instructor's own rows.
  let updated = instructors.update(update_from(&saved)).await.unwrap();
  assert_eq!(updated, saved);
}

#[tokio::test]
async fn instructor_validation_reports_every_bad_field() {
  let instructors = InstructorService::new(store().await, Arc::new(PlainEncoder));
  let mut dto = instructor_dto("AX111222", "mpapadaki");
  dto.firstname = String::new();
  dto.user.password = "short".to_string();
  dto.contact_details.email = "not-an-email".to_string();

  let err = instructors.save(dto).await.unwrap_err();
  match err {
    Error::Validation(errors) => {
      assert!(errors.0.contains_key("firstname"));
      assert!(errors.0.contains_key("user.password"));
      assert!(errors.0.contains_key("contactDetails.email"));
    }
    other => panic!("expected Validation, got {other:?}"),
  }
}

// ─── Students ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn enrolling_in_a_missing_course_leaves_nothing_behind() {
  let store = store().await;
  let students = StudentService::new(Arc::clone(&store));

  let err = students
    .save(student_dto("123456789", Some(vec![42])))
    .await
    .unwrap_err();
  assert!(
    matches!(err, Error::NotFound { entity: "Course", .. }),
    "got {err:?}"
  );

  // The referential check precedes persistence; no partial student exists.
  assert!(store.list_students().await.unwrap().is_empty());
}

#[tokio::test]
async fn a_student_without_enrollments_reads_back_with_no_course_list() {
  let students = StudentService::new(store().await);
  let saved = students.save(student_dto("123456789", None)).await.unwrap();
  assert_eq!(saved.course_ids, None);

  let fetched = students.get_one(&saved.uuid).await.unwrap();
  assert_eq!(fetched.course_ids, None);
}

#[tokio::test]
async fn a_student_update_replaces_the_enrollment_set() {
  let store = store().await;
  let courses = CourseService::new(Arc::clone(&store));
  let students = StudentService::new(Arc::clone(&store));

  let pastry = courses.save(course_dto("Pastry")).await.unwrap();
  let wine = courses.save(course_dto("Wine")).await.unwrap();
  let saved = students
    .save(student_dto("123456789", Some(vec![pastry.id])))
    .await
    .unwrap();

  let updated = students
    .update(StudentUpdateDto {
      id:              saved.id,
      uuid:            saved.uuid.clone(),
      is_active:       saved.is_active,
      firstname:       saved.firstname.clone(),
      lastname:        saved.lastname.clone(),
      date_of_birth:   saved.date_of_birth,
      vat:             saved.vat.clone(),
      identity_number: saved.identity_number.clone(),
      gender:          saved.gender,
      contact_details: ContactDetailsUpdateDto {
        id:            saved.contact_details.id,
        city:          saved.contact_details.city.clone(),
        street:        saved.contact_details.street.clone(),
        street_number: saved.contact_details.street_number.clone(),
        postal_code:   saved.contact_details.postal_code.clone(),
        email:         saved.contact_details.email.clone(),
        phone_number:  saved.contact_details.phone_number.clone(),
      },
      course_ids:      Some(vec![wine.id]),
    })
    .await
    .unwrap();
  assert_eq!(updated.course_ids, Some(vec![wine.id]));
}

#[tokio::test]
async fn student_vat_collision_is_checked_before_identity_number() {
  let students = StudentService::new(store().await);
  students.save(student_dto("123456789", None)).await.unwrap();

  let mut dto = student_dto("123456789", None);
  dto.identity_number = "IDother".to_string();
  dto.contact_details = contact_dto("other@school.test");
  let err = students.save(dto).await.unwrap_err();
  match err {
    Error::AlreadyExists { field, .. } => assert_eq!(field, "VAT"),
    other => panic!("expected AlreadyExists, got {other:?}"),
  }
}

#[tokio::test]
async fn an_all_empty_filter_body_returns_the_first_page_of_everything() {
  let store = store().await;
  let students = StudentService::new(Arc::clone(&store));
  students.save(student_dto("123456789", None)).await.unwrap();
  let mut second = student_dto("987654321", None);
  second.identity_number = "ID987".to_string();
  students.save(second).await.unwrap();

  // Blank and absent filter values are both neutral.
  let filters = StudentFilters {
    lastname: Some("   ".to_string()),
    instructor_uuid: Some(String::new()),
    ..Default::default()
  };
  let page = students.search(filters).await.unwrap();
  assert_eq!(page.total_elements, 2);
  assert_eq!(page.current_page, 0);
  assert_eq!(page.page_size, 10);
}
