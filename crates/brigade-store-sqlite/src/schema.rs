//! SQL schema for the Brigade SQLite store.
//!
//! Executed once at connection startup. The UNIQUE constraints here are the
//! authoritative backstop for every globally-unique field; the services'
//! pre-checks only exist to produce friendlier errors.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS contact_details (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    city          TEXT NOT NULL,
    street        TEXT,
    street_number TEXT,
    postal_code   TEXT,
    email         TEXT NOT NULL UNIQUE,
    phone_number  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    is_active     INTEGER NOT NULL DEFAULT 1,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role          TEXT NOT NULL,    -- 'ADMIN' | 'INSTRUCTOR'
    vat           TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS instructors (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    uuid               TEXT NOT NULL UNIQUE,
    is_active          INTEGER NOT NULL DEFAULT 1,
    firstname          TEXT NOT NULL,
    lastname           TEXT NOT NULL,
    identity_number    TEXT NOT NULL UNIQUE,
    gender             TEXT NOT NULL,    -- 'MALE' | 'FEMALE' | 'OTHER'
    user_id            INTEGER NOT NULL UNIQUE REFERENCES users(id),
    contact_details_id INTEGER NOT NULL UNIQUE REFERENCES contact_details(id)
);

CREATE TABLE IF NOT EXISTS students (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    uuid               TEXT NOT NULL UNIQUE,
    is_active          INTEGER NOT NULL DEFAULT 1,
    firstname          TEXT NOT NULL,
    lastname           TEXT NOT NULL,
    date_of_birth      TEXT NOT NULL,    -- ISO 8601 date
    vat                TEXT NOT NULL UNIQUE,
    identity_number    TEXT NOT NULL UNIQUE,
    gender             TEXT NOT NULL,
    contact_details_id INTEGER NOT NULL UNIQUE REFERENCES contact_details(id)
);

CREATE TABLE IF NOT EXISTS courses (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    is_active     INTEGER NOT NULL DEFAULT 1,
    name          TEXT NOT NULL UNIQUE,
    description   TEXT NOT NULL,
    instructor_id INTEGER REFERENCES instructors(id)
);

-- Owning side of the student<->course enrollment relation. The composite
-- primary key keeps enrollment idempotent.
CREATE TABLE IF NOT EXISTS students_courses (
    student_id INTEGER NOT NULL REFERENCES students(id),
    course_id  INTEGER NOT NULL REFERENCES courses(id),
    PRIMARY KEY (student_id, course_id)
);

CREATE INDEX IF NOT EXISTS courses_instructor_idx     ON courses(instructor_id);
CREATE INDEX IF NOT EXISTS students_courses_course_idx ON students_courses(course_id);

PRAGMA user_version = 1;
";
