//! Core types, services and trait definitions for the Brigade cooking-school
//! backend.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod contact;
pub mod course;
pub mod dto;
pub mod error;
pub mod filters;
pub mod instructor;
pub mod mapper;
pub mod service;
pub mod store;
pub mod student;
pub mod user;
pub mod validate;

pub use error::{Error, Result};
