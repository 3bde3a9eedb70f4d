//! # fitola-core
//!
//! Core types and primitives for the Fitola fitness-coaching backend.
//! This crate defines the shared vocabulary used by every other crate in the workspace.

pub mod body;
pub mod error;
pub mod types;

pub use body::{BmiCategory, bmi, mifflin_st_jeor_bmr, tdee};
pub use error::{FitolaError, Result};
pub use types::*;
