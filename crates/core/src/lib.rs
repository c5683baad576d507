//! Pure domain logic for the template storefront.
//!
//! Entity types, validation, statistics and derived views. Nothing in this
//! crate performs I/O; callers pass collections in.

#[macro_use]
mod macros;

pub mod custom_solution;
pub mod error;
pub mod stats;
pub mod template;
pub mod types;
pub mod validation;
pub mod views;
