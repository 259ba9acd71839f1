//! Domain types shared across the outpass workspace.
//!
//! This crate contains only pure types with no framework dependencies.

pub mod outpass;
pub mod user;
