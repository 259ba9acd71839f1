//! Auth types shared across the outpass workspace.
//!
//! Provides JWT issue/validation and the bearer-token identity extractors
//! (`Identity`, `StudentIdentity`, `StaffIdentity`).

pub mod identity;
pub mod token;
