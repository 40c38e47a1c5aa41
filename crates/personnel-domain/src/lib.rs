//! Domain types shared across the personnel registry.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod locale;
pub mod messages;
pub mod reconcile;
pub mod unique_id;
pub mod user;
