//! Auth types shared across personnel registry services.
//!
//! Provides the access/refresh [`token::TokenManager`] and the
//! [`bearer::BearerIdentity`] extractor for protected routes.

pub mod bearer;
pub mod token;
