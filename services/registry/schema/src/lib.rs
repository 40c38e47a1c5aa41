//! sea-orm entities for the tables owned by the registry service.
//!
//! Table DDL lives with the deployment; these definitions only mirror it.

pub mod employee_details;
pub mod employees;
pub mod research_area_key_topics;
pub mod research_areas;
pub mod user_sessions;
pub mod users;
