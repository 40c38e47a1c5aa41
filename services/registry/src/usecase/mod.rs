pub mod auth;
pub mod employee_detail;
pub mod password;
pub mod research_area;
pub mod validation;
