pub mod auth;
pub mod employee_detail;
pub mod health;
pub mod research_area;
