//! Kiosk workflows
//!
//! Each function runs one request's worth of store access and returns a
//! typed payload or an [`shared::error::AppError`]; HTTP concerns stay in
//! [`crate::api`].

pub mod eligibility;
pub mod ordering;
pub mod payment;

pub use eligibility::{StudentStatus, load_status, required_student_id};
pub use ordering::place_order;
pub use payment::confirm_payment;
