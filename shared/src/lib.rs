//! Shared types for the beverage kiosk
//!
//! Error types, the unified response envelope, and the JSON payloads used by
//! kiosk-server and its front-end.

pub mod error;
pub mod kiosk;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
