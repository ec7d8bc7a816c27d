//! Kiosk API payloads
//!
//! Request and response bodies exchanged between kiosk-server and the kiosk
//! front-end. Field names are camelCase on the wire.

pub mod menu;
pub mod order;
pub mod payment;
pub mod student;

// Re-exports
pub use menu::*;
pub use order::*;
pub use payment::*;
pub use student::*;
