//! kiosk-server: beverage subscription kiosk backend
//!
//! Checks whether a student may order a beverage right now and records
//! orders and first payments. All data lives in a spreadsheet with a
//! registration table and an orders table.
//!
//! ```text
//!  kiosk ──HTTP──► api ──► services ──► eligibility (pure rules)
//!                             │
//!                             └──────► sheets (SheetStore: Google / memory)
//! ```

pub mod api;
pub mod clock;
pub mod config;
pub mod eligibility;
pub mod locks;
pub mod services;
pub mod sheets;
pub mod state;
pub mod utils;

pub use config::Config;
pub use state::AppState;
