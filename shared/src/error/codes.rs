//! Unified error codes for the kiosk
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Student errors (registration, payment status)
//! - 2xxx: Order errors (daily cap, cooldown, order window, menu)
//! - 9xxx: System errors (spreadsheet store, configuration)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as a bare `u16` so the kiosk front-end can switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Invalid format
    InvalidFormat = 6,

    // ==================== 1xxx: Student ====================
    /// No registration row matches the student ID
    StudentNotRegistered = 1001,
    /// First payment has not been confirmed yet
    PaymentRequired = 1002,

    // ==================== 2xxx: Order ====================
    /// Daily order cap reached
    DailyLimitReached = 2001,
    /// Last order is too recent
    CooldownActive = 2002,
    /// Today is outside the subscription window
    OutsideOrderWindow = 2003,
    /// Beverage is not on the menu
    UnknownBeverage = 2004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Spreadsheet store could not be reached or rejected the call
    StoreUnavailable = 9002,
    /// Spreadsheet headers do not match the configured columns
    StoreSchemaInvalid = 9003,
    /// Request did not finish in time
    TimeoutError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::InvalidFormat => "Invalid format",

            // Student
            ErrorCode::StudentNotRegistered => "Student is not registered",
            ErrorCode::PaymentRequired => "First payment has not been confirmed",

            // Order
            ErrorCode::DailyLimitReached => "Daily order limit reached",
            ErrorCode::CooldownActive => "Previous order is too recent",
            ErrorCode::OutsideOrderWindow => "Subscription window is not open",
            ErrorCode::UnknownBeverage => "Beverage is not on the menu",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StoreUnavailable => "Spreadsheet store is unavailable",
            ErrorCode::StoreSchemaInvalid => "Spreadsheet columns do not match configuration",
            ErrorCode::TimeoutError => "Operation timed out",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            6 => Ok(ErrorCode::InvalidFormat),

            // Student
            1001 => Ok(ErrorCode::StudentNotRegistered),
            1002 => Ok(ErrorCode::PaymentRequired),

            // Order
            2001 => Ok(ErrorCode::DailyLimitReached),
            2002 => Ok(ErrorCode::CooldownActive),
            2003 => Ok(ErrorCode::OutsideOrderWindow),
            2004 => Ok(ErrorCode::UnknownBeverage),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StoreUnavailable),
            9003 => Ok(ErrorCode::StoreSchemaInvalid),
            9005 => Ok(ErrorCode::TimeoutError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
