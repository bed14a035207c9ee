//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Menu errors
//! - 7xxx: Table errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// State-machine rule violation
    InvalidTransition = 4002,
    /// Order has already been paid
    OrderAlreadyPaid = 4003,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4004,
    /// Order has no items
    OrderEmpty = 4005,
    /// Patch does not match a recognized field group
    UnrecognizedPatch = 4006,

    // ==================== 5xxx: Payment ====================
    /// Approval requires an uploaded payment proof
    PaymentProofMissing = 5001,
    /// Payment proof may only be attached once
    PaymentProofAlreadySet = 5002,
    /// Approval requires a non-empty courier name
    CourierNameRequired = 5003,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item has an invalid price
    MenuInvalidPrice = 6002,
    /// Menu item has an invalid stock count
    MenuInvalidStock = 6003,

    // ==================== 7xxx: Table ====================
    /// Table number outside the configured range
    TableOutOfRange = 7001,
    /// More than one open order claims the same table
    TableConflict = 7002,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Persistence/transport collaborator unreachable or failing
    TransportError = 9002,
    /// Operation timeout
    TimeoutError = 9003,
    /// Configuration error
    ConfigError = 9004,
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
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::InvalidTransition => "Order is not in the required state",
            ErrorCode::OrderAlreadyPaid => "Order has already been paid",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::UnrecognizedPatch => "Patch does not match a recognized field group",

            // Payment
            ErrorCode::PaymentProofMissing => "Payment proof has not been uploaded",
            ErrorCode::PaymentProofAlreadySet => "Payment proof has already been uploaded",
            ErrorCode::CourierNameRequired => "A courier name is required",

            // Menu
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuInvalidPrice => "Menu item price must be non-negative",
            ErrorCode::MenuInvalidStock => "Menu item stock must be non-negative",

            // Table
            ErrorCode::TableOutOfRange => "Table number is outside the configured range",
            ErrorCode::TableConflict => "More than one open order claims this table",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::TransportError => "The order store could not be reached",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
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
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::InvalidTransition),
            4003 => Ok(ErrorCode::OrderAlreadyPaid),
            4004 => Ok(ErrorCode::OrderAlreadyCancelled),
            4005 => Ok(ErrorCode::OrderEmpty),
            4006 => Ok(ErrorCode::UnrecognizedPatch),

            // Payment
            5001 => Ok(ErrorCode::PaymentProofMissing),
            5002 => Ok(ErrorCode::PaymentProofAlreadySet),
            5003 => Ok(ErrorCode::CourierNameRequired),

            // Menu
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::MenuInvalidPrice),
            6003 => Ok(ErrorCode::MenuInvalidStock),

            // Table
            7001 => Ok(ErrorCode::TableOutOfRange),
            7002 => Ok(ErrorCode::TableConflict),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::TransportError),
            9003 => Ok(ErrorCode::TimeoutError),
            9004 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::AlreadyExists.code(), 4);

        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::InvalidTransition.code(), 4002);
        assert_eq!(ErrorCode::OrderAlreadyPaid.code(), 4003);
        assert_eq!(ErrorCode::OrderEmpty.code(), 4005);

        assert_eq!(ErrorCode::PaymentProofMissing.code(), 5001);
        assert_eq!(ErrorCode::CourierNameRequired.code(), 5003);

        assert_eq!(ErrorCode::MenuItemNotFound.code(), 6001);
        assert_eq!(ErrorCode::TableOutOfRange.code(), 7001);
        assert_eq!(ErrorCode::TableConflict.code(), 7002);

        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::TransportError.code(), 9002);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::InvalidTransition.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(4002), Ok(ErrorCode::InvalidTransition));
        assert_eq!(ErrorCode::try_from(7002), Ok(ErrorCode::TableConflict));
        assert_eq!(ErrorCode::try_from(9002), Ok(ErrorCode::TransportError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::InvalidTransition).unwrap();
        assert_eq!(json, "4002");

        let code: ErrorCode = serde_json::from_str("7002").unwrap();
        assert_eq!(code, ErrorCode::TableConflict);
    }

    #[test]
    fn test_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::InvalidTransition,
            ErrorCode::TableConflict,
            ErrorCode::TransportError,
        ];

        for code in codes {
            let json = serde_json::to_string(&code).unwrap();
            let parsed: ErrorCode = serde_json::from_str(&json).unwrap();
            assert_eq!(code, parsed);
        }
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::OrderNotFound.message(), "Order not found");
        assert_eq!(
            ErrorCode::InvalidTransition.message(),
            "Order is not in the required state"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "0");
        assert_eq!(format!("{}", ErrorCode::OrderNotFound), "4001");
    }
}
