//! Unified error handling
//!
//! All rejections carry a structured [`ErrorCode`] so callers can
//! distinguish "your input was invalid" from "this order can no longer be
//! acted on" from "the system could not be reached" without parsing
//! messages.

pub mod category;
pub mod codes;
pub mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
