//! Core error types

use thiserror::Error;

/// Shell core errors.
///
/// Per the error policy, none of these escape the public entry points:
/// invalid requests are dropped where they arrive and logged at debug
/// level. The variants exist so internal operations can say precisely
/// why a request was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    #[error("invalid surface id: {0}")]
    InvalidSurfaceId(u32),

    #[error("invalid window id: {0}")]
    InvalidWindowId(u32),

    #[error("invalid seat id: {0}")]
    InvalidSeatId(u32),

    #[error("window {0} is already grabbed")]
    AlreadyGrabbed(u32),

    #[error("invalid resize edge mask: {0:#x}")]
    InvalidResizeEdges(u32),

    #[error("seat {0} has no pointer")]
    NoPointer(u32),

    #[error("no pointer button held for grab on seat {0}")]
    NoButtonDown(u32),

    #[error("stale grab serial {got} (expected {expected})")]
    StaleSerial { got: u32, expected: u32 },

    #[error("pointer focus does not match requesting surface {0}")]
    FocusMismatch(u32),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, ShellError>;
