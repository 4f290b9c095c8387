//! Error types for the netboot path
//!
//! One flat error enum covering discovery, resolution, and fetch, in
//! discrete result values — the caller aborts the network-boot attempt
//! and falls back to other boot sources on any of these.

use core::fmt;

use crate::raw::Status;
use crate::url::UrlError;

/// Result type for netboot operations
pub type Result<T> = core::result::Result<T, Error>;

/// Netboot error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// No handle exposes a usable netboot capability
    CapabilityNotFound,

    /// Capabilities exist but none is started with an ACK received
    CapabilityNotActive,

    /// The operation requires earlier stages that have not run
    NotReady,

    /// The boot-file URL failed structural validation
    MalformedUrl(UrlError),

    /// The DHCPv6 acknowledgment carries no boot-file URL option
    OptionNotFound,

    /// An allocation failed
    OutOfMemory,

    /// The transfer buffer would exceed the growth ceiling
    SizeLimitExceeded,

    /// The network read failed with the environment's status
    TransferFailed(Status),
}

impl Error {
    /// Get error name as string
    pub fn name(&self) -> &'static str {
        match self {
            Self::CapabilityNotFound => "CAPABILITY_NOT_FOUND",
            Self::CapabilityNotActive => "CAPABILITY_NOT_ACTIVE",
            Self::NotReady => "NOT_READY",
            Self::MalformedUrl(_) => "MALFORMED_URL",
            Self::OptionNotFound => "OPTION_NOT_FOUND",
            Self::OutOfMemory => "OUT_OF_MEMORY",
            Self::SizeLimitExceeded => "SIZE_LIMIT_EXCEEDED",
            Self::TransferFailed(_) => "TRANSFER_FAILED",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedUrl(e) => write!(f, "Netboot Error: MALFORMED_URL ({})", e.name()),
            Self::TransferFailed(status) => {
                write!(f, "Netboot Error: TRANSFER_FAILED ({status})")
            }
            _ => write!(f, "Netboot Error: {}", self.name()),
        }
    }
}

impl From<UrlError> for Error {
    fn from(err: UrlError) -> Self {
        Self::MalformedUrl(err)
    }
}

// =============================================================================
// TESTS
// =============================================================================
