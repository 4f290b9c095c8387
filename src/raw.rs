//! Raw firmware-facing types
//!
//! ABI-level types shared with the boot environment. Everything here is
//! binary-compatible with the corresponding UEFI definitions, trimmed to
//! what the netboot path actually touches.

use core::fmt;

// =============================================================================
// STATUS
// =============================================================================

/// Firmware status code
///
/// Error codes have the high bit set, matching the UEFI convention.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct Status(pub u64);

impl Status {
    /// Error bit mask
    const ERROR_BIT: u64 = 1u64 << 63;

    /// Success
    pub const SUCCESS: Self = Self(0);

    /// The buffer is not large enough
    pub const BUFFER_TOO_SMALL: Self = Self(Self::ERROR_BIT | 5);

    /// There is no pending request
    pub const NOT_READY: Self = Self(Self::ERROR_BIT | 6);

    /// The physical device reported an error
    pub const DEVICE_ERROR: Self = Self(Self::ERROR_BIT | 7);

    /// A resource has run out
    pub const OUT_OF_RESOURCES: Self = Self(Self::ERROR_BIT | 9);

    /// The item was not found
    pub const NOT_FOUND: Self = Self(Self::ERROR_BIT | 14);

    /// The timeout time expired
    pub const TIMEOUT: Self = Self(Self::ERROR_BIT | 18);

    /// The protocol has not been started
    pub const NOT_STARTED: Self = Self(Self::ERROR_BIT | 19);

    /// The operation was aborted
    pub const ABORTED: Self = Self(Self::ERROR_BIT | 21);

    /// An ICMP error occurred during the network operation
    pub const ICMP_ERROR: Self = Self(Self::ERROR_BIT | 22);

    /// A TFTP error occurred during the network operation
    pub const TFTP_ERROR: Self = Self(Self::ERROR_BIT | 23);

    /// Create a new status code
    pub const fn new(code: u64) -> Self {
        Self(code)
    }

    /// Check if this is a success status
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }

    /// Check if this is an error status
    pub const fn is_error(self) -> bool {
        self.0 & Self::ERROR_BIT != 0
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Status(0x{:X})", self.0)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

// =============================================================================
// HANDLE
// =============================================================================

/// Opaque handle to an environment object
///
/// Pointer-sized token owned by the environment; the crate never
/// dereferences it, only passes it back across the boundary.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Handle(pub usize);

impl Handle {
    /// Null handle
    pub const NULL: Self = Self(0);

    /// Check if this is a null handle
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle(0x{:X})", self.0)
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::NULL
    }
}

// =============================================================================
// GUID
// =============================================================================

/// Globally unique identifier (UEFI layout)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct Guid {
    /// First component (big-endian in textual representation)
    pub data1: u32,
    /// Second component
    pub data2: u16,
    /// Third component
    pub data3: u16,
    /// Fourth component (array of 8 bytes)
    pub data4: [u8; 8],
}

impl Guid {
    /// Create a GUID from its components
    pub const fn new(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self { data1, data2, data3, data4 }
    }
}

/// PXE Base Code protocol GUID
///
/// `03C4E603-AC28-11D3-9A2D-0090273FC14D`
pub const PXE_BASE_CODE_GUID: Guid = Guid::new(
    0x03C4_E603,
    0xAC28,
    0x11D3,
    [0x9A, 0x2D, 0x00, 0x90, 0x27, 0x3F, 0xC1, 0x4D],
);

// =============================================================================
// TFTP OPCODES
// =============================================================================

/// Mtftp operation requested from the base code protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum TftpOpcode {
    /// Query the size of a remote file
    GetFileSize = 1,
    /// Read a single file
    ReadFile = 2,
    /// Write a single file
    WriteFile = 3,
    /// Read a directory listing
    ReadDirectory = 4,
}

// =============================================================================
// TESTS
// =============================================================================
