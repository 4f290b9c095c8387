//! Boot environment boundary
//!
//! Everything the netboot path needs from the firmware, expressed as two
//! traits: [`BootEnv`] for handle enumeration and capability acquisition,
//! and [`PxeBaseCode`] for the per-handle netboot capability itself.
//!
//! The call shapes deliberately mirror the firmware ABI. Enumeration and
//! the Mtftp read both report an undersized caller buffer together with
//! the required size, because the retry protocols built on top of them
//! (grow-once for enumeration, doubling for the transfer) live in this
//! crate, not in the environment.

use crate::addr::IpAddr;
use crate::raw::{Handle, Status, TftpOpcode};

// =============================================================================
// CALL SHAPES
// =============================================================================

/// Outcome of a handle enumeration call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateOutcome {
    /// The buffer now holds this many handles
    Handles(usize),
    /// The buffer is undersized; this many handle slots are required
    BufferTooSmall(usize),
    /// Enumeration failed outright
    Failed(Status),
}

/// Outcome of an Mtftp transfer call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MtftpOutcome {
    /// Transfer complete; this many bytes of the buffer are valid
    Complete(usize),
    /// The buffer is undersized; this many bytes are required
    BufferTooSmall(usize),
    /// The transfer failed for another reason
    Failed(Status),
}

/// Parameters of one Mtftp operation
///
/// Field-for-field shape of the firmware call, minus the destination
/// buffer which is passed separately as a mutable slice.
#[derive(Debug, Clone, Copy)]
pub struct MtftpRequest<'a> {
    /// Operation to perform
    pub operation: TftpOpcode,
    /// Overwrite an existing destination buffer
    pub overwrite: bool,
    /// Negotiated block size hint, in bytes
    pub block_size: usize,
    /// TFTP server address
    pub server: IpAddr,
    /// Remote file path
    pub path: &'a str,
    /// Perform the transfer without buffering
    pub dont_use_buffer: bool,
}

// =============================================================================
// CAPABILITY
// =============================================================================

/// The netboot capability exposed on one environment handle
///
/// Borrowed from the environment for the lifetime of the boot attempt;
/// the environment owns the underlying protocol instance and the raw
/// acknowledgment bytes.
pub trait PxeBaseCode {
    /// The protocol has been started
    fn started(&self) -> bool;

    /// A DHCP acknowledgment has been received
    fn ack_received(&self) -> bool;

    /// The acknowledgment is a DHCPv6 message rather than DHCPv4
    fn using_ipv6(&self) -> bool;

    /// Raw bytes of the received DHCP acknowledgment
    fn dhcp_ack(&self) -> &[u8];

    /// Perform a blocking Mtftp operation into `buffer`
    ///
    /// May block for an environment-defined duration; there is no timeout
    /// or cancellation contract.
    fn mtftp(&self, request: &MtftpRequest<'_>, buffer: &mut [u8]) -> MtftpOutcome;
}

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// The boot environment's discovery surface
///
/// On UEFI firmware an implementation backs these calls with
/// `LocateHandle`/`OpenProtocol` against [`PXE_BASE_CODE_GUID`].
///
/// [`PXE_BASE_CODE_GUID`]: crate::raw::PXE_BASE_CODE_GUID
pub trait BootEnv {
    /// Enumerate handles carrying the netboot capability
    ///
    /// Fills `buffer` with as many handles as fit and reports the count,
    /// or the required slot count when the buffer is undersized.
    fn locate_netboot_handles(&self, buffer: &mut [Handle]) -> LocateOutcome;

    /// Acquire the netboot capability on one handle
    ///
    /// Handles that do not expose a usable capability return the
    /// environment's failure status; the caller skips them.
    fn open_netboot(&self, handle: Handle) -> Result<&dyn PxeBaseCode, Status>;
}
