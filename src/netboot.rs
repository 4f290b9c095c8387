//! Netboot session: discover, resolve, fetch
//!
//! One boot attempt is one [`NetbootSession`]. The session owns the
//! attempt's state — the selected capability and the resolved TFTP
//! target — so the fixed ordering (discover, then resolve, then fetch)
//! is enforced by data dependency rather than convention. Concurrent
//! boot attempts are unsupported; create one session per attempt.
//!
//! Everything here runs synchronously as blocking calls into the
//! environment. A hang in the underlying transfer is a hang in the
//! whole boot attempt.

use alloc::string::String;
use alloc::vec::Vec;

use crate::dhcp;
use crate::env::{BootEnv, LocateOutcome, MtftpOutcome, MtftpRequest, PxeBaseCode};
use crate::error::{Error, Result};
use crate::raw::{Handle, TftpOpcode};
use crate::url::{self, TftpTarget, DEFAULT_LOADER};

// =============================================================================
// TUNING
// =============================================================================

/// Starting size of the fetch buffer when the caller supplies none
pub const DEFAULT_BUFFER_SIZE: usize = 4096 * 1024;

/// Ceiling on fetch buffer growth
///
/// The too-small retry doubles until the transfer fits; the ceiling keeps
/// a hostile server from forcing unbounded allocation.
pub const MAX_BUFFER_SIZE: usize = 512 * 1024 * 1024;

/// Negotiated TFTP block size hint, in bytes
pub const TFTP_BLOCK_SIZE: usize = 512;

/// Handle slots tried before growing the enumeration buffer
const INITIAL_HANDLE_SLOTS: usize = 1;

// =============================================================================
// SESSION
// =============================================================================

/// State of one network-boot attempt
///
/// Borrows the environment for the lifetime of the attempt. [`discover`],
/// [`resolve`], and [`fetch`] are invoked in that order by the surrounding
/// loader; each later stage fails with [`Error::NotReady`] if an earlier
/// one has not succeeded.
///
/// [`discover`]: NetbootSession::discover
/// [`resolve`]: NetbootSession::resolve
/// [`fetch`]: NetbootSession::fetch
pub struct NetbootSession<'e, E: BootEnv> {
    env: &'e E,
    capability: Option<&'e dyn PxeBaseCode>,
    target: Option<TftpTarget>,
}

impl<'e, E: BootEnv> NetbootSession<'e, E> {
    /// Create a session for one boot attempt
    pub fn new(env: &'e E) -> Self {
        Self { env, capability: None, target: None }
    }

    /// The target resolved by the last successful [`resolve`](Self::resolve)
    pub fn target(&self) -> Option<&TftpTarget> {
        self.target.as_ref()
    }

    // =========================================================================
    // DISCOVERY
    // =========================================================================

    /// Locate an active, ACK-received netboot capability
    ///
    /// Enumerates netboot handles, growing the handle buffer once if the
    /// environment reports it undersized; a second undersized result is
    /// failure. Handles whose capability cannot be acquired are skipped.
    /// The first capability that is started and has received an
    /// acknowledgment is selected.
    pub fn discover(&mut self) -> Result<()> {
        let mut handles = alloc_handles(INITIAL_HANDLE_SLOTS)?;

        let count = match self.env.locate_netboot_handles(&mut handles) {
            LocateOutcome::Handles(count) => count,
            LocateOutcome::BufferTooSmall(needed) => {
                handles = alloc_handles(needed)?;
                match self.env.locate_netboot_handles(&mut handles) {
                    LocateOutcome::Handles(count) => count,
                    LocateOutcome::BufferTooSmall(_) | LocateOutcome::Failed(_) => {
                        return Err(Error::CapabilityNotFound);
                    }
                }
            }
            LocateOutcome::Failed(status) => {
                log::debug!("netboot handle enumeration failed: {status}");
                return Err(Error::CapabilityNotFound);
            }
        };

        let mut saw_candidate = false;
        for &handle in handles.get(..count).unwrap_or(&[]) {
            let pxe = match self.env.open_netboot(handle) {
                Ok(pxe) => pxe,
                Err(status) => {
                    log::debug!("skipping {handle:?}: {status}");
                    continue;
                }
            };
            saw_candidate = true;

            if pxe.started() && pxe.ack_received() {
                // Started with an ACK in hand: this one can tell us
                // where the TFTP server is.
                log::info!("netboot capability selected on {handle:?} (ipv6={})",
                    pxe.using_ipv6());
                self.capability = Some(pxe);
                return Ok(());
            }
        }

        Err(if saw_candidate {
            Error::CapabilityNotActive
        } else {
            Error::CapabilityNotFound
        })
    }

    // =========================================================================
    // RESOLUTION
    // =========================================================================

    /// Extract the TFTP server address and loader path from the DHCP ack
    ///
    /// Branches on the address family of the acknowledgment the selected
    /// capability received. Any previously resolved target is cleared
    /// before the attempt; the new target is stored for the fetch and
    /// returned.
    pub fn resolve(&mut self) -> Result<&TftpTarget> {
        let pxe = self.capability.ok_or(Error::NotReady)?;
        self.target = None;

        let target = if pxe.using_ipv6() {
            resolve_v6(pxe.dhcp_ack())?
        } else {
            resolve_v4(pxe.dhcp_ack())?
        };

        log::debug!("netboot target [{}] {}", target.address, target.path);
        Ok(&*self.target.insert(target))
    }

    // =========================================================================
    // FETCH
    // =========================================================================

    /// Fetch the resolved image over TFTP
    ///
    /// Reads into `buffer` (or a fresh [`DEFAULT_BUFFER_SIZE`] one),
    /// doubling and retrying while the environment reports the buffer too
    /// small, up to [`MAX_BUFFER_SIZE`]. On success the returned buffer is
    /// truncated to the transferred size and ownership moves to the caller.
    pub fn fetch(&self, buffer: Option<Vec<u8>>) -> Result<Vec<u8>> {
        let pxe = self.capability.ok_or(Error::NotReady)?;
        let target = self.target.as_ref().ok_or(Error::NotReady)?;

        let mut buffer = match buffer {
            Some(supplied) if supplied.capacity() > 0 => {
                let size = supplied.capacity();
                let mut buffer = supplied;
                buffer.clear();
                buffer.resize(size, 0);
                buffer
            }
            _ => alloc_buffer(DEFAULT_BUFFER_SIZE)?,
        };

        log::info!("fetching netboot image {} from [{}]", target.path, target.address);

        loop {
            let request = MtftpRequest {
                operation: TftpOpcode::ReadFile,
                overwrite: false,
                block_size: TFTP_BLOCK_SIZE,
                server: target.address,
                path: &target.path,
                dont_use_buffer: false,
            };

            match pxe.mtftp(&request, &mut buffer) {
                MtftpOutcome::Complete(size) => {
                    buffer.truncate(size);
                    log::info!("netboot image fetched: {size} bytes");
                    return Ok(buffer);
                }
                MtftpOutcome::BufferTooSmall(required) => {
                    let next = grown_size(buffer.len(), required)?;
                    log::debug!("fetch buffer too small, retrying with {next} bytes");
                    buffer = alloc_buffer(next)?;
                }
                MtftpOutcome::Failed(status) => {
                    log::error!("netboot transfer failed: {status}");
                    return Err(Error::TransferFailed(status));
                }
            }
        }
    }
}

// =============================================================================
// RESOLUTION HELPERS
// =============================================================================

/// Resolve from a DHCPv6 acknowledgment: option walk plus URL decomposition
fn resolve_v6(ack: &[u8]) -> Result<TftpTarget> {
    let bootfile_url = dhcp::find_bootfile_url(ack).ok_or(Error::OptionNotFound)?;
    Ok(url::decompose(&bootfile_url)?)
}

/// Resolve from a DHCPv4 acknowledgment
///
/// The v4 path carries no boot-file URL in the exchanges this crate
/// handles; the server comes from the fixed `siaddr` field and the path
/// is the loader name by convention.
fn resolve_v4(ack: &[u8]) -> Result<TftpTarget> {
    let address = dhcp::v4_server_addr(ack).ok_or(Error::OptionNotFound)?;

    let mut path = String::new();
    path.try_reserve_exact(DEFAULT_LOADER.len())
        .map_err(|_| Error::OutOfMemory)?;
    path.push_str(DEFAULT_LOADER);

    Ok(TftpTarget { address: address.into(), path })
}

// =============================================================================
// BUFFER HELPERS
// =============================================================================

/// Allocate a zeroed handle buffer, surfacing allocation failure
fn alloc_handles(slots: usize) -> Result<Vec<Handle>> {
    let mut handles = Vec::new();
    handles.try_reserve_exact(slots).map_err(|_| Error::OutOfMemory)?;
    handles.resize(slots, Handle::NULL);
    Ok(handles)
}

/// Allocate a zeroed fetch buffer, surfacing allocation failure
fn alloc_buffer(size: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(size).map_err(|_| Error::OutOfMemory)?;
    buffer.resize(size, 0);
    Ok(buffer)
}

/// Next fetch buffer size: doubled, at least `required`, capped
fn grown_size(current: usize, required: usize) -> Result<usize> {
    let next = current.saturating_mul(2).max(required);
    if next > MAX_BUFFER_SIZE {
        return Err(Error::SizeLimitExceeded);
    }
    Ok(next)
}

// =============================================================================
// TESTS
// =============================================================================
