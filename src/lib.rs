//! # PXE Netboot Support
//!
//! Network-boot plumbing for a UEFI first-stage loader: find an active,
//! ACK-received PXE session, pull the TFTP server and boot path out of the
//! DHCP acknowledgment it received, re-point the path at the secondary
//! loader, and fetch that file into memory.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! - **Layer 0 (raw)**: ABI-level types shared with the firmware
//! - **Layer 1 (env)**: the boundary traits the environment implements
//! - **Layer 2 (addr/dhcp/url)**: untrusted-input parsing
//! - **Layer 3 (netboot)**: the session driving one boot attempt
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use uefi_netboot::NetbootSession;
//!
//! let mut session = NetbootSession::new(&env);
//! session.discover()?;
//! session.resolve()?;
//! let image = session.fetch(None)?;
//! ```
//!
//! The three entry points run in that fixed order; each later stage fails
//! with `NotReady` until the earlier one has succeeded. One session is one
//! boot attempt — on any error the caller abandons network boot and falls
//! back to other boot sources.
//!
//! All parsing of the acknowledgment packet and the boot-file URL is
//! bounds-checked: both originate from an untrusted network responder
//! before any code-signing trust has been established.

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

extern crate alloc;

// =============================================================================
// MODULES
// =============================================================================

/// Raw firmware-facing types (Layer 0)
pub mod raw;

/// Boot environment boundary traits (Layer 1)
pub mod env;

/// IP address types and the IPv6 literal parser
pub mod addr;

/// DHCP acknowledgment parsing
pub mod dhcp;

/// Boot URL decomposition
pub mod url;

/// The netboot session: discover, resolve, fetch (Layer 3)
pub mod netboot;

/// Error types
pub mod error;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use addr::{IpAddr, Ipv4Addr, Ipv6Addr};
pub use env::{BootEnv, LocateOutcome, MtftpOutcome, MtftpRequest, PxeBaseCode};
pub use error::{Error, Result};
pub use netboot::{NetbootSession, DEFAULT_BUFFER_SIZE, MAX_BUFFER_SIZE, TFTP_BLOCK_SIZE};
pub use raw::{Guid, Handle, Status, TftpOpcode, PXE_BASE_CODE_GUID};
pub use url::{TftpTarget, UrlError, DEFAULT_LOADER};
