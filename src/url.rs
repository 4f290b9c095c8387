//! Boot URL decomposition
//!
//! DHCPv6 hands the boot file down as a `tftp://[v6-literal]/path` URL.
//! This module validates the structure, parses the server literal, and
//! rewrites the path so its final segment is always the secondary-loader
//! file name for the target architecture — whatever file name the server
//! suggested is discarded.

use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt;

use crate::addr::{IpAddr, Ipv6Addr};

// =============================================================================
// SECONDARY LOADER
// =============================================================================

/// Secondary-loader file name substituted into every resolved path
#[cfg(target_arch = "x86_64")]
pub const DEFAULT_LOADER: &str = "grubx64.efi";
/// Secondary-loader file name substituted into every resolved path
#[cfg(target_arch = "x86")]
pub const DEFAULT_LOADER: &str = "grubia32.efi";
/// Secondary-loader file name substituted into every resolved path
#[cfg(target_arch = "aarch64")]
pub const DEFAULT_LOADER: &str = "grubaa64.efi";
/// Secondary-loader file name substituted into every resolved path
#[cfg(target_arch = "riscv64")]
pub const DEFAULT_LOADER: &str = "grubriscv64.efi";
/// Secondary-loader file name substituted into every resolved path
#[cfg(not(any(
    target_arch = "x86_64",
    target_arch = "x86",
    target_arch = "aarch64",
    target_arch = "riscv64"
)))]
pub const DEFAULT_LOADER: &str = "grubx64.efi";

/// Longest canonical IPv6 text form
const MAX_V6_LITERAL_LEN: usize = 39;

// =============================================================================
// ERRORS
// =============================================================================

/// Structural failure of a boot-file URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlError {
    /// The URL does not start with `tftp://`
    BadScheme,
    /// The server address is not enclosed in `[..]`
    MissingBracket,
    /// The bracketed address is unterminated or too long to be IPv6
    MalformedAddress,
}

impl UrlError {
    /// Get error name as string
    pub fn name(&self) -> &'static str {
        match self {
            Self::BadScheme => "BAD_SCHEME",
            Self::MissingBracket => "MISSING_BRACKET",
            Self::MalformedAddress => "MALFORMED_ADDRESS",
        }
    }
}

impl fmt::Display for UrlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "URL Error: {}", self.name())
    }
}

// =============================================================================
// TFTP TARGET
// =============================================================================

/// Resolved TFTP destination
///
/// Immutable once produced. The path uses forward slashes only and its
/// final segment is always [`DEFAULT_LOADER`]. NUL termination is an FFI
/// concern of the environment binding, not of this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TftpTarget {
    /// Server address
    pub address: IpAddr,
    /// Remote file path
    pub path: String,
}

// =============================================================================
// DECOMPOSITION
// =============================================================================

/// Decompose a `tftp://[v6]/path` boot-file URL
///
/// The bracketed literal is bounded at 39 characters before it is handed
/// to the lenient address parser. Everything after `]` becomes the path,
/// normalized and re-pointed at the secondary loader.
pub fn decompose(url: &[u8]) -> Result<TftpTarget, UrlError> {
    let rest = url.strip_prefix(b"tftp://").ok_or_else(|| {
        log::error!("bootfile URL must start with tftp://");
        UrlError::BadScheme
    })?;

    let rest = rest.strip_prefix(b"[").ok_or_else(|| {
        log::error!("TFTP server address must be enclosed in [..]");
        UrlError::MissingBracket
    })?;

    let close = rest
        .iter()
        .position(|&b| b == b']')
        .filter(|&close| close <= MAX_V6_LITERAL_LEN)
        .ok_or_else(|| {
            log::error!("bootfile URL carries a malformed IPv6 address");
            UrlError::MalformedAddress
        })?;

    let address = Ipv6Addr::parse_literal(&rest[..close]);
    let path = rewrite_path(&rest[close + 1..]);

    Ok(TftpTarget { address: IpAddr::V6(address), path })
}

/// Rebuild a path around the secondary-loader file name
///
/// Keeps the directory prefix up to and including the last `/` (after
/// slash normalization) and appends [`DEFAULT_LOADER`]. A path with no
/// separator at all becomes the loader name alone.
pub(crate) fn rewrite_path(raw: &[u8]) -> String {
    // Lenient carry-over: undecodable bytes degrade instead of failing.
    let raw = String::from_utf8_lossy(raw);
    let normalized = translate_slashes(&raw);

    let dir_end = normalized.rfind('/').map_or(0, |i| i + 1);
    let mut path = String::with_capacity(dir_end + DEFAULT_LOADER.len());
    path.push_str(&normalized[..dir_end]);
    path.push_str(DEFAULT_LOADER);
    path
}

/// Normalize path separators
///
/// A single backslash becomes a forward slash; a doubled backslash
/// (an escaped separator) collapses to one forward slash.
pub(crate) fn translate_slashes(path: &str) -> Cow<'_, str> {
    if !path.contains('\\') {
        return Cow::Borrowed(path);
    }

    let mut out = String::with_capacity(path.len());
    let mut chars = path.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push('/');
            if chars.peek() == Some(&'\\') {
                chars.next();
            }
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use crate::addr::Ipv6Addr;

    #[test]
    fn test_decompose_basic() {
        let target = decompose(b"tftp://[2001:db8::1]/path/old.efi").unwrap();
        assert_eq!(target.address, IpAddr::V6(Ipv6Addr::parse_literal(b"2001:db8::1")));
        assert_eq!(target.path, format!("/path/{DEFAULT_LOADER}"));
    }

    #[test]
    fn test_decompose_bad_scheme() {
        assert_eq!(decompose(b"http://[::1]/x"), Err(UrlError::BadScheme));
        assert_eq!(decompose(b""), Err(UrlError::BadScheme));
    }

    #[test]
    fn test_decompose_missing_bracket() {
        assert_eq!(decompose(b"tftp://2001:db8::1/x"), Err(UrlError::MissingBracket));
    }

    #[test]
    fn test_decompose_unterminated_address() {
        assert_eq!(decompose(b"tftp://[2001:db8::1/x"), Err(UrlError::MalformedAddress));
        assert_eq!(decompose(b"tftp://["), Err(UrlError::MalformedAddress));
    }

    #[test]
    fn test_decompose_oversized_address() {
        // 40 characters inside the brackets exceeds the canonical maximum.
        let url = b"tftp://[0000:0000:0000:0000:0000:0000:0000:00001]/x";
        assert_eq!(decompose(url), Err(UrlError::MalformedAddress));
    }

    #[test]
    fn test_decompose_longest_canonical_address() {
        let url = b"tftp://[ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff]/x";
        let target = decompose(url).unwrap();
        assert_eq!(
            target.address,
            IpAddr::V6(Ipv6Addr::new(0xffff, 0xffff, 0xffff, 0xffff,
                                     0xffff, 0xffff, 0xffff, 0xffff))
        );
    }

    #[test]
    fn test_decompose_no_separator_in_path() {
        let target = decompose(b"tftp://[::1]oldname.efi").unwrap();
        assert_eq!(target.path, DEFAULT_LOADER);
    }

    #[test]
    fn test_decompose_empty_path() {
        let target = decompose(b"tftp://[::1]").unwrap();
        assert_eq!(target.path, DEFAULT_LOADER);
    }

    #[test]
    fn test_decompose_backslash_path() {
        let target = decompose(b"tftp://[::1]\\boot\\old.efi").unwrap();
        assert_eq!(target.path, format!("/boot/{DEFAULT_LOADER}"));
        assert!(!target.path.contains('\\'));
    }

    #[test]
    fn test_translate_slashes() {
        // Single backslash becomes a slash; a doubled backslash collapses.
        assert_eq!(translate_slashes("a\\b\\\\c"), "a/b/c");
        assert_eq!(translate_slashes("\\x"), "/x");
        assert_eq!(translate_slashes("plain/path"), "plain/path");
        assert_eq!(translate_slashes("\\\\"), "/");
    }

    #[test]
    fn test_rewrite_keeps_last_separator() {
        assert_eq!(rewrite_path(b"/a/b/c.efi"), format!("/a/b/{DEFAULT_LOADER}"));
        assert_eq!(rewrite_path(b"/"), format!("/{DEFAULT_LOADER}"));
        assert_eq!(rewrite_path(b""), DEFAULT_LOADER);
    }
}
