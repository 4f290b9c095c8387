//! IP address types and the IPv6 literal parser
//!
//! Self-contained address values used for the resolved TFTP target.
//! `core::net` is deliberately not used: the boot environment hands these
//! across an ABI boundary and the layout must stay under our control.
//!
//! The literal parser is lenient by contract: a malformed literal yields a
//! best-effort address, never an error. Invalid hex digits contribute zero
//! nibbles and surplus groups are ignored. This mirrors what network boot
//! firmware has historically accepted; rejecting parses would change which
//! DHCP answers boot.

use core::fmt;

// =============================================================================
// IPV4
// =============================================================================

/// IPv4 address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ipv4Addr {
    /// Address octets in network order
    pub octets: [u8; 4],
}

impl Ipv4Addr {
    /// Any address (0.0.0.0)
    pub const ANY: Ipv4Addr = Ipv4Addr::new(0, 0, 0, 0);

    /// Create from octets
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self { octets: [a, b, c, d] }
    }

    /// Create from a network-order byte array
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self { octets: bytes }
    }

    /// Check if unspecified
    pub const fn is_unspecified(&self) -> bool {
        self.octets[0] == 0 && self.octets[1] == 0 &&
        self.octets[2] == 0 && self.octets[3] == 0
    }
}

impl fmt::Display for Ipv4Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}",
            self.octets[0], self.octets[1],
            self.octets[2], self.octets[3])
    }
}

// =============================================================================
// IPV6
// =============================================================================

/// IPv6 address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ipv6Addr {
    /// 16-bit groups in host order; network order on the wire
    pub segments: [u16; 8],
}

impl Ipv6Addr {
    /// Unspecified address (::)
    pub const UNSPECIFIED: Ipv6Addr = Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 0);

    /// Create from segments
    pub const fn new(a: u16, b: u16, c: u16, d: u16,
                     e: u16, f: u16, g: u16, h: u16) -> Self {
        Self { segments: [a, b, c, d, e, f, g, h] }
    }

    /// Create from network-order bytes
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self {
            segments: [
                u16::from_be_bytes([bytes[0], bytes[1]]),
                u16::from_be_bytes([bytes[2], bytes[3]]),
                u16::from_be_bytes([bytes[4], bytes[5]]),
                u16::from_be_bytes([bytes[6], bytes[7]]),
                u16::from_be_bytes([bytes[8], bytes[9]]),
                u16::from_be_bytes([bytes[10], bytes[11]]),
                u16::from_be_bytes([bytes[12], bytes[13]]),
                u16::from_be_bytes([bytes[14], bytes[15]]),
            ],
        }
    }

    /// Convert to network-order bytes
    pub fn to_bytes(self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        for (i, segment) in self.segments.iter().enumerate() {
            bytes[i * 2..i * 2 + 2].copy_from_slice(&segment.to_be_bytes());
        }
        bytes
    }

    /// Check if unspecified
    pub const fn is_unspecified(&self) -> bool {
        self.segments[0] == 0 && self.segments[1] == 0 &&
        self.segments[2] == 0 && self.segments[3] == 0 &&
        self.segments[4] == 0 && self.segments[5] == 0 &&
        self.segments[6] == 0 && self.segments[7] == 0
    }

    /// Parse a textual IPv6 literal
    ///
    /// Colon-separated hexadecimal groups with at most one `::` compression
    /// marker. Groups left of the marker fill from the front, groups right
    /// of it fill from the back, and anything unreached stays zero. At most
    /// eight groups are taken from either side and the two sides never
    /// overlap, so oversized input cannot write out of range.
    ///
    /// The parse is lenient and never fails; see the module docs.
    pub fn parse_literal(text: &[u8]) -> Self {
        let mut segments = [0u16; 8];

        let marker = text.windows(2).position(|w| w == b"::");
        match marker {
            Some(pos) => {
                let mut front = 0;
                if pos > 0 {
                    for group in text[..pos].split(|&b| b == b':') {
                        if front == 8 {
                            break;
                        }
                        segments[front] = group_value(group);
                        front += 1;
                    }
                }
                let back = &text[pos + 2..];
                if !back.is_empty() {
                    let mut slot = 8;
                    for group in back.split(|&b| b == b':').rev() {
                        if slot == front {
                            break;
                        }
                        slot -= 1;
                        segments[slot] = group_value(group);
                    }
                }
            }
            None => {
                for (slot, group) in text.split(|&b| b == b':').take(8).enumerate() {
                    segments[slot] = group_value(group);
                }
            }
        }

        Self { segments }
    }
}

/// Accumulate one 16-bit group from hex text
///
/// Non-hex characters count as zero; excess digits shift out the top.
fn group_value(text: &[u8]) -> u16 {
    let mut value: u16 = 0;
    for &byte in text {
        let nibble = match byte {
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            b'A'..=b'F' => byte - b'A' + 10,
            _ => 0,
        };
        value = (value << 4) | u16::from(nibble);
    }
    value
}

impl fmt::Display for Ipv6Addr {
    /// Canonical rendering per RFC 5952: lowercase hex, no leading zeros,
    /// the leftmost longest run of two or more zero groups compressed to `::`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut best_start = 0;
        let mut best_len = 0;
        let mut run_start = 0;
        let mut run_len = 0;
        for (i, &segment) in self.segments.iter().enumerate() {
            if segment == 0 {
                if run_len == 0 {
                    run_start = i;
                }
                run_len += 1;
                if run_len > best_len {
                    best_start = run_start;
                    best_len = run_len;
                }
            } else {
                run_len = 0;
            }
        }

        if best_len < 2 {
            for (i, segment) in self.segments.iter().enumerate() {
                if i > 0 {
                    write!(f, ":")?;
                }
                write!(f, "{segment:x}")?;
            }
            return Ok(());
        }

        for (i, segment) in self.segments[..best_start].iter().enumerate() {
            if i > 0 {
                write!(f, ":")?;
            }
            write!(f, "{segment:x}")?;
        }
        write!(f, "::")?;
        for (i, segment) in self.segments[best_start + best_len..].iter().enumerate() {
            if i > 0 {
                write!(f, ":")?;
            }
            write!(f, "{segment:x}")?;
        }
        Ok(())
    }
}

// =============================================================================
// TAGGED ADDRESS
// =============================================================================

/// IP address (v4 or v6)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpAddr {
    /// IPv4 address
    V4(Ipv4Addr),
    /// IPv6 address
    V6(Ipv6Addr),
}

impl fmt::Display for IpAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpAddr::V4(addr) => addr.fmt(f),
            IpAddr::V6(addr) => addr.fmt(f),
        }
    }
}

impl From<Ipv4Addr> for IpAddr {
    fn from(addr: Ipv4Addr) -> Self {
        IpAddr::V4(addr)
    }
}

impl From<Ipv6Addr> for IpAddr {
    fn from(addr: Ipv6Addr) -> Self {
        IpAddr::V6(addr)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    fn roundtrip(text: &str) -> alloc::string::String {
        format!("{}", Ipv6Addr::parse_literal(text.as_bytes()))
    }

    #[test]
    fn test_parse_full_form() {
        let addr = Ipv6Addr::parse_literal(b"2001:db8:0:1:2:3:4:5");
        assert_eq!(addr.segments, [0x2001, 0xdb8, 0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_parse_compressed() {
        let addr = Ipv6Addr::parse_literal(b"2001:db8::1");
        assert_eq!(addr.segments, [0x2001, 0xdb8, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_parse_leading_compression() {
        let addr = Ipv6Addr::parse_literal(b"::1");
        assert_eq!(addr.segments, [0, 0, 0, 0, 0, 0, 0, 1]);

        let addr = Ipv6Addr::parse_literal(b"::ffff:c0a8:101");
        assert_eq!(addr.segments, [0, 0, 0, 0, 0, 0xffff, 0xc0a8, 0x101]);
    }

    #[test]
    fn test_parse_trailing_compression() {
        let addr = Ipv6Addr::parse_literal(b"fe80::");
        assert_eq!(addr.segments, [0xfe80, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_parse_all_zero() {
        assert!(Ipv6Addr::parse_literal(b"::").is_unspecified());
    }

    #[test]
    fn test_parse_lenient_garbage() {
        // Non-hex characters contribute zero nibbles, never an error.
        let addr = Ipv6Addr::parse_literal(b"2g01::1");
        assert_eq!(addr.segments[0], 0x2001);
    }

    #[test]
    fn test_parse_excess_groups_bounded() {
        // More than eight groups on either side must not write out of range.
        let addr = Ipv6Addr::parse_literal(b"1:2:3:4:5:6:7:8:9:a:b");
        assert_eq!(addr.segments, [1, 2, 3, 4, 5, 6, 7, 8]);

        let addr = Ipv6Addr::parse_literal(b"1:2:3::4:5:6:7:8:9:a:b");
        assert_eq!(addr.segments[..3], [1, 2, 3]);
    }

    #[test]
    fn test_display_roundtrip() {
        assert_eq!(roundtrip("2001:db8::1"), "2001:db8::1");
        assert_eq!(roundtrip("::1"), "::1");
        assert_eq!(roundtrip("fe80::"), "fe80::");
        assert_eq!(roundtrip("::"), "::");
        assert_eq!(roundtrip("1:2:3:4:5:6:7:8"), "1:2:3:4:5:6:7:8");
        assert_eq!(roundtrip("2001:0DB8::0001"), "2001:db8::1");
    }

    #[test]
    fn test_display_leftmost_longest_run() {
        let addr = Ipv6Addr::new(1, 0, 0, 2, 0, 0, 0, 3);
        assert_eq!(format!("{addr}"), "1:0:0:2::3");

        // Single zero group is not compressed.
        let addr = Ipv6Addr::new(1, 0, 2, 3, 4, 5, 6, 7);
        assert_eq!(format!("{addr}"), "1:0:2:3:4:5:6:7");
    }

    #[test]
    fn test_bytes_roundtrip() {
        let addr = Ipv6Addr::parse_literal(b"2001:db8::1");
        assert_eq!(Ipv6Addr::from_bytes(addr.to_bytes()), addr);
        assert_eq!(addr.to_bytes()[0], 0x20);
        assert_eq!(addr.to_bytes()[1], 0x01);
    }

    #[test]
    fn test_ipv4_display() {
        assert_eq!(format!("{}", Ipv4Addr::new(192, 168, 1, 10)), "192.168.1.10");
    }
}
