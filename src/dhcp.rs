//! DHCP acknowledgment parsing
//!
//! The PXE base code hands back the raw DHCP acknowledgment it received.
//! For IPv6 that is a DHCPv6 message whose option list carries the
//! boot-file URL; for IPv4 the TFTP server lives in the fixed `siaddr`
//! field of the BOOTP header and no option walk is needed.
//!
//! The option list is untrusted network input. Every record is reached
//! through bounds-checked slicing; a truncated header, a length running
//! past the packet, or a missing terminator ends the scan with "not found"
//! rather than an over-read.

use alloc::vec::Vec;
use static_assertions::const_assert_eq;

use crate::addr::Ipv4Addr;

// =============================================================================
// PACKET LAYOUT
// =============================================================================

/// Offset of the option list in a DHCPv6 message
///
/// One message-type byte followed by a three-byte transaction id.
pub const DHCPV6_OPTIONS_OFFSET: usize = 4;

/// Offset of `siaddr` (next-server address) in a BOOTP/DHCPv4 header
pub const DHCPV4_SIADDR_OFFSET: usize = 20;

// op, htype, hlen, hops, xid, secs, flags, ciaddr, yiaddr precede siaddr.
const_assert_eq!(DHCPV4_SIADDR_OFFSET, 1 + 1 + 1 + 1 + 4 + 2 + 2 + 4 + 4);

/// DHCPv6 option code for the boot-file URL (RFC 5970)
pub const OPTION_BOOTFILE_URL: u16 = 59;

/// Option record header: two big-endian u16s (op-code, length)
const OPTION_HEADER_LEN: usize = 4;

// =============================================================================
// OPTION SCANNER
// =============================================================================

/// Borrowed view of one TLV option record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DhcpOption<'a> {
    /// Option code
    pub op_code: u16,
    /// Option payload, exactly `length` bytes of the packet
    pub data: &'a [u8],
}

/// Bounded cursor over a DHCPv6 option list
///
/// Yields records until the op-code-0 terminator or until the packet
/// runs out, whichever comes first.
struct OptionScanner<'a> {
    options: &'a [u8],
    cursor: usize,
}

impl<'a> OptionScanner<'a> {
    fn new(options: &'a [u8]) -> Self {
        Self { options, cursor: 0 }
    }
}

impl<'a> Iterator for OptionScanner<'a> {
    type Item = DhcpOption<'a>;

    fn next(&mut self) -> Option<DhcpOption<'a>> {
        let record = self.options.get(self.cursor..)?;
        if record.len() < OPTION_HEADER_LEN {
            return None;
        }
        let op_code = u16::from_be_bytes([record[0], record[1]]);
        if op_code == 0 {
            return None;
        }
        let length = usize::from(u16::from_be_bytes([record[2], record[3]]));
        let data = record.get(OPTION_HEADER_LEN..OPTION_HEADER_LEN + length)?;
        self.cursor += OPTION_HEADER_LEN + length;
        Some(DhcpOption { op_code, data })
    }
}

/// Locate the boot-file URL option in a DHCPv6 acknowledgment
///
/// Returns the payload of the first op-code-59 record, copied and truncated
/// at the first NUL byte since downstream treats it as a C string. `None`
/// when the option is absent, the list is malformed, or the packet is
/// shorter than the options offset.
pub fn find_bootfile_url(packet: &[u8]) -> Option<Vec<u8>> {
    let options = packet.get(DHCPV6_OPTIONS_OFFSET..)?;

    let option = OptionScanner::new(options)
        .find(|option| option.op_code == OPTION_BOOTFILE_URL)?;

    let end = option.data.iter().position(|&b| b == 0).unwrap_or(option.data.len());
    let mut url = Vec::new();
    url.try_reserve_exact(end).ok()?;
    url.extend_from_slice(&option.data[..end]);
    Some(url)
}

/// Read the TFTP server address from a DHCPv4 acknowledgment
///
/// `None` if the packet is too short to contain `siaddr`.
pub fn v4_server_addr(packet: &[u8]) -> Option<Ipv4Addr> {
    let bytes = packet.get(DHCPV4_SIADDR_OFFSET..DHCPV4_SIADDR_OFFSET + 4)?;
    Some(Ipv4Addr::from_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    /// Build a DHCPv6 ack: 4-byte header, then (op, data) records,
    /// optionally terminated.
    fn v6_ack(options: &[(u16, &[u8])], terminated: bool) -> Vec<u8> {
        let mut packet = vec![0u8; DHCPV6_OPTIONS_OFFSET];
        for (op, data) in options {
            packet.extend_from_slice(&op.to_be_bytes());
            packet.extend_from_slice(&(data.len() as u16).to_be_bytes());
            packet.extend_from_slice(data);
        }
        if terminated {
            packet.extend_from_slice(&[0, 0, 0, 0]);
        }
        packet
    }

    #[test]
    fn test_finds_first_bootfile_url() {
        let packet = v6_ack(
            &[
                (23, b"dns"),
                (OPTION_BOOTFILE_URL, b"tftp://[::1]/a"),
                (OPTION_BOOTFILE_URL, b"tftp://[::1]/b"),
            ],
            true,
        );
        assert_eq!(find_bootfile_url(&packet).as_deref(), Some(&b"tftp://[::1]/a"[..]));
    }

    #[test]
    fn test_terminator_stops_scan() {
        // An option after the terminator must not be reached.
        let mut packet = v6_ack(&[(23, b"dns")], true);
        packet.extend_from_slice(&OPTION_BOOTFILE_URL.to_be_bytes());
        packet.extend_from_slice(&2u16.to_be_bytes());
        packet.extend_from_slice(b"xx");
        assert_eq!(find_bootfile_url(&packet), None);
    }

    #[test]
    fn test_absent_option() {
        let packet = v6_ack(&[(23, b"dns"), (16, b"vendor")], true);
        assert_eq!(find_bootfile_url(&packet), None);
    }

    #[test]
    fn test_unterminated_list() {
        let packet = v6_ack(&[(23, b"dns")], false);
        assert_eq!(find_bootfile_url(&packet), None);
    }

    #[test]
    fn test_truncated_record() {
        // Length claims more data than the packet holds.
        let mut packet = v6_ack(&[], false);
        packet.extend_from_slice(&OPTION_BOOTFILE_URL.to_be_bytes());
        packet.extend_from_slice(&200u16.to_be_bytes());
        packet.extend_from_slice(b"short");
        assert_eq!(find_bootfile_url(&packet), None);
    }

    #[test]
    fn test_truncated_header() {
        let mut packet = v6_ack(&[(23, b"dns")], false);
        packet.extend_from_slice(&[0, 59, 0]);
        assert_eq!(find_bootfile_url(&packet), None);
    }

    #[test]
    fn test_short_packet() {
        assert_eq!(find_bootfile_url(&[0, 1]), None);
        assert_eq!(find_bootfile_url(&[]), None);
    }

    #[test]
    fn test_nul_truncation() {
        let packet = v6_ack(&[(OPTION_BOOTFILE_URL, b"tftp://[::1]/x\0junk")], true);
        assert_eq!(find_bootfile_url(&packet).as_deref(), Some(&b"tftp://[::1]/x"[..]));
    }

    #[test]
    fn test_v4_server_addr() {
        let mut packet = vec![0u8; 240];
        packet[DHCPV4_SIADDR_OFFSET..DHCPV4_SIADDR_OFFSET + 4]
            .copy_from_slice(&[192, 168, 1, 10]);
        assert_eq!(v4_server_addr(&packet), Some(Ipv4Addr::new(192, 168, 1, 10)));
    }

    #[test]
    fn test_v4_server_addr_short_packet() {
        assert_eq!(v4_server_addr(&[0u8; 16]), None);
    }
}
