//! RFC 959 host-port encoding
//!
//! Converts between the `h1,h2,h3,h4,p1,p2` decimal-comma notation used by
//! PORT and PASV and an IPv4 socket address.

use std::net::SocketAddrV4;

use crate::error::HostPortError;

/// Encodes an IPv4 socket address as `h1,h2,h3,h4,p1,p2`.
pub fn encode(addr: SocketAddrV4) -> String {
    let ip = addr.ip().octets();
    let port = addr.port();
    format!(
        "{},{},{},{},{},{}",
        ip[0],
        ip[1],
        ip[2],
        ip[3],
        port >> 8,
        port & 0xff
    )
}

/// Decodes a `h1,h2,h3,h4,p1,p2` literal into an IPv4 socket address.
///
/// Every field must be a plain decimal integer in `[0,255]`; surrounding
/// whitespace is not accepted.
pub fn decode(s: &str) -> Result<SocketAddrV4, HostPortError> {
    let fields: Vec<&str> = s.split(',').collect();
    if fields.len() != 6 {
        return Err(HostPortError::FieldCount(fields.len()));
    }

    let mut bytes = [0u8; 6];
    for (i, field) in fields.iter().enumerate() {
        bytes[i] = field
            .parse::<u8>()
            .map_err(|_| HostPortError::InvalidField(field.to_string()))?;
    }

    let ip = [bytes[0], bytes[1], bytes[2], bytes[3]];
    let port = (u16::from(bytes[4]) << 8) | u16::from(bytes[5]);
    Ok(SocketAddrV4::new(ip.into(), port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_encode() {
        let addr = SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 8000);
        assert_eq!(encode(addr), "127,0,0,1,31,64");

        let addr = SocketAddrV4::new(Ipv4Addr::new(10, 1, 2, 3), 255);
        assert_eq!(encode(addr), "10,1,2,3,0,255");
    }

    #[test]
    fn test_decode() {
        let addr = decode("127,0,0,1,31,64").unwrap();
        assert_eq!(addr, SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 8000));

        let addr = decode("0,0,0,0,0,0").unwrap();
        assert_eq!(addr, SocketAddrV4::new(Ipv4Addr::new(0, 0, 0, 0), 0));

        let addr = decode("255,255,255,255,255,255").unwrap();
        assert_eq!(
            addr,
            SocketAddrV4::new(Ipv4Addr::new(255, 255, 255, 255), 65535)
        );
    }

    #[test]
    fn test_round_trip() {
        let samples = [
            SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 1),
            SocketAddrV4::new(Ipv4Addr::new(192, 168, 0, 42), 2121),
            SocketAddrV4::new(Ipv4Addr::new(8, 8, 8, 8), 53),
            SocketAddrV4::new(Ipv4Addr::new(255, 0, 255, 0), 65535),
        ];
        for addr in samples {
            assert_eq!(decode(&encode(addr)).unwrap(), addr);
        }

        for port in (0..=u16::MAX).step_by(257) {
            let addr = SocketAddrV4::new(Ipv4Addr::new(172, 16, 254, 9), port);
            assert_eq!(decode(&encode(addr)).unwrap(), addr);
        }
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(decode("").is_err());
        assert!(decode("127,0,0,1").is_err());
        assert!(decode("127,0,0,1,31,64,0").is_err());
        assert!(decode("127,0,0,one,31,64").is_err());
        assert!(decode("256,0,0,1,31,64").is_err());
        assert!(decode("127,0,0,1,300,64").is_err());
        assert!(decode("127,0,0,1,-1,64").is_err());
        assert!(decode(" 127,0,0,1,31,64").is_err());
        assert!(decode("127, 0,0,1,31,64").is_err());
    }
}
