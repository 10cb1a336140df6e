//! Peer hardware addresses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CoreError;

/// An IEEE 802 MAC address.
///
/// Serialized as colon-separated hex for readability.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub const fn from_bytes(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    pub const fn octets(self) -> [u8; 6] {
        self.0
    }

    /// Parse from `aa:bb:cc:dd:ee:ff` form.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidMac {
            raw: s.to_string(),
            reason: reason.to_string(),
        };

        let mut bytes = [0u8; 6];
        let mut count = 0;
        for part in s.split(':') {
            if count == 6 {
                return Err(invalid("more than 6 octets"));
            }
            if part.len() != 2 {
                return Err(invalid("octet must be exactly 2 hex digits"));
            }
            bytes[count] =
                u8::from_str_radix(part, 16).map_err(|_| invalid("octet contains invalid hex"))?;
            count += 1;
        }
        if count != 6 {
            return Err(invalid("fewer than 6 octets"));
        }
        Ok(Self(bytes))
    }
}

impl fmt::Debug for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacAddress({})", self)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MacAddress::parse(s)
    }
}

impl Serialize for MacAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        MacAddress::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        let mac = MacAddress::parse("00:01:02:03:04:05").unwrap();
        assert_eq!(mac.octets(), [0, 1, 2, 3, 4, 5]);
        assert_eq!(mac.to_string(), "00:01:02:03:04:05");
    }

    #[test]
    fn parse_accepts_upper_hex() {
        let mac = MacAddress::parse("06:07:08:09:0A:0B").unwrap();
        assert_eq!(mac.octets(), [6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(MacAddress::parse("").is_err());
        assert!(MacAddress::parse("00:01:02:03:04").is_err());
        assert!(MacAddress::parse("00:01:02:03:04:05:06").is_err());
        assert!(MacAddress::parse("00:01:02:03:04:0g").is_err());
        assert!(MacAddress::parse("0:1:2:3:4:5").is_err());
    }
}
