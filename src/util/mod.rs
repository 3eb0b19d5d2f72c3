
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::{Error, Result};

/// Seconds between the NTP epoch (1900-01-01) and the Unix epoch (1970-01-01).
pub const NTP_UNIX_OFFSET: u64 = 2_208_988_800;

const SECONDS_PER_DAY: i64 = 86400;
const SECONDS_PER_HOUR: i64 = 3600;
const SECONDS_PER_MINUTE: i64 = 60;

/// ConnectionRole indicates which of the end points should initiate the connection establishment
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConnectionRole {
    #[default]
    Unspecified,

    /// ConnectionRoleActive indicates the endpoint will initiate an outgoing connection.
    Active,

    /// ConnectionRolePassive indicates the endpoint will accept an incoming connection.
    Passive,

    /// ConnectionRoleActpass indicates the endpoint is willing to accept an incoming connection or to initiate an outgoing connection.
    Actpass,

    /// ConnectionRoleHoldconn indicates the endpoint does not want the connection to be established for the time being.
    Holdconn,
}

const CONNECTION_ROLE_ACTIVE_STR: &str = "active";
const CONNECTION_ROLE_PASSIVE_STR: &str = "passive";
const CONNECTION_ROLE_ACTPASS_STR: &str = "actpass";
const CONNECTION_ROLE_HOLDCONN_STR: &str = "holdconn";

impl ConnectionRole {
    /// Wire token of the role, `None` for [`ConnectionRole::Unspecified`].
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            ConnectionRole::Active => Some(CONNECTION_ROLE_ACTIVE_STR),
            ConnectionRole::Passive => Some(CONNECTION_ROLE_PASSIVE_STR),
            ConnectionRole::Actpass => Some(CONNECTION_ROLE_ACTPASS_STR),
            ConnectionRole::Holdconn => Some(CONNECTION_ROLE_HOLDCONN_STR),
            ConnectionRole::Unspecified => None,
        }
    }

    pub fn is_unspecified(&self) -> bool {
        *self == ConnectionRole::Unspecified
    }
}

impl fmt::Display for ConnectionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().unwrap_or("Unspecified"))
    }
}

impl From<&str> for ConnectionRole {
    fn from(raw: &str) -> Self {
        match raw {
            CONNECTION_ROLE_ACTIVE_STR => ConnectionRole::Active,
            CONNECTION_ROLE_PASSIVE_STR => ConnectionRole::Passive,
            CONNECTION_ROLE_ACTPASS_STR => ConnectionRole::Actpass,
            CONNECTION_ROLE_HOLDCONN_STR => ConnectionRole::Holdconn,
            _ => ConnectionRole::Unspecified,
        }
    }
}

/// https://tools.ietf.org/html/draft-ietf-rtcweb-jsep-26#section-5.2.1
/// Session ID is recommended to be constructed by generating a 64-bit
/// quantity with the highest bit set to zero and the remaining 63-bits
/// being cryptographically random.
pub(crate) fn new_session_id() -> i64 {
    let c = u64::MAX ^ (1u64 << 63);
    (rand::random::<u64>() & c) as i64
}

/// Parses a decimal integer, reporting `line` on failure.
pub(crate) fn parse_int<T: FromStr>(value: &str, line: &str) -> Result<T> {
    value
        .parse::<T>()
        .map_err(|_| Error::invalid_value(value, line))
}

/// Parses an absolute time in seconds since the NTP epoch. The literal `0`
/// stands for an unbounded time and is returned as `0`.
pub fn parse_time(value: &str, line: &str) -> Result<u64> {
    if value == "0" {
        return Ok(0);
    }
    parse_int(value, line)
}

/// Parses a duration in seconds, accepting the compact `d`, `h`, `m` and `s`
/// suffixes of RFC 4566 section 5.10.
pub fn parse_duration(value: &str, line: &str) -> Result<i64> {
    let len = value.len();
    let (num, factor) = match value.as_bytes().last() {
        Some(b'd') => (&value[..len - 1], SECONDS_PER_DAY),
        Some(b'h') => (&value[..len - 1], SECONDS_PER_HOUR),
        Some(b'm') => (&value[..len - 1], SECONDS_PER_MINUTE),
        Some(b's') => (&value[..len - 1], 1),
        _ => (value, 1),
    };
    num.parse::<i64>()
        .ok()
        .and_then(|n| n.checked_mul(factor))
        .ok_or_else(|| Error::invalid_value(value, line))
}

/// Appends the decimal representation of `v`.
pub(crate) fn append_int(buf: &mut Vec<u8>, v: i64) {
    if v < 0 {
        buf.push(b'-');
    }
    append_uint(buf, v.unsigned_abs());
}

pub(crate) fn append_uint(buf: &mut Vec<u8>, mut v: u64) {
    let mut digits = [0u8; 20];
    let mut i = digits.len();
    loop {
        i -= 1;
        digits[i] = b'0' + (v % 10) as u8;
        v /= 10;
        if v == 0 {
            break;
        }
    }
    buf.extend_from_slice(&digits[i..]);
}

/// Appends a duration using the largest unit that divides it exactly.
pub(crate) fn append_duration(buf: &mut Vec<u8>, secs: i64) {
    if secs == 0 {
        buf.push(b'0');
    } else if secs % SECONDS_PER_DAY == 0 {
        append_int(buf, secs / SECONDS_PER_DAY);
        buf.push(b'd');
    } else if secs % SECONDS_PER_HOUR == 0 {
        append_int(buf, secs / SECONDS_PER_HOUR);
        buf.push(b'h');
    } else if secs % SECONDS_PER_MINUTE == 0 {
        append_int(buf, secs / SECONDS_PER_MINUTE);
        buf.push(b'm');
    } else {
        append_int(buf, secs);
    }
}

/// Formats a duration the way the encoder writes it, e.g. `604800` as `7d`.
pub fn format_duration(secs: i64) -> String {
    let mut buf = Vec::with_capacity(21);
    append_duration(&mut buf, secs);
    // only ASCII digits, a sign and a unit letter are ever written
    String::from_utf8_lossy(&buf).into_owned()
}

/// Converts NTP seconds to a wall-clock instant. `0` (unbounded) and
/// instants before the Unix epoch yield `None`.
pub fn ntp_to_system_time(ntp: u64) -> Option<SystemTime> {
    if ntp == 0 {
        return None;
    }
    let unix = ntp.checked_sub(NTP_UNIX_OFFSET)?;
    UNIX_EPOCH.checked_add(Duration::from_secs(unix))
}

/// Converts a wall-clock instant to whole NTP seconds.
pub fn system_time_to_ntp(t: SystemTime) -> u64 {
    let unix = t
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_secs();
    unix + NTP_UNIX_OFFSET
}
