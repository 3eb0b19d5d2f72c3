use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};


/// Direction is a marker for transmission direction of an endpoint
#[derive(Default, Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    #[default]
    Unspecified = 0,
    /// Direction::SendRecv is for bidirectional communication
    SendRecv = 1,
    /// Direction::SendOnly is for outgoing communication
    SendOnly = 2,
    /// Direction::RecvOnly is for incoming communication
    RecvOnly = 3,
    /// Direction::Inactive is for no communication
    Inactive = 4,
}

pub const DIRECTION_SEND_RECV_STR: &str = "sendrecv";
pub const DIRECTION_SEND_ONLY_STR: &str = "sendonly";
pub const DIRECTION_RECV_ONLY_STR: &str = "recvonly";
pub const DIRECTION_INACTIVE_STR: &str = "inactive";
const DIRECTION_UNSPECIFIED_STR: &str = "Unspecified";

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().unwrap_or(DIRECTION_UNSPECIFIED_STR))
    }
}

impl Direction {
    /// new defines a procedure for creating a new direction from a raw string.
    pub fn new(raw: &str) -> Self {
        match raw {
            DIRECTION_SEND_RECV_STR => Direction::SendRecv,
            DIRECTION_SEND_ONLY_STR => Direction::SendOnly,
            DIRECTION_RECV_ONLY_STR => Direction::RecvOnly,
            DIRECTION_INACTIVE_STR => Direction::Inactive,
            _ => Direction::Unspecified,
        }
    }

    /// The attribute name carrying this direction, `None` when unspecified.
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Direction::SendRecv => Some(DIRECTION_SEND_RECV_STR),
            Direction::SendOnly => Some(DIRECTION_SEND_ONLY_STR),
            Direction::RecvOnly => Some(DIRECTION_RECV_ONLY_STR),
            Direction::Inactive => Some(DIRECTION_INACTIVE_STR),
            Direction::Unspecified => None,
        }
    }

    pub fn is_unspecified(&self) -> bool {
        *self == Direction::Unspecified
    }

    /// The direction as seen from the other end of the session.
    pub fn reverse(&self) -> Self {
        match self {
            Direction::SendOnly => Direction::RecvOnly,
            Direction::RecvOnly => Direction::SendOnly,
            d => *d,
        }
    }
}
