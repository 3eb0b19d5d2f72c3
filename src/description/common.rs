use std::fmt;

use indexmap::IndexMap;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Information describes the "i=" field which provides textual information
/// about the session.
pub type Information = String;

/// Bandwidth describes the "b=" fields of a session or media block, keyed by
/// bandwidth type (`AS`, `CT`, `TIAS`, `X-...`). Keys are unique and keep the
/// order in which they were first inserted.
pub type Bandwidth = IndexMap<String, u64>;

pub const NETWORK_INTERNET: &str = "IN";
pub const ADDRESS_TYPE_IP4: &str = "IP4";
pub const ADDRESS_TYPE_IP6: &str = "IP6";
pub(crate) const LOOPBACK_IP4: &str = "127.0.0.1";
pub(crate) const LOOPBACK_IP6: &str = "::1";

/// Connection defines the representation for the "c=" field
/// containing connection data.
///
/// The multicast suffix of the address is kept apart from it: for `IP4`
/// the wire form is `<address>/<ttl>[/<count>]`, for `IP6` it is
/// `<address>/<count>`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Connection {
    pub network_type: String,
    pub address_type: String,
    pub address: String,
    pub ttl: Option<u8>,
    pub address_count: Option<u32>,
}

impl Connection {
    /// new returns an `IN IP4` connection to `address`.
    pub fn new(address: impl Into<String>) -> Self {
        Connection {
            network_type: NETWORK_INTERNET.to_owned(),
            address_type: ADDRESS_TYPE_IP4.to_owned(),
            address: address.into(),
            ttl: None,
            address_count: None,
        }
    }

    pub fn is_ip6(&self) -> bool {
        self.address_type == ADDRESS_TYPE_IP6
    }
}

/// Key describes the "k=" field which conveys encryption key information.
/// The key is carried opaquely and never interpreted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Key {
    /// `clear`, `base64`, `uri` or `prompt`
    pub method: String,
    /// Empty when the method takes no value.
    pub value: String,
}

impl Key {
    pub fn new(method: impl Into<String>, value: impl Into<String>) -> Self {
        Key {
            method: method.into(),
            value: value.into(),
        }
    }
}

/// Attribute describes the "a=" field which represents the primary means for
/// extending SDP. A property attribute (`a=<flag>`) has an empty value.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}:{}", self.name, self.value)
        }
    }
}

impl Attribute {
    /// new constructs a new value attribute
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }

    /// flag constructs a property attribute without value
    pub fn flag(name: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: String::new(),
        }
    }

    pub fn is_flag(&self) -> bool {
        self.value.is_empty()
    }

    /// is_ice_candidate returns true if the attribute key equals "candidate".
    pub fn is_ice_candidate(&self) -> bool {
        self.name.as_str() == "candidate"
    }
}

/// Returns the first attribute named `name`.
pub(crate) fn find_attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attributes.iter().find(|a| a.name == name)
}

/// Fingerprint describes the "a=fingerprint:" attribute of RFC 8122 carrying
/// the hash of a DTLS certificate.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fingerprint {
    /// e.g. `sha-256`
    pub hash_function: String,
    /// Colon separated upper-case hex bytes, kept verbatim.
    pub value: String,
}

impl Fingerprint {
    pub fn new(hash_function: impl Into<String>, value: impl Into<String>) -> Self {
        Fingerprint {
            hash_function: hash_function.into(),
            value: value.into(),
        }
    }
}
