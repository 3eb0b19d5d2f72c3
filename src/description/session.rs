use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use url::Url;

use super::common::*;
use super::media::*;
use crate::decoder::Decoder;
use crate::direction::Direction;
use crate::encoder::Encoder;
use crate::error::{Error, Result};
use crate::util::*;

/// Constants for SDP attributes with a typed representation
pub const ATTR_KEY_RTPMAP: &str = "rtpmap";
pub const ATTR_KEY_FMTP: &str = "fmtp";
pub const ATTR_KEY_RTCP_FB: &str = "rtcp-fb";
pub const ATTR_KEY_RTCP: &str = "rtcp";
pub const ATTR_KEY_RTCPMUX: &str = "rtcp-mux";
pub const ATTR_KEY_MID: &str = "mid";
pub const ATTR_KEY_GROUP: &str = "group";
pub const ATTR_KEY_MSID_SEMANTIC: &str = "msid-semantic";
pub const ATTR_KEY_CONNECTION_SETUP: &str = "setup";
pub const ATTR_KEY_FINGERPRINT: &str = "fingerprint";

/// Constants for semantic tokens used in JSEP
pub const SEMANTIC_TOKEN_LIP_SYNCHRONIZATION: &str = "LS";
pub const SEMANTIC_TOKEN_FLOW_IDENTIFICATION: &str = "FID";
pub const SEMANTIC_TOKEN_FORWARD_ERROR_CORRECTION: &str = "FEC";
pub const SEMANTIC_TOKEN_BUNDLE: &str = "BUNDLE";
pub const SEMANTIC_TOKEN_WEBRTC_MEDIA_STREAMS: &str = "WMS";

/// Version describes the value provided by the "v=" field which gives
/// the version of the Session Description Protocol.
pub type Version = u32;

/// Origin defines the structure for the "o=" field which provides the
/// originator of the session plus a session identifier and version number.
///
/// Empty fields are written with their defaults: `-` for the username and
/// `IN`/`IP4`/loopback for the transport.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Origin {
    pub username: String,
    pub session_id: i64,
    pub session_version: i64,
    pub network_type: String,
    pub address_type: String,
    pub address: String,
}

impl Origin {
    /// new returns an `IN IP4` origin with a random session id and version 1.
    pub fn new(username: impl Into<String>, address: impl Into<String>) -> Self {
        Origin {
            username: username.into(),
            session_id: new_session_id(),
            session_version: 1,
            network_type: NETWORK_INTERNET.to_owned(),
            address_type: ADDRESS_TYPE_IP4.to_owned(),
            address: address.into(),
        }
    }

    /// bump_version must be called whenever the session content changes.
    pub fn bump_version(&mut self) {
        self.session_version = self.session_version.wrapping_add(1);
    }
}

/// SessionName describes a structured representations for the "s=" field
/// and is the textual session name.
pub type SessionName = String;

/// EmailAddress describes a structured representations for the "e=" line
/// which specifies email contact information for the person responsible for
/// the conference.
pub type EmailAddress = String;

/// PhoneNumber describes a structured representations for the "p=" line
/// specify phone contact information for the person responsible for the
/// conference.
pub type PhoneNumber = String;

/// Timing defines the "t=" field's structured representation for the start and
/// stop times, in seconds since the NTP epoch. Zero means unbounded.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timing {
    pub start: u64,
    pub stop: u64,

    /// `r=<repeat interval> <active duration> <offsets from start-time>`
    ///
    /// <https://tools.ietf.org/html/rfc4566#section-5.10>
    pub repeat: Option<Repeat>,
}

impl Timing {
    pub fn new(start: u64, stop: u64) -> Self {
        Timing {
            start,
            stop,
            repeat: None,
        }
    }

    /// is_permanent reports `t=0 0` style timing.
    pub fn is_permanent(&self) -> bool {
        self.start == 0 && self.stop == 0
    }

    pub fn start_time(&self) -> Option<SystemTime> {
        ntp_to_system_time(self.start)
    }

    pub fn stop_time(&self) -> Option<SystemTime> {
        ntp_to_system_time(self.stop)
    }
}

/// Repeat describes the "r=" field of the session description which
/// represents the intervals and durations for repeated scheduled sessions.
/// All values are seconds.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Repeat {
    pub interval: i64,
    pub duration: i64,
    pub offsets: Vec<i64>,
}

/// TimeZone defines the structured object for "z=" line which describes
/// repeated sessions scheduling.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeZone {
    /// NTP seconds of the adjustment.
    pub time: u64,
    /// Signed offset in seconds.
    pub offset: i64,
}

/// Group describes an `a=group:<semantics> <mid>...` attribute (RFC 5888).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Group {
    pub semantics: String,
    pub media: Vec<String>,
}

/// MsidSemantic describes the session level `a=msid-semantic` attribute.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MsidSemantic {
    pub semantics: String,
    pub identifiers: Vec<String>,
}

/// Description is a well-defined format for conveying sufficient
/// information to discover and participate in a multimedia session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Description {
    /// `v=0`
    ///
    /// <https://tools.ietf.org/html/rfc4566#section-5.1>
    pub version: Version,

    /// `o=<username> <sess-id> <sess-version> <nettype> <addrtype> <unicast-address>`
    ///
    /// <https://tools.ietf.org/html/rfc4566#section-5.2>
    pub origin: Option<Origin>,

    /// `s=<session name>`
    ///
    /// <https://tools.ietf.org/html/rfc4566#section-5.3>
    pub session_name: SessionName,

    /// `i=<session description>`
    ///
    /// <https://tools.ietf.org/html/rfc4566#section-5.4>
    pub information: Option<Information>,

    /// `u=<uri>`, kept verbatim. See [`Description::url`].
    ///
    /// <https://tools.ietf.org/html/rfc4566#section-5.5>
    pub uri: Option<String>,

    /// `e=<email-address>`
    ///
    /// <https://tools.ietf.org/html/rfc4566#section-5.6>
    pub emails: Vec<EmailAddress>,

    /// `p=<phone-number>`
    ///
    /// <https://tools.ietf.org/html/rfc4566#section-5.6>
    pub phones: Vec<PhoneNumber>,

    /// `c=<nettype> <addrtype> <connection-address>`
    ///
    /// <https://tools.ietf.org/html/rfc4566#section-5.7>
    pub connection: Option<Connection>,

    /// `b=<bwtype>:<bandwidth>`
    ///
    /// <https://tools.ietf.org/html/rfc4566#section-5.8>
    pub bandwidth: Bandwidth,

    /// `t=<start-time> <stop-time>` and its `r=` line
    ///
    /// <https://tools.ietf.org/html/rfc4566#section-5.9>
    pub timing: Timing,

    /// `z=<adjustment time> <offset> <adjustment time> <offset> ...`
    ///
    /// <https://tools.ietf.org/html/rfc4566#section-5.11>
    pub time_zones: Vec<TimeZone>,

    /// `k=<method>`
    ///
    /// `k=<method>:<encryption key>`
    ///
    /// <https://tools.ietf.org/html/rfc4566#section-5.12>
    pub key: Option<Key>,

    /// Attributes not promoted to one of the typed fields, in their
    /// original order.
    ///
    /// <https://tools.ietf.org/html/rfc4566#section-5.13>
    pub attributes: Vec<Attribute>,

    /// <https://tools.ietf.org/html/rfc4566#section-5.14>
    pub media: Vec<Media>,

    pub mode: Direction,
    pub setup: ConnectionRole,
    pub groups: Vec<Group>,
    pub msid_semantic: Option<MsidSemantic>,
    pub fingerprint: Option<Fingerprint>,
}

impl Description {
    /// parse decodes a complete SDP document held in memory.
    pub fn parse(text: &str) -> Result<Self> {
        Decoder::from_text(text).decode()
    }

    /// to_text encodes the description into canonical SDP, each line
    /// terminated by CRLF.
    pub fn to_text(&self) -> Vec<u8> {
        let mut enc = Encoder::new();
        enc.encode(self);
        enc.bytes().to_vec()
    }

    /// marshal returns the canonical text of the description.
    ///
    /// Session lines are written as `v o s i u e p c b t r z k`, followed by
    /// the direction, `setup`, `group`, `msid-semantic`, `fingerprint` and the
    /// remaining attributes. Each media block is written as `m i c b k`,
    /// `rtcp`, `rtcp-mux`, `mid`, the formats in ascending payload order, then
    /// direction, `setup`, `fingerprint` and the remaining attributes.
    ///
    /// <https://tools.ietf.org/html/rfc4566#section-5>
    pub fn marshal(&self) -> String {
        let mut enc = Encoder::new();
        enc.encode(self);
        enc.to_string()
    }

    /// url parses the `u=` value, `None` when the field is absent.
    pub fn url(&self) -> Result<Option<Url>> {
        match &self.uri {
            Some(uri) => Ok(Some(Url::parse(uri)?)),
            None => Ok(None),
        }
    }

    /// Returns whether an attribute exists
    pub fn has_attribute(&self, name: &str) -> bool {
        find_attribute(&self.attributes, name).is_some()
    }

    /// Attribute returns the value of an attribute and if it exists
    pub fn attribute(&self, name: &str) -> Option<&str> {
        find_attribute(&self.attributes, name).map(|a| a.value.as_str())
    }

    /// media_by_id returns the media block tagged with `a=mid:<id>`.
    pub fn media_by_id(&self, id: &str) -> Option<&Media> {
        self.media.iter().find(|m| m.id.as_deref() == Some(id))
    }

    /// WithPropertyAttribute adds a property attribute 'a=key' to the session description
    pub fn with_property_attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(Attribute::flag(name));
        self
    }

    /// WithValueAttribute adds a value attribute 'a=key:value' to the session description
    pub fn with_value_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    /// WithFingerprint adds a fingerprint to the session description
    pub fn with_fingerprint(mut self, hash_function: impl Into<String>, value: impl Into<String>) -> Self {
        self.fingerprint = Some(Fingerprint::new(hash_function, value));
        self
    }

    /// WithMedia adds a media description to the session description
    pub fn with_media(mut self, media: Media) -> Self {
        self.media.push(media);
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn with_connection(mut self, connection: Connection) -> Self {
        self.connection = Some(connection);
        self
    }

    pub fn with_mode(mut self, mode: Direction) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_group(mut self, semantics: impl Into<String>, media: Vec<String>) -> Self {
        self.groups.push(Group {
            semantics: semantics.into(),
            media,
        });
        self
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.marshal())
    }
}

impl FromStr for Description {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Description::parse(s)
    }
}

impl TryFrom<&str> for Description {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Description::parse(s)
    }
}

impl TryFrom<String> for Description {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Description::parse(&s)
    }
}

impl From<Description> for String {
    fn from(desc: Description) -> String {
        desc.marshal()
    }
}
