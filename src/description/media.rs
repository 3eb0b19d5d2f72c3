use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::description::common::*;
use crate::direction::Direction;
use crate::util::ConnectionRole;

/// Format is a media format: a payload number together with whatever
/// `rtpmap`, `rtcp-fb` and `fmtp` attributes describe it.
///
/// A payload declared on the `m=` line without an `rtpmap` keeps every field
/// but `payload` empty.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Format {
    pub payload: u8,
    pub codec: String,
    pub clock_rate: u32,
    pub channels: Option<u16>,
    /// `a=rtcp-fb:<payload> <feedback>` values in order of appearance.
    pub feedback: Vec<String>,
    /// `a=fmtp:<payload> <params>` values in order of appearance.
    pub params: Vec<String>,
}

impl Format {
    pub fn new(payload: u8, codec: impl Into<String>, clock_rate: u32) -> Self {
        Format {
            payload,
            codec: codec.into(),
            clock_rate,
            ..Default::default()
        }
    }

    /// A format that is declared by payload number only.
    pub fn payload(payload: u8) -> Self {
        Format {
            payload,
            ..Default::default()
        }
    }

    pub fn with_channels(mut self, channels: u16) -> Self {
        self.channels = Some(channels);
        self
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback.push(feedback.into());
        self
    }

    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.params.push(params.into());
        self
    }

    /// has_rtpmap reports whether the encoder will write an `a=rtpmap` line.
    pub fn has_rtpmap(&self) -> bool {
        !self.codec.is_empty()
    }
}

/// Control describes the RTCP transport of a media block: `a=rtcp` of
/// RFC 3605 and the `a=rtcp-mux` flag of RFC 5761.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Control {
    pub port: u16,
    /// Empty network, address type and address mean the attribute carries
    /// the port only.
    pub network_type: String,
    pub address_type: String,
    pub address: String,
    pub muxed: bool,
}

impl Control {
    pub(crate) fn has_transport(&self) -> bool {
        !(self.network_type.is_empty() && self.address_type.is_empty() && self.address.is_empty())
    }
}

/// Media represents a media description.
///
/// ## Specifications
///
/// * [RFC 4566 §5.14]
///
/// [RFC 4566 §5.14]: https://tools.ietf.org/html/rfc4566#section-5.14
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Media {
    /// `m=<media> <port>/<number of ports> <proto> <fmt> ...`
    ///
    /// <https://tools.ietf.org/html/rfc4566#section-5.14>
    pub media_type: String,
    pub port: u16,
    pub port_count: Option<u16>,
    pub proto: String,

    /// Formats keyed by payload number. Encoding always walks the payload
    /// numbers in ascending order. Only written for RTP based protocols.
    pub formats: HashMap<u8, Format>,

    /// The verbatim `<fmt>` list of a media block whose protocol is not RTP
    /// based, e.g. `webrtc-datachannel`. Ignored by the encoder for RTP.
    pub format_description: String,

    /// `i=<media title>`
    ///
    /// <https://tools.ietf.org/html/rfc4566#section-5.4>
    pub information: Option<Information>,

    /// `c=<nettype> <addrtype> <connection-address>`
    ///
    /// <https://tools.ietf.org/html/rfc4566#section-5.7>
    pub connection: Option<Connection>,

    /// `b=<bwtype>:<bandwidth>`
    ///
    /// <https://tools.ietf.org/html/rfc4566#section-5.8>
    pub bandwidth: Bandwidth,

    /// `k=<method>`
    ///
    /// `k=<method>:<encryption key>`
    ///
    /// <https://tools.ietf.org/html/rfc4566#section-5.12>
    pub key: Option<Key>,

    /// Attributes not promoted to one of the typed fields, in their
    /// original order.
    pub attributes: Vec<Attribute>,

    pub mode: Direction,
    pub setup: ConnectionRole,

    /// `a=mid:<identification-tag>`
    pub id: Option<String>,
    pub control: Option<Control>,
    pub fingerprint: Option<Fingerprint>,
}

impl Media {
    pub fn new(media_type: impl Into<String>, port: u16, proto: impl Into<String>) -> Self {
        Media {
            media_type: media_type.into(),
            port,
            proto: proto.into(),
            ..Default::default()
        }
    }

    /// is_rtp reports whether the `<fmt>` list holds RTP payload numbers.
    pub fn is_rtp(&self) -> bool {
        is_rtp_proto(&self.proto)
    }

    /// payloads returns the declared payload numbers in ascending order.
    pub fn payloads(&self) -> Vec<u8> {
        let mut payloads: Vec<u8> = self.formats.keys().copied().collect();
        payloads.sort_unstable();
        payloads
    }

    pub fn format(&self, payload: u8) -> Option<&Format> {
        self.formats.get(&payload)
    }

    /// format_by_codec returns the lowest payload whose codec name matches
    /// case-insensitively.
    pub fn format_by_codec(&self, codec: &str) -> Option<&Format> {
        self.payloads()
            .into_iter()
            .filter_map(|p| self.formats.get(&p))
            .find(|f| f.codec.eq_ignore_ascii_case(codec))
    }

    /// Returns whether an attribute exists
    pub fn has_attribute(&self, name: &str) -> bool {
        find_attribute(&self.attributes, name).is_some()
    }

    /// attribute returns the value of the first attribute named `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        find_attribute(&self.attributes, name).map(|a| a.value.as_str())
    }

    /// with_format declares a format, replacing one with the same payload.
    pub fn with_format(mut self, format: Format) -> Self {
        self.formats.insert(format.payload, format);
        self
    }

    /// with_codec adds codec information to the media description
    pub fn with_codec(
        self,
        payload: u8,
        codec: impl Into<String>,
        clock_rate: u32,
        channels: Option<u16>,
    ) -> Self {
        let mut format = Format::new(payload, codec, clock_rate);
        format.channels = channels;
        self.with_format(format)
    }

    /// with_property_attribute adds a property attribute 'a=key' to the media description
    pub fn with_property_attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(Attribute::flag(name));
        self
    }

    /// with_value_attribute adds a value attribute 'a=key:value' to the media description
    pub fn with_value_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
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

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

pub(crate) fn is_rtp_proto(proto: &str) -> bool {
    proto.split('/').any(|p| p == "RTP")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_missing() {
        let media = Media::default();

        assert_eq!(media.attribute("recvonly"), None);
    }

    #[test]
    fn test_attribute_present_with_no_value() {
        let media = Media::default().with_property_attribute("rtcp-rsize");

        assert_eq!(media.attribute("rtcp-rsize"), Some(""));
        assert!(media.has_attribute("rtcp-rsize"));
    }

    #[test]
    fn test_attribute_present_with_value() {
        let media = Media::default().with_value_attribute("ptime", "20");

        assert_eq!(media.attribute("ptime"), Some("20"));
    }

    #[test]
    fn test_payloads_sorted() {
        let media = Media::new("audio", 49170, "RTP/AVP")
            .with_codec(97, "iLBC", 8000, None)
            .with_codec(8, "PCMA", 8000, None)
            .with_format(Format::payload(0))
            .with_codec(101, "telephone-event", 8000, None);

        assert_eq!(media.payloads(), vec![0, 8, 97, 101]);
        assert_eq!(media.format_by_codec("pcma").map(|f| f.payload), Some(8));
        assert!(!media.format(0).map(Format::has_rtpmap).unwrap_or(true));
    }

    #[test]
    fn test_is_rtp() {
        assert!(Media::new("audio", 1, "RTP/AVP").is_rtp());
        assert!(Media::new("video", 9, "UDP/TLS/RTP/SAVPF").is_rtp());
        assert!(!Media::new("application", 9, "UDP/DTLS/SCTP").is_rtp());
        assert!(!Media::new("image", 54111, "udptl").is_rtp());
    }
}
