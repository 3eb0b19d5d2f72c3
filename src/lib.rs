#![warn(rust_2018_idioms)]

//! Decoding and canonical encoding of SDP, the Session Description
//! Protocol of [RFC 4566](https://tools.ietf.org/html/rfc4566).
//!
//! ```
//! let desc = sdp_codec::parse(
//!     "v=0\r\n\
//!      o=jdoe 2890844526 2890842807 IN IP4 10.47.16.5\r\n\
//!      s=SDP Seminar\r\n\
//!      t=0 0\r\n\
//!      m=audio 49170 RTP/AVP 0\r\n\
//!      a=rtpmap:0 PCMU/8000\r\n",
//! )?;
//! assert_eq!(desc.media[0].format(0).map(|f| f.codec.as_str()), Some("PCMU"));
//! assert!(desc.marshal().ends_with("a=rtpmap:0 PCMU/8000\r\n"));
//! # Ok::<(), sdp_codec::Error>(())
//! ```

pub mod decoder;
pub mod description;
pub mod direction;
pub mod encoder;
mod error;
pub mod lexer;
pub mod util;

pub use decoder::{Decoder, DecoderConfig};
pub use description::common::{Attribute, Bandwidth, Connection, Fingerprint, Key};
pub use description::media::{Control, Format, Media};
pub use description::session::{
    Description, Group, MsidSemantic, Origin, Repeat, TimeZone, Timing,
};
pub use direction::Direction;
pub use encoder::Encoder;
pub use error::{Error, Result};
pub use util::ConnectionRole;

/// MIME type of an SDP document.
pub const MEDIA_TYPE: &str = "application/sdp";

/// parse decodes a complete SDP document held in memory.
pub fn parse(text: &str) -> Result<Description> {
    Description::parse(text)
}
