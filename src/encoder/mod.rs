
use log::debug;

use crate::description::common::*;
use crate::description::media::*;
use crate::description::session::*;
use crate::direction::Direction;
use crate::lexer::END_LINE;
use crate::util::*;

/// Smallest buffer an encoder starts out with.
pub const MIN_CAPACITY: usize = 1024;

const SESSION_NAME_EMPTY: &str = "-";
const USERNAME_EMPTY: &str = "-";

/// Encoder writes descriptions in canonical SDP text form.
///
/// An encoder owns a growable buffer that is reused from one
/// [`Encoder::encode`] call to the next. Lines are separated by `\r\n`; the
/// terminator of the last line is only added by [`Encoder::bytes`].
#[derive(Debug, Clone)]
pub struct Encoder {
    buf: Vec<u8>,
    terminated: bool,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self::with_capacity(MIN_CAPACITY)
    }

    /// with_capacity preallocates at least `capacity` bytes, never fewer
    /// than [`MIN_CAPACITY`].
    pub fn with_capacity(capacity: usize) -> Self {
        Encoder {
            buf: Vec::with_capacity(capacity.max(MIN_CAPACITY)),
            terminated: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// encode replaces the buffer contents with the text form of `desc`.
    /// The allocation of a previous call is kept.
    pub fn encode(&mut self, desc: &Description) {
        let capacity = self.buf.capacity();
        self.buf.clear();
        self.terminated = false;

        self.session(desc);
        for media in &desc.media {
            self.media(media);
        }

        if self.buf.capacity() > capacity {
            debug!(
                "sdp: encoder buffer grew from {} to {} bytes",
                capacity,
                self.buf.capacity()
            );
        }
    }

    /// bytes returns the encoded text with its final line terminator.
    pub fn bytes(&mut self) -> &[u8] {
        if !self.terminated && !self.buf.is_empty() {
            self.buf.extend_from_slice(END_LINE);
            self.terminated = true;
        }
        &self.buf
    }

    /// unterminated returns the encoded text without the final terminator.
    pub fn unterminated(&self) -> &[u8] {
        if self.terminated {
            &self.buf[..self.buf.len() - END_LINE.len()]
        } else {
            &self.buf
        }
    }

    // Takes `&mut self` to add the terminator, so this is not `Display`.
    #[allow(clippy::inherent_to_string)]
    pub fn to_string(&mut self) -> String {
        // every piece written is either a `&str` or ASCII
        String::from_utf8_lossy(self.bytes()).into_owned()
    }

    fn session(&mut self, desc: &Description) {
        self.line(b'v');
        self.uint(desc.version as u64);

        if let Some(origin) = &desc.origin {
            self.line(b'o');
            self.str_or(&origin.username, USERNAME_EMPTY);
            self.space();
            self.int(origin.session_id);
            self.space();
            self.int(origin.session_version);
            self.space();
            self.transport(
                &origin.network_type,
                &origin.address_type,
                &origin.address,
            );
        }

        self.line(b's');
        self.str_or(&desc.session_name, SESSION_NAME_EMPTY);

        if let Some(information) = &desc.information {
            self.key_value(b'i', information);
        }
        if let Some(uri) = &desc.uri {
            self.key_value(b'u', uri);
        }
        for email in &desc.emails {
            self.key_value(b'e', email);
        }
        for phone in &desc.phones {
            self.key_value(b'p', phone);
        }
        if let Some(connection) = &desc.connection {
            self.connection(connection);
        }
        self.bandwidth(&desc.bandwidth);
        self.timing(&desc.timing);

        if !desc.time_zones.is_empty() {
            self.line(b'z');
            for (i, zone) in desc.time_zones.iter().enumerate() {
                if i > 0 {
                    self.space();
                }
                self.uint(zone.time);
                self.space();
                append_duration(&mut self.buf, zone.offset);
            }
        }

        if let Some(key) = &desc.key {
            self.key(key);
        }

        self.mode(desc.mode);
        self.setup(desc.setup);
        for group in &desc.groups {
            self.attribute_name(ATTR_KEY_GROUP);
            self.byte(b':');
            self.str(&group.semantics);
            for mid in &group.media {
                self.space();
                self.str(mid);
            }
        }
        if let Some(msid) = &desc.msid_semantic {
            self.attribute_name(ATTR_KEY_MSID_SEMANTIC);
            self.str(": ");
            self.str(&msid.semantics);
            for id in &msid.identifiers {
                self.space();
                self.str(id);
            }
        }
        if let Some(fingerprint) = &desc.fingerprint {
            self.fingerprint(fingerprint);
        }
        for attr in &desc.attributes {
            self.attribute(attr);
        }
    }

    fn media(&mut self, media: &Media) {
        // payload numbers belong to RTP, any other protocol writes its
        // <fmt> list verbatim
        let rtp = media.is_rtp();
        let payloads = if rtp { media.payloads() } else { vec![] };

        self.line(b'm');
        self.str(&media.media_type);
        self.space();
        self.uint(media.port as u64);
        if let Some(count) = media.port_count {
            self.byte(b'/');
            self.uint(count as u64);
        }
        self.space();
        self.str(&media.proto);
        for payload in &payloads {
            self.space();
            self.uint(*payload as u64);
        }
        if !rtp && !media.format_description.is_empty() {
            self.space();
            self.str(&media.format_description);
        }

        if let Some(information) = &media.information {
            self.key_value(b'i', information);
        }
        if let Some(connection) = &media.connection {
            self.connection(connection);
        }
        self.bandwidth(&media.bandwidth);
        if let Some(key) = &media.key {
            self.key(key);
        }

        if let Some(control) = &media.control {
            self.attribute_name(ATTR_KEY_RTCP);
            self.byte(b':');
            self.uint(control.port as u64);
            if control.has_transport() {
                self.space();
                self.transport(
                    &control.network_type,
                    &control.address_type,
                    &control.address,
                );
            }
            if control.muxed {
                self.attribute_name(ATTR_KEY_RTCPMUX);
            }
        }
        if let Some(id) = &media.id {
            self.attribute_name(ATTR_KEY_MID);
            self.byte(b':');
            self.str(id);
        }

        for format in payloads.iter().filter_map(|p| media.formats.get(p)) {
            self.format(format);
        }

        self.mode(media.mode);
        self.setup(media.setup);
        if let Some(fingerprint) = &media.fingerprint {
            self.fingerprint(fingerprint);
        }
        for attr in &media.attributes {
            self.attribute(attr);
        }
    }

    fn format(&mut self, format: &Format) {
        if format.has_rtpmap() {
            self.attribute_name(ATTR_KEY_RTPMAP);
            self.byte(b':');
            self.uint(format.payload as u64);
            self.space();
            self.str(&format.codec);
            self.byte(b'/');
            self.uint(format.clock_rate as u64);
            if let Some(channels) = format.channels {
                self.byte(b'/');
                self.uint(channels as u64);
            }
        }
        for feedback in &format.feedback {
            self.attribute_name(ATTR_KEY_RTCP_FB);
            self.byte(b':');
            self.uint(format.payload as u64);
            self.space();
            self.str(feedback);
        }
        for params in &format.params {
            self.attribute_name(ATTR_KEY_FMTP);
            self.byte(b':');
            self.uint(format.payload as u64);
            self.space();
            self.str(params);
        }
    }

    fn timing(&mut self, timing: &Timing) {
        self.line(b't');
        self.uint(timing.start);
        self.space();
        self.uint(timing.stop);

        if let Some(repeat) = &timing.repeat {
            self.line(b'r');
            append_duration(&mut self.buf, repeat.interval);
            self.space();
            append_duration(&mut self.buf, repeat.duration);
            for offset in &repeat.offsets {
                self.space();
                append_duration(&mut self.buf, *offset);
            }
        }
    }

    fn connection(&mut self, connection: &Connection) {
        self.line(b'c');
        self.transport(
            &connection.network_type,
            &connection.address_type,
            &connection.address,
        );
        if connection.is_ip6() {
            if let Some(count) = connection.address_count {
                self.byte(b'/');
                self.uint(count as u64);
            }
        } else if let Some(ttl) = connection.ttl {
            self.byte(b'/');
            self.uint(ttl as u64);
            if let Some(count) = connection.address_count {
                self.byte(b'/');
                self.uint(count as u64);
            }
        }
    }

    fn bandwidth(&mut self, bandwidth: &Bandwidth) {
        for (bandwidth_type, value) in bandwidth {
            self.line(b'b');
            self.str(bandwidth_type);
            self.byte(b':');
            self.uint(*value);
        }
    }

    fn key(&mut self, key: &Key) {
        self.line(b'k');
        self.str(&key.method);
        if !key.value.is_empty() {
            self.byte(b':');
            self.str(&key.value);
        }
    }

    fn mode(&mut self, mode: Direction) {
        if let Some(name) = mode.as_str() {
            self.attribute_name(name);
        }
    }

    fn setup(&mut self, role: ConnectionRole) {
        if let Some(role) = role.as_str() {
            self.attribute_name(ATTR_KEY_CONNECTION_SETUP);
            self.byte(b':');
            self.str(role);
        }
    }

    fn fingerprint(&mut self, fingerprint: &Fingerprint) {
        self.attribute_name(ATTR_KEY_FINGERPRINT);
        self.byte(b':');
        self.str(&fingerprint.hash_function);
        self.space();
        self.str(&fingerprint.value);
    }

    fn attribute(&mut self, attr: &Attribute) {
        self.attribute_name(&attr.name);
        if !attr.value.is_empty() {
            self.byte(b':');
            self.str(&attr.value);
        }
    }

    /// `<nettype> <addrtype> <address>` with loopback defaults.
    fn transport(&mut self, network_type: &str, address_type: &str, address: &str) {
        self.str_or(network_type, NETWORK_INTERNET);
        self.space();
        self.str_or(address_type, ADDRESS_TYPE_IP4);
        self.space();
        let loopback = if address_type == ADDRESS_TYPE_IP6 {
            LOOPBACK_IP6
        } else {
            LOOPBACK_IP4
        };
        self.str_or(address, loopback);
    }

    /// line starts a new `<type>=` line, terminating the previous one.
    fn line(&mut self, tag: u8) {
        if !self.buf.is_empty() {
            self.buf.extend_from_slice(END_LINE);
        }
        self.buf.push(tag);
        self.buf.push(b'=');
    }

    fn attribute_name(&mut self, name: &str) {
        self.line(b'a');
        self.str(name);
    }

    fn key_value(&mut self, tag: u8, value: &str) {
        self.line(tag);
        self.str(value);
    }

    fn str(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
    }

    fn str_or(&mut self, s: &str, default: &str) {
        self.str(if s.is_empty() { default } else { s });
    }

    fn byte(&mut self, b: u8) {
        self.buf.push(b);
    }

    fn space(&mut self) {
        self.buf.push(b' ');
    }

    fn int(&mut self, v: i64) {
        append_int(&mut self.buf, v);
    }

    fn uint(&mut self, v: u64) {
        append_uint(&mut self.buf, v);
    }
}
