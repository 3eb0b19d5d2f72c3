
pub(crate) mod attributes;

use std::io;

use log::{debug, trace};

use crate::description::common::*;
use crate::description::media::*;
use crate::description::session::*;
use crate::error::{Error, Result};
use crate::lexer::*;
use crate::util::*;

/// Default upper bound for the number of media blocks in one description.
pub const DEFAULT_MAX_MEDIA: usize = 1024;

/// DecoderConfig bounds the resources a single decode may use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Longest accepted logical line, terminator excluded.
    pub max_line_length: usize,
    /// Most `m=` blocks accepted in one description.
    pub max_media: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            max_media: DEFAULT_MAX_MEDIA,
        }
    }
}

/// Decoder turns SDP text into a [`Description`].
///
/// The decoder is bound to one input and consumed by [`Decoder::decode`].
/// Lines are read one at a time, so a streaming source never has to be
/// buffered as a whole.
pub struct Decoder<L: LineReader> {
    lines: L,
    config: DecoderConfig,
}

impl<R: io::BufRead> Decoder<StreamLines<R>> {
    /// new binds a decoder to a buffered byte stream.
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, DecoderConfig::default())
    }

    pub fn with_config(reader: R, config: DecoderConfig) -> Self {
        Decoder {
            lines: StreamLines::with_max_line_length(reader, config.max_line_length),
            config,
        }
    }
}

impl<'a> Decoder<StrLines<'a>> {
    /// from_text binds a decoder to a document held in memory.
    pub fn from_text(text: &'a str) -> Self {
        Self::from_text_with_config(text, DecoderConfig::default())
    }

    pub fn from_text_with_config(text: &'a str, config: DecoderConfig) -> Self {
        Decoder {
            lines: StrLines::with_max_line_length(text, config.max_line_length),
            config,
        }
    }
}

impl<L: LineReader> Decoder<L> {
    /// from_lines binds a decoder to any line source.
    pub fn from_lines(lines: L, config: DecoderConfig) -> Self {
        Decoder { lines, config }
    }

    /// decode reads the input to its end and returns the description, or
    /// the first error met. No partial description is returned on error.
    pub fn decode(self) -> Result<Description> {
        let Decoder { mut lines, config } = self;
        let mut lexer = Lexer::new(config);

        while let Some(line) = lines.next_line()? {
            lexer.unmarshal_line(line)?;
        }

        let mut desc = lexer.desc;
        attributes::promote_session(&mut desc);
        for media in &mut desc.media {
            attributes::promote_media(media)?;
        }

        debug!(
            "sdp: decoded description with {} media block(s)",
            desc.media.len()
        );
        Ok(desc)
    }
}

/// Scope selects which part of the description a line applies to. Once the
/// first `m=` line is seen the lexer never returns to the session scope.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Scope {
    Session,
    Media(usize),
}

struct Lexer {
    desc: Description,
    scope: Scope,
    config: DecoderConfig,
    // r= only follows a t= line
    timing_seen: bool,
}

impl Lexer {
    fn new(config: DecoderConfig) -> Self {
        Lexer {
            desc: Description::default(),
            scope: Scope::Session,
            config,
            timing_seen: false,
        }
    }

    fn unmarshal_line(&mut self, line: &str) -> Result<()> {
        let kv = split_fields(line, line, '=', 2, Split::Required)?;
        let (key, value) = (kv[0], kv[1]);

        let mut chars = key.chars();
        let tag = match (chars.next(), chars.next()) {
            (Some(tag), None) => tag,
            _ => return Err(Error::syntax(line)),
        };
        trace!("sdp: {:?} line '{}'", self.scope, line);

        match self.scope {
            Scope::Session => self.unmarshal_session_line(tag, value, line),
            Scope::Media(index) => self.unmarshal_media_line(index, tag, value, line),
        }
    }

    fn unmarshal_session_line(&mut self, tag: char, value: &str, line: &str) -> Result<()> {
        if tag == 'm' {
            return self.unmarshal_media_description(value, line);
        }

        let desc = &mut self.desc;
        match tag {
            'v' => desc.version = parse_int(value, line)?,
            'o' => desc.origin = Some(unmarshal_origin(value, line)?),
            's' => desc.session_name = value.to_owned(),
            'i' => desc.information = Some(value.to_owned()),
            'u' => desc.uri = Some(value.to_owned()),
            'e' => desc.emails.push(value.to_owned()),
            'p' => desc.phones.push(value.to_owned()),
            'c' => desc.connection = Some(unmarshal_connection(value, line)?),
            'b' => unmarshal_bandwidth(&mut desc.bandwidth, value, line)?,
            't' => {
                desc.timing = unmarshal_timing(value, line)?;
                self.timing_seen = true;
            }
            'r' if self.timing_seen => {
                desc.timing.repeat = Some(unmarshal_repeat(value, line)?);
            }
            'r' => return Err(Error::syntax(line)),
            'z' => unmarshal_time_zones(&mut desc.time_zones, value, line)?,
            'k' => desc.key = Some(unmarshal_key(value, line)?),
            'a' => desc.attributes.push(unmarshal_attribute(value, line)?),
            _ => return Err(unknown_type(tag, line)),
        }
        Ok(())
    }

    fn unmarshal_media_line(
        &mut self,
        index: usize,
        tag: char,
        value: &str,
        line: &str,
    ) -> Result<()> {
        if tag == 'm' {
            return self.unmarshal_media_description(value, line);
        }

        let media = match self.desc.media.get_mut(index) {
            Some(media) => media,
            None => return Err(Error::syntax(line)),
        };
        match tag {
            'i' => media.information = Some(value.to_owned()),
            'c' => media.connection = Some(unmarshal_connection(value, line)?),
            'b' => unmarshal_bandwidth(&mut media.bandwidth, value, line)?,
            'k' => media.key = Some(unmarshal_key(value, line)?),
            'a' => media.attributes.push(unmarshal_attribute(value, line)?),
            _ => return Err(unknown_type(tag, line)),
        }
        Ok(())
    }

    fn unmarshal_media_description(&mut self, value: &str, line: &str) -> Result<()> {
        if self.desc.media.len() >= self.config.max_media {
            return Err(Error::syntax(line));
        }

        let fields = split_fields(line, value, ' ', 4, Split::Required)?;

        // <port>/<number of ports>
        let port = split_fields(line, fields[1], '/', 2, Split::Optional)?;
        let port_count = match port.get(1) {
            Some(count) => Some(parse_int(count, line)?),
            None => None,
        };

        let mut media = Media {
            media_type: fields[0].to_owned(),
            port: parse_int(port[0], line)?,
            port_count,
            proto: fields[2].to_owned(),
            ..Default::default()
        };

        // <fmt> ... holds payload numbers for RTP only, anything else is
        // kept verbatim.
        if media.is_rtp() {
            for payload in fields[3].split(' ') {
                let payload: u8 = parse_int(payload, line)?;
                media.formats.insert(payload, Format::payload(payload));
            }
        } else {
            media.format_description = fields[3].to_owned();
        }

        self.desc.media.push(media);
        self.scope = Scope::Media(self.desc.media.len() - 1);
        Ok(())
    }
}

fn unknown_type(tag: char, line: &str) -> Error {
    Error::UnknownType {
        tag,
        line: line.to_owned(),
    }
}

fn unmarshal_origin(value: &str, line: &str) -> Result<Origin> {
    let fields = split_fields(line, value, ' ', 6, Split::Required)?;

    Ok(Origin {
        username: fields[0].to_owned(),
        session_id: parse_int(fields[1], line)?,
        session_version: parse_int(fields[2], line)?,
        network_type: fields[3].to_owned(),
        address_type: fields[4].to_owned(),
        address: fields[5].to_owned(),
    })
}

fn unmarshal_connection(value: &str, line: &str) -> Result<Connection> {
    let fields = split_fields(line, value, ' ', 3, Split::Required)?;

    let mut connection = Connection {
        network_type: fields[0].to_owned(),
        address_type: fields[1].to_owned(),
        ..Default::default()
    };

    // <base multicast address>[/<ttl>]/<number of addresses>
    let parts = split_fields(line, fields[2], '/', 3, Split::Optional)?;
    connection.address = parts[0].to_owned();
    if connection.is_ip6() {
        // IPv6 multicast carries no TTL
        match parts.len() {
            1 => {}
            2 => connection.address_count = Some(parse_int(parts[1], line)?),
            _ => return Err(Error::invalid_value(fields[2], line)),
        }
    } else {
        if let Some(ttl) = parts.get(1) {
            connection.ttl = Some(parse_int(ttl, line)?);
        }
        if let Some(count) = parts.get(2) {
            connection.address_count = Some(parse_int(count, line)?);
        }
    }

    Ok(connection)
}

fn unmarshal_bandwidth(bandwidth: &mut Bandwidth, value: &str, line: &str) -> Result<()> {
    let fields = split_fields(line, value, ':', 2, Split::Required)?;
    bandwidth.insert(fields[0].to_owned(), parse_int(fields[1], line)?);
    Ok(())
}

fn unmarshal_timing(value: &str, line: &str) -> Result<Timing> {
    let fields = split_fields(line, value, ' ', 2, Split::Required)?;

    Ok(Timing {
        start: parse_time(fields[0], line)?,
        stop: parse_time(fields[1], line)?,
        repeat: None,
    })
}

/// `r=<repeat interval> <active duration> <offsets from start-time>`. The
/// offset list may be left out, which reads as no offsets.
fn unmarshal_repeat(value: &str, line: &str) -> Result<Repeat> {
    let fields = split_fields(line, value, ' ', 3, Split::Optional)?;
    if fields.len() < 2 {
        return Err(Error::syntax(line));
    }

    let mut offsets = vec![];
    if let Some(list) = fields.get(2) {
        for offset in list.split(' ') {
            offsets.push(parse_duration(offset, line)?);
        }
    }

    Ok(Repeat {
        interval: parse_duration(fields[0], line)?,
        duration: parse_duration(fields[1], line)?,
        offsets,
    })
}

fn unmarshal_time_zones(time_zones: &mut Vec<TimeZone>, value: &str, line: &str) -> Result<()> {
    // These fields are transmitted in pairs
    // z=<adjustment time> <offset> <adjustment time> <offset> ....
    let fields: Vec<&str> = value.split(' ').collect();
    if fields.len() % 2 != 0 {
        return Err(Error::syntax(line));
    }

    for pair in fields.chunks(2) {
        time_zones.push(TimeZone {
            time: parse_time(pair[0], line)?,
            offset: parse_duration(pair[1], line)?,
        });
    }
    Ok(())
}

fn unmarshal_key(value: &str, line: &str) -> Result<Key> {
    let fields = split_fields(line, value, ':', 2, Split::Optional)?;
    Ok(Key {
        method: fields[0].to_owned(),
        value: fields.get(1).map(|v| v.to_string()).unwrap_or_default(),
    })
}

fn unmarshal_attribute(value: &str, line: &str) -> Result<Attribute> {
    let fields = split_fields(line, value, ':', 2, Split::Optional)?;
    Ok(Attribute {
        name: fields[0].to_owned(),
        value: fields.get(1).map(|v| v.to_string()).unwrap_or_default(),
    })
}
