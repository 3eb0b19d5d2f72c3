//! Promotion of well-known attributes into typed fields.
//!
//! Runs once over each scope after the whole document has been read. A
//! promoted attribute is removed from the attribute list; everything else
//! keeps its relative order. Single-valued fields take the first occurrence,
//! repeats stay in the list as opaque attributes.

use log::trace;

use crate::description::common::*;
use crate::description::media::*;
use crate::description::session::*;
use crate::direction::Direction;
use crate::error::{Error, Result};
use crate::util::ConnectionRole;

pub(crate) fn promote_session(desc: &mut Description) {
    let attributes = std::mem::take(&mut desc.attributes);
    let mut retained = Vec::with_capacity(attributes.len());

    for attr in attributes {
        if promote_session_attribute(desc, &attr) {
            trace!("sdp: promoted session attribute '{}'", attr);
        } else {
            retained.push(attr);
        }
    }

    desc.attributes = retained;
}

fn promote_session_attribute(desc: &mut Description, attr: &Attribute) -> bool {
    if let Some(mode) = direction(attr) {
        if desc.mode != Direction::Unspecified {
            return false;
        }
        desc.mode = mode;
        return true;
    }

    match attr.name.as_str() {
        ATTR_KEY_CONNECTION_SETUP if desc.setup == ConnectionRole::Unspecified => {
            match setup(attr) {
                Some(role) => desc.setup = role,
                None => return false,
            }
        }
        ATTR_KEY_FINGERPRINT if desc.fingerprint.is_none() => match fingerprint(attr) {
            Some(fp) => desc.fingerprint = Some(fp),
            None => return false,
        },
        ATTR_KEY_GROUP => {
            let mut tokens = attr.value.split_whitespace();
            let semantics = match tokens.next() {
                Some(semantics) => semantics.to_owned(),
                None => return false,
            };
            desc.groups.push(Group {
                semantics,
                media: tokens.map(str::to_owned).collect(),
            });
        }
        ATTR_KEY_MSID_SEMANTIC if desc.msid_semantic.is_none() => {
            // usually written as "msid-semantic: WMS <id>..."
            let mut tokens = attr.value.split_whitespace();
            let semantics = match tokens.next() {
                Some(semantics) => semantics.to_owned(),
                None => return false,
            };
            desc.msid_semantic = Some(MsidSemantic {
                semantics,
                identifiers: tokens.map(str::to_owned).collect(),
            });
        }
        _ => return false,
    }

    true
}

pub(crate) fn promote_media(media: &mut Media) -> Result<()> {
    let attributes = std::mem::take(&mut media.attributes);
    let mut retained = Vec::with_capacity(attributes.len());

    for attr in attributes {
        if promote_media_attribute(media, &attr)? {
            trace!(
                "sdp: promoted {} media attribute '{}'",
                media.media_type,
                attr
            );
        } else {
            retained.push(attr);
        }
    }

    // rtcp-mux only folds into an a=rtcp seen in the same block
    if let Some(control) = media.control.as_mut() {
        let before = retained.len();
        retained.retain(|a| !(a.name == ATTR_KEY_RTCPMUX && a.is_flag()));
        control.muxed = retained.len() != before;
    }

    media.attributes = retained;
    Ok(())
}

fn promote_media_attribute(media: &mut Media, attr: &Attribute) -> Result<bool> {
    if let Some(mode) = direction(attr) {
        if media.mode != Direction::Unspecified {
            return Ok(false);
        }
        media.mode = mode;
        return Ok(true);
    }

    match attr.name.as_str() {
        ATTR_KEY_CONNECTION_SETUP if media.setup == ConnectionRole::Unspecified => {
            match setup(attr) {
                Some(role) => media.setup = role,
                None => return Ok(false),
            }
        }
        ATTR_KEY_FINGERPRINT if media.fingerprint.is_none() => match fingerprint(attr) {
            Some(fp) => media.fingerprint = Some(fp),
            None => return Ok(false),
        },
        ATTR_KEY_MID if media.id.is_none() && !attr.value.is_empty() => {
            media.id = Some(attr.value.clone())
        }
        ATTR_KEY_RTCP if media.control.is_none() => match control(attr) {
            Some(control) => media.control = Some(control),
            None => return Ok(false),
        },
        ATTR_KEY_RTPMAP if media.is_rtp() => rtpmap(media, attr)?,
        ATTR_KEY_FMTP if media.is_rtp() => fmtp(media, attr)?,
        ATTR_KEY_RTCP_FB if media.is_rtp() => return Ok(rtcp_fb(media, &attr.value)),
        _ => return Ok(false),
    }

    Ok(true)
}

fn direction(attr: &Attribute) -> Option<Direction> {
    if !attr.is_flag() {
        return None;
    }
    match Direction::new(&attr.name) {
        Direction::Unspecified => None,
        mode => Some(mode),
    }
}

fn setup(attr: &Attribute) -> Option<ConnectionRole> {
    match ConnectionRole::from(attr.value.as_str()) {
        ConnectionRole::Unspecified => None,
        role => Some(role),
    }
}

fn fingerprint(attr: &Attribute) -> Option<Fingerprint> {
    let mut tokens = attr.value.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(hash_function), Some(value), None) => Some(Fingerprint::new(hash_function, value)),
        _ => None,
    }
}

/// `a=rtcp:<port> [<nettype> <addrtype> <connection-address>]`
fn control(attr: &Attribute) -> Option<Control> {
    let tokens: Vec<&str> = attr.value.split_whitespace().collect();
    let port = tokens.first()?.parse::<u16>().ok()?;

    match tokens.len() {
        1 => Some(Control {
            port,
            ..Default::default()
        }),
        4 => Some(Control {
            port,
            network_type: tokens[1].to_owned(),
            address_type: tokens[2].to_owned(),
            address: tokens[3].to_owned(),
            muxed: false,
        }),
        _ => None,
    }
}

fn format_mut(media: &mut Media, payload: u8) -> &mut Format {
    media
        .formats
        .entry(payload)
        .or_insert_with(|| Format::payload(payload))
}

/// `a=rtpmap:<payload type> <encoding name>/<clock rate>[/<encoding parameters>]`
fn rtpmap(media: &mut Media, attr: &Attribute) -> Result<()> {
    let value = attr.value.as_str();
    let malformed = || Error::Rtpmap(format!("a={}", attr));

    let (payload, encoding) = value.split_once(' ').ok_or_else(malformed)?;
    let payload = payload.parse::<u8>().map_err(|_| malformed())?;

    let parts: Vec<&str> = encoding.split('/').collect();
    if parts.len() < 2 || parts.len() > 3 || parts[0].is_empty() {
        return Err(malformed());
    }
    let clock_rate = parts[1].parse::<u32>().map_err(|_| malformed())?;
    let channels = match parts.get(2) {
        Some(channels) => Some(channels.parse::<u16>().map_err(|_| malformed())?),
        None => None,
    };

    let format = format_mut(media, payload);
    format.codec = parts[0].to_owned();
    format.clock_rate = clock_rate;
    format.channels = channels;
    Ok(())
}

/// `a=fmtp:<format> <format specific parameters>`
fn fmtp(media: &mut Media, attr: &Attribute) -> Result<()> {
    let value = attr.value.as_str();
    let malformed = || Error::Fmtp(format!("a={}", attr));

    let (payload, params) = value.split_once(' ').ok_or_else(malformed)?;
    let payload = payload.parse::<u8>().map_err(|_| malformed())?;

    format_mut(media, payload).params.push(params.to_owned());
    Ok(())
}

/// `a=rtcp-fb:<payload type> <feedback>`. The wildcard payload `*` is not
/// bound to a single format and stays an opaque attribute.
fn rtcp_fb(media: &mut Media, value: &str) -> bool {
    let (payload, feedback) = match value.split_once(' ') {
        Some(split) => split,
        None => return false,
    };
    let payload = match payload.parse::<u8>() {
        Ok(payload) => payload,
        Err(_) => return false,
    };

    format_mut(media, payload).feedback.push(feedback.to_owned());
    true
}
