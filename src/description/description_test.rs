use std::time::{Duration, UNIX_EPOCH};

use url::Url;

use super::common::*;
use super::media::*;
use super::session::*;
use crate::direction::Direction;
use crate::error::{Error, Result};
use crate::util::NTP_UNIX_OFFSET;

const CANONICAL_SDP: &str = "v=0\r\n\
o=jdoe 2890844526 2890842807 IN IP4 10.47.16.5\r\n\
s=SDP Seminar\r\n\
i=A Seminar on the session description protocol\r\n\
u=http://www.example.com/seminars/sdp.pdf\r\n\
e=j.doe@example.com (Jane Doe)\r\n\
p=+1 617 555-6011\r\n\
c=IN IP4 224.2.17.12/127\r\n\
b=X-YZ:128\r\n\
b=AS:12345\r\n\
t=2873397496 2873404696\r\n\
r=7d 1h 0 25h\r\n\
z=2882844526 -1h 2898848070 0\r\n\
k=prompt\r\n\
a=recvonly\r\n\
a=candidate:0 1 UDP 2113667327 203.0.113.1 54400 typ host\r\n\
m=audio 49170 RTP/AVP 0\r\n\
i=Vivamus a posuere nisl\r\n\
c=IN IP4 203.0.113.1\r\n\
b=X-YZ:128\r\n\
k=prompt\r\n\
a=sendrecv\r\n\
m=video 51372 RTP/AVP 99\r\n\
a=rtpmap:99 h263-1998/90000\r\n";

const WEBRTC_SDP: &str = "v=0\r\n\
o=- 4596489990601351948 2 IN IP4 127.0.0.1\r\n\
s=-\r\n\
t=0 0\r\n\
a=group:BUNDLE 0 1\r\n\
a=msid-semantic: WMS stream\r\n\
a=ice-lite\r\n\
m=audio 9 UDP/TLS/RTP/SAVPF 0 111\r\n\
c=IN IP4 0.0.0.0\r\n\
a=rtcp:9 IN IP4 0.0.0.0\r\n\
a=rtcp-mux\r\n\
a=mid:0\r\n\
a=rtpmap:111 opus/48000/2\r\n\
a=rtcp-fb:111 transport-cc\r\n\
a=fmtp:111 minptime=10;useinbandfec=1\r\n\
a=sendrecv\r\n\
a=setup:actpass\r\n\
a=fingerprint:sha-256 19:E2:1C:3B\r\n\
a=ice-ufrag:ETEn\r\n\
a=candidate:1 1 udp 2130706431 192.0.2.1 50000 typ host\r\n\
m=application 9 UDP/DTLS/SCTP webrtc-datachannel\r\n\
c=IN IP4 0.0.0.0\r\n\
a=mid:1\r\n\
a=setup:actpass\r\n\
a=sctp-port:5000\r\n";

#[test]
fn test_round_trip() -> Result<()> {
    let tests = vec![
        ("Canonical", CANONICAL_SDP, None),
        ("WebRTC", WEBRTC_SDP, None),
        (
            "LFOnly",
            "v=0\no=- 1 1 IN IP4 0.0.0.0\ns=-\nt=0 0\n",
            Some("v=0\r\no=- 1 1 IN IP4 0.0.0.0\r\ns=-\r\nt=0 0\r\n"),
        ),
        (
            "NoFinalTerminator",
            "v=0\r\ns=-\r\nt=0 0",
            Some("v=0\r\ns=-\r\nt=0 0\r\n"),
        ),
        (
            "RawDurations",
            "v=0\r\ns=-\r\nt=0 0\r\nr=604800 3600 0 90000\r\nz=2882844526 -3600 2898848070 0\r\n",
            Some("v=0\r\ns=-\r\nt=0 0\r\nr=7d 1h 0 25h\r\nz=2882844526 -1h 2898848070 0\r\n"),
        ),
        (
            "MultipleTimings",
            "v=0\r\ns=-\r\nt=2873397496 2873404696\r\nt=3034423619 3042462419\r\n",
            Some("v=0\r\ns=-\r\nt=3034423619 3042462419\r\n"),
        ),
        (
            "DirectionBeforeAttributes",
            "v=0\r\ns=-\r\nt=0 0\r\na=tool:x\r\na=inactive\r\n",
            Some("v=0\r\ns=-\r\nt=0 0\r\na=inactive\r\na=tool:x\r\n"),
        ),
        (
            "FormatsAfterMediaFields",
            "v=0\r\ns=-\r\nt=0 0\r\n\
m=video 51372 RTP/AVP 99 31\r\n\
a=sendrecv\r\n\
a=fmtp:99 profile=3\r\n\
a=rtpmap:99 h263-1998/90000\r\n\
a=mid:v\r\n",
            Some(
                "v=0\r\ns=-\r\nt=0 0\r\n\
m=video 51372 RTP/AVP 31 99\r\n\
a=mid:v\r\n\
a=rtpmap:99 h263-1998/90000\r\n\
a=fmtp:99 profile=3\r\n\
a=sendrecv\r\n",
            ),
        ),
        (
            "MulticastConnection",
            "v=0\r\ns=-\r\nc=IN IP4 224.2.1.1/127/3\r\nt=0 0\r\n\
m=audio 9 RTP/AVP 0\r\nc=IN IP6 FF15::101/3\r\n",
            None,
        ),
    ];

    for (name, sdp, expected) in tests {
        let desc = Description::parse(sdp)?;
        assert_eq!(desc.marshal(), expected.unwrap_or(sdp), "{name}\n{sdp}");
    }

    Ok(())
}

#[test]
fn test_re_encode_is_stable() -> Result<()> {
    for sdp in [CANONICAL_SDP, WEBRTC_SDP] {
        let desc = Description::parse(sdp)?;
        let again = Description::parse(&desc.marshal())?;
        assert_eq!(desc, again);
    }
    Ok(())
}

#[test]
fn test_unmarshal_canonical() -> Result<()> {
    let desc = Description::parse(CANONICAL_SDP)?;

    assert_eq!(desc.session_name, "SDP Seminar");
    assert_eq!(desc.phones, vec!["+1 617 555-6011"]);
    assert_eq!(desc.bandwidth.get("AS"), Some(&12345));
    assert_eq!(desc.mode, Direction::RecvOnly);
    assert_eq!(desc.attributes.len(), 1);
    assert!(desc.attributes[0].is_ice_candidate());

    let audio = &desc.media[0];
    assert_eq!(audio.information.as_deref(), Some("Vivamus a posuere nisl"));
    assert_eq!(audio.key, Some(Key::new("prompt", "")));
    assert_eq!(audio.mode, Direction::SendRecv);

    let video = &desc.media[1];
    assert_eq!(
        video.format(99),
        Some(&Format::new(99, "h263-1998", 90000))
    );
    assert_eq!(video.format_by_codec("H263-1998").map(|f| f.payload), Some(99));

    Ok(())
}

#[test]
fn test_unmarshal_webrtc() -> Result<()> {
    let desc: Description = WEBRTC_SDP.parse()?;

    assert_eq!(desc.origin.as_ref().map(|o| o.session_version), Some(2));
    assert_eq!(desc.groups[0].media, vec!["0", "1"]);
    assert_eq!(
        desc.msid_semantic.as_ref().map(|m| m.semantics.as_str()),
        Some(SEMANTIC_TOKEN_WEBRTC_MEDIA_STREAMS)
    );
    assert!(desc.has_attribute("ice-lite"));

    let audio = desc.media_by_id("0").map(|m| m.payloads());
    assert_eq!(audio, Some(vec![0, 111]));

    let app = desc.media_by_id("1");
    assert_eq!(
        app.map(|m| m.format_description.as_str()),
        Some("webrtc-datachannel")
    );
    assert_eq!(app.and_then(|m| m.attribute("sctp-port")), Some("5000"));

    Ok(())
}

#[test]
fn test_conversions() -> Result<()> {
    let desc = Description::try_from(WEBRTC_SDP)?;
    assert_eq!(desc, Description::try_from(WEBRTC_SDP.to_owned())?);
    assert_eq!(desc.to_string(), WEBRTC_SDP);
    assert_eq!(desc.to_text(), WEBRTC_SDP.as_bytes());
    assert_eq!(String::from(desc), WEBRTC_SDP);

    assert_eq!(
        "v=0\r\nx=1\r\n".parse::<Description>(),
        Err(Error::UnknownType {
            tag: 'x',
            line: "x=1".to_owned(),
        })
    );
    Ok(())
}

#[test]
fn test_url() -> Result<()> {
    let desc = Description::parse(CANONICAL_SDP)?;
    assert_eq!(
        desc.url()?,
        Some(Url::parse("http://www.example.com/seminars/sdp.pdf")?)
    );

    assert_eq!(Description::default().url()?, None);

    let desc = Description {
        uri: Some("not a url".to_owned()),
        ..Default::default()
    };
    assert!(matches!(desc.url(), Err(Error::ParseUrl(_))));
    Ok(())
}

#[test]
fn test_origin() {
    let mut origin = Origin::new("alice", "192.0.2.1");
    assert!(origin.session_id >= 0);
    assert_eq!(origin.session_version, 1);
    assert_eq!(origin.network_type, NETWORK_INTERNET);
    assert_eq!(origin.address_type, ADDRESS_TYPE_IP4);

    origin.bump_version();
    assert_eq!(origin.session_version, 2);

    origin.session_version = i64::MAX;
    origin.bump_version();
    assert_eq!(origin.session_version, i64::MIN);
}

#[test]
fn test_timing() {
    assert!(Timing::default().is_permanent());
    assert_eq!(Timing::default().start_time(), None);

    let timing = Timing::new(NTP_UNIX_OFFSET + 60, 0);
    assert!(!timing.is_permanent());
    assert_eq!(
        timing.start_time(),
        Some(UNIX_EPOCH + Duration::from_secs(60))
    );
    assert_eq!(timing.stop_time(), None);
}

#[test]
fn test_builders() {
    let desc = Description::default()
        .with_origin(Origin::new("-", "127.0.0.1"))
        .with_connection(Connection::new("192.0.2.1"))
        .with_mode(Direction::SendOnly)
        .with_group(SEMANTIC_TOKEN_BUNDLE, vec!["a".to_owned()])
        .with_fingerprint("sha-256", "00:11")
        .with_property_attribute("ice-lite")
        .with_value_attribute("tool", "sdp-codec")
        .with_media(Media::new("audio", 9, "RTP/AVP").with_id("a"));

    assert_eq!(desc.attribute("ice-lite"), Some(""));
    assert_eq!(desc.attribute("tool"), Some("sdp-codec"));
    assert_eq!(desc.attribute("missing"), None);
    assert!(desc.media_by_id("a").is_some());
    assert!(desc.media_by_id("b").is_none());
    assert_eq!(desc.fingerprint, Some(Fingerprint::new("sha-256", "00:11")));
    assert_eq!(desc.mode, Direction::SendOnly);
    assert_eq!(
        desc.connection.as_ref().map(|c| c.address.as_str()),
        Some("192.0.2.1")
    );
}
