use crate::sse::models::Message;
use axum::body::Bytes;

pub const CONTENT_TYPE: &str = "text/event-stream";

/// Frames a message as `event: <name>\ndata: <payload>\n\n`.
///
/// No escaping is performed: callers must not put line breaks in either the
/// event name or the payload.
pub fn encode(message: &Message) -> Bytes {
    encode_parts(message.event(), message.payload())
}

pub fn encode_parts(event: &str, payload: &[u8]) -> Bytes {
    let mut buf = Vec::with_capacity(event.len() + payload.len() + 16);
    buf.extend_from_slice(b"event: ");
    buf.extend_from_slice(event.as_bytes());
    buf.push(b'\n');
    buf.extend_from_slice(b"data: ");
    buf.extend_from_slice(payload);
    buf.extend_from_slice(b"\n\n");
    Bytes::from(buf)
}

/// True when the value can be framed without breaking the line protocol.
pub fn is_single_line(value: &[u8]) -> bool {
    !value.iter().any(|b| *b == b'\n' || *b == b'\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_event_and_data() {
        let message = Message::new("greet", "hi");
        assert_eq!(&encode(&message)[..], b"event: greet\ndata: hi\n\n");
    }

    #[test]
    fn empty_payload_still_terminates_frame() {
        assert_eq!(&encode_parts("ping", b"")[..], b"event: ping\ndata: \n\n");
    }

    #[test]
    fn payload_bytes_are_copied_verbatim() {
        let frame = encode_parts("message", "{\"a\": \"é\"}".as_bytes());
        assert!(frame.ends_with("data: {\"a\": \"é\"}\n\n".as_bytes()));
    }

    #[test]
    fn detects_line_breaks() {
        assert!(is_single_line(b"plain text"));
        assert!(!is_single_line(b"two\nlines"));
        assert!(!is_single_line(b"carriage\rreturn"));
    }
}
