//! Wire format for the peer data exchange.
//!
//! Outbound frames (except the request, see below) carry an explicit envelope so
//! receivers never have to guess a payload's type from its size:
//!
//! ```text
//! [version: u8][type: u8][payload length: u16 LE][payload]
//! ```
//!
//! Unmodified sensor boards predate the envelope and push bare structs, so
//! decoding falls back to the legacy contract when a datagram is not an
//! envelope: dispatch purely on payload length. 1 byte (`0xAA`) is a snapshot
//! request, 16 bytes a measurement snapshot, 28 bytes a board sample triplet;
//! anything else is an error. Length dispatch is deterministic, never heuristic.
//! Requests are sent in the legacy single-byte form so legacy boards understand
//! them.
//!
//! All multi-byte fields are little-endian. The board sample is packed
//! (`u32 id + 3×f64`), not a struct memcpy, so the layout does not depend on any
//! platform's padding rules.

use crate::error::{HubError, Result};
use crate::vitals::data::{BoardId, BoardSample, RemoteSnapshot};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Envelope protocol version.
pub const PROTOCOL_VERSION: u8 = 1;
/// Single-byte snapshot request command, shared with the legacy contract.
pub const REQUEST_CMD: u8 = 0xAA;
/// Wire size of a bare [`RemoteSnapshot`]: three `f32` plus one `u32`.
pub const SNAPSHOT_WIRE_LEN: usize = 16;
/// Wire size of a bare [`BoardSample`]: `u32` id plus three `f64`.
pub const SAMPLE_WIRE_LEN: usize = 28;

const HEADER_LEN: usize = 4;
const TYPE_SAMPLE: u8 = 0x01;
const TYPE_SNAPSHOT: u8 = 0x02;
const TYPE_REQUEST: u8 = REQUEST_CMD;

/// A decoded datagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frame {
    /// Legacy push of one board's raw triplet
    Sample(BoardSample),
    /// Response from the remote measurement board
    Snapshot(RemoteSnapshot),
    /// Request for a fresh measurement snapshot
    Request,
}

/// Encode a frame with the envelope header.
pub fn encode(frame: &Frame) -> Bytes {
    let (frame_type, payload) = match frame {
        Frame::Sample(sample) => (TYPE_SAMPLE, encode_sample(sample)),
        Frame::Snapshot(snapshot) => (TYPE_SNAPSHOT, encode_snapshot(snapshot)),
        Frame::Request => (TYPE_REQUEST, Bytes::new()),
    };

    let mut buf = BytesMut::with_capacity(HEADER_LEN + payload.len());
    buf.put_u8(PROTOCOL_VERSION);
    buf.put_u8(frame_type);
    buf.put_u16_le(payload.len() as u16);
    buf.put_slice(&payload);
    buf.freeze()
}

/// Encode a snapshot request in the legacy single-byte form.
pub fn encode_legacy_request() -> Bytes {
    Bytes::from_static(&[REQUEST_CMD])
}

/// Decode one datagram: envelope first, legacy length dispatch otherwise.
pub fn decode(datagram: &[u8]) -> Result<Frame> {
    if let Some(frame) = decode_envelope(datagram)? {
        return Ok(frame);
    }
    decode_legacy(datagram)
}

fn decode_envelope(datagram: &[u8]) -> Result<Option<Frame>> {
    if datagram.len() < HEADER_LEN || datagram[0] != PROTOCOL_VERSION {
        return Ok(None);
    }
    let frame_type = datagram[1];
    let payload_len = u16::from_le_bytes([datagram[2], datagram[3]]) as usize;
    if datagram.len() != HEADER_LEN + payload_len {
        return Ok(None);
    }
    let payload = &datagram[HEADER_LEN..];

    match frame_type {
        TYPE_SAMPLE => decode_sample(payload).map(Frame::Sample).map(Some),
        TYPE_SNAPSHOT => decode_snapshot(payload).map(Frame::Snapshot).map(Some),
        TYPE_REQUEST if payload_len == 0 => Ok(Some(Frame::Request)),
        _ => Ok(None),
    }
}

fn decode_legacy(datagram: &[u8]) -> Result<Frame> {
    match datagram.len() {
        1 if datagram[0] == REQUEST_CMD => Ok(Frame::Request),
        SNAPSHOT_WIRE_LEN => decode_snapshot(datagram).map(Frame::Snapshot),
        SAMPLE_WIRE_LEN => decode_sample(datagram).map(Frame::Sample),
        other => Err(HubError::codec_error(format!(
            "unrecognized datagram length: {} bytes",
            other
        ))),
    }
}

fn encode_sample(sample: &BoardSample) -> Bytes {
    let mut buf = BytesMut::with_capacity(SAMPLE_WIRE_LEN);
    buf.put_u32_le(sample.board.wire_id());
    buf.put_f64_le(sample.a);
    buf.put_f64_le(sample.b);
    buf.put_f64_le(sample.c);
    buf.freeze()
}

fn decode_sample(payload: &[u8]) -> Result<BoardSample> {
    if payload.len() != SAMPLE_WIRE_LEN {
        return Err(HubError::codec_error(format!(
            "board sample payload must be {} bytes, got {}",
            SAMPLE_WIRE_LEN,
            payload.len()
        )));
    }
    let mut buf = payload;
    let board = BoardId::try_from(buf.get_u32_le())?;
    Ok(BoardSample {
        board,
        a: buf.get_f64_le(),
        b: buf.get_f64_le(),
        c: buf.get_f64_le(),
    })
}

fn encode_snapshot(snapshot: &RemoteSnapshot) -> Bytes {
    let mut buf = BytesMut::with_capacity(SNAPSHOT_WIRE_LEN);
    buf.put_f32_le(snapshot.weight_kg);
    buf.put_f32_le(snapshot.height_cm);
    buf.put_f32_le(snapshot.bmi);
    buf.put_u32_le(snapshot.timestamp);
    buf.freeze()
}

fn decode_snapshot(payload: &[u8]) -> Result<RemoteSnapshot> {
    if payload.len() != SNAPSHOT_WIRE_LEN {
        return Err(HubError::codec_error(format!(
            "measurement snapshot payload must be {} bytes, got {}",
            SNAPSHOT_WIRE_LEN,
            payload.len()
        )));
    }
    let mut buf = payload;
    Ok(RemoteSnapshot {
        weight_kg: buf.get_f32_le(),
        height_cm: buf.get_f32_le(),
        bmi: buf.get_f32_le(),
        timestamp: buf.get_u32_le(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BoardSample {
        BoardSample {
            board: BoardId::Thermal,
            a: 36.6,
            b: 24.5,
            c: 0.0,
        }
    }

    fn snapshot() -> RemoteSnapshot {
        RemoteSnapshot {
            weight_kg: 70.0,
            height_cm: 175.0,
            bmi: 22.86,
            timestamp: 12345,
        }
    }

    #[test]
    fn test_envelope_round_trips() {
        assert_eq!(
            decode(&encode(&Frame::Sample(sample()))).unwrap(),
            Frame::Sample(sample())
        );
        assert_eq!(
            decode(&encode(&Frame::Snapshot(snapshot()))).unwrap(),
            Frame::Snapshot(snapshot())
        );
        assert_eq!(decode(&encode(&Frame::Request)).unwrap(), Frame::Request);
    }

    #[test]
    fn test_legacy_request_byte() {
        assert_eq!(decode(&[REQUEST_CMD]).unwrap(), Frame::Request);
        assert_eq!(decode(&encode_legacy_request()).unwrap(), Frame::Request);
    }

    #[test]
    fn test_legacy_snapshot_by_length() {
        let mut wire = BytesMut::new();
        wire.put_f32_le(70.0);
        wire.put_f32_le(175.0);
        wire.put_f32_le(22.86);
        wire.put_u32_le(12345);
        assert_eq!(wire.len(), SNAPSHOT_WIRE_LEN);

        match decode(&wire).unwrap() {
            Frame::Snapshot(s) => {
                assert_eq!(s.weight_kg, 70.0);
                assert_eq!(s.height_cm, 175.0);
                assert_eq!(s.timestamp, 12345);
            }
            other => panic!("expected snapshot, got {:?}", other),
        }
    }

    #[test]
    fn test_legacy_sample_by_length() {
        let mut wire = BytesMut::new();
        wire.put_u32_le(3);
        wire.put_f64_le(0.30);
        wire.put_f64_le(0.31);
        wire.put_f64_le(0.42);
        assert_eq!(wire.len(), SAMPLE_WIRE_LEN);

        match decode(&wire).unwrap() {
            Frame::Sample(s) => {
                assert_eq!(s.board, BoardId::Ranging);
                assert_eq!(s.a, 0.30);
            }
            other => panic!("expected sample, got {:?}", other),
        }
    }

    #[test]
    fn test_snapshot_length_dispatch_is_deterministic() {
        // 16 bytes whose leading word looks exactly like a board-sample id must
        // still decode as a snapshot; only the length decides.
        let mut wire = BytesMut::new();
        wire.put_u32_le(2);
        wire.put_f32_le(1.0);
        wire.put_f32_le(2.0);
        wire.put_u32_le(3);
        assert_eq!(wire.len(), SNAPSHOT_WIRE_LEN);
        assert!(matches!(decode(&wire).unwrap(), Frame::Snapshot(_)));
    }

    #[test]
    fn test_out_of_range_board_id_is_rejected() {
        let mut wire = BytesMut::new();
        wire.put_u32_le(4);
        wire.put_f64_le(1.0);
        wire.put_f64_le(2.0);
        wire.put_f64_le(3.0);

        match decode(&wire) {
            Err(HubError::InvalidBoardId(4)) => {}
            other => panic!("expected InvalidBoardId(4), got {:?}", other),
        }
    }

    #[test]
    fn test_unrecognized_length_is_an_error() {
        assert!(matches!(decode(&[0u8; 7]), Err(HubError::Codec(_))));
        assert!(matches!(decode(&[]), Err(HubError::Codec(_))));
        assert!(matches!(decode(&[0x55]), Err(HubError::Codec(_))));
    }

    #[test]
    fn test_truncated_envelope_falls_back_to_legacy_rules() {
        // Envelope header claiming more payload than present is not an envelope;
        // at 5 bytes it matches no legacy size either.
        let wire = [PROTOCOL_VERSION, TYPE_SNAPSHOT, 16, 0, 0];
        assert!(matches!(decode(&wire), Err(HubError::Codec(_))));
    }
}
