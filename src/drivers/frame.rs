//! PYD1588 bridge wire format.
//!
//! Every frame is exactly [`FRAME_LEN`] bytes, big-endian:
//!
//! | offset | len | field |
//! |---|---|---|
//! | 0 | 4 | device timestamp (u32) |
//! | 4 | 2 | instantaneous amplitude (i16) |
//! | 6 | 2 | average amplitude (i16) |
//! | 8 | 2 | reserved |
use crate::drivers::error::DecodeError;
use crate::types::RawSample;
pub const FRAME_LEN: usize = 10;
/// Decode one frame. Anything that is not exactly [`FRAME_LEN`] bytes is rejected.
pub fn decode(raw: &[u8]) -> Result<RawSample, DecodeError> {
    let frame: &[u8; FRAME_LEN] = raw.try_into().map_err(|_| DecodeError::WrongLength {
        expected: FRAME_LEN,
        actual: raw.len(),
    })?;
    Ok(RawSample {
        device_timestamp: u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]),
        instant_amplitude: i16::from_be_bytes([frame[4], frame[5]]),
        average_amplitude: i16::from_be_bytes([frame[6], frame[7]]),
        reserved: [frame[8], frame[9]],
    })
}
/// Inverse of [`decode`]; used by the simulated sensor.
pub fn encode(sample: &RawSample) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    frame[0..4].copy_from_slice(&sample.device_timestamp.to_be_bytes());
    frame[4..6].copy_from_slice(&sample.instant_amplitude.to_be_bytes());
    frame[6..8].copy_from_slice(&sample.average_amplitude.to_be_bytes());
    frame[8..10].copy_from_slice(&sample.reserved);
    frame
}
