// src/types.rs
use serde::{Deserialize, Serialize};

// Where frames come from
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    #[default]
    Serial,
    Simulation,
}

/// One frame as decoded from the wire, before baseline normalisation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawSample {
    pub device_timestamp: u32,
    pub instant_amplitude: i16,
    pub average_amplitude: i16,
    /// Bytes 8..10 of the frame, carried through uninterpreted.
    pub reserved: [u8; 2],
}

impl RawSample {
    pub fn new(device_timestamp: u32, instant_amplitude: i16, average_amplitude: i16) -> Self {
        Self {
            device_timestamp,
            instant_amplitude,
            average_amplitude,
            reserved: [0; 2],
        }
    }

    // Stdout trace format: [<device_timestamp>: <instant>; <average>]
    pub fn trace_line(&self) -> String {
        format!(
            "[{}: {}; {}]",
            self.device_timestamp, self.instant_amplitude, self.average_amplitude
        )
    }
}

/// A reading placed on the process-relative time axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sample {
    pub relative_timestamp: u32,
    pub instant_amplitude: i16,
    pub average_amplitude: i16,
}

impl Sample {
    pub fn new(relative_timestamp: u32, instant_amplitude: i16, average_amplitude: i16) -> Self {
        Self {
            relative_timestamp,
            instant_amplitude,
            average_amplitude,
        }
    }
}
