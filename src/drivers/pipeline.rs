use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use log::{debug, trace, warn};
use crate::drivers::error::AcquisitionError;
use crate::drivers::frame;
use crate::drivers::source::FrameSource;
use crate::drivers::SharedWindow;
use crate::types::{RawSample, Sample};
/// What a single [`AcquisitionLoop::step`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The read timed out with no data.
    Empty,
    /// Bytes arrived but did not form a frame.
    Discarded,
    Appended(Sample),
}
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AcquisitionStats {
    pub reads: u64,
    pub empty_reads: u64,
    pub discarded: u64,
    pub appended: u64,
    /// Times the device clock stepped backwards (reset or wrap).
    pub clock_jumps: u64,
}
impl AcquisitionStats {
    fn record(&mut self, outcome: &StepOutcome) {
        self.reads += 1;
        match outcome {
            StepOutcome::Empty => self.empty_reads += 1,
            StepOutcome::Discarded => self.discarded += 1,
            StepOutcome::Appended(_) => self.appended += 1,
        }
    }
}
/// Reads frames from a source, puts them on the process-relative time axis and
/// appends them to the shared window. Sole writer of the window.
pub struct AcquisitionLoop<S: FrameSource, W: Write> {
    source: S,
    window: SharedWindow,
    trace_out: W,
    baseline: Option<u32>,
    last_device_timestamp: Option<u32>,
    stats: AcquisitionStats,
}
impl<S: FrameSource, W: Write> AcquisitionLoop<S, W> {
    pub fn new(source: S, window: SharedWindow, trace_out: W) -> Self {
        Self {
            source,
            window,
            trace_out,
            baseline: None,
            last_device_timestamp: None,
            stats: AcquisitionStats::default(),
        }
    }
    pub fn baseline(&self) -> Option<u32> {
        self.baseline
    }
    pub fn stats(&self) -> AcquisitionStats {
        self.stats
    }
    /// One read, one decode attempt, at most one append.
    pub fn step(&mut self) -> Result<StepOutcome, AcquisitionError> {
        let raw = self.source.read_frame()?;
        let outcome = self.ingest(&raw);
        self.stats.record(&outcome);
        Ok(outcome)
    }
    fn ingest(&mut self, raw: &[u8]) -> StepOutcome {
        if raw.is_empty() {
            return StepOutcome::Empty;
        }
        let decoded = match frame::decode(raw) {
            Ok(decoded) => decoded,
            Err(e) => {
                trace!("dropping frame: {e}");
                return StepOutcome::Discarded;
            }
        };
        // stdout going away must not stop acquisition
        if let Err(e) = writeln!(self.trace_out, "{}", decoded.trace_line()) {
            debug!("trace output failed: {e}");
        }
        let sample = self.normalise(&decoded);
        self.window.push(sample);
        StepOutcome::Appended(sample)
    }
    /// Relative time is taken modulo 2^32, so a single wrap of the device
    /// counter keeps the axis continuous. A reset shows up as one jump.
    fn normalise(&mut self, decoded: &RawSample) -> Sample {
        let baseline = *self.baseline.get_or_insert_with(|| {
            debug!("baseline set to {}", decoded.device_timestamp);
            decoded.device_timestamp
        });
        if let Some(last) = self.last_device_timestamp {
            if decoded.device_timestamp < last {
                self.stats.clock_jumps += 1;
                warn!(
                    "device clock went from {} back to {}; counter reset or wrapped",
                    last, decoded.device_timestamp
                );
            }
        }
        self.last_device_timestamp = Some(decoded.device_timestamp);
        Sample::new(
            decoded.device_timestamp.wrapping_sub(baseline),
            decoded.instant_amplitude,
            decoded.average_amplitude,
        )
    }
    /// Steps until `stop` is raised or the transport fails.
    ///
    /// `stop` is checked after every read attempt, so the loop exits within one
    /// transport timeout of the request.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<AcquisitionStats, AcquisitionError> {
        while !stop.load(Ordering::Acquire) {
            self.step()?;
        }
        Ok(self.stats)
    }
}
