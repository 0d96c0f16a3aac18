use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};
use rand::Rng;
use crate::drivers::error::AcquisitionError;
use crate::drivers::frame;
use crate::types::RawSample;
/// Something that yields candidate frames on demand.
///
/// An empty vector means "nothing arrived before the read timed out". Vectors
/// of the wrong length are misframed input and get discarded by the caller.
/// `Err` is reserved for fatal transport failures.
pub trait FrameSource {
    fn read_frame(&mut self) -> Result<Vec<u8>, AcquisitionError>;
}
impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn read_frame(&mut self) -> Result<Vec<u8>, AcquisitionError> {
        (**self).read_frame()
    }
}
/// In-memory source useful for tests and deterministic playback.
/// Reports empty reads once the queue is drained.
pub struct ManualSource {
    queue: VecDeque<Vec<u8>>,
}
impl ManualSource {
    pub fn new(frames: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            queue: frames.into_iter().collect(),
        }
    }
}
impl FrameSource for ManualSource {
    fn read_frame(&mut self) -> Result<Vec<u8>, AcquisitionError> {
        Ok(self.queue.pop_front().unwrap_or_default())
    }
}
/// Synthetic PYD1588 bridge: a noisy sine on the instantaneous channel and its
/// moving average on the other, stamped with milliseconds since start.
pub struct SimulatedSource {
    started: Instant,
    interval: Duration,
    epoch_ms: u32,
    phase: f64,
    average: f64,
}
impl SimulatedSource {
    pub fn new(interval: Duration) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            started: Instant::now(),
            interval,
            // device clocks rarely start at zero
            epoch_ms: rng.gen_range(10_000..1_000_000),
            phase: 0.0,
            average: 0.0,
        }
    }
    fn next_sample(&mut self) -> RawSample {
        let mut rng = rand::thread_rng();
        self.phase += 0.05;
        let noise: f64 = rng.gen_range(-20.0..20.0);
        let instant = (self.phase.sin() * 250.0 + noise).round();
        self.average += (instant - self.average) * 0.1;
        let elapsed_ms = u32::try_from(self.started.elapsed().as_millis()).unwrap_or(u32::MAX);
        let mut sample = RawSample::new(
            self.epoch_ms.wrapping_add(elapsed_ms),
            instant as i16,
            self.average.round() as i16,
        );
        sample.reserved = *b"\r\n";
        sample
    }
}
impl FrameSource for SimulatedSource {
    fn read_frame(&mut self) -> Result<Vec<u8>, AcquisitionError> {
        thread::sleep(self.interval);
        Ok(frame::encode(&self.next_sample()).to_vec())
    }
}
