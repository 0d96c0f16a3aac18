use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use crate::drivers::BufferError;
use crate::types::Sample;
pub const DEFAULT_CAPACITY: usize = 512;
/// Column-wise copy of the window, ready to plot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WindowColumns {
    pub timestamps: Vec<u32>,
    pub instants: Vec<i16>,
    pub averages: Vec<i16>,
}
impl WindowColumns {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
    /// `[x, y]` pairs for the instantaneous trace.
    pub fn instant_points(&self) -> Vec<[f64; 2]> {
        pair_up(&self.timestamps, &self.instants)
    }
    /// `[x, y]` pairs for the average trace.
    pub fn average_points(&self) -> Vec<[f64; 2]> {
        pair_up(&self.timestamps, &self.averages)
    }
}
fn pair_up(xs: &[u32], ys: &[i16]) -> Vec<[f64; 2]> {
    xs.iter()
        .zip(ys)
        .map(|(&x, &y)| [f64::from(x), f64::from(y)])
        .collect()
}
/// Fixed-capacity FIFO window kept as three index-aligned columns.
///
/// Once full, every append drops the oldest entry of each column first.
#[derive(Debug)]
pub struct SlidingWindowBuffer {
    timestamps: VecDeque<u32>,
    instants: VecDeque<i16>,
    averages: VecDeque<i16>,
    capacity: usize,
}
impl SlidingWindowBuffer {
    pub fn new(capacity: usize) -> Result<Self, BufferError> {
        if capacity == 0 {
            return Err(BufferError::ZeroCapacity);
        }
        Ok(Self {
            timestamps: VecDeque::with_capacity(capacity),
            instants: VecDeque::with_capacity(capacity),
            averages: VecDeque::with_capacity(capacity),
            capacity,
        })
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
    pub fn append(&mut self, timestamp: u32, instant: i16, average: i16) {
        if self.timestamps.len() == self.capacity {
            self.timestamps.pop_front();
            self.instants.pop_front();
            self.averages.pop_front();
        }
        self.timestamps.push_back(timestamp);
        self.instants.push_back(instant);
        self.averages.push_back(average);
    }
    pub fn push(&mut self, sample: Sample) {
        self.append(
            sample.relative_timestamp,
            sample.instant_amplitude,
            sample.average_amplitude,
        );
    }
    /// Oldest first.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.timestamps
            .iter()
            .zip(&self.instants)
            .zip(&self.averages)
            .map(|((&t, &i), &a)| Sample::new(t, i, a))
            .collect()
    }
    pub fn columns(&self) -> WindowColumns {
        WindowColumns {
            timestamps: self.timestamps.iter().copied().collect(),
            instants: self.instants.iter().copied().collect(),
            averages: self.averages.iter().copied().collect(),
        }
    }
}
/// Handle shared between the acquisition thread (writer) and the render loop (reader).
///
/// Appends and snapshots both run under the same lock, so a reader always sees
/// whole appends with the three columns at equal length.
#[derive(Clone, Debug)]
pub struct SharedWindow {
    inner: Arc<Mutex<SlidingWindowBuffer>>,
}
impl SharedWindow {
    pub fn with_capacity(capacity: usize) -> Result<Self, BufferError> {
        Ok(Self {
            inner: Arc::new(Mutex::new(SlidingWindowBuffer::new(capacity)?)),
        })
    }
    // A panicking holder cannot leave a half-applied append behind: append does
    // not call anything that can panic between the pops and pushes.
    fn lock(&self) -> MutexGuard<'_, SlidingWindowBuffer> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
    pub fn append(&self, timestamp: u32, instant: i16, average: i16) {
        self.lock().append(timestamp, instant, average);
    }
    pub fn push(&self, sample: Sample) {
        self.lock().push(sample);
    }
    pub fn snapshot(&self) -> Vec<Sample> {
        self.lock().snapshot()
    }
    pub fn columns(&self) -> WindowColumns {
        self.lock().columns()
    }
    pub fn len(&self) -> usize {
        self.lock().len()
    }
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            SlidingWindowBuffer::new(0),
            Err(BufferError::ZeroCapacity)
        ));
    }
    #[test]
    fn fresh_buffer_snapshots_empty() {
        let buffer = SlidingWindowBuffer::new(DEFAULT_CAPACITY).unwrap();
        assert!(buffer.snapshot().is_empty());
        assert!(buffer.columns().is_empty());
        assert!(buffer.snapshot().is_empty());
    }
    #[test]
    fn evicts_oldest_when_full() {
        let mut buffer = SlidingWindowBuffer::new(2).unwrap();
        buffer.append(1, 1, 1);
        buffer.append(2, 2, 2);
        buffer.append(3, 3, 3);
        assert_eq!(
            buffer.snapshot(),
            vec![Sample::new(2, 2, 2), Sample::new(3, 3, 3)]
        );
    }
    #[test]
    fn push_matches_append_column_for_column() {
        let mut pushed = SlidingWindowBuffer::new(2).unwrap();
        let mut appended = SlidingWindowBuffer::new(2).unwrap();
        for n in 0..3u32 {
            pushed.push(Sample::new(n * 5, n as i16, -(n as i16)));
            appended.append(n * 5, n as i16, -(n as i16));
        }
        assert_eq!(pushed.columns(), appended.columns());
        assert_eq!(
            pushed.snapshot(),
            vec![Sample::new(5, 1, -1), Sample::new(10, 2, -2)]
        );
        let shared = SharedWindow::with_capacity(2).unwrap();
        shared.push(Sample::new(0, 50, 40));
        assert_eq!(shared.snapshot(), vec![Sample::new(0, 50, 40)]);
    }
    #[test]
    fn keeps_the_most_recent_capacity_samples() {
        let capacity = 16;
        let total = 53u32;
        let mut buffer = SlidingWindowBuffer::new(capacity).unwrap();
        for n in 1..=total {
            buffer.append(n, n as i16, -(n as i16));
        }
        let snapshot = buffer.snapshot();
        assert_eq!(snapshot.len(), capacity);
        // oldest retained is the (N - capacity + 1)-th appended sample
        assert_eq!(snapshot[0].relative_timestamp, total - capacity as u32 + 1);
        assert_eq!(snapshot[capacity - 1].relative_timestamp, total);
        assert!(snapshot
            .windows(2)
            .all(|w| w[0].relative_timestamp < w[1].relative_timestamp));
    }
    #[test]
    fn snapshot_does_not_alias_live_storage() {
        let mut buffer = SlidingWindowBuffer::new(4).unwrap();
        buffer.append(0, 5, 5);
        let before = buffer.snapshot();
        let columns = buffer.columns();
        buffer.append(1, 6, 6);
        assert_eq!(before, vec![Sample::new(0, 5, 5)]);
        assert_eq!(columns.len(), 1);
        assert_eq!(buffer.len(), 2);
    }
    #[test]
    fn columns_stay_aligned_at_every_length() {
        let mut buffer = SlidingWindowBuffer::new(3).unwrap();
        for n in 0..10u32 {
            let cols = buffer.columns();
            assert_eq!(cols.timestamps.len(), cols.instants.len());
            assert_eq!(cols.instants.len(), cols.averages.len());
            buffer.append(n, n as i16 * 2, n as i16 * 3);
        }
        let cols = buffer.columns();
        assert_eq!(cols.timestamps, vec![7, 8, 9]);
        assert_eq!(cols.instants, vec![14, 16, 18]);
        assert_eq!(cols.averages, vec![21, 24, 27]);
        assert_eq!(cols.instant_points()[0], [7.0, 14.0]);
        assert_eq!(cols.average_points()[2], [9.0, 27.0]);
    }
    #[test]
    fn concurrent_snapshots_never_see_torn_appends() {
        let window = SharedWindow::with_capacity(64).unwrap();
        let writer = {
            let window = window.clone();
            thread::spawn(move || {
                for n in 0..20_000u32 {
                    let v = (n % 1000) as i16;
                    window.append(n, v, v);
                }
            })
        };
        for _ in 0..2_000 {
            let cols = window.columns();
            assert_eq!(cols.timestamps.len(), cols.instants.len());
            assert_eq!(cols.instants.len(), cols.averages.len());
            assert!(cols.len() <= 64);
            for ((t, i), a) in cols.timestamps.iter().zip(&cols.instants).zip(&cols.averages) {
                assert_eq!((t % 1000) as i16, *i);
                assert_eq!(i, a);
            }
        }
        writer.join().unwrap();
        assert_eq!(window.len(), 64);
        assert_eq!(window.snapshot().last(), Some(&Sample::new(19_999, 999, 999)));
    }
}
