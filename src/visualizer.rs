// src/visualizer.rs
use std::time::{Duration, Instant};
use crate::drivers::{SharedWindow, WindowColumns};
/// Render-side view of the window: takes a snapshot at most once per interval
/// and keeps the latest one for redraws in between. Never writes to the window.
pub struct RenderLoop {
    window: SharedWindow,
    interval: Duration,
    last_snapshot: Option<Instant>,
    latest: WindowColumns,
    snapshots: u64,
}
impl RenderLoop {
    pub fn new(window: SharedWindow, interval: Duration) -> Self {
        Self {
            window,
            interval,
            last_snapshot: None,
            latest: WindowColumns::default(),
            snapshots: 0,
        }
    }
    /// Refreshes the snapshot when it is due. Returns true if it did.
    pub fn poll(&mut self, now: Instant) -> bool {
        let due = match self.last_snapshot {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if due {
            self.latest = self.window.columns();
            self.last_snapshot = Some(now);
            self.snapshots += 1;
        }
        due
    }
    /// Time left until the next snapshot is due.
    pub fn next_due(&self, now: Instant) -> Duration {
        match self.last_snapshot {
            None => Duration::ZERO,
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
        }
    }
    pub fn latest(&self) -> &WindowColumns {
        &self.latest
    }
    pub fn interval(&self) -> Duration {
        self.interval
    }
    pub fn snapshots(&self) -> u64 {
        self.snapshots
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn first_poll_always_snapshots() {
        let window = SharedWindow::with_capacity(4).unwrap();
        let mut render = RenderLoop::new(window, Duration::from_millis(250));
        let now = Instant::now();
        assert_eq!(render.next_due(now), Duration::ZERO);
        assert!(render.poll(now));
        assert!(render.latest().is_empty());
        assert_eq!(render.snapshots(), 1);
        assert_eq!(render.interval(), Duration::from_millis(250));
    }
    #[test]
    fn snapshots_only_on_the_fixed_period() {
        let window = SharedWindow::with_capacity(4).unwrap();
        let mut render = RenderLoop::new(window.clone(), Duration::from_millis(250));
        let start = Instant::now();
        render.poll(start);
        window.append(0, 10, 10);
        assert!(!render.poll(start + Duration::from_millis(100)));
        assert!(render.latest().is_empty());
        assert_eq!(
            render.next_due(start + Duration::from_millis(100)),
            Duration::from_millis(150)
        );
        assert!(render.poll(start + Duration::from_millis(250)));
        assert_eq!(render.latest().timestamps, vec![0]);
    }
    #[test]
    fn renders_exactly_what_is_present() {
        let window = SharedWindow::with_capacity(512).unwrap();
        window.append(0, 50, 40);
        window.append(5, 55, 42);
        let mut render = RenderLoop::new(window.clone(), Duration::from_millis(250));
        render.poll(Instant::now());
        let cols = render.latest();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols.instant_points(), vec![[0.0, 50.0], [5.0, 55.0]]);
        assert_eq!(cols.average_points(), vec![[0.0, 40.0], [5.0, 42.0]]);
        // reading never changes the window
        assert_eq!(window.len(), 2);
    }
}
