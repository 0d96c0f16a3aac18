//! Live reader for a PYD1588 pyroelectric sensor bridge.
//!
//! A background thread decodes 10-byte frames from the serial port into a
//! bounded sliding window; the GUI snapshots that window on a fixed period and
//! charts it.
pub mod config;
pub mod drivers;
pub mod engine;
pub mod gui;
pub mod types;
pub mod visualizer;
