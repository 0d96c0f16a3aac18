// src/drivers/mod.rs
pub mod buffer;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod plot;
pub mod serial;
pub mod source;
pub use buffer::{SharedWindow, SlidingWindowBuffer, WindowColumns};
pub use error::{AcquisitionError, BufferError, DecodeError, PlotError};
pub use pipeline::{AcquisitionLoop, AcquisitionStats, StepOutcome};
pub use plot::{render_window_png, PlotStyle};
pub use serial::{open_serial, LineFrameSource};
pub use source::{FrameSource, ManualSource, SimulatedSource};
