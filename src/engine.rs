// src/engine.rs
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use anyhow::{Context, Result};
use log::{error, info};
use crate::config::AppConfig;
use crate::drivers::{
    open_serial, AcquisitionError, AcquisitionLoop, AcquisitionStats, FrameSource, SharedWindow,
    SimulatedSource,
};
use crate::gui;
use crate::types::SourceMode;
/// Read-only view of whether the acquisition thread is still alive.
#[derive(Clone, Debug)]
pub struct AcquisitionStatus {
    running: Arc<AtomicBool>,
}
impl AcquisitionStatus {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}
// Clears the running flag however the thread exits, panics included.
struct RunningGuard(Arc<AtomicBool>);
impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
pub struct AcquisitionHandle {
    stop: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
    thread: JoinHandle<Result<AcquisitionStats, AcquisitionError>>,
}
impl AcquisitionHandle {
    pub fn status(&self) -> AcquisitionStatus {
        AcquisitionStatus {
            running: Arc::clone(&self.running),
        }
    }
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }
    /// Requests a stop and waits for the thread. Returns within one transport
    /// read timeout.
    pub fn join(self) -> Result<AcquisitionStats, AcquisitionError> {
        self.request_stop();
        self.thread
            .join()
            .map_err(|_| AcquisitionError::Panicked)?
    }
}
/// Starts the acquisition loop on its own thread.
pub fn spawn_acquisition<S, W>(source: S, window: SharedWindow, trace_out: W) -> Result<AcquisitionHandle>
where
    S: FrameSource + Send + 'static,
    W: Write + Send + 'static,
{
    let stop = Arc::new(AtomicBool::new(false));
    let running = Arc::new(AtomicBool::new(true));
    let thread = {
        let stop = Arc::clone(&stop);
        let guard = RunningGuard(Arc::clone(&running));
        thread::Builder::new()
            .name("pyro-acquisition".to_owned())
            .spawn(move || {
                let _guard = guard;
                let mut acquisition = AcquisitionLoop::new(source, window, trace_out);
                let result = acquisition.run(&stop);
                match &result {
                    Ok(stats) => info!(
                        "acquisition stopped: {} reads, {} samples, {} discarded, {} empty, {} clock jumps",
                        stats.reads, stats.appended, stats.discarded, stats.empty_reads, stats.clock_jumps
                    ),
                    Err(e) => error!("acquisition aborted: {e}"),
                }
                result
            })
            .context("failed to spawn acquisition thread")?
    };
    Ok(AcquisitionHandle {
        stop,
        running,
        thread,
    })
}
fn open_source(config: &AppConfig) -> Result<Box<dyn FrameSource + Send>> {
    match config.source {
        SourceMode::Serial => {
            let source = open_serial(&config.serial)
                .with_context(|| format!("cannot read sensor on {}", config.serial.port_name))?;
            Ok(Box::new(source))
        }
        SourceMode::Simulation => {
            info!(
                "using simulated sensor, one frame every {:?}",
                config.simulation_interval()
            );
            Ok(Box::new(SimulatedSource::new(config.simulation_interval())))
        }
    }
}
/// Runs acquisition alongside the chart until the window closes, then shuts
/// the acquisition thread down. A transport failure surfaces as the error.
pub fn run(config: AppConfig) -> Result<()> {
    config.validate()?;
    let window = SharedWindow::with_capacity(config.window_capacity)?;
    let source = open_source(&config)?;
    let acquisition = spawn_acquisition(source, window.clone(), io::stdout())?;
    let gui_result = gui::run(&config, window, acquisition.status());
    let acquisition_result = acquisition.join();
    let stats = acquisition_result.context("sensor acquisition failed")?;
    gui_result?;
    info!("exiting after {} samples", stats.appended);
    Ok(())
}
