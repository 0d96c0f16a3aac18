// src/gui.rs
use std::fs;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use anyhow::{anyhow, Context, Result};
use eframe::egui;
use egui::Color32;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use log::{error, info, warn};
use crate::config::{AppConfig, DisplayConfig};
use crate::drivers::{render_window_png, PlotStyle, SharedWindow};
use crate::engine::AcquisitionStatus;
use crate::visualizer::RenderLoop;
const INSTANT_COLOR: Color32 = Color32::from_rgb(197, 201, 199);
const AVERAGE_COLOR: Color32 = Color32::from_rgb(255, 127, 14);
pub struct PyroReaderApp {
    render: RenderLoop,
    display: DisplayConfig,
    capacity: usize,
    acquisition: AcquisitionStatus,
    close_requested: bool,
    export_message: Option<String>,
}
impl PyroReaderApp {
    pub fn new(window: SharedWindow, display: DisplayConfig, acquisition: AcquisitionStatus) -> Self {
        let capacity = window.capacity();
        Self {
            render: RenderLoop::new(window, display.refresh_interval()),
            display,
            capacity,
            acquisition,
            close_requested: false,
            export_message: None,
        }
    }
    fn export_png(&mut self) {
        let style = PlotStyle {
            title: self.display.title.clone(),
            y_range: self.display.y_range as f32,
            ..PlotStyle::default()
        };
        let result = render_window_png(self.render.latest(), &style)
            .map_err(anyhow::Error::from)
            .and_then(|png| {
                let secs = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map_or(0, |d| d.as_secs());
                let name = format!("pyd1588_window_{secs}.png");
                fs::write(&name, png).with_context(|| format!("cannot write {name}"))?;
                Ok(name)
            });
        self.export_message = Some(match result {
            Ok(name) => {
                info!("saved window to {name}");
                format!("Saved {name}")
            }
            Err(e) => {
                warn!("png export failed: {e:#}");
                format!("Export failed: {e}")
            }
        });
    }
}
impl eframe::App for PyroReaderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // 1. snapshot on the fixed period
        self.render.poll(Instant::now());
        // 2. acquisition died on its own: close so the coordinator can report it
        let running = self.acquisition.is_running();
        if !running && !self.close_requested {
            error!("acquisition stopped, closing the chart");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            self.close_requested = true;
        }
        // 3. draw
        let mut export_clicked = false;
        let columns = self.render.latest();
        egui::TopBottomPanel::top("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.display.title.as_str());
                ui.separator();
                ui.label(format!("{} / {} samples", columns.len(), self.capacity));
                ui.label(format!("refresh {} ms", self.render.interval().as_millis()));
                ui.separator();
                if running {
                    ui.label(egui::RichText::new("acquiring").color(Color32::LIGHT_GREEN));
                } else {
                    ui.label(egui::RichText::new("stopped").color(Color32::RED));
                }
                ui.separator();
                if ui
                    .add_enabled(!columns.is_empty(), egui::Button::new("Save PNG"))
                    .clicked()
                {
                    export_clicked = true;
                }
                if let Some(msg) = &self.export_message {
                    ui.label(msg.as_str());
                }
            });
        });
        let y_range = self.display.y_range;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label("Instant/Average Amplitude");
            Plot::new("pyd1588_plot")
                .legend(Legend::default())
                .include_y(-y_range)
                .include_y(y_range)
                .auto_bounds_x()
                .show(ui, |plot_ui| {
                    plot_ui.line(
                        Line::new(PlotPoints::new(columns.instant_points()))
                            .name("Instant")
                            .color(INSTANT_COLOR),
                    );
                    plot_ui.line(
                        Line::new(PlotPoints::new(columns.average_points()))
                            .name("Average")
                            .color(AVERAGE_COLOR),
                    );
                });
        });
        if export_clicked {
            self.export_png();
        }
        ctx.request_repaint_after(self.render.next_due(Instant::now()));
    }
}
/// Blocks on the GUI event loop until the window is closed.
pub fn run(config: &AppConfig, window: SharedWindow, acquisition: AcquisitionStatus) -> Result<()> {
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1000.0, 600.0])
        .with_min_inner_size([480.0, 320.0])
        .with_title(config.display.title.as_str());
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let display = config.display.clone();
    eframe::run_native(
        "pyro-reader",
        options,
        Box::new(move |_cc| Box::new(PyroReaderApp::new(window, display, acquisition))),
    )
    .map_err(|e| anyhow!("chart window failed: {e}"))
}
