use std::io;
use thiserror::Error;
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("wrong frame length: expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },
}
#[derive(Debug, Error)]
pub enum BufferError {
    #[error("window capacity must be greater than zero")]
    ZeroCapacity,
}
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("failed to open serial port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },
    #[error("transport failure: {0}")]
    Transport(#[from] io::Error),
    #[error("acquisition thread panicked")]
    Panicked,
}
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("window has no samples to draw")]
    EmptyWindow,
    #[error("failed to render plot: {0}")]
    Render(String),
    #[error("failed to encode png: {0}")]
    Encode(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for PlotError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        PlotError::Render(format!("{value:?}"))
    }
}
impl From<image::ImageError> for PlotError {
    fn from(value: image::ImageError) -> Self {
        PlotError::Encode(value.to_string())
    }
}
