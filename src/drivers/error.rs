use std::io;
use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("no serial port configured; pass --port or set monitor_port in platformio.ini")]
    UnresolvedPort,
    #[error("plot width must be between 1 and {}", crate::types::MAX_WIDTH)]
    InvalidWidth,
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value {value:?} for {key} in {path}")]
    ProjectValue {
        path: PathBuf,
        key: &'static str,
        value: String,
    },
    #[error("failed to open serial port {port}: {source}")]
    SerialOpen {
        port: String,
        #[source]
        source: serialport::Error,
    },
    #[error("failed to listen on tcp://localhost:{port}: {source}")]
    TcpBind {
        port: u16,
        #[source]
        source: io::Error,
    },
    #[error("input source disconnected")]
    Disconnected,
    #[error("transport read failed: {0}")]
    Io(#[from] io::Error),
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for PlotError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        PlotError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for PlotError {
    fn from(value: image::ImageError) -> Self {
        PlotError::Plot(value.to_string())
    }
}
