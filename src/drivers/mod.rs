// Ingestion and rendering core: source -> parser -> registry -> history -> chart.
pub mod buffer;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod plot;
pub mod registry;
pub mod source;
pub use buffer::{ChartFrame, HistoryStore};
pub use error::PlotError;
pub use pipeline::{PlotContext, RenderCycle};
pub use plot::{write_frame_png, PlotStyle};
pub use registry::ChannelRegistry;
pub use source::{LineSource, SerialSource, TcpSource};
