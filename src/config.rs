// src/config.rs
// Layers command line, plotcfg.json and PlatformIO values into a RunConfig.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

use crate::drivers::PlotError;
use crate::platformio::ProjectConfig;
use crate::types::*;

pub const CONFIG_FILE: &str = "plotcfg.json";

/// Plot whitespace-separated numbers streamed from a serial port or a TCP socket.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    /// Plotter width (number of samples kept per channel)
    #[arg(short, long)]
    pub width: Option<usize>,

    /// Plotter title
    #[arg(short, long)]
    pub title: Option<String>,

    /// TCP socket port number; selects TCP input instead of serial
    #[arg(short, long)]
    pub socket: Option<u16>,

    /// Serial port device name
    #[arg(short, long)]
    pub port: Option<String>,

    /// Serial baud rate (default 115200)
    #[arg(short, long)]
    pub baud: Option<u32>,

    /// Plot configuration file
    #[arg(long, value_name = "PATH", default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Directory searched for platformio.ini
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Render to this PNG file instead of opening a window
    #[arg(long, value_name = "PNG")]
    pub headless: Option<PathBuf>,

    /// Redraw period in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    pub interval_ms: u64,

    /// Channel labels, in column order
    pub labels: Vec<String>,
}

/// Contents of `plotcfg.json`. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub title: Option<String>,
    pub width: Option<usize>,
    pub label: Option<Vec<String>>,
}

impl Cli {
    /// Port 0 counts as "not given", leaving serial input selected.
    pub fn tcp_port(&self) -> Option<u16> {
        self.socket.filter(|port| *port != 0)
    }
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Option<Self>, PlotError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("no config file at {}", path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(PlotError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = serde_json::from_str(&text).map_err(|source| PlotError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded plot config from {}", path.display());
        Ok(Some(config))
    }
}

/// Reads the config file and the PlatformIO project named by `cli`, then resolves.
pub fn load(cli: &Cli) -> Result<RunConfig, PlotError> {
    let file = FileConfig::load(&cli.config)?;
    // the device project only matters when reading from a serial port
    let project = if cli.tcp_port().is_none() && (cli.port.is_none() || cli.baud.is_none()) {
        ProjectConfig::load(&cli.project_dir)?
    } else {
        None
    };
    resolve(cli, file.as_ref(), project.as_ref())
}

/// Per option: explicit argument, then config file, then built-in default.
pub fn resolve(
    cli: &Cli,
    file: Option<&FileConfig>,
    project: Option<&ProjectConfig>,
) -> Result<RunConfig, PlotError> {
    let title = cli
        .title
        .clone()
        .or_else(|| file.and_then(|f| f.title.clone()))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let width = cli
        .width
        .or_else(|| file.and_then(|f| f.width))
        .unwrap_or(DEFAULT_WIDTH);
    if width == 0 || width > MAX_WIDTH {
        return Err(PlotError::InvalidWidth);
    }
    let labels = if cli.labels.is_empty() {
        file.and_then(|f| f.label.clone()).unwrap_or_default()
    } else {
        cli.labels.clone()
    };
    Ok(RunConfig {
        title,
        width,
        labels,
        transport: resolve_transport(cli, project)?,
        period: Duration::from_millis(cli.interval_ms.max(1)),
    })
}

fn resolve_transport(cli: &Cli, project: Option<&ProjectConfig>) -> Result<Transport, PlotError> {
    if let Some(port) = cli.tcp_port() {
        return Ok(Transport::Tcp { port });
    }
    let port = match &cli.port {
        Some(port) => port.clone(),
        None => project
            .and_then(ProjectConfig::monitor_port)
            .ok_or(PlotError::UnresolvedPort)?,
    };
    let baud = match cli.baud {
        Some(baud) => baud,
        None => match project {
            Some(project) => project.monitor_speed()?.unwrap_or(DEFAULT_BAUD),
            None => DEFAULT_BAUD,
        },
    };
    Ok(Transport::Serial { port, baud })
}
