// src/types.rs
use std::time::Duration;

pub const DEFAULT_TITLE: &str = "Serial Data Plot";
pub const DEFAULT_WIDTH: usize = 50;
pub const MAX_WIDTH: usize = 1_000_000;
pub const DEFAULT_BAUD: u32 = 115_200;

// Process exit codes
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_UNRESOLVED_PORT: i32 = 2;
pub const EXIT_INTERRUPTED: i32 = 9;

// Which transport feeds the plot
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transport {
    Serial { port: String, baud: u32 },
    Tcp { port: u16 },
}

impl Transport {
    pub fn address(&self) -> String {
        match self {
            Transport::Serial { port, .. } => port.clone(),
            Transport::Tcp { port } => format!("tcp://localhost:{port}"),
        }
    }
}

// Resolved startup options; not mutated once the plot is running
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub title: String,
    pub width: usize,
    pub labels: Vec<String>,
    pub transport: Transport,
    pub period: Duration,
}
