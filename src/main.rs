// src/main.rs
mod config;
mod drivers;
mod engine;
mod gui;
mod platformio;
mod types;
use std::process;
use std::time::Instant;
use anyhow::{Context, Result};
use clap::Parser;
use config::Cli;
use drivers::{LineSource, PlotContext, PlotError, PlotStyle, RenderCycle, SerialSource, TcpSource};
use engine::TickScheduler;
use types::*;
fn open_source(transport: &Transport) -> Result<Box<dyn LineSource>, PlotError> {
    Ok(match transport {
        Transport::Serial { port, baud } => Box::new(SerialSource::open(port, *baud)?),
        Transport::Tcp { port } => Box::new(TcpSource::open(*port)?),
    })
}
fn run(cli: Cli) -> Result<()> {
    let config = match config::load(&cli) {
        Ok(config) => config,
        Err(PlotError::UnresolvedPort) => {
            eprintln!("Please check the platformio.ini for the 'monitor_port' or the -p option");
            process::exit(EXIT_UNRESOLVED_PORT);
        }
        Err(err) => return Err(err).context("invalid configuration"),
    };
    log::debug!("run configuration: {config:?}");
    let source = open_source(&config.transport)
        .with_context(|| format!("failed to open {}", config.transport.address()))?;
    println!("\n{}\n", source.describe());
    let mut cycle = RenderCycle::new(source, PlotContext::from_config(&config));
    match &cli.headless {
        Some(output) => {
            let mut scheduler = TickScheduler::new(config.period, Instant::now());
            engine::run_headless(&mut cycle, &mut scheduler, output, &PlotStyle::default())
                .context("plotting stopped")
        }
        None => gui::run_window(cycle, config.period),
    }
}
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = ctrlc::set_handler(|| {
        println!("Ctrl-C pressed");
        process::exit(EXIT_INTERRUPTED);
    }) {
        log::warn!("failed to install Ctrl-C handler: {err}");
    }
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        log::error!("{err:#}");
        process::exit(EXIT_FAILURE);
    }
}
