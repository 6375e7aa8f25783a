// src/gui.rs
use std::sync::mpsc::{channel, Sender};
use std::time::{Duration, Instant};

use anyhow::anyhow;
use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotBounds, PlotPoints};

use crate::drivers::{ChartFrame, LineSource, PlotError, RenderCycle};
use crate::engine::TickScheduler;

/// Window backend: the egui event loop drives the tick scheduler.
pub struct PlotterApp<S: LineSource> {
    cycle: RenderCycle<S>,
    scheduler: TickScheduler,
    // last drawn frame, repainted between ticks
    frame: ChartFrame,
    failure: Sender<PlotError>,
    stopped: bool,
}

impl<S: LineSource> PlotterApp<S> {
    pub fn new(cycle: RenderCycle<S>, period: Duration, failure: Sender<PlotError>) -> Self {
        Self {
            frame: cycle.frame(),
            cycle,
            scheduler: TickScheduler::new(period, Instant::now()),
            failure,
            stopped: false,
        }
    }

    fn run_due_tick(&mut self, ctx: &egui::Context) {
        if self.stopped || !self.scheduler.begin(Instant::now()) {
            return;
        }
        match self.cycle.tick() {
            Ok(_) => {
                self.frame = self.cycle.frame();
                self.scheduler.complete(Instant::now());
            }
            Err(err) => {
                log::error!("{err}");
                self.stopped = true;
                self.failure.send(err).ok();
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }
}

impl<S: LineSource + 'static> eframe::App for PlotterApp<S> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.run_due_tick(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| ui.heading(&self.frame.title));
            draw_chart(ui, &self.frame);
        });

        if !self.stopped {
            ctx.request_repaint_after(self.scheduler.time_until_due(Instant::now()));
        }
    }
}

/// Full redraw of one frame: fixed x range, y range pinned at zero.
pub fn draw_chart(ui: &mut egui::Ui, frame: &ChartFrame) {
    let (x_min, x_max) = frame.x_bounds();
    let (y_min, y_max) = frame.y_bounds();
    Plot::new("telemetry_plot")
        .legend(Legend::default())
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_min, y_min], [x_max, y_max]));
            for series in &frame.series {
                let points = PlotPoints::from_ys_f64(&series.values);
                plot_ui.line(Line::new(points).name(&series.label));
            }
        });
}

/// Opens the plot window titled with the transport address and blocks until it closes.
/// A transport failure closes the window and is returned here.
pub fn run_window<S: LineSource + 'static>(
    cycle: RenderCycle<S>,
    period: Duration,
) -> anyhow::Result<()> {
    let address = cycle.source().address();
    let (tx, rx) = channel();
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([960.0, 600.0])
        .with_min_inner_size([480.0, 320.0])
        .with_title(&address);
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        &address,
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Box::new(PlotterApp::new(cycle, period, tx))
        }),
    )
    .map_err(|err| anyhow!("window backend failed: {err}"))?;
    match rx.try_recv() {
        Ok(err) => Err(err.into()),
        Err(_) => Ok(()),
    }
}
