// src/engine.rs
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use crate::drivers::{write_frame_png, LineSource, PlotError, PlotStyle, RenderCycle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Tick,
}

/// Fixed-period trigger for the render cycle. Only one tick is ever active;
/// a tick that overruns pushes the next one a full period past its end.
#[derive(Debug)]
pub struct TickScheduler {
    period: Duration,
    next_due: Instant,
    state: CycleState,
}

impl TickScheduler {
    /// The first tick is due immediately.
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next_due: now,
            state: CycleState::Idle,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.state == CycleState::Idle && now >= self.next_due
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }

    /// Idle -> Tick, if a tick is due.
    pub fn begin(&mut self, now: Instant) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.state = CycleState::Tick;
        true
    }

    /// Tick -> Idle, scheduling the next period boundary.
    pub fn complete(&mut self, finished: Instant) {
        let planned = self.next_due + self.period;
        self.next_due = if planned > finished {
            planned
        } else {
            log::debug!("tick overran its {:?} period", self.period);
            finished + self.period
        };
        self.state = CycleState::Idle;
    }
}

/// Window-less render loop: wait for the period boundary, tick, rewrite the PNG.
/// Only returns on a fatal error.
pub fn run_headless<S: LineSource>(
    cycle: &mut RenderCycle<S>,
    scheduler: &mut TickScheduler,
    output: &Path,
    style: &PlotStyle,
) -> Result<(), PlotError> {
    log::info!(
        "rendering to {} every {:?}",
        output.display(),
        scheduler.period()
    );
    let mut style = style.clone();
    loop {
        let wait = scheduler.time_until_due(Instant::now());
        if !wait.is_zero() {
            thread::sleep(wait);
        }
        if !scheduler.begin(Instant::now()) {
            continue;
        }
        cycle.tick()?;
        let frame = cycle.frame();
        match write_frame_png(&frame, &style, output) {
            Ok(()) => {}
            // usually a missing system font; keep plotting without text
            Err(PlotError::Plot(msg)) if style.text => {
                log::warn!("{msg}; rendering without labels");
                style.text = false;
                write_frame_png(&frame, &style, output)?;
            }
            Err(err) => return Err(err),
        }
        scheduler.complete(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::source::ManualSource;
    use crate::drivers::PlotContext;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn ticks_on_period_boundaries() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::new(SECOND, start);
        assert!(scheduler.begin(start));
        assert_eq!(scheduler.state(), CycleState::Tick);
        scheduler.complete(start + Duration::from_millis(200));
        assert_eq!(scheduler.state(), CycleState::Idle);
        assert!(!scheduler.is_due(start + Duration::from_millis(999)));
        assert_eq!(
            scheduler.time_until_due(start + Duration::from_millis(200)),
            Duration::from_millis(800)
        );
        assert!(scheduler.begin(start + SECOND));
    }

    #[test]
    fn no_second_tick_while_one_is_active() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::new(SECOND, start);
        assert!(scheduler.begin(start));
        assert!(!scheduler.begin(start + 5 * SECOND));
    }

    #[test]
    fn overrun_defers_next_tick() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::new(SECOND, start);
        scheduler.begin(start);
        let finished = start + Duration::from_millis(2500);
        scheduler.complete(finished);
        assert!(!scheduler.is_due(start + 2 * SECOND));
        assert!(!scheduler.is_due(finished + Duration::from_millis(999)));
        assert!(scheduler.is_due(finished + SECOND));
    }

    #[test]
    fn headless_loop_stops_on_disconnect() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("plot.png");
        let mut cycle = RenderCycle::new(
            ManualSource::new(["1 2", "3 4"]),
            PlotContext::new("t", 5, Vec::new()),
        );
        let mut scheduler = TickScheduler::new(Duration::from_millis(1), Instant::now());
        let style = PlotStyle {
            width: 160,
            height: 100,
            text: false,
            ..PlotStyle::default()
        };
        let result = run_headless(&mut cycle, &mut scheduler, &output, &style);
        assert!(matches!(result, Err(PlotError::Disconnected)));
        assert!(output.exists());
        assert_eq!(
            cycle.context().history().to_vecs(),
            vec![vec![1.0, 3.0], vec![2.0, 4.0]]
        );
    }
}
