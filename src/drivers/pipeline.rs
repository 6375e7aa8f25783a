use crate::drivers::error::PlotError;
use crate::drivers::parser::{parse_record, ParsedRecord};
use crate::drivers::source::LineSource;
use crate::drivers::{ChannelRegistry, ChartFrame, HistoryStore};
use crate::types::RunConfig;
/// Outcome of one tick, mostly for logging and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub record: ParsedRecord,
    pub new_channels: usize,
}
/// All state carried from one tick to the next.
pub struct PlotContext {
    title: String,
    registry: ChannelRegistry,
    history: HistoryStore,
}
impl PlotContext {
    pub fn new(title: impl Into<String>, width: usize, seed_labels: Vec<String>) -> Self {
        Self {
            title: title.into(),
            registry: ChannelRegistry::seeded(seed_labels),
            history: HistoryStore::new(width),
        }
    }
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(config.title.clone(), config.width, config.labels.clone())
    }
    #[cfg(test)]
    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }
    #[cfg(test)]
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }
    /// Parse, label and record one raw line.
    pub fn apply_line(&mut self, line: &str) -> TickReport {
        let record = parse_record(line);
        let known = self.registry.len();
        self.registry.grow_to(record.width());
        for (channel, value) in record.values.iter().enumerate() {
            self.history.append(channel, *value);
        }
        TickReport {
            new_channels: self.registry.len() - known,
            record,
        }
    }
    pub fn frame(&self) -> ChartFrame {
        self.history.snapshot(&self.title, &self.registry)
    }
}
/// Pulls one record per tick from a source into a [`PlotContext`].
pub struct RenderCycle<S: LineSource> {
    source: S,
    context: PlotContext,
}
impl<S: LineSource> RenderCycle<S> {
    pub fn new(source: S, context: PlotContext) -> Self {
        Self { source, context }
    }
    pub fn source(&self) -> &S {
        &self.source
    }
    #[cfg(test)]
    pub fn context(&self) -> &PlotContext {
        &self.context
    }
    pub fn tick(&mut self) -> Result<TickReport, PlotError> {
        let line = self.source.read_line()?;
        let report = self.context.apply_line(&line);
        log::debug!(
            "tick: {} values, {} new channels",
            report.record.width(),
            report.new_channels
        );
        if report.new_channels > 0 {
            log::info!("channels: {}", self.context.registry.labels().join(", "));
        }
        Ok(report)
    }
    pub fn frame(&self) -> ChartFrame {
        self.context.frame()
    }
}
