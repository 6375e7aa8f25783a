use std::collections::VecDeque;
use crate::drivers::ChannelRegistry;
/// One labelled line of the chart.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
}
/// Everything a backend needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartFrame {
    pub title: String,
    pub width: usize,
    pub series: Vec<Series>,
}
impl ChartFrame {
    pub fn x_bounds(&self) -> (f64, f64) {
        (0.0, self.width as f64)
    }
    /// Lower bound pinned at zero, upper bound follows the data with a small margin.
    pub fn y_bounds(&self) -> (f64, f64) {
        let y_max = self
            .series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(0.0f64, f64::max);
        if y_max <= 0.0 {
            (0.0, 1.0)
        } else {
            (0.0, y_max * 1.05)
        }
    }
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
/// Rolling buffer that stores the most recent `width` values per channel.
pub struct HistoryStore {
    per_channel: Vec<VecDeque<f64>>, // channel -> values
    width: usize,
}
impl HistoryStore {
    pub fn new(width: usize) -> Self {
        Self {
            per_channel: Vec::new(),
            width,
        }
    }
    #[cfg(test)]
    pub fn channel_count(&self) -> usize {
        self.per_channel.len()
    }
    /// Queues grow on demand; the truncation below bounds them, not the allocation.
    pub fn append(&mut self, channel: usize, value: f64) {
        if self.per_channel.len() <= channel {
            self.per_channel.resize_with(channel + 1, VecDeque::new);
        }
        let width = self.width;
        let queue = &mut self.per_channel[channel];
        queue.push_back(value);
        while queue.len() > width {
            queue.pop_front();
        }
    }
    #[cfg(test)]
    pub fn window(&self, channel: usize) -> Option<&VecDeque<f64>> {
        self.per_channel.get(channel)
    }
    /// Values of every channel, oldest first.
    #[cfg(test)]
    pub fn to_vecs(&self) -> Vec<Vec<f64>> {
        self.per_channel
            .iter()
            .map(|queue| queue.iter().copied().collect())
            .collect()
    }
    pub fn snapshot(&self, title: &str, registry: &ChannelRegistry) -> ChartFrame {
        let series = self
            .per_channel
            .iter()
            .enumerate()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|(idx, queue)| Series {
                label: registry
                    .label(idx)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("data{}", idx + 1)),
                values: queue.iter().copied().collect(),
            })
            .collect();
        ChartFrame {
            title: title.to_string(),
            width: self.width,
            series,
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn window_keeps_last_width_values() {
        let mut store = HistoryStore::new(5);
        for i in 0..12 {
            store.append(0, i as f64);
        }
        let window: Vec<f64> = store.window(0).unwrap().iter().copied().collect();
        assert_eq!(window, vec![7.0, 8.0, 9.0, 10.0, 11.0]);
    }
    #[test]
    fn short_history_is_not_padded() {
        let mut store = HistoryStore::new(4);
        store.append(0, 1.0);
        store.append(0, 2.0);
        store.append(2, 9.0);
        assert_eq!(store.channel_count(), 3);
        assert_eq!(store.to_vecs(), vec![vec![1.0, 2.0], vec![], vec![9.0]]);
    }
    #[test]
    fn unbounded_width_does_not_preallocate() {
        let mut store = HistoryStore::new(usize::MAX);
        store.append(0, 1.0);
        store.append(2, 3.0);
        store.append(0, 2.0);
        assert_eq!(store.to_vecs(), vec![vec![1.0, 2.0], vec![], vec![3.0]]);
    }
    #[test]
    fn snapshot_uses_registry_labels() {
        let mut registry = ChannelRegistry::seeded(vec!["volts".into()]);
        registry.grow_to(2);
        let mut store = HistoryStore::new(10);
        store.append(0, 3.3);
        store.append(1, 5.0);
        let frame = store.snapshot("Bench", &registry);
        assert_eq!(frame.title, "Bench");
        assert_eq!(frame.x_bounds(), (0.0, 10.0));
        let labels: Vec<&str> = frame.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["volts", "data2"]);
    }
    #[test]
    fn y_axis_starts_at_zero() {
        let frame = ChartFrame {
            title: String::new(),
            width: 3,
            series: vec![Series {
                label: "a".into(),
                values: vec![-5.0, 10.0, f64::NAN],
            }],
        };
        let (lo, hi) = frame.y_bounds();
        assert_eq!(lo, 0.0);
        assert!(hi >= 10.0);
        let empty = ChartFrame {
            title: String::new(),
            width: 3,
            series: Vec::new(),
        };
        assert_eq!(empty.y_bounds(), (0.0, 1.0));
    }
}
