/// Append-only mapping from record column to display label.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChannelRegistry {
    labels: Vec<String>,
}
impl ChannelRegistry {
    pub fn seeded(labels: Vec<String>) -> Self {
        Self { labels }
    }
    /// Makes sure every column of a `width`-wide record has a label.
    /// New columns get `data{k}` where `k` continues from the current count.
    pub fn grow_to(&mut self, width: usize) {
        for k in self.labels.len() + 1..=width {
            let label = format!("data{k}");
            log::debug!("new channel {} labelled {label}", k - 1);
            self.labels.push(label);
        }
    }
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
    pub fn len(&self) -> usize {
        self.labels.len()
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn grows_with_synthetic_labels() {
        let mut registry = ChannelRegistry::default();
        registry.grow_to(2);
        assert_eq!(registry.labels(), ["data1", "data2"]);
        registry.grow_to(4);
        assert_eq!(registry.labels(), ["data1", "data2", "data3", "data4"]);
    }
    #[test]
    fn never_shrinks() {
        let mut registry = ChannelRegistry::default();
        registry.grow_to(3);
        registry.grow_to(1);
        registry.grow_to(0);
        assert_eq!(registry.len(), 3);
    }
    #[test]
    fn seeded_labels_are_kept() {
        let mut registry = ChannelRegistry::seeded(vec!["temp".into(), "humidity".into()]);
        registry.grow_to(1);
        assert_eq!(registry.labels(), ["temp", "humidity"]);
        registry.grow_to(4);
        assert_eq!(registry.labels(), ["temp", "humidity", "data3", "data4"]);
        assert_eq!(registry.label(0), Some("temp"));
        assert_eq!(registry.label(9), None);
    }
    #[test]
    fn covers_widest_record_seen() {
        let mut registry = ChannelRegistry::seeded(vec!["a".into()]);
        let mut widest = 0;
        for width in [0, 1, 1, 3, 3, 5, 8] {
            registry.grow_to(width);
            widest = widest.max(width);
            assert!(registry.len() >= widest);
            assert_eq!(registry.label(0), Some("a"));
        }
    }
}
