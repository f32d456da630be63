/// Configuration for an [`ActionRunner`](crate::ActionRunner).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOptions {
    /// Name attached to every log event emitted for this runner.
    pub label: String,
    /// Clear the previous result as soon as a new invocation starts, instead
    /// of leaving it visible until the new invocation settles.
    pub clear_data_on_start: bool,
}

impl Default for ActionOptions {
    fn default() -> Self {
        Self {
            label: "action".to_string(),
            clear_data_on_start: false,
        }
    }
}

impl ActionOptions {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn clear_data_on_start(mut self, clear: bool) -> Self {
        self.clear_data_on_start = clear;
        self
    }
}
