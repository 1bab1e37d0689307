const DEFAULT_STATE_PREFIX: &str = "S";
const DEFAULT_SINK_NAME: &str = "Sink";
const DEFAULT_SET_SEPARATOR: &str = "-";

#[derive(Debug, Clone)]
pub struct Options {
    /// The prefix of the state names generated when compiling regular expressions.
    /// Generated states are named `<prefix><n>`, where `n` is a counter starting at zero.
    pub state_prefix: String,
    /// The name of the sink state added during determinization.
    /// If the name is already taken by another state, primes (`'`) are appended until it is unique.
    pub sink_name: String,
    /// The separator placed between the member names of a set-state during determinization.
    pub set_separator: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            state_prefix: DEFAULT_STATE_PREFIX.to_string(),
            sink_name: DEFAULT_SINK_NAME.to_string(),
            set_separator: DEFAULT_SET_SEPARATOR.to_string(),
        }
    }
}

impl Options {
    pub fn with_state_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.state_prefix = prefix.into();
        self
    }

    pub fn with_sink_name(mut self, name: impl Into<String>) -> Self {
        self.sink_name = name.into();
        self
    }
}
