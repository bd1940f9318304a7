//! Engine configuration.

/// Rolls kept in the history by default.
pub const DEFAULT_HISTORY_LEN: usize = 5;

pub const DEFAULT_HEADQUARTERS_NAME: &str = "Castle Gyllencreutz";

/// Configuration for the dice engine and new headquarters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum entries in the roll history, most recent first.
    pub history_len: usize,

    /// Name given to a freshly created headquarters.
    pub headquarters_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_len: DEFAULT_HISTORY_LEN,
            headquarters_name: DEFAULT_HEADQUARTERS_NAME.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the roll history length.
    pub fn with_history_len(mut self, history_len: usize) -> Self {
        self.history_len = history_len;
        self
    }

    /// Set the headquarters name.
    pub fn with_headquarters_name(mut self, name: impl Into<String>) -> Self {
        self.headquarters_name = name.into();
        self
    }
}
