/// Environment variable that turns on semantics dumps after every frame.
pub const DEBUG_SEMANTICS_ENV: &str = "ROLECALL_DEBUG_SEMANTICS";

/// Configuration for an [`AppShell`](crate::AppShell).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShellSettings {
    /// Frames an interaction may take to settle before it fails.
    pub max_settle_frames: usize,
    /// Log the semantics tree at debug level whenever it is rebuilt.
    pub debug_semantics: bool,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            max_settle_frames: 100,
            debug_semantics: std::env::var_os(DEBUG_SEMANTICS_ENV).is_some(),
        }
    }
}

impl ShellSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_settle_frames(mut self, frames: usize) -> Self {
        self.max_settle_frames = frames.max(1);
        self
    }

    pub fn with_debug_semantics(mut self, enabled: bool) -> Self {
        self.debug_semantics = enabled;
        self
    }
}
