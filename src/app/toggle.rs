//! Layer-feedback enable/disable toggle.
//!
//! Process-lifetime, in memory only: every boot starts enabled. Owned by
//! the [`Policy`](super::policy::Policy), which is the single writer.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleState {
    enabled: bool,
}

impl ToggleState {
    pub const fn new() -> Self {
        Self { enabled: true }
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip and return the new value.
    pub(crate) fn flip(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }
}

impl Default for ToggleState {
    fn default() -> Self {
        Self::new()
    }
}
