//! Process-wide table of named easing functions.
//!
//! The table is built on first use and never mutated afterwards, so any
//! number of threads may read it without locking. Entries are handed out as
//! [`SharedEasing`] handles; intervals hold a handle, never the function.

use super::{CubicPreset, StepPosition, TimingFunction};
use crate::result::CadenceResult;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

/// Shared, immutable handle to an easing function.
pub type SharedEasing = Arc<TimingFunction>;

/// Read-only lookup of the named easing functions.
#[derive(Debug)]
pub struct EasingTable {
    entries: BTreeMap<&'static str, SharedEasing>,
}

impl EasingTable {
    fn build() -> Self {
        let named = [
            ("linear", TimingFunction::Linear),
            ("ease", TimingFunction::preset(CubicPreset::Ease)),
            ("ease-in", TimingFunction::preset(CubicPreset::EaseIn)),
            ("ease-out", TimingFunction::preset(CubicPreset::EaseOut)),
            ("ease-in-out", TimingFunction::preset(CubicPreset::EaseInOut)),
            ("step-start", TimingFunction::step(StepPosition::Start)),
            ("step-middle", TimingFunction::step(StepPosition::Middle)),
            ("step-end", TimingFunction::step(StepPosition::End)),
        ];
        Self {
            entries: named
                .into_iter()
                .map(|(name, function)| (name, Arc::new(function)))
                .collect(),
        }
    }

    /// The table, built on first call.
    pub fn global() -> &'static Self {
        static TABLE: OnceLock<EasingTable> = OnceLock::new();
        TABLE.get_or_init(Self::build)
    }

    /// Shared handle for a named function, if the name is known.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<SharedEasing> {
        self.entries.get(name).cloned()
    }

    /// The shared `linear` entry.
    #[must_use]
    pub fn linear(&self) -> SharedEasing {
        self.get("linear")
            .unwrap_or_else(|| Arc::new(TimingFunction::Linear))
    }

    /// A named entry, or a freshly parsed function for any other text.
    pub fn resolve(&self, text: &str) -> CadenceResult<SharedEasing> {
        if let Some(shared) = self.get(text.trim()) {
            return Ok(shared);
        }
        Ok(Arc::new(text.parse()?))
    }

    /// Names of all entries, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }
}
