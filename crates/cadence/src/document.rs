//! Effect documents.
//!
//! An [`EffectDocument`] pairs a [`TimingInput`] with a keyframe list and is
//! the on-disk form read by the command line. Both JSON and YAML are
//! accepted:
//!
//! ```yaml
//! timing:
//!   duration: 2
//!   iterations: infinite
//!   direction: alternate
//! keyframes:
//!   - { offset: 0, opacity: 0 }
//!   - { offset: 1, opacity: 1, easing: ease-in }
//! ```

use crate::keyframes::{KeyframeEffectModel, KeyframeInput};
use crate::result::{CadenceError, CadenceResult};
use crate::timing::{Timing, TimingInput};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Timing plus keyframes, as read from a file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectDocument {
    /// Timing configuration
    pub timing: TimingInput,
    /// Keyframes, possibly empty
    pub keyframes: Vec<KeyframeInput>,
}

impl EffectDocument {
    /// Parse a JSON document
    pub fn from_json(text: &str) -> CadenceResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a YAML document
    pub fn from_yaml(text: &str) -> CadenceResult<Self> {
        Ok(serde_yaml_ng::from_str(text)?)
    }

    /// Load a document, choosing the format from the file extension.
    ///
    /// `.json` is JSON; `.yaml`, `.yml` and anything else is YAML.
    pub fn load(path: impl AsRef<Path>) -> CadenceResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        debug!(path = %path.display(), json = is_json, "loading effect document");
        if is_json {
            Self::from_json(&text)
        } else {
            Self::from_yaml(&text)
        }
    }

    /// Validated timing
    pub fn timing(&self) -> CadenceResult<Timing> {
        self.timing.into_timing()
    }

    /// Compiled keyframe model
    pub fn effect_model(&self) -> CadenceResult<KeyframeEffectModel> {
        KeyframeEffectModel::from_inputs(&self.keyframes)
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> CadenceResult<String> {
        serde_json::to_string_pretty(self).map_err(CadenceError::from)
    }
}
