//! Cadence: animation timing and interpolation engine
//!
//! Cadence turns a declarative timing configuration plus a local time into a
//! phase, a progress fraction within the current iteration, and a set of
//! interpolated values.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     CADENCE Architecture                         │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────────┐         │
//! │   │ Timing     │    │ Timing     │    │ IntervalSet    │         │
//! │   │ + local    │───►│ Result     │───►│ (keyframes,    │         │
//! │   │   time     │    │ phase/frac │    │  easing)       │         │
//! │   └────────────┘    └────────────┘    └────────────────┘         │
//! │         ▲                 │                    │                 │
//! │   ┌────────────┐    ┌────────────┐    ┌────────────────┐         │
//! │   │ Effect     │    │ Animation  │    │ Sampled values │         │
//! │   │ Document   │    │ Node events│    │                │         │
//! │   └────────────┘    └────────────┘    └────────────────┘         │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use cadence::{calculate, Phase, Timing, TimingUpdateReason};
//!
//! let timing = Timing::new().with_duration(2.0).with_iterations(3.0);
//! let result = calculate(&timing, 3.0, TimingUpdateReason::OnDemand);
//! assert_eq!(result.phase, Phase::Active);
//! assert_eq!(result.current_iteration, Some(1.0));
//! assert_eq!(result.time_fraction, Some(0.5));
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod document;
pub mod easing;
pub mod interpolation;
pub mod keyframes;
mod result;
pub mod sampler;
pub mod timing;

pub use document::EffectDocument;
pub use easing::{
    accuracy_for_duration, CubicBezier, CubicPreset, EasingTable, SharedEasing, StepPosition,
    TimingFunction, UnitBezier,
};
pub use interpolation::{
    Interpolable, InterpolationInterval, IntervalSet, NumberInterpolation, SampledValue,
};
pub use keyframes::{
    Keyframe, KeyframeEffectModel, KeyframeInput, PropertyInterpolation, PropertyValue,
};
pub use result::{CadenceError, CadenceResult};
pub use sampler::{EffectModel, InertSampler};
pub use timing::{
    calculate, multiply_zero_always_gives_zero, time_to_effect_change, AnimationNode,
    DurationInput, EffectChange, EventDelegate, FillMode, IterationsInput, Phase,
    PlaybackDirection, Timing, TimingInput, TimingResult, TimingUpdateReason,
};
