//! Fixed-time sampling of an effect.
//!
//! An [`InertSampler`] evaluates an [`EffectModel`] once, at a local time
//! chosen up front. It is used for previews and paused effects: nothing
//! advances, so it never asks to be serviced again.

use crate::timing::{calculate, EffectChange, Timing, TimingUpdateReason};
use tracing::trace;

/// Turns timing output into concrete interpolated values.
///
/// The engine never inspects the returned values.
pub trait EffectModel {
    /// One sampled output
    type Output;

    /// Sample at `time_fraction` within iteration `iteration`.
    fn sample(&self, iteration: i32, time_fraction: f64, iteration_duration: f64) -> Vec<Self::Output>;
}

/// An effect model evaluated at a single, fixed local time.
#[derive(Debug)]
pub struct InertSampler<'a, M: ?Sized> {
    model: &'a M,
    timing: Timing,
    local_time: f64,
    paused: bool,
}

impl<'a, M: EffectModel + ?Sized> InertSampler<'a, M> {
    /// Borrow `model` and fix the sampling time.
    pub const fn new(model: &'a M, timing: Timing, local_time: f64, paused: bool) -> Self {
        Self {
            model,
            timing,
            local_time,
            paused,
        }
    }

    /// Timing configuration
    pub const fn timing(&self) -> &Timing {
        &self.timing
    }

    /// The fixed local time
    pub const fn local_time(&self) -> f64 {
        self.local_time
    }

    /// Whether the sampled effect is paused
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Sample the model, or nothing if the effect is not in effect.
    pub fn sample(&self) -> Vec<M::Output> {
        let result = calculate(&self.timing, self.local_time, TimingUpdateReason::OnDemand);
        let (Some(iteration), Some(time_fraction)) = (result.iteration_index(), result.time_fraction)
        else {
            trace!(local_time = self.local_time, phase = %result.phase, "inert sample not in effect");
            return Vec::new();
        };
        trace!(
            local_time = self.local_time,
            iteration,
            time_fraction,
            paused = self.paused,
            "inert sample"
        );
        self.model
            .sample(iteration, time_fraction, self.timing.iteration_duration)
    }
}

impl<M: ?Sized> EffectChange for InertSampler<'_, M> {
    fn calculate_time_to_effect_change(
        &self,
        _forwards: bool,
        _local_time: f64,
        _time_to_next_iteration: f64,
    ) -> f64 {
        f64::INFINITY
    }
}
