//! Time-scoped interpolation intervals.
//!
//! An [`IntervalSet`] holds intervals in registration order. Sampling at a
//! time fraction yields one [`SampledValue`] per interval whose apply window
//! `[apply_from, apply_to)` contains the fraction. The local fraction inside
//! `[start, end]` is not clamped, so a window wider than `[start, end]`
//! extrapolates.

use crate::easing::SharedEasing;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// A two-endpoint payload that can be blended by a fraction.
pub trait Interpolable {
    /// Output of one interpolation
    type Value;

    /// Blend at `fraction`; `0` is the start value and `1` the end value.
    fn interpolate(&self, fraction: f64) -> Self::Value;
}

/// Linear blend between two numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumberInterpolation {
    /// Value at fraction 0
    pub from: f64,
    /// Value at fraction 1
    pub to: f64,
}

impl NumberInterpolation {
    /// Create a number interpolation
    #[must_use]
    pub const fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }
}

impl Interpolable for NumberInterpolation {
    type Value = f64;

    fn interpolate(&self, fraction: f64) -> f64 {
        self.from + (self.to - self.from) * fraction
    }
}

/// One registered interval.
#[derive(Debug, Clone)]
pub struct InterpolationInterval<P> {
    payload: P,
    easing: Option<SharedEasing>,
    apply_from: f64,
    apply_to: f64,
    start: f64,
    end: f64,
}

impl<P> InterpolationInterval<P> {
    /// The opaque payload
    pub const fn payload(&self) -> &P {
        &self.payload
    }

    /// Easing applied to the local fraction, if any
    pub const fn easing(&self) -> Option<&SharedEasing> {
        self.easing.as_ref()
    }

    /// `(apply_from, apply_to)`
    pub const fn apply_window(&self) -> (f64, f64) {
        (self.apply_from, self.apply_to)
    }

    /// `(start, end)`
    pub const fn bounds(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    /// Whether `fraction` lies in `[apply_from, apply_to)`.
    pub fn is_active(&self, fraction: f64) -> bool {
        self.apply_from <= fraction && fraction < self.apply_to
    }

    /// Position of `fraction` relative to `[start, end]`, before easing.
    ///
    /// Zero-length and unbounded intervals report `0`.
    pub fn local_fraction(&self, fraction: f64) -> f64 {
        let length = self.end - self.start;
        if length == 0.0 || !length.is_finite() {
            return 0.0;
        }
        (fraction - self.start) / length
    }

    fn eased_fraction(&self, fraction: f64, iteration_duration: f64) -> f64 {
        let local = self.local_fraction(fraction);
        match &self.easing {
            Some(easing) => easing.evaluate(local, Some(iteration_duration)),
            None => local,
        }
    }
}

/// Output of one active interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampledValue<V> {
    /// Registration index of the interval
    pub index: usize,
    /// Local fraction after easing
    pub fraction: f64,
    /// Interpolated value
    pub value: V,
}

/// Ordered collection of interpolation intervals.
///
/// Intervals are registered during setup; afterwards the set is only read.
/// Sampling is pure apart from the last-fraction slot, which exists for
/// inspection and never feeds back into results.
#[derive(Debug)]
pub struct IntervalSet<P> {
    intervals: Vec<InterpolationInterval<P>>,
    last_fraction: AtomicU64,
}

impl<P> Default for IntervalSet<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone> Clone for IntervalSet<P> {
    fn clone(&self) -> Self {
        Self {
            intervals: self.intervals.clone(),
            last_fraction: AtomicU64::new(self.last_fraction.load(Ordering::Relaxed)),
        }
    }
}

impl<P> IntervalSet<P> {
    /// Create an empty set
    pub fn new() -> Self {
        Self {
            intervals: Vec::new(),
            last_fraction: AtomicU64::new(f64::NAN.to_bits()),
        }
    }

    /// Register an interval after all existing ones.
    pub fn add_interval(
        &mut self,
        payload: P,
        easing: Option<SharedEasing>,
        apply_from: f64,
        apply_to: f64,
        start: f64,
        end: f64,
    ) {
        self.intervals.push(InterpolationInterval {
            payload,
            easing,
            apply_from,
            apply_to,
            start,
            end,
        });
    }

    /// Number of registered intervals
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Whether no interval is registered
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Registered intervals in order
    pub fn intervals(&self) -> &[InterpolationInterval<P>] {
        &self.intervals
    }

    /// Most recent fraction passed to [`Self::active_intervals_at`].
    pub fn last_fraction(&self) -> Option<f64> {
        let value = f64::from_bits(self.last_fraction.load(Ordering::Relaxed));
        (!value.is_nan()).then_some(value)
    }
}

impl<P: Interpolable> IntervalSet<P> {
    /// Values of every interval active at `fraction`, in registration order.
    ///
    /// The iterator is lazy and borrows the set; call again to restart.
    pub fn active_intervals_at(
        &self,
        fraction: f64,
        iteration_duration: f64,
    ) -> impl Iterator<Item = SampledValue<P::Value>> + '_ {
        self.last_fraction
            .store(fraction.to_bits(), Ordering::Relaxed);
        self.intervals
            .iter()
            .enumerate()
            .filter(move |(_, interval)| interval.is_active(fraction))
            .map(move |(index, interval)| {
                let eased = interval.eased_fraction(fraction, iteration_duration);
                SampledValue {
                    index,
                    fraction: eased,
                    value: interval.payload.interpolate(eased),
                }
            })
    }
}
