//! Easing (timing) functions.
//!
//! An easing function maps raw progress to eased progress. Three families
//! are supported:
//!
//! - `linear`: identity, never clamped
//! - `cubic-bezier(x1, y1, x2, y2)`: with the `ease*` keyword presets
//! - `steps(n, start|middle|end)`: with the `step-*` keyword presets
//!
//! The textual form round-trips through [`std::fmt::Display`] and
//! [`std::str::FromStr`]; serde uses the same text.

pub mod bezier;
pub mod table;

use crate::result::{CadenceError, CadenceResult};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use std::sync::OnceLock;

pub use bezier::UnitBezier;
pub use table::{EasingTable, SharedEasing};

/// Solver accuracy used when no duration hint is available.
pub const DEFAULT_ACCURACY: f64 = 1e-6;

/// Solver epsilon appropriate for an animation of `duration` seconds.
///
/// Longer animations need finer resolution to avoid visible jumps.
#[must_use]
pub fn accuracy_for_duration(duration: f64) -> f64 {
    if duration > 0.0 && duration.is_finite() {
        1.0 / (200.0 * duration)
    } else {
        DEFAULT_ACCURACY
    }
}

/// Named cubic bezier curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubicPreset {
    /// `ease`
    Ease,
    /// `ease-in`
    EaseIn,
    /// `ease-out`
    EaseOut,
    /// `ease-in-out`
    EaseInOut,
    /// Explicit control points
    Custom,
}

impl CubicPreset {
    /// Control points of a named preset. `Custom` has none.
    #[must_use]
    pub const fn control_points(self) -> Option<(f64, f64, f64, f64)> {
        match self {
            Self::Ease => Some((0.25, 0.1, 0.25, 1.0)),
            Self::EaseIn => Some((0.42, 0.0, 1.0, 1.0)),
            Self::EaseOut => Some((0.0, 0.0, 0.58, 1.0)),
            Self::EaseInOut => Some((0.42, 0.0, 0.58, 1.0)),
            Self::Custom => None,
        }
    }

    const fn keyword(self) -> Option<&'static str> {
        match self {
            Self::Ease => Some("ease"),
            Self::EaseIn => Some("ease-in"),
            Self::EaseOut => Some("ease-out"),
            Self::EaseInOut => Some("ease-in-out"),
            Self::Custom => None,
        }
    }
}

/// A cubic bezier easing curve.
#[derive(Debug, Clone, Copy)]
pub struct CubicBezier {
    preset: CubicPreset,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    bezier: UnitBezier,
}

impl CubicBezier {
    fn with_points(preset: CubicPreset, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            preset,
            x1,
            y1,
            x2,
            y2,
            bezier: UnitBezier::new(x1, y1, x2, y2),
        }
    }

    /// Which preset this curve was built from
    #[must_use]
    pub const fn preset(&self) -> CubicPreset {
        self.preset
    }

    /// Control points `(x1, y1, x2, y2)`
    #[must_use]
    pub const fn points(&self) -> (f64, f64, f64, f64) {
        (self.x1, self.y1, self.x2, self.y2)
    }

    /// The underlying solver
    #[must_use]
    pub const fn solver(&self) -> &UnitBezier {
        &self.bezier
    }

    fn range(&self, min: f64, max: f64) -> (f64, f64) {
        // Turning points of y(t) are the roots of A t^2 + B t + C.
        let a = 3.0 * (self.y1 - self.y2) + 1.0;
        let b = 2.0 * (self.y2 - 2.0 * self.y1);
        let c = self.y1;

        if a.abs() < f64::EPSILON && b.abs() < f64::EPSILON {
            return (min, max);
        }

        let (t1, t2) = if a.abs() < f64::EPSILON {
            (-c / b, 0.0)
        } else {
            let discriminant = b * b - 4.0 * a * c;
            if discriminant < 0.0 {
                return (min, max);
            }
            let root = discriminant.sqrt();
            ((-b + root) / (2.0 * a), (-b - root) / (2.0 * a))
        };

        let turning_value = |t: f64| {
            if 0.0 < t && t < 1.0 {
                self.bezier.sample_curve_y(t)
            } else {
                0.0
            }
        };
        let solution1 = turning_value(t1);
        let solution2 = turning_value(t2);

        let at_min = self.bezier.solve(min, f64::EPSILON);
        let at_max = self.bezier.solve(max, f64::EPSILON);

        let low = at_min.min(at_max).min(0.0).min(solution1).min(solution2);
        let high = at_min.max(at_max).max(1.0).max(solution1).max(solution2);
        (low, high)
    }
}

impl PartialEq for CubicBezier {
    fn eq(&self, other: &Self) -> bool {
        if self.preset != other.preset {
            return false;
        }
        self.preset != CubicPreset::Custom || self.points() == other.points()
    }
}

/// Where within each interval a step change happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepPosition {
    /// Jump at the start of each interval
    Start,
    /// Jump halfway through each interval
    Middle,
    /// Jump at the end of each interval
    End,
}

impl StepPosition {
    const fn offset(self) -> f64 {
        match self {
            Self::Start => 1.0,
            Self::Middle => 0.5,
            Self::End => 0.0,
        }
    }

    const fn keyword(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// An easing function.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TimingFunction {
    /// Identity
    #[default]
    Linear,
    /// Cubic bezier curve
    CubicBezier(CubicBezier),
    /// Stepped function
    Steps {
        /// Number of equal intervals; 0 evaluates as 1
        steps: u32,
        /// Jump position within each interval
        position: StepPosition,
    },
}

impl TimingFunction {
    /// A named bezier preset. `CubicPreset::Custom` yields the diagonal curve.
    #[must_use]
    pub fn preset(preset: CubicPreset) -> Self {
        let (x1, y1, x2, y2) = preset.control_points().unwrap_or((0.0, 0.0, 1.0, 1.0));
        Self::CubicBezier(CubicBezier::with_points(preset, x1, y1, x2, y2))
    }

    /// A custom bezier curve. Never equal to a preset, even with the same points.
    ///
    /// `x1` and `x2` must lie in `[0, 1]` for x(t) to be monotonic.
    pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> CadenceResult<Self> {
        let finite = [x1, y1, x2, y2].iter().all(|p| p.is_finite());
        if !finite || !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return Err(CadenceError::invalid_easing(format!(
                "cubic-bezier({x1}, {y1}, {x2}, {y2})"
            )));
        }
        Ok(Self::CubicBezier(CubicBezier::with_points(
            CubicPreset::Custom,
            x1,
            y1,
            x2,
            y2,
        )))
    }

    /// A stepped function with `steps` intervals.
    pub fn steps(steps: u32, position: StepPosition) -> CadenceResult<Self> {
        if steps == 0 {
            return Err(CadenceError::invalid_easing(format!(
                "steps(0, {})",
                position.keyword()
            )));
        }
        Ok(Self::Steps { steps, position })
    }

    /// The one-step `step-start`, `step-middle` or `step-end` function.
    #[must_use]
    pub const fn step(position: StepPosition) -> Self {
        Self::Steps { steps: 1, position }
    }

    /// Whether this is the identity function
    #[must_use]
    pub const fn is_linear(&self) -> bool {
        matches!(self, Self::Linear)
    }

    /// Eased progress for raw progress `x`.
    ///
    /// `duration_hint` is the iteration duration in seconds; bezier curves
    /// derive their solver accuracy from it.
    #[must_use]
    pub fn evaluate(&self, x: f64, duration_hint: Option<f64>) -> f64 {
        let accuracy = duration_hint.map_or(DEFAULT_ACCURACY, accuracy_for_duration);
        self.evaluate_with_accuracy(x, accuracy)
    }

    /// Eased progress with an explicit solver accuracy.
    #[must_use]
    pub fn evaluate_with_accuracy(&self, x: f64, accuracy: f64) -> f64 {
        match self {
            Self::Linear => x,
            Self::CubicBezier(curve) => curve.bezier.solve(x, accuracy),
            Self::Steps { steps, position } => {
                // A hand-built zero-step function behaves as a single step.
                let steps = f64::from((*steps).max(1));
                ((steps * x + position.offset()).floor() / steps).clamp(0.0, 1.0)
            }
        }
    }

    /// Output range when the input spans `[min, max]`.
    #[must_use]
    pub fn range(&self, min: f64, max: f64) -> (f64, f64) {
        match self {
            Self::Linear => (min, max),
            Self::Steps { .. } => (0.0, 1.0),
            Self::CubicBezier(curve) => curve.range(min, max),
        }
    }
}

impl std::fmt::Display for TimingFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::CubicBezier(curve) => match curve.preset.keyword() {
                Some(keyword) => write!(f, "{keyword}"),
                None => write!(
                    f,
                    "cubic-bezier({}, {}, {}, {})",
                    curve.x1, curve.y1, curve.x2, curve.y2
                ),
            },
            Self::Steps { steps: 1, position } => write!(f, "step-{}", position.keyword()),
            Self::Steps { steps, position } => write!(f, "steps({steps}, {})", position.keyword()),
        }
    }
}

const NUMBER: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";

fn cached_pattern(
    cell: &'static OnceLock<Option<Regex>>,
    source: impl FnOnce() -> String,
) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(&source()).ok()).as_ref()
}

fn cubic_bezier_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    cached_pattern(&PATTERN, || {
        format!(r"^cubic-bezier\(\s*({NUMBER})\s*,\s*({NUMBER})\s*,\s*({NUMBER})\s*,\s*({NUMBER})\s*\)$")
    })
}

fn steps_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    cached_pattern(&PATTERN, || {
        r"^steps\(\s*(\d+)\s*(?:,\s*(start|middle|end)\s*)?\)$".to_string()
    })
}

impl FromStr for TimingFunction {
    type Err = CadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || CadenceError::invalid_easing(s);

        match text {
            "linear" => return Ok(Self::Linear),
            "ease" => return Ok(Self::preset(CubicPreset::Ease)),
            "ease-in" => return Ok(Self::preset(CubicPreset::EaseIn)),
            "ease-out" => return Ok(Self::preset(CubicPreset::EaseOut)),
            "ease-in-out" => return Ok(Self::preset(CubicPreset::EaseInOut)),
            "step-start" => return Ok(Self::step(StepPosition::Start)),
            "step-middle" => return Ok(Self::step(StepPosition::Middle)),
            "step-end" => return Ok(Self::step(StepPosition::End)),
            _ => {}
        }

        if let Some(caps) = cubic_bezier_pattern().and_then(|re| re.captures(text)) {
            let mut points = [0.0; 4];
            for (slot, index) in points.iter_mut().zip(1..=4) {
                *slot = caps
                    .get(index)
                    .and_then(|m| m.as_str().parse::<f64>().ok())
                    .ok_or_else(invalid)?;
            }
            let [x1, y1, x2, y2] = points;
            return Self::cubic_bezier(x1, y1, x2, y2).map_err(|_| invalid());
        }

        if let Some(caps) = steps_pattern().and_then(|re| re.captures(text)) {
            let steps = caps
                .get(1)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .ok_or_else(invalid)?;
            let position = match caps.get(2).map(|m| m.as_str()) {
                Some("start") => StepPosition::Start,
                Some("middle") => StepPosition::Middle,
                _ => StepPosition::End,
            };
            return Self::steps(steps, position).map_err(|_| invalid());
        }

        Err(invalid())
    }
}

impl Serialize for TimingFunction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimingFunction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
