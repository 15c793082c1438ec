//! Keyframe effect model.
//!
//! A keyframe list is compiled once into an [`IntervalSet`]: one interval per
//! property per adjacent keyframe pair. The outermost intervals are unbounded
//! on their open side so fractions outside `[0, 1]` (produced by eased or
//! overshooting timing) extrapolate from the nearest pair.
//!
//! ```text
//! offsets   0 ........ 0.4 .............. 1
//! pair 0   [-inf ----- 0.4)
//! pair 1               [0.4 ------------- +inf)
//! ```

use crate::easing::{EasingTable, SharedEasing};
use crate::interpolation::{IntervalSet, Interpolable};
use crate::result::{CadenceError, CadenceResult};
use crate::sampler::EffectModel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// A keyframe as written in a document.
///
/// Every key other than `offset` and `easing` is a numeric property.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeyframeInput {
    /// Position in `[0, 1]`; distributed evenly when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
    /// Easing towards the next keyframe, `linear` when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,
    /// Property values
    #[serde(flatten)]
    pub properties: BTreeMap<String, f64>,
}

/// A resolved keyframe.
#[derive(Debug, Clone)]
pub struct Keyframe {
    /// Position in `[0, 1]`
    pub offset: f64,
    /// Easing applied between this keyframe and the next
    pub easing: SharedEasing,
    /// Property values
    pub values: BTreeMap<String, f64>,
}

impl Keyframe {
    /// Keyframe with linear easing
    #[must_use]
    pub fn new(offset: f64, values: BTreeMap<String, f64>) -> Self {
        Self {
            offset,
            easing: EasingTable::global().linear(),
            values,
        }
    }

    /// Replace the easing
    #[must_use]
    pub fn with_easing(mut self, easing: SharedEasing) -> Self {
        self.easing = easing;
        self
    }
}

/// One property value produced by sampling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyValue {
    /// Property name
    pub property: String,
    /// Interpolated value
    pub value: f64,
}

/// Interval payload blending one property between two keyframes.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInterpolation {
    /// Property name
    pub property: String,
    /// Value at the earlier keyframe
    pub from: f64,
    /// Value at the later keyframe
    pub to: f64,
}

impl Interpolable for PropertyInterpolation {
    type Value = PropertyValue;

    fn interpolate(&self, fraction: f64) -> PropertyValue {
        PropertyValue {
            property: self.property.clone(),
            value: self.from + (self.to - self.from) * fraction,
        }
    }
}

/// Keyframes compiled into interpolation intervals.
#[derive(Debug, Clone, Default)]
pub struct KeyframeEffectModel {
    keyframes: Vec<Keyframe>,
    intervals: IntervalSet<PropertyInterpolation>,
}

impl KeyframeEffectModel {
    /// Validate `keyframes` and compile them.
    ///
    /// An empty list is accepted and samples to nothing.
    pub fn new(keyframes: Vec<Keyframe>) -> CadenceResult<Self> {
        validate(&keyframes)?;
        let intervals = compile(&keyframes);
        trace!(
            keyframes = keyframes.len(),
            intervals = intervals.len(),
            "keyframes compiled"
        );
        Ok(Self {
            keyframes,
            intervals,
        })
    }

    /// Resolve offsets and easing text, then compile.
    pub fn from_inputs(inputs: &[KeyframeInput]) -> CadenceResult<Self> {
        let offsets = distribute_offsets(inputs)?;
        let table = EasingTable::global();
        let keyframes = inputs
            .iter()
            .zip(offsets)
            .map(|(input, offset)| {
                let easing = match input.easing.as_deref() {
                    Some(text) => table.resolve(text)?,
                    None => table.linear(),
                };
                Ok(Keyframe {
                    offset,
                    easing,
                    values: input.properties.clone(),
                })
            })
            .collect::<CadenceResult<Vec<_>>>()?;
        Self::new(keyframes)
    }

    /// Resolved keyframes
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Compiled intervals
    pub fn intervals(&self) -> &IntervalSet<PropertyInterpolation> {
        &self.intervals
    }

    /// Animated property names, sorted
    pub fn properties(&self) -> impl Iterator<Item = &str> + '_ {
        self.keyframes
            .first()
            .into_iter()
            .flat_map(|keyframe| keyframe.values.keys().map(String::as_str))
    }
}

impl EffectModel for KeyframeEffectModel {
    type Output = PropertyValue;

    fn sample(
        &self,
        _iteration: i32,
        time_fraction: f64,
        iteration_duration: f64,
    ) -> Vec<PropertyValue> {
        self.intervals
            .active_intervals_at(time_fraction, iteration_duration)
            .map(|sampled| sampled.value)
            .collect()
    }
}

/// Fill in missing offsets.
///
/// The last keyframe defaults to `1`, the first (when there is more than
/// one) to `0`, and gaps are spread evenly between known neighbours.
fn distribute_offsets(inputs: &[KeyframeInput]) -> CadenceResult<Vec<f64>> {
    let mut specified: Vec<Option<f64>> = inputs.iter().map(|input| input.offset).collect();
    let mut previous = f64::NEG_INFINITY;
    for offset in specified.iter().flatten() {
        check_offset(*offset)?;
        if *offset < previous {
            return Err(CadenceError::invalid_keyframes(
                "offsets must be non-decreasing",
            ));
        }
        previous = *offset;
    }

    let Some(last) = specified.last_mut() else {
        return Ok(Vec::new());
    };
    if last.is_none() {
        *last = Some(1.0);
    }
    if specified.len() > 1 && specified[0].is_none() {
        specified[0] = Some(0.0);
    }

    let mut offsets = Vec::with_capacity(specified.len());
    let mut last_index = 0;
    let mut last_offset = specified[0].unwrap_or(0.0);
    offsets.push(last_offset);
    for (index, offset) in specified.iter().enumerate().skip(1) {
        let Some(offset) = *offset else {
            continue;
        };
        let gap = index - last_index;
        for step in 1..gap {
            offsets.push(last_offset + (offset - last_offset) * step as f64 / gap as f64);
        }
        offsets.push(offset);
        last_index = index;
        last_offset = offset;
    }
    Ok(offsets)
}

fn check_offset(offset: f64) -> CadenceResult<()> {
    if !offset.is_finite() || !(0.0..=1.0).contains(&offset) {
        return Err(CadenceError::invalid_keyframes(format!(
            "offset {offset} is outside [0, 1]"
        )));
    }
    Ok(())
}

fn validate(keyframes: &[Keyframe]) -> CadenceResult<()> {
    let (Some(first), Some(last)) = (keyframes.first(), keyframes.last()) else {
        return Ok(());
    };
    for pair in keyframes.windows(2) {
        if pair[1].offset < pair[0].offset {
            return Err(CadenceError::invalid_keyframes(
                "offsets must be non-decreasing",
            ));
        }
    }
    for keyframe in keyframes {
        check_offset(keyframe.offset)?;
    }
    if first.offset != 0.0 {
        return Err(CadenceError::invalid_keyframes(
            "the first keyframe must have offset 0",
        ));
    }
    if last.offset != 1.0 {
        return Err(CadenceError::invalid_keyframes(
            "the last keyframe must have offset 1",
        ));
    }

    for keyframe in &keyframes[1..] {
        if keyframe.values.keys().ne(first.values.keys()) {
            return Err(CadenceError::invalid_keyframes(format!(
                "keyframe at offset {} does not animate the same properties as the first",
                keyframe.offset
            )));
        }
    }
    Ok(())
}

fn compile(keyframes: &[Keyframe]) -> IntervalSet<PropertyInterpolation> {
    let mut intervals = IntervalSet::new();
    let Some(first) = keyframes.first() else {
        return intervals;
    };
    let pairs = keyframes.len().saturating_sub(1);
    for property in first.values.keys() {
        for (index, pair) in keyframes.windows(2).enumerate() {
            let (a, b) = (&pair[0], &pair[1]);
            let (Some(&from), Some(&to)) = (a.values.get(property), b.values.get(property)) else {
                continue;
            };
            let apply_from = if index == 0 {
                f64::NEG_INFINITY
            } else {
                a.offset
            };
            let apply_to = if index + 1 == pairs || b.offset == 1.0 {
                f64::INFINITY
            } else {
                b.offset
            };
            let easing = (!a.easing.is_linear()).then(|| a.easing.clone());
            intervals.add_interval(
                PropertyInterpolation {
                    property: property.clone(),
                    from,
                    to,
                },
                easing,
                apply_from,
                apply_to,
                a.offset,
                b.offset,
            );
        }
    }
    intervals
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input(offset: Option<f64>, pairs: &[(&str, f64)]) -> KeyframeInput {
        KeyframeInput {
            offset,
            easing: None,
            properties: pairs
                .iter()
                .map(|(name, value)| ((*name).to_string(), *value))
                .collect(),
        }
    }

    fn values(model: &KeyframeEffectModel, fraction: f64) -> Vec<(String, f64)> {
        model
            .sample(0, fraction, 1.0)
            .into_iter()
            .map(|v| (v.property, v.value))
            .collect()
    }

    #[test]
    fn test_two_keyframes() {
        let model = KeyframeEffectModel::from_inputs(&[
            input(Some(0.0), &[("width", 100.0)]),
            input(Some(1.0), &[("width", 0.0)]),
        ])
        .unwrap();
        assert_eq!(model.intervals().len(), 1);
        assert_eq!(values(&model, 0.25), vec![("width".to_string(), 75.0)]);
        assert_eq!(values(&model, 1.5), vec![("width".to_string(), -50.0)]);
        assert_eq!(values(&model, -0.5), vec![("width".to_string(), 150.0)]);
    }

    #[test]
    fn test_offsets_distributed() {
        let offsets = distribute_offsets(&[
            input(None, &[("x", 0.0)]),
            input(None, &[("x", 1.0)]),
            input(Some(0.5), &[("x", 2.0)]),
            input(None, &[("x", 3.0)]),
            input(None, &[("x", 4.0)]),
        ])
        .unwrap();
        assert_eq!(offsets, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_single_unplaced_keyframe_rejected() {
        let result = KeyframeEffectModel::from_inputs(&[input(None, &[("x", 1.0)])]);
        assert!(matches!(result, Err(CadenceError::InvalidKeyframes { .. })));
    }

    #[test]
    fn test_missing_offset_zero_rejected() {
        let result = KeyframeEffectModel::from_inputs(&[
            input(Some(0.1), &[("width", 100.0)]),
            input(Some(1.0), &[("width", 0.0)]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_offset_one_rejected() {
        let result = KeyframeEffectModel::from_inputs(&[
            input(Some(0.0), &[("width", 100.0)]),
            input(Some(0.1), &[("width", 0.0)]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_offset_zero_and_one_rejected() {
        let result = KeyframeEffectModel::from_inputs(&[
            input(Some(0.1), &[("width", 100.0)]),
            input(Some(0.2), &[("width", 0.0)]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_mismatched_properties_rejected() {
        let result = KeyframeEffectModel::from_inputs(&[
            input(Some(0.0), &[("width", 100.0)]),
            input(Some(1.0), &[("height", 100.0), ("width", 0.0)]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_decreasing_offsets_rejected() {
        let result = KeyframeEffectModel::from_inputs(&[
            input(Some(0.0), &[("x", 0.0)]),
            input(Some(0.6), &[("x", 1.0)]),
            input(Some(0.4), &[("x", 2.0)]),
            input(Some(1.0), &[("x", 3.0)]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_out_of_range_offset_rejected() {
        let result = KeyframeEffectModel::from_inputs(&[
            input(Some(0.0), &[("x", 0.0)]),
            input(Some(1.5), &[("x", 1.0)]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_samples_nothing() {
        let model = KeyframeEffectModel::from_inputs(&[]).unwrap();
        assert!(model.intervals().is_empty());
        assert!(values(&model, 0.5).is_empty());
    }

    #[test]
    fn test_three_keyframes_windows() {
        let model = KeyframeEffectModel::from_inputs(&[
            input(Some(0.0), &[("x", 0.0)]),
            input(Some(0.4), &[("x", 4.0)]),
            input(Some(1.0), &[("x", 10.0)]),
        ])
        .unwrap();
        let windows: Vec<_> = model
            .intervals()
            .intervals()
            .iter()
            .map(|interval| interval.apply_window())
            .collect();
        assert_eq!(
            windows,
            vec![(f64::NEG_INFINITY, 0.4), (0.4, f64::INFINITY)]
        );
        assert_eq!(values(&model, 0.2), vec![("x".to_string(), 2.0)]);
        assert_eq!(values(&model, 0.4), vec![("x".to_string(), 4.0)]);
        assert_eq!(values(&model, 0.7), vec![("x".to_string(), 7.0)]);
    }

    #[test]
    fn test_properties_sorted_per_pair() {
        let model = KeyframeEffectModel::from_inputs(&[
            input(Some(0.0), &[("width", 0.0), ("height", 10.0)]),
            input(Some(1.0), &[("width", 10.0), ("height", 0.0)]),
        ])
        .unwrap();
        let names: Vec<_> = model.properties().collect();
        assert_eq!(names, vec!["height", "width"]);
        assert_eq!(
            values(&model, 0.5),
            vec![("height".to_string(), 5.0), ("width".to_string(), 5.0)]
        );
    }

    #[test]
    fn test_keyframe_easing_resolved() {
        let mut first = input(Some(0.0), &[("x", 0.0)]);
        first.easing = Some("step-end".to_string());
        let model =
            KeyframeEffectModel::from_inputs(&[first, input(Some(1.0), &[("x", 10.0)])]).unwrap();
        assert_eq!(values(&model, 0.9), vec![("x".to_string(), 0.0)]);
        assert!(model.intervals().intervals()[0].easing().is_some());
    }

    #[test]
    fn test_linear_easing_not_attached() {
        let model = KeyframeEffectModel::from_inputs(&[
            input(Some(0.0), &[("x", 0.0)]),
            input(Some(1.0), &[("x", 1.0)]),
        ])
        .unwrap();
        assert!(model.intervals().intervals()[0].easing().is_none());
    }

    #[test]
    fn test_bad_easing_text() {
        let mut first = input(Some(0.0), &[("x", 0.0)]);
        first.easing = Some("bounce".to_string());
        let result = KeyframeEffectModel::from_inputs(&[first, input(Some(1.0), &[("x", 1.0)])]);
        assert!(matches!(result, Err(CadenceError::InvalidEasing { .. })));
    }

    #[test]
    fn test_input_deserializes_flattened_properties() {
        let parsed: KeyframeInput =
            serde_json::from_str(r#"{"offset": 0.5, "easing": "ease", "opacity": 1}"#).unwrap();
        assert_eq!(parsed.offset, Some(0.5));
        assert_eq!(parsed.easing.as_deref(), Some("ease"));
        assert_eq!(parsed.properties.get("opacity"), Some(&1.0));
    }

    #[test]
    fn test_new_validates_resolved_keyframes() {
        let frames = vec![
            Keyframe::new(0.0, BTreeMap::from([("x".to_string(), 0.0)])),
            Keyframe::new(1.0, BTreeMap::from([("x".to_string(), 2.0)])),
        ];
        let model = KeyframeEffectModel::new(frames).unwrap();
        assert_eq!(model.keyframes().len(), 2);

        let reversed = vec![
            Keyframe::new(1.0, BTreeMap::from([("x".to_string(), 0.0)])),
            Keyframe::new(0.0, BTreeMap::from([("x".to_string(), 2.0)])),
        ];
        assert!(KeyframeEffectModel::new(reversed).is_err());
    }
}
