//! Stateful per-frame driver around the pure timing calculation.

use super::calculations::{calculate, time_to_effect_change, Phase, TimingResult, TimingUpdateReason};
use super::Timing;
use tracing::debug;

/// Notification hook invoked by [`AnimationNode`] on frame updates.
///
/// The node borrows the delegate for the duration of one update only.
pub trait EventDelegate {
    /// Called when the phase (or, if requested, the iteration) changed since
    /// the previous frame update, and on the first frame update.
    fn on_event_condition(&mut self, result: &TimingResult);

    /// Whether iteration changes should also raise event conditions.
    fn requires_iteration_events(&self) -> bool {
        false
    }
}

/// Computes how long the output of an effect stays unchanged.
pub trait EffectChange {
    /// Local time until the next change, looking `forwards` or in reverse.
    fn calculate_time_to_effect_change(
        &self,
        forwards: bool,
        local_time: f64,
        time_to_next_iteration: f64,
    ) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct FrameSnapshot {
    phase: Phase,
    current_iteration: Option<f64>,
}

/// A single timed effect driven by successive local times.
///
/// Caches the latest [`TimingResult`] and the time until the next effect
/// change in each direction. The timing itself is never mutated.
#[derive(Debug, Clone)]
pub struct AnimationNode {
    timing: Timing,
    calculated: Option<TimingResult>,
    last_frame: Option<FrameSnapshot>,
    requires_iteration_events: bool,
    time_to_forwards_effect_change: f64,
    time_to_reverse_effect_change: f64,
}

impl AnimationNode {
    /// Create a node that has not been updated yet
    #[must_use]
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            calculated: None,
            last_frame: None,
            requires_iteration_events: false,
            time_to_forwards_effect_change: f64::INFINITY,
            time_to_reverse_effect_change: f64::INFINITY,
        }
    }

    /// Timing configuration
    #[must_use]
    pub const fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Recalculate at `local_time`.
    ///
    /// `ForAnimationFrame` updates notify `delegate` when an event condition
    /// is met. `OnDemand` updates never notify and do not advance the
    /// frame-to-frame comparison.
    pub fn update_inherited_time(
        &mut self,
        local_time: f64,
        reason: TimingUpdateReason,
        delegate: Option<&mut dyn EventDelegate>,
    ) -> &TimingResult {
        let result = calculate(&self.timing, local_time, reason);
        self.requires_iteration_events = delegate
            .as_ref()
            .is_some_and(|d| d.requires_iteration_events());

        let effect_change = |forwards| {
            time_to_effect_change(
                &self.timing,
                result.phase,
                forwards,
                local_time,
                result.time_to_next_iteration,
                self.requires_iteration_events,
            )
        };
        let forwards = effect_change(true);
        let reverse = effect_change(false);
        self.time_to_forwards_effect_change = forwards;
        self.time_to_reverse_effect_change = reverse;

        if reason == TimingUpdateReason::ForAnimationFrame {
            let snapshot = FrameSnapshot {
                phase: result.phase,
                current_iteration: result.current_iteration,
            };
            let fire = match self.last_frame {
                None => true,
                Some(previous) => {
                    previous.phase != snapshot.phase
                        || (self.requires_iteration_events
                            && previous.current_iteration != snapshot.current_iteration)
                }
            };
            self.last_frame = Some(snapshot);
            if fire {
                if let Some(delegate) = delegate {
                    debug!(
                        local_time,
                        phase = %result.phase,
                        current_iteration = ?result.current_iteration,
                        "event condition"
                    );
                    delegate.on_event_condition(&result);
                }
            }
        }

        self.calculated.insert(result)
    }

    /// Latest calculation, if any update has happened
    #[must_use]
    pub const fn result(&self) -> Option<&TimingResult> {
        self.calculated.as_ref()
    }

    /// Phase of the latest calculation
    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        self.calculated.map(|r| r.phase)
    }

    /// Whether the latest calculation was in play
    #[must_use]
    pub fn is_in_play(&self) -> bool {
        self.calculated.is_some_and(|r| r.is_in_play)
    }

    /// Whether the latest calculation was current
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.calculated.is_some_and(|r| r.is_current)
    }

    /// Whether the latest calculation was in effect
    #[must_use]
    pub fn is_in_effect(&self) -> bool {
        self.calculated.is_some_and(|r| r.is_in_effect)
    }

    /// Current iteration of the latest calculation
    #[must_use]
    pub fn current_iteration(&self) -> Option<f64> {
        self.calculated.and_then(|r| r.current_iteration)
    }

    /// Time fraction of the latest calculation
    #[must_use]
    pub fn time_fraction(&self) -> Option<f64> {
        self.calculated.and_then(|r| r.time_fraction)
    }

    /// Local time until the output changes with time flowing forwards
    #[must_use]
    pub const fn time_to_forwards_effect_change(&self) -> f64 {
        self.time_to_forwards_effect_change
    }

    /// Local time until the output changes with time flowing backwards
    #[must_use]
    pub const fn time_to_reverse_effect_change(&self) -> f64 {
        self.time_to_reverse_effect_change
    }
}

impl EffectChange for AnimationNode {
    fn calculate_time_to_effect_change(
        &self,
        forwards: bool,
        local_time: f64,
        time_to_next_iteration: f64,
    ) -> f64 {
        let Some(result) = self.calculated else {
            return f64::INFINITY;
        };
        time_to_effect_change(
            &self.timing,
            result.phase,
            forwards,
            local_time,
            time_to_next_iteration,
            self.requires_iteration_events,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::timing::FillMode;

    #[derive(Default)]
    struct Recorder {
        fired: usize,
        iteration_events: bool,
    }

    impl EventDelegate for Recorder {
        fn on_event_condition(&mut self, _result: &TimingResult) {
            self.fired += 1;
        }

        fn requires_iteration_events(&self) -> bool {
            self.iteration_events
        }
    }

    fn events_timing() -> Timing {
        Timing::new()
            .with_duration(1.0)
            .with_fill(FillMode::Forwards)
            .with_iterations(2.0)
            .with_start_delay(1.0)
    }

    #[test]
    fn test_on_demand_never_fires() {
        let mut node = AnimationNode::new(events_timing());
        let mut recorder = Recorder::default();
        node.update_inherited_time(0.0, TimingUpdateReason::OnDemand, Some(&mut recorder));
        node.update_inherited_time(1.5, TimingUpdateReason::OnDemand, Some(&mut recorder));
        assert_eq!(recorder.fired, 0);
    }

    #[test]
    fn test_first_frame_fires() {
        let mut node = AnimationNode::new(events_timing());
        let mut recorder = Recorder::default();
        node.update_inherited_time(0.0, TimingUpdateReason::ForAnimationFrame, Some(&mut recorder));
        assert_eq!(recorder.fired, 1);
    }

    #[test]
    fn test_same_phase_does_not_refire() {
        let mut node = AnimationNode::new(events_timing());
        let mut recorder = Recorder::default();
        node.update_inherited_time(1.2, TimingUpdateReason::ForAnimationFrame, Some(&mut recorder));
        node.update_inherited_time(1.4, TimingUpdateReason::ForAnimationFrame, Some(&mut recorder));
        assert_eq!(recorder.fired, 1);
    }

    #[test]
    fn test_iteration_change_needs_opt_in() {
        let mut node = AnimationNode::new(events_timing());
        let mut quiet = Recorder::default();
        node.update_inherited_time(1.5, TimingUpdateReason::ForAnimationFrame, Some(&mut quiet));
        node.update_inherited_time(2.5, TimingUpdateReason::ForAnimationFrame, Some(&mut quiet));
        assert_eq!(quiet.fired, 1);

        let mut node = AnimationNode::new(events_timing());
        let mut eager = Recorder {
            iteration_events: true,
            ..Recorder::default()
        };
        node.update_inherited_time(1.5, TimingUpdateReason::ForAnimationFrame, Some(&mut eager));
        node.update_inherited_time(2.5, TimingUpdateReason::ForAnimationFrame, Some(&mut eager));
        assert_eq!(eager.fired, 2);
    }

    #[test]
    fn test_effect_change_cached() {
        let mut node = AnimationNode::new(events_timing());
        node.update_inherited_time(0.25, TimingUpdateReason::OnDemand, None);
        assert_eq!(node.phase(), Some(Phase::Before));
        assert_eq!(node.time_to_forwards_effect_change(), 0.75);
        assert!(node.time_to_reverse_effect_change().is_infinite());

        node.update_inherited_time(1.5, TimingUpdateReason::OnDemand, None);
        assert_eq!(node.time_to_forwards_effect_change(), 1.5);
        assert_eq!(node.time_to_reverse_effect_change(), 0.0);
    }

    #[test]
    fn test_accessors_before_update() {
        let node = AnimationNode::new(events_timing());
        assert!(node.result().is_none());
        assert!(!node.is_in_effect());
        assert_eq!(node.time_fraction(), None);
        assert!(node.calculate_time_to_effect_change(true, 0.0, 0.0).is_infinite());
    }
}
