//! Discrete milestone navigation driven by wheel and button events.

use foundation::time::Millis;
use tracing::trace;

use crate::config::NavigationConfig;

/// Bridge count that should be standing once milestone `index` is reached.
///
/// The first milestone gets an initial chunk of `ceil(max / total)`; the
/// rest of the capacity is spread evenly over the remaining transitions.
pub fn planned_bridge_count(index: usize, max_count: usize, total_milestones: usize) -> usize {
    let total = total_milestones.max(1);
    let initial_chunk = max_count.div_ceil(total);
    let remaining = max_count - initial_chunk.min(max_count);
    let transitions = (total - 1).max(1);
    let increments = index * remaining / transitions;
    max_count.min(initial_chunk + increments)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone)]
pub struct MilestoneNavigator {
    config: NavigationConfig,
    total: usize,
    index: usize,
    displayed_index: usize,
    previous_index: usize,
    direction: Direction,
    transition_started_at: Option<Millis>,
    // Shared by buttons and wheel so neither can double-trigger the other.
    last_trigger: Option<Millis>,
}

impl MilestoneNavigator {
    /// `milestone_count == 0` falls back to the configured default.
    pub fn new(milestone_count: usize, config: NavigationConfig) -> Self {
        let total = if milestone_count == 0 {
            config.default_milestones.max(1)
        } else {
            milestone_count
        };
        Self {
            config,
            total,
            index: 0,
            displayed_index: 0,
            previous_index: 0,
            direction: Direction::Forward,
            transition_started_at: None,
            last_trigger: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn displayed_index(&self) -> usize {
        self.displayed_index
    }

    pub fn previous_index(&self) -> usize {
        self.previous_index
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition_started_at.is_some()
    }

    fn cooling_down(&self, now: Millis, cooldown_ms: u64) -> bool {
        self.last_trigger
            .is_some_and(|last| now.since(last) < cooldown_ms)
    }

    /// Button "next". Returns the new index when it changed.
    pub fn next(&mut self, now: Millis) -> Option<usize> {
        self.button(now, self.index.saturating_add(1).min(self.total - 1))
    }

    /// Button "previous". Returns the new index when it changed.
    pub fn prev(&mut self, now: Millis) -> Option<usize> {
        self.button(now, self.index.saturating_sub(1))
    }

    // Buttons arm the cooldown even when already at an end.
    fn button(&mut self, now: Millis, target: usize) -> Option<usize> {
        if self.cooling_down(now, self.config.button_cooldown_ms) {
            trace!("milestone button ignored during cooldown");
            return None;
        }
        self.last_trigger = Some(now);
        self.go_to(target, now)
    }

    /// Scroll wheel: one milestone per accepted event.
    pub fn wheel(&mut self, delta_y: f64, now: Millis) -> Option<usize> {
        if delta_y.is_nan() || delta_y.abs() < self.config.wheel_min_delta {
            return None;
        }
        let target = if delta_y > 0.0 {
            self.index.saturating_add(1).min(self.total - 1)
        } else {
            self.index.saturating_sub(1)
        };
        if target == self.index {
            return None;
        }
        if self.cooling_down(now, self.config.wheel_cooldown_ms) {
            trace!("wheel ignored during cooldown");
            return None;
        }
        self.last_trigger = Some(now);
        self.go_to(target, now)
    }

    fn go_to(&mut self, target: usize, now: Millis) -> Option<usize> {
        if target == self.index {
            return None;
        }
        self.index = target;
        if self.index != self.displayed_index {
            self.previous_index = self.displayed_index;
            self.direction = if self.index > self.displayed_index {
                Direction::Forward
            } else {
                Direction::Backward
            };
            self.transition_started_at = Some(now);
        } else {
            self.transition_started_at = None;
        }
        Some(target)
    }

    /// Completes a pending display transition once it has run its course.
    pub fn tick(&mut self, now: Millis) {
        if let Some(started) = self.transition_started_at {
            if now.since(started) >= self.config.transition_ms {
                self.displayed_index = self.index;
                self.transition_started_at = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, MilestoneNavigator, planned_bridge_count};
    use crate::config::NavigationConfig;
    use foundation::time::Millis;

    fn nav(total: usize) -> MilestoneNavigator {
        MilestoneNavigator::new(total, NavigationConfig::default())
    }

    #[test]
    fn planned_count_spreads_capacity() {
        // 12 segments over 6 milestones: chunk of 2, then 10 over 5 steps.
        let counts: Vec<usize> = (0..6).map(|i| planned_bridge_count(i, 12, 6)).collect();
        assert_eq!(counts, vec![2, 4, 6, 8, 10, 12]);

        let counts: Vec<usize> = (0..4).map(|i| planned_bridge_count(i, 10, 4)).collect();
        assert_eq!(counts, vec![3, 5, 7, 10]);
    }

    #[test]
    fn planned_count_edge_cases() {
        assert_eq!(planned_bridge_count(0, 0, 6), 0);
        assert_eq!(planned_bridge_count(3, 0, 6), 0);
        assert_eq!(planned_bridge_count(0, 7, 1), 7);
        assert_eq!(planned_bridge_count(0, 7, 0), 7);
        assert_eq!(planned_bridge_count(40, 9, 3), 9);
    }

    #[test]
    fn zero_milestones_uses_default_total() {
        assert_eq!(nav(0).total(), 6);
        assert_eq!(nav(3).total(), 3);
    }

    #[test]
    fn buttons_clamp_and_cool_down() {
        let mut n = nav(3);
        assert_eq!(n.prev(Millis(0)), None);
        // The failed prev still armed the cooldown.
        assert_eq!(n.next(Millis(100)), None);
        assert_eq!(n.next(Millis(450)), Some(1));
        assert_eq!(n.next(Millis(900)), Some(2));
        assert_eq!(n.next(Millis(1_400)), None);
        assert_eq!(n.index(), 2);
        assert_eq!(n.prev(Millis(1_500)), None);
        assert_eq!(n.prev(Millis(1_850)), Some(1));
    }

    #[test]
    fn wheel_threshold_and_cooldown() {
        let mut n = nav(4);
        assert_eq!(n.wheel(1.5, Millis(0)), None);
        assert_eq!(n.wheel(-30.0, Millis(0)), None);
        assert_eq!(n.wheel(30.0, Millis(0)), Some(1));
        assert_eq!(n.wheel(30.0, Millis(999)), None);
        assert_eq!(n.wheel(30.0, Millis(1_000)), Some(2));
        assert_eq!(n.wheel(-3.0, Millis(2_000)), Some(1));
    }

    #[test]
    fn wheel_at_end_does_not_arm_cooldown() {
        let mut n = nav(2);
        assert_eq!(n.wheel(10.0, Millis(0)), Some(1));
        assert_eq!(n.wheel(10.0, Millis(1_200)), None);
        // Going back right after the no-op is still allowed.
        assert_eq!(n.wheel(-10.0, Millis(1_300)), Some(0));
    }

    #[test]
    fn display_transition_completes_after_delay() {
        let mut n = nav(5);
        n.next(Millis(0));
        assert!(n.is_transitioning());
        assert_eq!(n.displayed_index(), 0);
        assert_eq!(n.previous_index(), 0);
        assert_eq!(n.direction(), Direction::Forward);
        n.tick(Millis(449));
        assert_eq!(n.displayed_index(), 0);
        n.tick(Millis(450));
        assert!(!n.is_transitioning());
        assert_eq!(n.displayed_index(), 1);

        n.prev(Millis(1_000));
        assert_eq!(n.direction(), Direction::Backward);
        assert_eq!(n.previous_index(), 1);
    }
}
