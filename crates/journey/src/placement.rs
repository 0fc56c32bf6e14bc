//! Per-city bridge counts that grow one segment at a time.
//!
//! Increases are staggered on a fixed step delay so each new segment gets
//! its own drop animation and click. Decreases land at once. Every change is
//! reported as a [`PlacementCue`] for the host to turn into sound.

use std::collections::BTreeMap;

use foundation::time::Millis;
use serde::Serialize;
use tracing::debug;

use crate::config::PlacementConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PlacementCue {
    Placed { city: String, count: usize },
    Removed { city: String, count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingSteps {
    target: usize,
    step_delay_ms: u64,
    next_at: Millis,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CityBridges {
    count: usize,
    max: Option<usize>,
    initialized: bool,
    pending: Option<PendingSteps>,
}

#[derive(Debug, Clone, Default)]
pub struct BridgePlacement {
    config: PlacementConfig,
    cities: BTreeMap<String, CityBridges>,
}

impl BridgePlacement {
    pub fn new(config: PlacementConfig) -> Self {
        Self {
            config,
            cities: BTreeMap::new(),
        }
    }

    pub fn count(&self, city: &str) -> usize {
        self.cities.get(city).map_or(0, |c| c.count)
    }

    pub fn max(&self, city: &str) -> Option<usize> {
        self.cities.get(city).and_then(|c| c.max)
    }

    pub fn is_animating(&self, city: &str) -> bool {
        self.cities.get(city).is_some_and(|c| c.pending.is_some())
    }

    pub fn forget(&mut self, city: &str) {
        self.cities.remove(city);
    }

    /// Record the segment capacity for `city`.
    ///
    /// The first time a city is seen its opening chunk is placed right away,
    /// `ceil(max / total_milestones)` clamped to `[1, max]`.
    pub fn set_max(
        &mut self,
        city: &str,
        max: usize,
        total_milestones: usize,
        now: Millis,
    ) -> Vec<PlacementCue> {
        let entry = self.cities.entry(city.to_string()).or_default();
        entry.max = Some(max);
        if entry.initialized {
            return Vec::new();
        }
        entry.initialized = true;

        let chunk = max.div_ceil(total_milestones.max(1)).max(1).min(max);
        debug!(city, max, chunk, "bridge capacity known");
        let delay = self.config.initial_step_delay_ms;
        self.move_towards(city, chunk, delay, now)
    }

    /// Ask for `target` segments on `city` using the regular step delay.
    pub fn request(&mut self, city: &str, target: usize, now: Millis) -> Vec<PlacementCue> {
        let delay = self.config.step_delay_ms;
        self.move_towards(city, target, delay, now)
    }

    fn move_towards(
        &mut self,
        city: &str,
        target: usize,
        step_delay_ms: u64,
        now: Millis,
    ) -> Vec<PlacementCue> {
        let entry = self.cities.entry(city.to_string()).or_default();
        entry.pending = None;

        if target == entry.count {
            return Vec::new();
        }
        if target < entry.count {
            entry.count = target;
            return vec![PlacementCue::Removed {
                city: city.to_string(),
                count: target,
            }];
        }

        entry.count += 1;
        if entry.count < target {
            entry.pending = Some(PendingSteps {
                target,
                step_delay_ms,
                next_at: now.after(step_delay_ms),
            });
        }
        vec![PlacementCue::Placed {
            city: city.to_string(),
            count: entry.count,
        }]
    }

    /// Apply every step that has come due by `now`.
    pub fn tick(&mut self, now: Millis) -> Vec<PlacementCue> {
        let mut cues = Vec::new();
        for (city, entry) in self.cities.iter_mut() {
            while let Some(pending) = entry.pending {
                if now < pending.next_at {
                    break;
                }
                if entry.count >= pending.target {
                    entry.pending = None;
                    break;
                }
                entry.count += 1;
                cues.push(PlacementCue::Placed {
                    city: city.clone(),
                    count: entry.count,
                });
                entry.pending = (entry.count < pending.target).then(|| PendingSteps {
                    next_at: pending.next_at.after(pending.step_delay_ms),
                    ..pending
                });
            }
        }
        cues
    }
}

#[cfg(test)]
mod tests {
    use super::{BridgePlacement, PlacementCue};
    use crate::config::PlacementConfig;
    use foundation::time::Millis;
    use pretty_assertions::assert_eq;

    fn placed(city: &str, count: usize) -> PlacementCue {
        PlacementCue::Placed {
            city: city.to_string(),
            count,
        }
    }

    #[test]
    fn first_capacity_places_initial_chunk() {
        let mut p = BridgePlacement::new(PlacementConfig::default());
        let cues = p.set_max("Tokyo", 12, 6, Millis(0));
        assert_eq!(cues, vec![placed("Tokyo", 1)]);
        assert_eq!(p.max("Tokyo"), Some(12));

        assert!(p.tick(Millis(159)).is_empty());
        assert_eq!(p.tick(Millis(160)), vec![placed("Tokyo", 2)]);
        assert!(!p.is_animating("Tokyo"));

        // Capacity updates after the first do not re-place anything.
        assert!(p.set_max("Tokyo", 14, 6, Millis(500)).is_empty());
        assert_eq!(p.count("Tokyo"), 2);
    }

    #[test]
    fn capacity_of_zero_places_nothing() {
        let mut p = BridgePlacement::new(PlacementConfig::default());
        assert!(p.set_max("Nowhere", 0, 6, Millis(0)).is_empty());
        assert_eq!(p.count("Nowhere"), 0);
    }

    #[test]
    fn increases_step_one_at_a_time() {
        let mut p = BridgePlacement::new(PlacementConfig::default());
        assert_eq!(p.request("Lima", 4, Millis(1_000)), vec![placed("Lima", 1)]);
        assert!(p.is_animating("Lima"));
        assert_eq!(p.tick(Millis(1_180)), vec![placed("Lima", 2)]);
        // A long frame catches up on every step that came due.
        assert_eq!(
            p.tick(Millis(2_000)),
            vec![placed("Lima", 3), placed("Lima", 4)]
        );
        assert_eq!(p.count("Lima"), 4);
        assert!(p.tick(Millis(5_000)).is_empty());
    }

    #[test]
    fn decreases_land_at_once_and_cancel_steps() {
        let mut p = BridgePlacement::new(PlacementConfig::default());
        p.request("Oslo", 6, Millis(0));
        p.tick(Millis(360));
        assert_eq!(p.count("Oslo"), 3);

        let cues = p.request("Oslo", 1, Millis(400));
        assert_eq!(
            cues,
            vec![PlacementCue::Removed {
                city: "Oslo".to_string(),
                count: 1
            }]
        );
        assert!(p.tick(Millis(10_000)).is_empty());
        assert_eq!(p.count("Oslo"), 1);
    }

    #[test]
    fn equal_request_is_silent() {
        let mut p = BridgePlacement::new(PlacementConfig::default());
        p.request("Rome", 1, Millis(0));
        assert!(p.request("Rome", 1, Millis(10)).is_empty());
        assert_eq!(p.count("Rome"), 1);
    }

    #[test]
    fn cities_are_independent() {
        let mut p = BridgePlacement::new(PlacementConfig::default());
        p.request("A", 2, Millis(0));
        p.request("B", 3, Millis(0));
        let cues = p.tick(Millis(180));
        assert_eq!(cues, vec![placed("A", 2), placed("B", 2)]);
        p.forget("A");
        assert_eq!(p.count("A"), 0);
        assert_eq!(p.count("B"), 2);
    }
}
