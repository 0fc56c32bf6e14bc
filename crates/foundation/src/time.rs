use serde::{Deserialize, Serialize};

/// Host wall-clock timestamp in milliseconds.
///
/// Cooldowns and step timers compare these; the host supplies them each
/// call so behaviour is replayable.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Millis(pub u64);

impl Millis {
    /// Milliseconds elapsed since `earlier`, zero if the clock went backwards.
    pub fn since(self, earlier: Millis) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    pub fn after(self, ms: u64) -> Millis {
        Millis(self.0.saturating_add(ms))
    }
}
