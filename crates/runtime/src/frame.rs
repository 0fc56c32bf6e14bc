use foundation::time::Millis;

/// Per-frame metadata handed to everything that animates.
///
/// `now` is the host clock at the start of the frame. Fixed-step frames derive
/// it from the index so a run can be recorded and replayed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta time since the previous frame (seconds).
    pub dt_s: f64,
    /// Host clock at the start of the frame.
    pub now: Millis,
}

impl Frame {
    /// Frame on a fixed timestep starting at clock zero.
    pub fn fixed(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            now: Millis((index as f64 * dt_s * 1000.0).round() as u64),
        }
    }

    /// Frame stamped with an externally supplied clock.
    pub fn at(index: u64, dt_s: f64, now: Millis) -> Self {
        Self { index, dt_s, now }
    }

    pub fn next(self) -> Self {
        Self {
            index: self.index + 1,
            dt_s: self.dt_s,
            now: self.now.after((self.dt_s * 1000.0).round() as u64),
        }
    }
}
