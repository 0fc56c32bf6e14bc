/// The two independently advancing progress terms.
///
/// Milestone navigation and bridge placement move at different paces. The
/// camera follows whichever is further ahead so it never stalls behind the
/// slower one.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ProgressSignal {
    pub milestone_progress: f64,
    pub bridge_progress: f64,
}

impl ProgressSignal {
    /// Terms with a zero denominator contribute 0.
    pub fn from_counters(
        milestone_index: usize,
        total_milestones: usize,
        segment_count: usize,
        max_segments: usize,
    ) -> Self {
        Self {
            milestone_progress: ratio(milestone_index + 1, total_milestones),
            bridge_progress: ratio(segment_count, max_segments),
        }
    }

    pub fn value(self) -> f64 {
        self.milestone_progress.max(self.bridge_progress)
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    (numerator as f64 / denominator as f64).clamp(0.0, 1.0)
}

/// Normalized progress in [0, 1] from milestone and segment counters.
pub fn compute_progress(
    milestone_index: usize,
    total_milestones: usize,
    segment_count: usize,
    max_segments: usize,
) -> f64 {
    ProgressSignal::from_counters(milestone_index, total_milestones, segment_count, max_segments)
        .value()
}
