use crate::stats;

/// Completed measurements for one corpus: both tools' timed samples plus the
/// corpus identity and file count. Statistics are derived on demand, never
/// stored, so a result can't drift from its samples.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub name: String,
    pub files: usize,
    /// Timed durations in seconds, in trial order. Warmups are not included.
    pub reference_times: Vec<f64>,
    pub candidate_times: Vec<f64>,
}

impl BenchmarkResult {
    pub fn reference_mean(&self) -> f64 {
        stats::mean(&self.reference_times)
    }

    pub fn reference_stdev(&self) -> f64 {
        stats::std_dev(&self.reference_times)
    }

    pub fn candidate_mean(&self) -> f64 {
        stats::mean(&self.candidate_times)
    }

    pub fn candidate_stdev(&self) -> f64 {
        stats::std_dev(&self.candidate_times)
    }

    /// Reference mean over candidate mean; 0.0 when the candidate mean is 0.
    pub fn speedup(&self) -> f64 {
        stats::speedup(self.reference_mean(), self.candidate_mean())
    }
}
