use crate::exchange::Outcome;

/// Run-wide tallies, owned by the run loop and updated exactly once per
/// resolved trial.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunCounters {
    pub ok: u64,
    pub failed: u64,
    pub timeout: u64,
}

impl RunCounters {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Ok => self.ok += 1,
            Outcome::Mismatch => self.failed += 1,
            Outcome::Timeout => self.timeout += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.ok + self.failed + self.timeout
    }

    /// None when no trial ever resolved; the percentage is undefined then.
    pub fn success_pct(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            None
        } else {
            Some(self.ok as f64 * 100.0 / total as f64)
        }
    }

    pub fn summary(&self) -> String {
        match self.success_pct() {
            Some(pct) => format!(
                "ok:{} failed:{} timeout:{} success:{:.2}%",
                self.ok, self.failed, self.timeout, pct
            ),
            None => format!(
                "ok:{} failed:{} timeout:{} success:n/a",
                self.ok, self.failed, self.timeout
            ),
        }
    }
}
