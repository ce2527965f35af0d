//! Monotonic trend detection.
//!
//! Holt's method only joins the ensemble when recent demand shows a
//! consistent rise or decline. The test is Mann-Kendall's tau over the last
//! few periods: the share of concordant minus discordant pairs.

/// Direction of a detected trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    NoTrend,
}

/// Mann-Kendall tau in [-1, 1].
///
/// Ties count as neither concordant nor discordant. Returns 0 for fewer than
/// two values.
pub fn mann_kendall_tau(series: &[f64]) -> f64 {
    let n = series.len();
    if n < 2 {
        return 0.0;
    }

    let mut s: i64 = 0;
    for i in 0..n - 1 {
        for j in i + 1..n {
            let diff = series[j] - series[i];
            if diff > 0.0 {
                s += 1;
            } else if diff < 0.0 {
                s -= 1;
            }
        }
    }

    let pairs = (n * (n - 1) / 2) as f64;
    s as f64 / pairs
}

/// Trend test over the most recent periods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendTest {
    /// Number of recent periods examined.
    pub window: usize,
    /// Minimum |tau| for a trend to count.
    pub min_strength: f64,
}

impl TrendTest {
    /// Fewest periods the test will judge.
    pub const MIN_PERIODS: usize = 4;

    pub fn new(window: usize, min_strength: f64) -> Self {
        Self {
            window,
            min_strength,
        }
    }

    pub fn detect(&self, history: &[f64]) -> TrendDirection {
        let recent = &history[history.len().saturating_sub(self.window)..];
        if recent.len() < Self::MIN_PERIODS {
            return TrendDirection::NoTrend;
        }

        let tau = mann_kendall_tau(recent);
        if tau >= self.min_strength {
            TrendDirection::Increasing
        } else if tau <= -self.min_strength {
            TrendDirection::Decreasing
        } else {
            TrendDirection::NoTrend
        }
    }

    pub fn passes(&self, history: &[f64]) -> bool {
        self.detect(history) != TrendDirection::NoTrend
    }
}

impl Default for TrendTest {
    fn default() -> Self {
        Self::new(6, 0.6)
    }
}
