//! Subtask progress counters.

/// Completed/expected subtask counters for one run.
///
/// A run is either **determinate** (`expected` known up front, `completed`
/// clamped to it) or **indeterminate** (`expected` unknown, `completed`
/// counts freely and [`percent`](Progress::percent) is unavailable).
///
/// # Example
/// ```
/// use taskpulse::Progress;
///
/// let mut p = Progress::with_expected(3);
/// p.advance(2);
/// assert_eq!(p.completed(), 2);
/// assert!(p.percent().unwrap() > 66.0);
///
/// // Over-reporting clamps at the expected count.
/// p.advance(5);
/// assert_eq!(p.completed(), 3);
/// assert_eq!(p.percent(), Some(100.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    expected: Option<u32>,
    completed: u32,
}

impl Progress {
    /// A run with an unknown amount of work.
    ///
    /// Same as `Progress::default()`.
    pub fn indeterminate() -> Self {
        Self::default()
    }

    /// A run expecting exactly `expected` subtasks.
    pub fn with_expected(expected: u32) -> Self {
        Self {
            expected: Some(expected),
            completed: 0,
        }
    }

    /// Restarts the counters for a new run.
    pub fn reset(&mut self, expected: Option<u32>) {
        self.expected = expected;
        self.completed = 0;
    }

    /// Records `n` completed subtasks, clamping to `expected` when
    /// determinate. Returns the new completed count.
    pub fn advance(&mut self, n: u32) -> u32 {
        let next = self.completed.saturating_add(n);
        self.completed = match self.expected {
            Some(expected) => next.min(expected),
            None => next,
        };
        self.completed
    }

    /// Completed subtask count.
    #[inline]
    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// Expected subtask count; `None` when the run is indeterminate.
    #[inline]
    pub fn expected(&self) -> Option<u32> {
        self.expected
    }

    /// `true` when the expected count is known.
    #[inline]
    pub fn is_determinate(&self) -> bool {
        self.expected.is_some()
    }

    /// Completion percentage in `0.0..=100.0`.
    ///
    /// `None` for indeterminate runs. A determinate run expecting zero
    /// subtasks reports `100.0` (there is nothing left to do).
    pub fn percent(&self) -> Option<f64> {
        let expected = self.expected?;
        if expected == 0 {
            return Some(100.0);
        }
        Some(f64::from(self.completed) / f64::from(expected) * 100.0)
    }
}
