//! Ramp profiles: how many virtual users each scenario runs over time.
//!
//! A profile is an ordered list of stages; during each stage the target
//! virtual-user count moves linearly from the previous stage's target to its
//! own. Goose executes profiles natively through its test plan, rendered by
//! [`LoadProfile::test_plan`].

use std::fmt;
use std::time::Duration;

/// One ramp stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub duration: Duration,
    pub target: usize,
}

impl Stage {
    pub const fn new(duration: Duration, target: usize) -> Self {
        Self { duration, target }
    }

    pub const fn secs(secs: u64, target: usize) -> Self {
        Self::new(Duration::from_secs(secs), target)
    }

    pub const fn mins(mins: u64, target: usize) -> Self {
        Self::new(Duration::from_secs(mins * 60), target)
    }
}

/// Ordered ramp stages starting from zero users
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadProfile {
    stages: Vec<Stage>,
}

impl LoadProfile {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Highest target across all stages
    pub fn peak_users(&self) -> usize {
        self.stages.iter().map(|s| s.target).max().unwrap_or(0)
    }

    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|s| s.duration).sum()
    }

    /// Multiply every stage duration by `factor`, keeping each at least one second.
    ///
    /// Used for short CI runs of the long profiles; non-positive or non-finite
    /// factors leave the profile unchanged.
    pub fn scaled(&self, factor: f64) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return self.clone();
        }
        let stages = self
            .stages
            .iter()
            .map(|s| {
                let secs = (s.duration.as_secs_f64() * factor).round().max(1.0);
                Stage::new(Duration::from_secs(secs as u64), s.target)
            })
            .collect();
        Self { stages }
    }

    /// Goose `--test-plan` string, e.g. `10,120s;10,300s;0,120s`.
    pub fn test_plan(&self) -> String {
        self.stages
            .iter()
            .map(|s| format!("{},{}s", s.target, s.duration.as_secs()))
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl fmt::Display for LoadProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut from = 0;
        for (idx, stage) in self.stages.iter().enumerate() {
            let shape = match stage.target.cmp(&from) {
                std::cmp::Ordering::Greater => "ramp up",
                std::cmp::Ordering::Less => "ramp down",
                std::cmp::Ordering::Equal => "hold",
            };
            writeln!(
                f,
                "  stage {}: {:>5}s  {:>4} -> {:<4} ({shape})",
                idx + 1,
                stage.duration.as_secs(),
                from,
                stage.target
            )?;
            from = stage.target;
        }
        Ok(())
    }
}
