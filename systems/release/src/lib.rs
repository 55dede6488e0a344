#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic schedule deciding when lab-reared mosquitoes are released.

use mosquito_sim_core::TICKS_PER_DAY;

/// Configuration parameters required to construct the release schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    total_releases: u32,
    interval_ticks: u64,
    per_release: u32,
}

impl Config {
    /// Creates a new configuration measured in ticks.
    #[must_use]
    pub const fn new(total_releases: u32, interval_ticks: u64, per_release: u32) -> Self {
        Self {
            total_releases,
            interval_ticks,
            per_release,
        }
    }

    /// Creates a configuration whose interval is expressed in simulated days.
    ///
    /// The interval is rounded to the nearest whole tick. Negative or
    /// non-finite intervals collapse to zero.
    #[must_use]
    pub fn from_days(total_releases: u32, interval_days: f64, per_release: u32) -> Self {
        let ticks = (interval_days * f64::from(TICKS_PER_DAY)).round();
        let interval_ticks = if ticks.is_finite() && ticks > 0.0 {
            ticks as u64
        } else {
            0
        };
        Self::new(total_releases, interval_ticks, per_release)
    }

    /// Ticks that must elapse between two releases.
    #[must_use]
    pub const fn interval_ticks(&self) -> u64 {
        self.interval_ticks
    }
}

/// Tracks elapsed ticks and performed releases.
///
/// The first release happens on the first tick, matching a schedule whose
/// previous release lies exactly one interval in the past.
#[derive(Clone, Debug)]
pub struct ReleaseSchedule {
    config: Config,
    performed: u32,
    ticks_since_release: u64,
}

impl ReleaseSchedule {
    /// Creates a new schedule using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            performed: 0,
            ticks_since_release: config.interval_ticks.saturating_sub(1),
        }
    }

    /// Advances the schedule by one tick.
    ///
    /// Returns the number of individuals to release when a release is due.
    pub fn advance(&mut self) -> Option<u32> {
        self.ticks_since_release = self.ticks_since_release.saturating_add(1);

        if self.performed >= self.config.total_releases {
            return None;
        }
        if self.ticks_since_release < self.config.interval_ticks {
            return None;
        }

        self.performed += 1;
        self.ticks_since_release = 0;
        Some(self.config.per_release)
    }

    /// Restarts the interval countdown without counting a release.
    ///
    /// Called when individuals are released out of schedule, so the next
    /// scheduled release waits a full interval.
    pub fn restart_interval(&mut self) {
        self.ticks_since_release = 0;
    }

    /// Number of releases already performed.
    #[must_use]
    pub const fn performed(&self) -> u32 {
        self.performed
    }

    /// Number of releases still outstanding.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.config.total_releases.saturating_sub(self.performed)
    }
}
