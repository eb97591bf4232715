//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `SimTime` counter in abstract time
//! units (the application decides whether a unit is a millisecond, a second,
//! …).  Using an integer as the canonical time unit means all budget
//! arithmetic is exact (no floating-point drift) and comparisons are O(1).
//!
//! Each tick the scheduler lends every participant a [`TimeLapse`] covering
//! `[now, now + step)`.  Participants spend it with [`TimeLapse::consume`];
//! the lapse refuses to hand out more time than it covers.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute point on the logical simulation clock.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    /// Return the time `n` units after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> SimTime {
        SimTime(self.0 + n)
    }

    /// Like [`offset`][Self::offset], but `None` if the result would not fit.
    #[inline]
    pub fn checked_offset(self, n: u64) -> Option<SimTime> {
        self.0.checked_add(n).map(SimTime)
    }

    /// Units elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: SimTime) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: u64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::AddAssign<u64> for SimTime {
    #[inline]
    fn add_assign(&mut self, rhs: u64) {
        self.0 += rhs;
    }
}

impl std::ops::Sub for SimTime {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: SimTime) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

// ── TimeLapse ─────────────────────────────────────────────────────────────────

/// A consumable slice of simulated time, `[start, end)`.
///
/// Invariant: `0 <= time_left <= end - start`.  The time already spent is
/// always the prefix of the interval, so the lapse's "current" time is
/// `end - time_left`.
///
/// The scheduler owns a single `TimeLapse` and re-initializes it for every
/// callback it makes.  Participants receive it as `&mut TimeLapse` and cannot
/// keep it past the callback; a [`split`][Self::split] tail is an owned value
/// and may be kept freely.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeLapse {
    start:     SimTime,
    end:       SimTime,
    time_left: u64,
}

impl TimeLapse {
    /// Create a fresh, unconsumed lapse over `[start, end)`.
    pub fn new(start: SimTime, end: SimTime) -> CoreResult<Self> {
        if start >= end {
            return Err(CoreError::EmptyInterval { start, end });
        }
        Ok(Self { start, end, time_left: end - start })
    }

    /// Re-initialize this lapse in place to cover `[start, end)` with all of
    /// its time available.
    pub fn reinit(&mut self, start: SimTime, end: SimTime) -> CoreResult<()> {
        if start >= end {
            return Err(CoreError::EmptyInterval { start, end });
        }
        self.start = start;
        self.end = end;
        self.time_left = end - start;
        Ok(())
    }

    /// Like [`reinit`][Self::reinit] but leaves the lapse fully consumed.
    pub fn reinit_exhausted(&mut self, start: SimTime, end: SimTime) -> CoreResult<()> {
        self.reinit(start, end)?;
        self.time_left = 0;
        Ok(())
    }

    /// Spend `amount` units.
    ///
    /// Fails without touching the lapse if `amount` is zero or exceeds
    /// [`time_left`][Self::time_left].
    pub fn consume(&mut self, amount: u64) -> CoreResult<()> {
        if amount == 0 {
            return Err(CoreError::NonPositiveAmount);
        }
        if amount > self.time_left {
            return Err(CoreError::InsufficientTime {
                requested: amount,
                left:      self.time_left,
            });
        }
        self.time_left -= amount;
        Ok(())
    }

    /// Spend everything that is left.
    #[inline]
    pub fn consume_all(&mut self) {
        self.time_left = 0;
    }

    /// Carve the last `length` units off this lapse.
    ///
    /// The returned lapse covers exactly `[end - length, end)` and is
    /// unconsumed; `self` is shortened to end where the tail begins.
    /// Splitting off all remaining time leaves `self` exhausted.
    pub fn split(&mut self, length: u64) -> CoreResult<TimeLapse> {
        if length == 0 || length > self.time_left {
            return Err(CoreError::InvalidSplit { length, left: self.time_left });
        }
        let tail_start = SimTime(self.end.0 - length);
        let tail = TimeLapse {
            start:     tail_start,
            end:       self.end,
            time_left: length,
        };
        self.end = tail_start;
        self.time_left -= length;
        Ok(tail)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn start_time(&self) -> SimTime {
        self.start
    }

    #[inline]
    pub fn end_time(&self) -> SimTime {
        self.end
    }

    #[inline]
    pub fn time_left(&self) -> u64 {
        self.time_left
    }

    /// Total length of the interval, `end - start`.
    #[inline]
    pub fn time_step(&self) -> u64 {
        self.end - self.start
    }

    #[inline]
    pub fn time_consumed(&self) -> u64 {
        self.time_step() - self.time_left
    }

    /// The first instant not yet spent, `end - time_left`.
    #[inline]
    pub fn current_time(&self) -> SimTime {
        SimTime(self.end.0 - self.time_left)
    }

    #[inline]
    pub fn has_time_left(&self) -> bool {
        self.time_left > 0
    }

    /// `true` if `time` falls in `[start, end)`.
    #[inline]
    pub fn is_in(&self, time: SimTime) -> bool {
        time >= self.start && time < self.end
    }
}

impl fmt::Display for TimeLapse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}) left={}", self.start.0, self.end.0, self.time_left)
    }
}

// ── ClockConfig ───────────────────────────────────────────────────────────────

/// Top-level clock configuration.
///
/// Typically loaded from a JSON file by the application crate (with the
/// `serde` feature) and passed to the scheduler builder.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClockConfig {
    /// Logical time at which the first tick begins.
    pub start_time: SimTime,

    /// Length of one tick in time units.  Must be > 0.
    pub time_step: u64,

    /// `Scheduler::start` returns once the clock reaches this time.
    /// `None` runs until something calls `stop`.
    pub end_time: Option<SimTime>,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            start_time: SimTime::ZERO,
            time_step:  1_000,
            end_time:   None,
            seed:       123,
        }
    }
}

impl ClockConfig {
    /// Reject configurations the scheduler cannot run.
    pub fn validate(&self) -> CoreResult<()> {
        if self.time_step == 0 {
            return Err(CoreError::Config("time_step must be greater than zero".into()));
        }
        if self.start_time.checked_offset(self.time_step).is_none() {
            return Err(CoreError::TimeOverflow { time: self.start_time, step: self.time_step });
        }
        if let Some(end) = self.end_time {
            if end < self.start_time {
                return Err(CoreError::Config(format!(
                    "end_time {end} precedes start_time {}",
                    self.start_time
                )));
            }
        }
        Ok(())
    }
}
