//! Time-based energy regeneration.
//!
//! Energy accrues one batch per whole interval elapsed since a stored
//! reference timestamp. The reference advances by exactly the whole
//! intervals consumed, never to "now", so partial progress toward the next
//! unit carries over and the result does not depend on how often the
//! policy is polled.
//!
//! Intervals that elapse while energy is already at the cap are still
//! consumed. Otherwise a later poll would credit the whole capped period at
//! once.

use chrono::{DateTime, TimeDelta, Utc};
use stargazer_types::UserProgress;

/// Whole intervals elapsed since a reference point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accrual {
    /// Number of whole intervals elapsed.
    pub intervals: u32,
    /// The reference advanced by exactly `intervals` intervals.
    pub reference: DateTime<Utc>,
}

/// Result of applying regeneration to a player's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefillOutcome {
    /// Whole intervals consumed.
    pub intervals: u32,
    /// Energy actually added after clamping to the cap.
    pub granted: u32,
}

/// Computes accrued energy from elapsed wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegenerationPolicy {
    interval: TimeDelta,
    amount: u32,
}

impl RegenerationPolicy {
    /// Create a policy granting `amount` units per `interval`.
    ///
    /// Non-positive intervals are raised to one millisecond.
    pub fn new(interval: TimeDelta, amount: u32) -> Self {
        let interval = if interval <= TimeDelta::zero() {
            TimeDelta::milliseconds(1)
        } else {
            interval
        };
        Self { interval, amount }
    }

    /// The regeneration interval.
    pub const fn interval(&self) -> TimeDelta {
        self.interval
    }

    /// Units granted per interval.
    pub const fn amount(&self) -> u32 {
        self.amount
    }

    /// Whole intervals between `last` and `now`.
    ///
    /// A clock that reads earlier than `last` accrues nothing and leaves the
    /// reference where it was.
    pub fn accrue(&self, last: DateTime<Utc>, now: DateTime<Utc>) -> Accrual {
        let unchanged = Accrual {
            intervals: 0,
            reference: last,
        };

        let elapsed_ms = now.signed_duration_since(last).num_milliseconds();
        let interval_ms = self.interval.num_milliseconds().max(1);
        let Some(whole) = elapsed_ms.checked_div(interval_ms) else {
            return unchanged;
        };
        if whole <= 0 {
            return unchanged;
        }

        let intervals = u32::try_from(whole).unwrap_or(u32::MAX);
        let advance = interval_ms
            .checked_mul(i64::from(intervals))
            .and_then(TimeDelta::try_milliseconds);
        let Some(reference) = advance.and_then(|d| last.checked_add_signed(d)) else {
            return unchanged;
        };

        Accrual {
            intervals,
            reference,
        }
    }

    /// Apply accrued energy to `progress` as of `now`.
    ///
    /// Energy is clamped to `max_energy`. The reference timestamp advances
    /// whenever at least one whole interval elapsed, even if nothing could
    /// be granted because energy was full.
    pub fn apply(&self, progress: &mut UserProgress, now: DateTime<Utc>) -> RefillOutcome {
        let accrual = self.accrue(progress.last_energy_refill, now);
        if accrual.intervals == 0 {
            return RefillOutcome {
                intervals: 0,
                granted: 0,
            };
        }

        let before = progress.energy.min(progress.max_energy);
        let gained = accrual.intervals.saturating_mul(self.amount);
        let after = before.saturating_add(gained).min(progress.max_energy);

        progress.energy = after;
        progress.last_energy_refill = accrual.reference;

        RefillOutcome {
            intervals: accrual.intervals,
            granted: after.saturating_sub(before),
        }
    }

    /// Time until the next unit accrues, measured from `now`.
    ///
    /// Zero when an interval has already fully elapsed.
    pub fn until_next(&self, last: DateTime<Utc>, now: DateTime<Utc>) -> TimeDelta {
        let accrual = self.accrue(last, now);
        let next = accrual
            .reference
            .checked_add_signed(self.interval)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let remaining = next.signed_duration_since(now);
        remaining.max(TimeDelta::zero())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn policy() -> RegenerationPolicy {
        RegenerationPolicy::new(TimeDelta::minutes(5), 1)
    }

    fn progress(energy: u32) -> UserProgress {
        let mut p = UserProgress::new(10, 100, t0());
        p.energy = energy;
        p
    }

    #[test]
    fn seventeen_minutes_grants_three_and_keeps_two_minutes() {
        let mut p = progress(2);
        let outcome = policy().apply(&mut p, t0() + TimeDelta::minutes(17));

        assert_eq!(outcome.intervals, 3);
        assert_eq!(outcome.granted, 3);
        assert_eq!(p.energy, 5);
        assert_eq!(p.last_energy_refill, t0() + TimeDelta::minutes(15));
    }

    #[test]
    fn partial_interval_accrues_nothing() {
        let mut p = progress(2);
        let outcome = policy().apply(&mut p, t0() + TimeDelta::seconds(299));
        assert_eq!(outcome.intervals, 0);
        assert_eq!(p.energy, 2);
        assert_eq!(p.last_energy_refill, t0());
    }

    #[test]
    fn exact_boundary_counts() {
        let accrual = policy().accrue(t0(), t0() + TimeDelta::minutes(15));
        assert_eq!(accrual.intervals, 3);
        assert_eq!(accrual.reference, t0() + TimeDelta::minutes(15));
    }

    #[test]
    fn result_does_not_depend_on_poll_frequency() {
        let end = t0() + TimeDelta::minutes(23);

        let mut once = progress(0);
        policy().apply(&mut once, end);

        let mut often = progress(0);
        let mut now = t0();
        while now < end {
            now += TimeDelta::seconds(37);
            policy().apply(&mut often, now.min(end));
        }

        assert_eq!(once, often);
        assert_eq!(once.energy, 4);
    }

    #[test]
    fn full_energy_still_consumes_intervals() {
        let mut p = progress(10);
        let outcome = policy().apply(&mut p, t0() + TimeDelta::minutes(60));
        assert_eq!(outcome.intervals, 12);
        assert_eq!(outcome.granted, 0);
        assert_eq!(p.energy, 10);
        assert_eq!(p.last_energy_refill, t0() + TimeDelta::minutes(60));

        // Spending one unit and polling again right away credits nothing:
        // the capped hour is not banked.
        p.energy = 9;
        let outcome = policy().apply(&mut p, t0() + TimeDelta::minutes(61));
        assert_eq!(outcome.granted, 0);
        assert_eq!(p.energy, 9);
    }

    #[test]
    fn grant_is_clamped_to_cap() {
        let mut p = progress(8);
        let outcome = policy().apply(&mut p, t0() + TimeDelta::minutes(25));
        assert_eq!(outcome.intervals, 5);
        assert_eq!(outcome.granted, 2);
        assert_eq!(p.energy, 10);
        assert_eq!(p.last_energy_refill, t0() + TimeDelta::minutes(25));
    }

    #[test]
    fn refill_amount_scales_grant() {
        let mut p = progress(0);
        let outcome = RegenerationPolicy::new(TimeDelta::minutes(5), 2)
            .apply(&mut p, t0() + TimeDelta::minutes(10));
        assert_eq!(outcome.granted, 4);
        assert_eq!(p.energy, 4);
    }

    #[test]
    fn clock_going_backwards_is_ignored() {
        let mut p = progress(3);
        let outcome = policy().apply(&mut p, t0() - TimeDelta::hours(2));
        assert_eq!(outcome.intervals, 0);
        assert_eq!(p.energy, 3);
        assert_eq!(p.last_energy_refill, t0());
    }

    #[test]
    fn until_next_counts_down_within_interval() {
        let remaining = policy().until_next(t0(), t0() + TimeDelta::minutes(17));
        assert_eq!(remaining, TimeDelta::minutes(3));
    }
}
