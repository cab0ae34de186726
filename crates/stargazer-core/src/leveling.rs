//! Experience and level-up rule.
//!
//! The threshold to leave level `n` is `xp_per_level * n`. After a gain the
//! threshold is checked exactly once: a reward large enough to cross two
//! thresholds levels up a single time and leaves the surplus in `xp`. The
//! built-in catalog keeps every reward at or below `2 * xp_per_level`,
//! which is small enough that one check always suffices.

use stargazer_types::UserProgress;

/// Linear leveling curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelingRule {
    xp_per_level: u32,
}

impl LevelingRule {
    /// Create a rule with `xp_per_level` experience per level step.
    ///
    /// Zero is raised to one so thresholds stay positive.
    pub fn new(xp_per_level: u32) -> Self {
        Self {
            xp_per_level: xp_per_level.max(1),
        }
    }

    /// Experience per level step.
    pub const fn xp_per_level(&self) -> u32 {
        self.xp_per_level
    }

    /// Experience needed to leave `level`. Saturates at `u32::MAX`.
    pub const fn threshold_for(&self, level: u32) -> u32 {
        self.xp_per_level.saturating_mul(level)
    }

    /// Largest single reward that can never cross two thresholds.
    pub const fn max_safe_reward(&self) -> u32 {
        self.xp_per_level.saturating_mul(2)
    }

    /// Add `gained` experience and apply at most one level-up.
    ///
    /// Returns the new level if a level-up happened.
    pub fn gain(&self, progress: &mut UserProgress, gained: u32) -> Option<u32> {
        progress.xp = progress.xp.saturating_add(gained);

        if progress.xp < progress.xp_to_next_level {
            return None;
        }

        progress.xp = progress.xp.saturating_sub(progress.xp_to_next_level);
        progress.level = progress.level.saturating_add(1);
        progress.xp_to_next_level = self.threshold_for(progress.level);
        Some(progress.level)
    }
}

impl Default for LevelingRule {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn fresh() -> UserProgress {
        UserProgress::new(10, 100, Utc::now())
    }

    #[test]
    fn thresholds_grow_linearly() {
        let rule = LevelingRule::default();
        assert_eq!(rule.threshold_for(1), 100);
        assert_eq!(rule.threshold_for(2), 200);
        assert_eq!(rule.threshold_for(7), 700);
    }

    #[test]
    fn gain_below_threshold_only_adds_xp() {
        let mut p = fresh();
        assert_eq!(LevelingRule::default().gain(&mut p, 99), None);
        assert_eq!(p.level, 1);
        assert_eq!(p.xp, 99);
    }

    #[test]
    fn gaining_130_at_level_one_carries_30() {
        let mut p = fresh();
        assert_eq!(LevelingRule::default().gain(&mut p, 130), Some(2));
        assert_eq!(p.level, 2);
        assert_eq!(p.xp, 30);
        assert_eq!(p.xp_to_next_level, 200);
    }

    #[test]
    fn exact_threshold_levels_up_with_zero_carry() {
        let mut p = fresh();
        p.xp = 60;
        assert_eq!(LevelingRule::default().gain(&mut p, 40), Some(2));
        assert_eq!(p.xp, 0);
    }

    #[test]
    fn oversized_reward_levels_up_only_once() {
        // 100 + 200 = 300 would be two levels; one check leaves xp at the
        // new threshold.
        let mut p = fresh();
        assert_eq!(LevelingRule::default().gain(&mut p, 400), Some(2));
        assert_eq!(p.level, 2);
        assert_eq!(p.xp, 300);
        assert!(p.xp >= p.xp_to_next_level);
    }

    #[test]
    fn safe_reward_keeps_xp_below_threshold() {
        let rule = LevelingRule::default();
        let mut p = fresh();
        p.xp = 99;
        rule.gain(&mut p, rule.max_safe_reward());
        assert!(p.xp < p.xp_to_next_level);
    }
}
