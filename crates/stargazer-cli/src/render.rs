//! Plain-text rendering of engine state.
//!
//! Every function returns a `String` so output can be tested without a
//! terminal.

use chrono::TimeDelta;
use stargazer_core::{Discovery, ExploreError, MissionStatus};
use stargazer_types::{DiscoveredObject, UserProgress};

/// Width of progress bars in characters.
const BAR_WIDTH: u32 = 20;

/// Render a `[#####.....]` bar for `percent` (0 to 100).
pub fn bar(percent: u8) -> String {
    let filled = u32::from(percent.min(100))
        .saturating_mul(BAR_WIDTH)
        .checked_div(100)
        .unwrap_or(0);
    let empty = BAR_WIDTH.saturating_sub(filled);
    let filled = usize::try_from(filled).unwrap_or(0);
    let empty = usize::try_from(empty).unwrap_or(0);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(empty))
}

/// `m:ss` for a non-negative duration.
pub fn clock(delta: TimeDelta) -> String {
    let secs = delta.num_seconds().max(0);
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn percent_of(part: u32, whole: u32) -> u8 {
    let percent = u64::from(part)
        .saturating_mul(100)
        .checked_div(u64::from(whole))
        .unwrap_or(100)
        .min(100);
    u8::try_from(percent).unwrap_or(100)
}

/// Level, experience and energy summary.
pub fn status(
    progress: &UserProgress,
    until_next_refill: Option<TimeDelta>,
    catalog_size: usize,
) -> String {
    let mut lines = vec![
        format!("Level {}", progress.level),
        format!(
            "XP      {} {}/{}",
            bar(percent_of(progress.xp, progress.xp_to_next_level)),
            progress.xp,
            progress.xp_to_next_level
        ),
        format!(
            "Energy  {} {}/{}",
            bar(percent_of(progress.energy, progress.max_energy)),
            progress.energy,
            progress.max_energy
        ),
    ];
    if let Some(wait) = until_next_refill {
        lines.push(format!("Next energy in {}", clock(wait)));
    }
    lines.push(format!(
        "Discovered {}/{}",
        progress.total_discovered, catalog_size
    ));
    for (object_type, count) in &progress.discovered_by_type {
        if *count > 0 {
            lines.push(format!("  {object_type:<10} {count}"));
        }
    }
    lines.join("\n")
}

/// One discovery.
pub fn discovery(found: &Discovery) -> String {
    let entry = &found.object.entry;
    let mut lines = vec![
        format!(
            "Discovered {} ({} {}) +{} XP",
            entry.name, entry.rarity, entry.object_type, found.xp_gained
        ),
        format!("  {}", entry.lore),
    ];
    if !entry.loot.is_empty() {
        lines.push(format!("  Loot: {}", entry.loot.join(", ")));
    }
    if let Some(level) = found.leveled_up_to {
        lines.push(format!("Level up! You are now level {level}."));
    }
    lines.join("\n")
}

/// Why an exploration was refused.
pub fn rejection(err: ExploreError, until_next_refill: Option<TimeDelta>) -> String {
    match (err, until_next_refill) {
        (ExploreError::NoEnergy, Some(wait)) => {
            format!("Out of energy. Next unit in {}.", clock(wait))
        }
        (ExploreError::NoEnergy, None) => "Out of energy.".to_owned(),
        (ExploreError::AlreadyExploring, _) => "Already exploring, hold on.".to_owned(),
        (ExploreError::CatalogExhausted, _) => {
            "You have discovered everything in the sky. Congratulations!".to_owned()
        }
    }
}

/// A list of discovered objects.
pub fn collection(objects: &[DiscoveredObject]) -> String {
    if objects.is_empty() {
        return "Nothing discovered yet.".to_owned();
    }
    objects
        .iter()
        .map(|o| {
            format!(
                "{:<22} {:<10} {:<10} {:>4} XP  {}",
                o.entry.name,
                o.entry.object_type,
                o.entry.rarity,
                o.entry.xp,
                o.discovered_at.format("%Y-%m-%d %H:%M")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Mission list with progress bars.
pub fn missions(statuses: &[MissionStatus]) -> String {
    statuses
        .iter()
        .map(|s| {
            let mark = if s.completed { "x" } else { " " };
            let mut reward = format!("{} XP", s.mission.reward.xp);
            if !s.mission.reward.loot.is_empty() {
                reward = format!("{reward} + {}", s.mission.reward.loot.join(", "));
            }
            format!(
                "[{mark}] {:<20} {} {}/{}  {}\n    {}",
                s.mission.title,
                bar(s.percent),
                s.current.min(s.mission.target),
                s.mission.target,
                reward,
                s.mission.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(bar(0), format!("[{}]", ".".repeat(20)));
        assert_eq!(bar(50), format!("[{}{}]", "#".repeat(10), ".".repeat(10)));
        assert_eq!(bar(100), format!("[{}]", "#".repeat(20)));
        assert_eq!(bar(250), bar(100));
    }

    #[test]
    fn clock_formats_minutes_and_seconds() {
        assert_eq!(clock(TimeDelta::seconds(183)), "3:03");
        assert_eq!(clock(TimeDelta::seconds(-5)), "0:00");
    }

    #[test]
    fn status_mentions_wait_only_when_regenerating() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut progress = UserProgress::new(10, 100, now);
        assert!(!status(&progress, None, 24).contains("Next energy"));

        progress.energy = 4;
        let text = status(&progress, Some(TimeDelta::seconds(90)), 24);
        assert!(text.contains("Energy"));
        assert!(text.contains("4/10"));
        assert!(text.contains("Next energy in 1:30"));
        assert!(text.contains("Discovered 0/24"));
    }

    #[test]
    fn rejections_are_distinct() {
        let no_energy = rejection(ExploreError::NoEnergy, None);
        let busy = rejection(ExploreError::AlreadyExploring, None);
        let done = rejection(ExploreError::CatalogExhausted, None);
        assert_ne!(no_energy, busy);
        assert_ne!(busy, done);
        assert!(rejection(ExploreError::NoEnergy, Some(TimeDelta::seconds(61))).contains("1:01"));
    }

    #[test]
    fn empty_collection_has_a_message() {
        assert_eq!(collection(&[]), "Nothing discovered yet.");
    }
}
