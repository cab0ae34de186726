//! Mission evaluation.
//!
//! Missions are read-only goals: progress is derived from the current
//! collection and level every time it is asked for. Nothing is claimed or
//! stored, so a reset or reload can never leave a mission out of step.

use serde::Serialize;
use stargazer_types::{Mission, MissionId, MissionKind, MissionReward, ObjectType, Rarity};

use crate::state::ProgressionState;

/// A mission together with its evaluated progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionStatus {
    /// The mission definition.
    pub mission: Mission,
    /// Current count toward the target.
    pub current: u32,
    /// Whether the target has been reached.
    pub completed: bool,
    /// Completion in percent, capped at 100.
    pub percent: u8,
}

/// Current count toward `mission`'s target.
pub fn progress(mission: &Mission, state: &ProgressionState) -> u32 {
    let count = match mission.goal {
        MissionKind::Discover { object_type: None } => state.discovered_count(),
        MissionKind::Discover {
            object_type: Some(object_type),
        } => state
            .records()
            .iter()
            .filter(|r| r.is_discovered() && r.entry.object_type == object_type)
            .count(),
        MissionKind::Collect { min_rarity } => state
            .records()
            .iter()
            .filter(|r| r.is_discovered() && r.entry.rarity >= min_rarity)
            .count(),
        MissionKind::Level => return state.progress.level,
    };
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Whether `mission` is complete.
pub fn is_completed(mission: &Mission, state: &ProgressionState) -> bool {
    progress(mission, state) >= mission.target
}

/// Completion in percent, rounded down and capped at 100.
///
/// A zero target counts as complete.
pub fn completion_percent(mission: &Mission, state: &ProgressionState) -> u8 {
    let current = u64::from(progress(mission, state));
    let percent = current
        .saturating_mul(100)
        .checked_div(u64::from(mission.target))
        .unwrap_or(100)
        .min(100);
    u8::try_from(percent).unwrap_or(100)
}

/// Evaluate one mission.
pub fn evaluate(mission: &Mission, state: &ProgressionState) -> MissionStatus {
    let current = progress(mission, state);
    MissionStatus {
        mission: mission.clone(),
        current,
        completed: current >= mission.target,
        percent: completion_percent(mission, state),
    }
}

/// Evaluate every mission in order.
pub fn evaluate_all(missions: &[Mission], state: &ProgressionState) -> Vec<MissionStatus> {
    missions.iter().map(|m| evaluate(m, state)).collect()
}

// ---------------------------------------------------------------------------
// Default mission set
// ---------------------------------------------------------------------------

fn mission(
    id: &str,
    title: &str,
    description: &str,
    target: u32,
    xp: u32,
    loot: &[&str],
    goal: MissionKind,
) -> Mission {
    Mission {
        id: MissionId::new(id),
        title: title.to_owned(),
        description: description.to_owned(),
        target,
        reward: MissionReward {
            xp,
            loot: loot.iter().map(|s| (*s).to_owned()).collect(),
        },
        goal,
    }
}

/// The missions shipped with the game.
pub fn default_missions() -> Vec<Mission> {
    let discover = |object_type| MissionKind::Discover { object_type };
    vec![
        mission(
            "first-light",
            "First Light",
            "Make your first discovery",
            1,
            25,
            &[],
            discover(None),
        ),
        mission(
            "star-gazer",
            "Star Gazer",
            "Discover 3 stars",
            3,
            50,
            &["Star Chart"],
            discover(Some(ObjectType::Star)),
        ),
        mission(
            "planet-hunter",
            "Planet Hunter",
            "Discover 3 planets",
            3,
            50,
            &["Planetary Probe"],
            discover(Some(ObjectType::Planet)),
        ),
        mission(
            "galaxy-explorer",
            "Galaxy Explorer",
            "Discover 2 galaxies",
            2,
            75,
            &["Deep Field Lens"],
            discover(Some(ObjectType::Galaxy)),
        ),
        mission(
            "rising-astronomer",
            "Rising Astronomer",
            "Reach level 5",
            5,
            100,
            &["Observatory Pass"],
            MissionKind::Level,
        ),
        mission(
            "rare-hunter",
            "Rare Hunter",
            "Discover 5 objects of Rare rarity or higher",
            5,
            150,
            &["Rare Finder"],
            MissionKind::Collect {
                min_rarity: Rarity::Rare,
            },
        ),
        mission(
            "legendary-seeker",
            "Legendary Seeker",
            "Discover a Legendary object",
            1,
            250,
            &["Cosmic Crown"],
            MissionKind::Collect {
                min_rarity: Rarity::Legendary,
            },
        ),
    ]
}
