//! The progression engine: the only place game state changes.
//!
//! A [`ProgressionEngine`] owns one [`ProgressionState`] and the rules that
//! act on it. The presentation layer calls [`ProgressionEngine::explore`]
//! and a periodic trigger calls [`ProgressionEngine::refill_energy`]; every
//! other method is a query.
//!
//! # Concurrency
//!
//! State lives behind a single [`std::sync::Mutex`] that is never held
//! across an `.await`. Each action applies its mutation under one lock
//! acquisition, so a refill tick can never observe a half-applied
//! exploration. The `is_exploring` flag is the single-flight guard for the
//! exploration delay: it is set under the same lock as the energy check and
//! cleared by a drop guard, so every exit path releases it.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::TimeDelta;
use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;
use stargazer_store::SnapshotStore;
use stargazer_types::{DiscoveredObject, Mission, ObjectType, Rarity, UserProgress};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::clock::{Clock, SystemClock};
use crate::config::GameConfig;
use crate::error::ExploreError;
use crate::leveling::LevelingRule;
use crate::missions::{self, MissionStatus};
use crate::persistence::{PersistenceError, PersistenceGateway};
use crate::regen::{RefillOutcome, RegenerationPolicy};
use crate::sampling::SamplingPolicy;
use crate::state::ProgressionState;

/// A successful exploration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Discovery {
    /// The newly discovered object.
    pub object: DiscoveredObject,
    /// Experience awarded.
    pub xp_gained: u32,
    /// The new level, if this discovery caused a level-up.
    pub leveled_up_to: Option<u32>,
}

/// Mutable part of the engine, guarded by one lock.
#[derive(Debug)]
struct Inner<R> {
    /// Player state.
    state: ProgressionState,
    /// Random source for discovery selection.
    rng: R,
}

/// Clears `is_exploring` when an exploration ends, however it ends.
struct ExploringGuard<'a, R> {
    inner: &'a Mutex<Inner<R>>,
}

impl<R> Drop for ExploringGuard<'_, R> {
    fn drop(&mut self) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .state
            .is_exploring = false;
    }
}

/// Orchestrates discovery, regeneration, leveling and persistence.
///
/// Generic over the save-slot backend `S`, the time source `C` and the
/// random source `R`, so tests can supply a [`ManualClock`] and a seeded
/// RNG.
///
/// [`ManualClock`]: crate::clock::ManualClock
#[derive(Debug)]
pub struct ProgressionEngine<S, C = SystemClock, R = StdRng> {
    /// Immutable entry templates.
    catalog: Catalog,
    /// Weighted rarity draw.
    sampling: SamplingPolicy,
    /// Energy regeneration.
    regen: RegenerationPolicy,
    /// Level-up rule.
    leveling: LevelingRule,
    /// Energy cap for new and loaded games.
    max_energy: u32,
    /// Simulated exploration time.
    explore_delay: Duration,
    /// Missions evaluated against the state.
    missions: Vec<Mission>,
    /// Save slot.
    gateway: PersistenceGateway<S>,
    /// Time source.
    clock: C,
    /// Player state and RNG.
    inner: Mutex<Inner<R>>,
    /// Orders writes to the save slot. Held from snapshot capture until the
    /// store call returns.
    slot_writes: tokio::sync::Mutex<()>,
}

impl<S, C, R> ProgressionEngine<S, C, R>
where
    S: SnapshotStore,
    C: Clock,
    R: Rng + Send,
{
    /// Build an engine with a fresh game.
    ///
    /// Call [`load_progress`](Self::load_progress) afterwards to restore a
    /// saved game.
    pub fn new(config: &GameConfig, catalog: Catalog, store: S, clock: C, rng: R) -> Self {
        let leveling = LevelingRule::new(config.progression.xp_per_level);
        let max_energy = config.energy.max_energy;

        if catalog.max_reward() > leveling.max_safe_reward() {
            warn!(
                max_reward = catalog.max_reward(),
                xp_per_level = leveling.xp_per_level(),
                "catalog reward can cross two level thresholds in one discovery"
            );
        }

        let state = ProgressionState::fresh(
            &catalog,
            UserProgress::new(max_energy, leveling.threshold_for(1), clock.now()),
        );

        debug!(
            entries = catalog.len(),
            max_energy,
            xp_per_level = leveling.xp_per_level(),
            "progression engine ready"
        );

        Self {
            catalog,
            sampling: SamplingPolicy::new(config.exploration.rarity_weights),
            regen: RegenerationPolicy::new(
                config.energy.refill_interval(),
                config.energy.refill_amount,
            ),
            leveling,
            max_energy,
            explore_delay: config.exploration.delay(),
            missions: missions::default_missions(),
            gateway: PersistenceGateway::new(store, config.storage.slot.clone()),
            clock,
            inner: Mutex::new(Inner { state, rng }),
            slot_writes: tokio::sync::Mutex::new(()),
        }
    }

    /// Replace the mission set.
    #[must_use]
    pub fn with_missions(mut self, missions: Vec<Mission>) -> Self {
        self.missions = missions;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner<R>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fresh_state(&self) -> ProgressionState {
        ProgressionState::fresh(
            &self.catalog,
            UserProgress::new(
                self.max_energy,
                self.leveling.threshold_for(1),
                self.clock.now(),
            ),
        )
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Spend one energy to discover a random undiscovered object.
    ///
    /// Rejected immediately with [`ExploreError::NoEnergy`] or
    /// [`ExploreError::AlreadyExploring`]. Otherwise waits out the
    /// exploration delay, draws from the undiscovered entries by rarity
    /// weight, applies the reward, and saves before returning. If nothing
    /// is left to discover the call ends with
    /// [`ExploreError::CatalogExhausted`] and nothing changes.
    pub async fn explore(&self) -> Result<Discovery, ExploreError> {
        let _flight = self.begin_exploration()?;

        if !self.explore_delay.is_zero() {
            tokio::time::sleep(self.explore_delay).await;
        }

        let discovery = {
            let _slot = self.slot_writes.lock().await;
            let (discovery, snapshot) = self.commit_exploration()?;
            self.persist(&snapshot).await;
            discovery
        };

        info!(
            id = %discovery.object.entry.id,
            rarity = %discovery.object.entry.rarity,
            xp_gained = discovery.xp_gained,
            leveled_up_to = ?discovery.leveled_up_to,
            "discovery"
        );
        Ok(discovery)
    }

    /// Check the guards and take the single-flight slot.
    fn begin_exploration(&self) -> Result<ExploringGuard<'_, R>, ExploreError> {
        let mut inner = self.lock();
        if inner.state.progress.energy == 0 {
            debug!("explore rejected: no energy");
            return Err(ExploreError::NoEnergy);
        }
        if inner.state.is_exploring {
            debug!("explore rejected: already exploring");
            return Err(ExploreError::AlreadyExploring);
        }
        inner.state.is_exploring = true;
        Ok(ExploringGuard { inner: &self.inner })
    }

    /// Apply one discovery as a single update. Returns the discovery and a
    /// copy of the state to persist.
    fn commit_exploration(&self) -> Result<(Discovery, ProgressionState), ExploreError> {
        let mut guard = self.lock();
        let Inner { state, rng } = &mut *guard;

        // A load or reset during the delay may have changed energy.
        if state.progress.energy == 0 {
            return Err(ExploreError::NoEnergy);
        }

        let candidates = state.undiscovered_positions();
        let rarity_of = |position: &usize| {
            state
                .record(*position)
                .map_or(Rarity::Common, |r| r.entry.rarity)
        };
        let Some(position) = self
            .sampling
            .pick(&candidates, rarity_of, rng)
            .and_then(|i| candidates.get(i).copied())
        else {
            info!("catalog exhausted");
            return Err(ExploreError::CatalogExhausted);
        };

        let now = self.clock.now();
        let entry = state
            .record_discovery(position, now)
            .ok_or(ExploreError::CatalogExhausted)?;

        state.progress.energy = state.progress.energy.saturating_sub(1);
        let leveled_up_to = self.leveling.gain(&mut state.progress, entry.xp);
        state.last_explore_time = Some(now);

        let xp_gained = entry.xp;
        let discovery = Discovery {
            object: DiscoveredObject::new(entry, now),
            xp_gained,
            leveled_up_to,
        };
        Ok((discovery, state.clone()))
    }

    /// Credit energy for every whole interval since the last refill.
    ///
    /// Idempotent: calling it again before another interval elapses grants
    /// nothing.
    pub fn refill_energy(&self) -> RefillOutcome {
        let now = self.clock.now();
        let outcome = {
            let mut inner = self.lock();
            self.regen.apply(&mut inner.state.progress, now)
        };
        if outcome.granted > 0 {
            debug!(
                granted = outcome.granted,
                intervals = outcome.intervals,
                "energy refilled"
            );
        }
        outcome
    }

    /// Discard all progress and the saved slot.
    ///
    /// Waits for any save already under way, so a stale snapshot cannot
    /// land after the delete. An exploration still in its delay keeps its
    /// single-flight slot and commits onto the fresh state.
    pub async fn reset_game(&self) -> Result<(), PersistenceError> {
        let _slot = self.slot_writes.lock().await;
        let fresh = self.fresh_state();
        {
            let mut inner = self.lock();
            let is_exploring = inner.state.is_exploring;
            inner.state = fresh;
            inner.state.is_exploring = is_exploring;
        }
        info!("game reset");

        self.gateway.reset().await.inspect_err(|e| {
            warn!(error = %e, "failed to discard saved game");
        })
    }

    /// Restore the saved game, then credit offline energy.
    ///
    /// Returns `Ok(true)` if a snapshot was restored. An empty or unusable
    /// slot leaves the current state in place. On a store error the state
    /// is also left in place and the error is returned after the refill.
    pub async fn load_progress(&self) -> Result<bool, PersistenceError> {
        let _slot = self.slot_writes.lock().await;
        let loaded = self.gateway.load(&self.catalog, self.max_energy).await;

        let result = match loaded {
            Ok(Some(state)) => {
                let mut inner = self.lock();
                let is_exploring = inner.state.is_exploring;
                inner.state = state;
                inner.state.is_exploring = is_exploring;
                info!(
                    level = inner.state.progress.level,
                    discovered = inner.state.progress.total_discovered,
                    "saved game restored"
                );
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                warn!(error = %e, "failed to load saved game");
                Err(e)
            }
        };

        self.refill_energy();
        result
    }

    /// Write the current state to the save slot.
    pub async fn save_progress(&self) -> Result<(), PersistenceError> {
        let _slot = self.slot_writes.lock().await;
        let snapshot = self.lock().state.clone();
        self.gateway.save(&snapshot).await
    }

    /// Save, logging instead of failing.
    async fn persist(&self, state: &ProgressionState) {
        if let Err(e) = self.gateway.save(state).await {
            warn!(error = %e, "failed to save progress, continuing in memory");
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Whether `explore` would pass its guards right now.
    pub fn can_explore(&self) -> bool {
        let inner = self.lock();
        inner.state.progress.energy > 0 && !inner.state.is_exploring
    }

    /// Whether an exploration is in flight.
    pub fn is_exploring(&self) -> bool {
        self.lock().state.is_exploring
    }

    /// Current player counters.
    pub fn progress(&self) -> UserProgress {
        self.lock().state.progress.clone()
    }

    /// A copy of the whole state.
    pub fn state(&self) -> ProgressionState {
        self.lock().state.clone()
    }

    /// The catalog the engine was built with.
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Time until the next energy unit, or `None` when energy is full.
    pub fn until_next_refill(&self) -> Option<TimeDelta> {
        let now = self.clock.now();
        let inner = self.lock();
        let progress = &inner.state.progress;
        (progress.energy < progress.max_energy)
            .then(|| self.regen.until_next(progress.last_energy_refill, now))
    }

    /// Every discovered object, in discovery order.
    pub fn discovered(&self) -> Vec<DiscoveredObject> {
        self.lock().state.discovered_objects()
    }

    /// Discovered objects of one type, in discovery order.
    pub fn discovered_by_type(&self, object_type: ObjectType) -> Vec<DiscoveredObject> {
        self.lock()
            .state
            .discovered_by_type(object_type)
            .into_iter()
            .filter_map(|r| r.to_discovered())
            .collect()
    }

    /// Discovered objects of one rarity tier, in discovery order.
    pub fn discovered_by_rarity(&self, rarity: Rarity) -> Vec<DiscoveredObject> {
        self.lock()
            .state
            .discovered_by_rarity(rarity)
            .into_iter()
            .filter_map(|r| r.to_discovered())
            .collect()
    }

    /// Number of discovered objects of one rarity tier.
    pub fn rarity_count(&self, rarity: Rarity) -> usize {
        self.lock().state.rarity_count(rarity)
    }

    /// Discovered counts for every rarity tier.
    pub fn rarity_counts(&self) -> BTreeMap<Rarity, usize> {
        self.lock().state.rarity_counts()
    }

    /// Every mission with its current progress.
    pub fn missions(&self) -> Vec<MissionStatus> {
        missions::evaluate_all(&self.missions, &self.lock().state)
    }
}
