//! Built-in catalog of celestial objects.
//!
//! Sample content covering every object type and rarity tier. Rewards scale
//! with rarity and stay at or below 200 XP, twice the default level step.

use stargazer_types::{CatalogEntry, EntryId, ObjectStats, ObjectType, Rarity};

use crate::catalog::{Catalog, CatalogError};

/// Helper to build [`ObjectStats`] with the two fields every card shows.
fn stats(distance: &str, specialty: &str) -> ObjectStats {
    ObjectStats {
        distance: Some(distance.to_owned()),
        specialty: Some(specialty.to_owned()),
        ..ObjectStats::default()
    }
}

/// Helper to build a [`CatalogEntry`].
#[allow(clippy::too_many_arguments)]
fn object(
    id: &str,
    name: &str,
    object_type: ObjectType,
    rarity: Rarity,
    xp: u32,
    loot: &[&str],
    lore: &str,
    stats: ObjectStats,
) -> CatalogEntry {
    CatalogEntry {
        id: EntryId::new(id),
        name: name.to_owned(),
        object_type,
        image: id.to_owned(),
        rarity,
        xp,
        loot: loot.iter().map(|s| (*s).to_owned()).collect(),
        lore: lore.to_owned(),
        stats,
    }
}

/// The catalog shipped with the game.
#[rustfmt::skip]
pub fn starting_catalog() -> Result<Catalog, CatalogError> {
    use ObjectType::{BlackHole, Exoplanet, Galaxy, Nebula, Planet, Star};
    use Rarity::{Common, Epic, Legendary, Rare};

    Catalog::new(vec![
        // --- Stars ---
        object(
            "sun", "The Sun", Star, Common, 10, &["Solar Flare"],
            "The star every other discovery is measured against.",
            stats("8.3 light-minutes", "Home star"),
        ),
        object(
            "sirius", "Sirius", Star, Common, 15, &["Stardust"],
            "The brightest star in the night sky, with a white dwarf companion.",
            stats("8.6 ly", "Brightest night star"),
        ),
        object(
            "vega", "Vega", Star, Common, 15, &["Stardust"],
            "Once the northern pole star, and will be again in 12,000 years.",
            stats("25 ly", "Former pole star"),
        ),
        object(
            "betelgeuse", "Betelgeuse", Star, Rare, 45, &["Red Giant Core"],
            "A red supergiant in Orion that could go supernova any millennium now.",
            stats("548 ly", "Supernova candidate"),
        ),
        object(
            "polaris", "Polaris", Star, Rare, 40, &["Navigator's Compass"],
            "The North Star, a guide for sailors for centuries.",
            stats("433 ly", "Pole star"),
        ),
        object(
            "eta-carinae", "Eta Carinae", Star, Epic, 100, &["Hypergiant Shard"],
            "A volatile stellar system that briefly outshone almost every star in 1843.",
            stats("7,500 ly", "Great Eruption"),
        ),
        // --- Planets ---
        object(
            "mars", "Mars", Planet, Common, 20, &["Red Dust"],
            "The red planet, home of Olympus Mons.",
            stats("225 million km", "Tallest volcano"),
        ),
        object(
            "jupiter", "Jupiter", Planet, Common, 25, &["Storm Fragment"],
            "A gas giant whose Great Red Spot is wider than Earth.",
            stats("778 million km", "Great Red Spot"),
        ),
        object(
            "saturn", "Saturn", Planet, Rare, 50, &["Ring Ice"],
            "Its rings span 280,000 km but are barely a kilometre thick.",
            stats("1.4 billion km", "Ring system"),
        ),
        object(
            "neptune", "Neptune", Planet, Rare, 45, &["Diamond Rain"],
            "The windiest world in the solar system.",
            stats("4.5 billion km", "Supersonic winds"),
        ),
        // --- Galaxies ---
        object(
            "milky-way", "Milky Way", Galaxy, Common, 20, &["Galactic Map"],
            "Our home galaxy, a barred spiral of a few hundred billion stars.",
            stats("0 ly", "Home galaxy"),
        ),
        object(
            "andromeda", "Andromeda", Galaxy, Rare, 55, &["Spiral Arm Fragment"],
            "The nearest large galaxy, on course to merge with the Milky Way.",
            stats("2.5 million ly", "Future merger"),
        ),
        object(
            "sombrero", "Sombrero Galaxy", Galaxy, Epic, 90, &["Dust Lane Sample"],
            "A bright nucleus ringed by a dark dust lane.",
            stats("31 million ly", "Dust lane"),
        ),
        object(
            "ic-1101", "IC 1101", Galaxy, Legendary, 180, &["Supergiant Halo"],
            "One of the largest galaxies known, spanning millions of light-years.",
            stats("1 billion ly", "Among the largest galaxies"),
        ),
        // --- Exoplanets ---
        object(
            "proxima-b", "Proxima Centauri b", Exoplanet, Rare, 50, &["Habitable Zone Data"],
            "The closest known exoplanet, orbiting in its star's habitable zone.",
            stats("4.2 ly", "Closest exoplanet"),
        ),
        object(
            "trappist-1e", "TRAPPIST-1e", Exoplanet, Epic, 85, &["Ocean World Sample"],
            "One of seven Earth-sized worlds around an ultracool dwarf.",
            stats("40 ly", "Possible ocean world"),
        ),
        object(
            "kepler-452b", "Kepler-452b", Exoplanet, Epic, 95, &["Earth Cousin Record"],
            "An older, larger cousin of Earth around a Sun-like star.",
            stats("1,800 ly", "Earth's cousin"),
        ),
        // --- Nebulae ---
        object(
            "orion-nebula", "Orion Nebula", Nebula, Common, 20, &["Stellar Nursery Gas"],
            "A stellar nursery visible to the naked eye.",
            stats("1,344 ly", "Star formation"),
        ),
        object(
            "crab-nebula", "Crab Nebula", Nebula, Rare, 45, &["Pulsar Wind"],
            "The remnant of a supernova recorded in 1054, with a pulsar at its heart.",
            stats("6,500 ly", "Supernova remnant"),
        ),
        object(
            "pillars-of-creation", "Pillars of Creation", Nebula, Epic, 110, &["Creation Dust"],
            "Towering columns of gas in the Eagle Nebula.",
            stats("6,500 ly", "Iconic pillars"),
        ),
        object(
            "helix-nebula", "Helix Nebula", Nebula, Legendary, 160, &["Eye of God Lens"],
            "A planetary nebula that stares back like a giant eye.",
            stats("650 ly", "Planetary nebula"),
        ),
        // --- Black holes ---
        object(
            "cygnus-x1", "Cygnus X-1", BlackHole, Epic, 120, &["X-Ray Burst"],
            "The first source widely accepted to be a black hole.",
            stats("7,200 ly", "First confirmed black hole"),
        ),
        object(
            "sagittarius-a", "Sagittarius A*", BlackHole, Legendary, 200, &["Event Horizon Echo"],
            "The supermassive black hole at the centre of the Milky Way.",
            stats("26,000 ly", "Galactic centre"),
        ),
        object(
            "ton-618", "TON 618", BlackHole, Legendary, 200, &["Quasar Light"],
            "An ultramassive black hole powering one of the brightest quasars.",
            stats("10.4 billion ly", "Ultramassive"),
        ),
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::leveling::LevelingRule;

    #[test]
    fn starting_catalog_builds() {
        let catalog = starting_catalog().unwrap();
        assert_eq!(catalog.len(), 24);
    }

    #[test]
    fn covers_every_type_and_rarity() {
        let catalog = starting_catalog().unwrap();
        let types: BTreeSet<_> = catalog.iter().map(|e| e.object_type).collect();
        let tiers: BTreeSet<_> = catalog.iter().map(|e| e.rarity).collect();
        assert_eq!(types.len(), ObjectType::ALL.len());
        assert_eq!(tiers.len(), Rarity::ALL.len());
    }

    #[test]
    fn rewards_never_skip_a_level() {
        let catalog = starting_catalog().unwrap();
        assert!(catalog.max_reward() <= LevelingRule::default().max_safe_reward());
    }

    #[test]
    fn rarer_tiers_pay_more() {
        let catalog = starting_catalog().unwrap();
        let max_of = |tier| {
            catalog
                .iter()
                .filter(|e| e.rarity == tier)
                .map(|e| e.xp)
                .max()
                .unwrap_or(0)
        };
        let min_of = |tier| {
            catalog
                .iter()
                .filter(|e| e.rarity == tier)
                .map(|e| e.xp)
                .min()
                .unwrap_or(0)
        };
        assert!(max_of(Rarity::Common) < min_of(Rarity::Rare));
        assert!(max_of(Rarity::Rare) < min_of(Rarity::Epic));
        assert!(max_of(Rarity::Epic) < min_of(Rarity::Legendary));
    }
}
