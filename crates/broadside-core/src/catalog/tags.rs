//! Closed enumerations used by weapon filters and targeting policies.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

bitflags! {
    /// Set of target categories.
    ///
    /// A ship or projectile belongs to one category; a weapon's filter is
    /// the set of categories it may engage. A weapon can engage a combatant
    /// when the two sets intersect.
    ///
    /// # Example
    ///
    /// ```
    /// use broadside_core::catalog::TargetTypes;
    ///
    /// let flak = TargetTypes::STRIKECRAFT | TargetTypes::TORPEDO;
    /// assert!(flak.matches(TargetTypes::TORPEDO));
    /// assert!(!flak.matches(TargetTypes::FRIGATE));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TargetTypes: u16 {
        /// Fighters and bombers.
        const STRIKECRAFT = 1 << 0;
        /// Corvettes.
        const CORVETTE = 1 << 1;
        /// Frigates.
        const FRIGATE = 1 << 2;
        /// Cruisers.
        const CRUISER = 1 << 3;
        /// Capital ships.
        const CAPITAL_SHIP = 1 << 4;
        /// Titans.
        const TITAN = 1 << 5;
        /// In-flight missiles and torpedoes.
        const TORPEDO = 1 << 6;
        /// Static structures.
        const STRUCTURE = 1 << 7;
        /// Planets.
        const PLANET = 1 << 8;
    }
}

/// Tag strings as they appear in entity files, paired with their flag.
const TAGS: [(&str, TargetTypes); 9] = [
    ("strikecraft", TargetTypes::STRIKECRAFT),
    ("corvette", TargetTypes::CORVETTE),
    ("frigate", TargetTypes::FRIGATE),
    ("cruiser", TargetTypes::CRUISER),
    ("capital_ship", TargetTypes::CAPITAL_SHIP),
    ("titan", TargetTypes::TITAN),
    ("torpedo", TargetTypes::TORPEDO),
    ("structure", TargetTypes::STRUCTURE),
    ("planet", TargetTypes::PLANET),
];

impl TargetTypes {
    /// Looks up a single tag, returning `None` for unknown tags.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        TAGS.iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, flag)| *flag)
    }

    /// Parses a list of tags for `entity`, failing on the first unknown tag.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownTargetType`] if any tag is not part of
    /// the enumeration.
    pub fn parse_tags<S: AsRef<str>>(entity: &str, tags: &[S]) -> Result<Self, CatalogError> {
        tags.iter().try_fold(Self::empty(), |acc, tag| {
            let tag = tag.as_ref();
            Self::from_tag(tag)
                .map(|flag| acc | flag)
                .ok_or_else(|| CatalogError::UnknownTargetType {
                    entity: entity.to_string(),
                    tag: tag.to_string(),
                })
        })
    }

    /// Returns true if the two sets share at least one category.
    #[must_use]
    pub const fn matches(self, other: Self) -> bool {
        self.intersects(other)
    }
}

impl fmt::Display for TargetTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = TAGS
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect();
        write!(f, "{}", names.join("|"))
    }
}

/// Per-weapon targeting policy.
///
/// The "order target" is the primary weapon's target (weapon index 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionLogic {
    /// Secondary weapons mirror the primary weapon's target outright.
    OrderTargetOnly,
    /// The weapon avoids the ship's primary target.
    BestTargetInRange,
    /// The weapon picks independently; it may or may not share the primary target.
    #[default]
    OrderTargetOrBestTargetInRange,
}

impl AcquisitionLogic {
    /// Parses the logic string used in weapon files.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "order_target_only" => Some(Self::OrderTargetOnly),
            "best_target_in_range" => Some(Self::BestTargetInRange),
            "order_target_or_best_target_in_range" => Some(Self::OrderTargetOrBestTargetInRange),
            _ => None,
        }
    }
}

/// How a weapon delivers its damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Damage lands on the target the moment the weapon fires.
    DirectFire,
    /// Firing spawns a salvo of projectiles that carry the damage.
    Projectile,
}

impl WeaponKind {
    /// Classifies a weapon by the naming convention of the source data:
    /// names ending in `missile` or `torpedo` launch projectiles.
    #[must_use]
    pub fn from_weapon_name(name: &str) -> Self {
        if name.ends_with("missile") || name.ends_with("torpedo") {
            Self::Projectile
        } else {
            Self::DirectFire
        }
    }
}
