//! Error types for catalog construction and engagement setup.
//!
//! Catalog errors are fatal: a catalog that failed validation cannot be
//! trusted for simulation. Nothing in the tick loop itself returns an error.

use thiserror::Error;

/// Result type alias using [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors raised while resolving raw entity definitions into a [`Catalog`].
///
/// [`Catalog`]: crate::catalog::Catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A target-type tag is not part of the closed target-type enumeration.
    #[error("unknown target type '{tag}' in '{entity}'")]
    UnknownTargetType {
        /// Entity whose definition carried the tag.
        entity: String,
        /// The unrecognized tag.
        tag: String,
    },

    /// A weapon names an acquisition logic the simulator does not implement.
    #[error("unknown acquisition logic '{logic}' on weapon '{weapon}'")]
    UnknownAcquisitionLogic {
        /// Weapon carrying the logic string.
        weapon: String,
        /// The unrecognized logic string.
        logic: String,
    },

    /// A ship mounts a weapon that is not defined.
    #[error("ship '{ship}' mounts unknown weapon '{weapon}'")]
    UnknownWeapon {
        /// Ship referencing the weapon.
        ship: String,
        /// Missing weapon name.
        weapon: String,
    },

    /// A missile or torpedo weapon has no projectile definition.
    #[error("projectile weapon '{weapon}' has no projectile definition")]
    MissingProjectile {
        /// Weapon lacking a projectile.
        weapon: String,
    },

    /// A projectile weapon fires an empty salvo.
    #[error("weapon '{weapon}' has salvo size 0")]
    InvalidSalvoSize {
        /// Weapon with the bad salvo size.
        weapon: String,
    },
}

/// Errors raised when an engagement configuration cannot be simulated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// At least one repetition is required to produce statistics.
    #[error("repetitions must be at least 1")]
    ZeroRepetitions,

    /// The tick interval drives every time-based formula and cannot be zero.
    #[error("tick interval must be at least 1 ms")]
    ZeroTickInterval,

    /// A battle needs a non-empty time budget.
    #[error("battle duration must be at least 1 second")]
    ZeroDuration,
}
