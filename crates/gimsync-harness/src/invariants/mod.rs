//! Invariant checking for deterministic simulation testing.
//!
//! Invariants are properties that must always hold for every published
//! aggregate. Unlike example-based tests that check specific scenarios,
//! invariants verify behavioral properties across all update sequences.
//!
//! # Architecture
//!
//! The invariant system flattens a [`gimsync_app::GroupState`] into a
//! [`GroupSnapshot`], then runs registered [`Invariant`] checks against it.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let snapshot = GroupSnapshot::capture(&state, now, ttl);
//! registry.check_all(&snapshot)?;
//! ```

mod checks;
mod snapshot;

use std::fmt;

pub use checks::{
    ColorsCoverRoster, DistinctPlayerColors, DropIdsIncrease, DropsWithinTtl, NoEmptyItems,
    PositiveDrops, RosterMatchesStates,
};
pub use snapshot::{DropSnapshot, GroupSnapshot};

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Identifies an invariant in violation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvariantKind {
    /// See [`RosterMatchesStates`].
    RosterMatchesStates,
    /// See [`ColorsCoverRoster`].
    ColorsCoverRoster,
    /// See [`DistinctPlayerColors`].
    DistinctPlayerColors,
    /// See [`NoEmptyItems`].
    NoEmptyItems,
    /// See [`PositiveDrops`].
    PositiveDrops,
    /// See [`DropIdsIncrease`].
    DropIdsIncrease,
    /// See [`DropsWithinTtl`].
    DropsWithinTtl,
}

impl fmt::Display for InvariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Invariant violation with context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// The violated invariant.
    pub invariant: InvariantKind,
    /// Description of what went wrong.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// An invariant that can be checked against a snapshot.
pub trait Invariant: Send + Sync {
    /// Which invariant this is.
    fn kind(&self) -> InvariantKind;

    /// Check the invariant against `state`.
    ///
    /// Returns `Ok(())` if the invariant holds, or a [`Violation`]
    /// describing what went wrong.
    fn check(&self, state: &GroupSnapshot) -> InvariantResult;
}

/// Registry of invariants to check.
///
/// Use [`InvariantRegistry::standard()`] for every aggregate invariant.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Create a registry with every aggregate invariant.
    ///
    /// Includes:
    /// - [`RosterMatchesStates`]: every roster member has a state, and only them
    /// - [`ColorsCoverRoster`]: every roster member has a color
    /// - [`DistinctPlayerColors`]: players never share a palette hue
    /// - [`NoEmptyItems`]: the item index holds no zero quantities
    /// - [`PositiveDrops`]: drops carry only positive gains
    /// - [`DropIdsIncrease`]: drop ids are unique and ordered
    /// - [`DropsWithinTtl`]: no published drop has expired
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(RosterMatchesStates);
        registry.add(ColorsCoverRoster);
        registry.add(DistinctPlayerColors);
        registry.add(NoEmptyItems);
        registry.add(PositiveDrops);
        registry.add(DropIdsIncrease);
        registry.add(DropsWithinTtl);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants against the given state.
    ///
    /// Returns `Ok(())` if all invariants hold, or all violations found.
    pub fn check_all(&self, state: &GroupSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}
