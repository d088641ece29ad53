//! Deterministic simulation harness for group state synchronization.
//!
//! Virtual-time implementations of the Environment and Driver traits, so the
//! production [`gimsync_app::Runtime`] can be driven through scripted
//! sessions without real clocks or a backend.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks over [`GroupSnapshot`]s. Use [`InvariantRegistry::standard()`] for
//! the properties every published aggregate must satisfy.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod invariants;
pub mod sim_driver;
pub mod sim_env;

pub use invariants::{
    ColorsCoverRoster, DistinctPlayerColors, DropIdsIncrease, DropSnapshot, DropsWithinTtl,
    GroupSnapshot, Invariant, InvariantKind, InvariantRegistry, InvariantResult, NoEmptyItems,
    PositiveDrops, RosterMatchesStates, Violation,
};
pub use sim_driver::{SimDriver, SimError};
pub use sim_env::{SimEnv, SimInstant};
