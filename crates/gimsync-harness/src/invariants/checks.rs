//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use std::collections::BTreeMap;

use gimsync_core::MemberName;

use super::{GroupSnapshot, Invariant, InvariantKind, InvariantResult, Violation};

/// The roster and the member states name the same members.
///
/// A state for someone off the roster would leak into the item index; a
/// roster member without state would render as a blank card.
pub struct RosterMatchesStates;

impl Invariant for RosterMatchesStates {
    fn kind(&self) -> InvariantKind {
        InvariantKind::RosterMatchesStates
    }

    fn check(&self, state: &GroupSnapshot) -> InvariantResult {
        if state.roster != state.tracked {
            return Err(Violation {
                invariant: self.kind(),
                message: format!("roster {:?} but states for {:?}", state.roster, state.tracked),
            });
        }
        Ok(())
    }
}

/// Every roster member, and nobody else, has a color. Shared storage has hue 0.
pub struct ColorsCoverRoster;

impl Invariant for ColorsCoverRoster {
    fn kind(&self) -> InvariantKind {
        InvariantKind::ColorsCoverRoster
    }

    fn check(&self, state: &GroupSnapshot) -> InvariantResult {
        if !state.colors.keys().eq(state.roster.iter()) {
            return Err(Violation {
                invariant: self.kind(),
                message: format!(
                    "colors for {:?} but roster {:?}",
                    state.colors.keys().collect::<Vec<_>>(),
                    state.roster
                ),
            });
        }

        let shared = MemberName::shared();
        if let Some(hue) = state.colors.get(&shared).filter(|hue| **hue != 0) {
            return Err(Violation {
                invariant: self.kind(),
                message: format!("{shared} has hue {hue}"),
            });
        }
        Ok(())
    }
}

/// Two players never share a palette hue.
///
/// Hue 0 is exempt: it is the fallback once the palette runs out.
pub struct DistinctPlayerColors;

impl Invariant for DistinctPlayerColors {
    fn kind(&self) -> InvariantKind {
        InvariantKind::DistinctPlayerColors
    }

    fn check(&self, state: &GroupSnapshot) -> InvariantResult {
        let mut owners: BTreeMap<u16, &MemberName> = BTreeMap::new();
        for (name, hue) in &state.colors {
            if name.is_shared() || *hue == 0 {
                continue;
            }
            if let Some(owner) = owners.insert(*hue, name) {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!("{owner} and {name} both have hue {hue}"),
                });
            }
        }
        Ok(())
    }
}

/// The item index only lists items somebody on the roster actually holds.
pub struct NoEmptyItems;

impl Invariant for NoEmptyItems {
    fn kind(&self) -> InvariantKind {
        InvariantKind::NoEmptyItems
    }

    fn check(&self, state: &GroupSnapshot) -> InvariantResult {
        for (item_id, holders) in &state.items {
            if holders.is_empty() {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!("item {item_id} has no holders"),
                });
            }
            for (name, quantity) in holders {
                if *quantity == 0 || !state.roster.contains(name) {
                    return Err(Violation {
                        invariant: self.kind(),
                        message: format!("item {item_id}: {name} holds {quantity}"),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Every drop carries at least one gain, and every gain is positive.
pub struct PositiveDrops;

impl Invariant for PositiveDrops {
    fn kind(&self) -> InvariantKind {
        InvariantKind::PositiveDrops
    }

    fn check(&self, state: &GroupSnapshot) -> InvariantResult {
        for (name, drops) in &state.drops {
            for drop in drops {
                if drop.amounts.is_empty() || drop.amounts.contains(&0) {
                    return Err(Violation {
                        invariant: self.kind(),
                        message: format!("{name} drop {}: amounts {:?}", drop.id, drop.amounts),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Drop ids increase within each list, never repeat, and stay below the
/// counter.
pub struct DropIdsIncrease;

impl Invariant for DropIdsIncrease {
    fn kind(&self) -> InvariantKind {
        InvariantKind::DropIdsIncrease
    }

    fn check(&self, state: &GroupSnapshot) -> InvariantResult {
        let mut seen = BTreeMap::new();
        for (name, drops) in &state.drops {
            for window in drops.windows(2) {
                if window[1].id <= window[0].id {
                    return Err(Violation {
                        invariant: self.kind(),
                        message: format!(
                            "{name}: drop {} listed after drop {}",
                            window[1].id, window[0].id
                        ),
                    });
                }
            }
            for drop in drops {
                if drop.id >= state.xp_drop_counter {
                    return Err(Violation {
                        invariant: self.kind(),
                        message: format!(
                            "{name}: drop {} not below counter {}",
                            drop.id, state.xp_drop_counter
                        ),
                    });
                }
                if let Some(other) = seen.insert(drop.id, name) {
                    return Err(Violation {
                        invariant: self.kind(),
                        message: format!("drop {} belongs to both {other} and {name}", drop.id),
                    });
                }
            }
        }
        Ok(())
    }
}

/// No published drop has outlived its lifetime, and only roster members have
/// drops.
pub struct DropsWithinTtl;

impl Invariant for DropsWithinTtl {
    fn kind(&self) -> InvariantKind {
        InvariantKind::DropsWithinTtl
    }

    fn check(&self, state: &GroupSnapshot) -> InvariantResult {
        for (name, drops) in &state.drops {
            if !state.roster.contains(name) || drops.is_empty() {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!("{name}: {} drops but not on the roster", drops.len()),
                });
            }
            if let Some(drop) = drops.iter().find(|drop| drop.age >= state.xp_drop_ttl) {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!(
                        "{name} drop {} aged {:?} (ttl {:?})",
                        drop.id, drop.age, state.xp_drop_ttl
                    ),
                });
            }
        }
        Ok(())
    }
}
