//! Roster and member colors.

use std::collections::BTreeSet;

use gimsync_core::GroupStateUpdate;

use crate::{MemberColor, MemberColors, Roster, SHARED_HUE};

/// Roster after applying `update`.
///
/// A partial update adds its members to the existing roster. A full update
/// replaces the roster with exactly the members it reports. Returns `None`
/// when the roster is unchanged.
pub(crate) fn next_roster(
    previous: &Roster,
    update: &GroupStateUpdate,
    partial: bool,
) -> Option<Roster> {
    if partial {
        if update.keys().all(|name| previous.contains(name)) {
            return None;
        }
        let mut roster = previous.clone();
        roster.extend(update.keys().cloned());
        return Some(roster);
    }

    let roster: Roster = update.keys().cloned().collect();
    previous.symmetric_difference(&roster).next().is_some().then_some(roster)
}

/// Colors for `roster`.
///
/// Members keep the color they already had. Newcomers take the first palette
/// hue no remaining player holds, in roster order. Once the palette is
/// exhausted newcomers get [`SHARED_HUE`]. The shared-storage pseudo-member
/// always gets [`SHARED_HUE`].
pub(crate) fn assign_colors(
    previous: &MemberColors,
    roster: &Roster,
    palette: &[u16],
) -> MemberColors {
    let mut colors: MemberColors = previous
        .iter()
        .filter(|(name, _)| roster.contains(*name))
        .map(|(name, color)| (name.clone(), *color))
        .collect();

    let mut taken: BTreeSet<u16> = colors
        .iter()
        .filter(|(name, _)| !name.is_shared())
        .map(|(_, color)| color.hue_degrees)
        .collect();

    for name in roster {
        if colors.contains_key(name) {
            continue;
        }
        let hue = if name.is_shared() {
            SHARED_HUE
        } else {
            let hue =
                palette.iter().copied().find(|hue| !taken.contains(hue)).unwrap_or(SHARED_HUE);
            taken.insert(hue);
            hue
        };
        colors.insert(name.clone(), MemberColor { hue_degrees: hue });
    }

    colors
}
