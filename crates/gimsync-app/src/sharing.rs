//! Structural sharing.
//!
//! Derived indexes are rebuilt from scratch on every member change, then each
//! rebuilt entry is compared against its previous version. Equal entries keep
//! the previous `Arc`, so unchanged rows stay pointer-equal for consumers.

use std::sync::Arc;

use gimsync_core::Collection;

use crate::{ContainerBreakdown, ItemBreakdown};

/// Contents comparison scoped to one shape of shared data.
pub trait SameContents {
    /// Whether `self` and `other` hold exactly the same entries.
    fn same_contents(&self, other: &Self) -> bool;
}

impl SameContents for ContainerBreakdown {
    fn same_contents(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl SameContents for ItemBreakdown {
    fn same_contents(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().zip(other.iter()).all(|((name_a, a), (name_b, b))| {
                name_a == name_b && a.same_contents(b)
            })
    }
}

impl SameContents for Collection {
    fn same_contents(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: SameContents> SameContents for Arc<T> {
    fn same_contents(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other) || (**self).same_contents(other)
    }
}

/// Keep `previous` if it holds the same contents as `next`.
pub fn share_if_unchanged<T: SameContents>(previous: Option<&Arc<T>>, next: T) -> Arc<T> {
    match previous {
        Some(previous) if T::same_contents(previous, &next) => Arc::clone(previous),
        _ => Arc::new(next),
    }
}

#[cfg(test)]
mod tests {
    use gimsync_core::{Container, ItemId, MemberName};

    use super::*;

    fn breakdown(entries: &[(&str, Container, u64)]) -> ItemBreakdown {
        let mut breakdown = ItemBreakdown::default();
        for &(name, container, quantity) in entries {
            breakdown.add(&MemberName::from(name), container, quantity);
        }
        breakdown
    }

    #[test]
    fn equal_contents_keep_previous_arc() {
        let previous = Arc::new(breakdown(&[("A", Container::Bank, 5)]));
        let shared = share_if_unchanged(Some(&previous), breakdown(&[("A", Container::Bank, 5)]));
        assert!(Arc::ptr_eq(&previous, &shared));
    }

    #[test]
    fn unwrapped_rebuild_compares_by_contents() {
        let previous = Arc::new(Collection::from([(ItemId(4151), 1)]));

        let same = share_if_unchanged(Some(&previous), Collection::from([(ItemId(4151), 1)]));
        let grown = share_if_unchanged(Some(&previous), Collection::from([(ItemId(4151), 2)]));

        assert!(Arc::ptr_eq(&previous, &same));
        assert!(!Arc::ptr_eq(&previous, &grown));
        assert_eq!(grown.get(&ItemId(4151)), Some(&2));
    }

    #[test]
    fn moved_item_is_a_change() {
        let previous = Arc::new(breakdown(&[("A", Container::Bank, 5)]));
        let moved = breakdown(&[("A", Container::Inventory, 5)]);
        assert!(!Arc::ptr_eq(&previous, &share_if_unchanged(Some(&previous), moved)));

        let other_member = breakdown(&[("B", Container::Bank, 5)]);
        assert!(!previous.same_contents(&Arc::new(other_member)));
    }

    #[test]
    fn collections_compare_every_key() {
        let a: Collection = [(ItemId(1), 1), (ItemId(2), 1)].into();
        let b: Collection = [(ItemId(1), 1), (ItemId(2), 2)].into();
        let c: Collection = [(ItemId(1), 1), (ItemId(2), 1), (ItemId(3), 1)].into();

        assert!(a.same_contents(&a.clone()));
        assert!(!a.same_contents(&b));
        assert!(!a.same_contents(&c));
    }
}
