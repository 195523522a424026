//! Capability traits used for operator dispatch.
//!
//! A value type advertises the operations it supports through a small set of
//! capability tags. The dispatch engine checks `TypeValue::has_trait` before
//! invoking an operator implementation, which is the only type information it
//! needs at runtime.

/// A capability a value type may support.
///
/// The discriminants are stable identifiers shared with external type
/// implementations; they must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Trait {
    /// Supports addition (`_+_`).
    Adder = 1,
    /// Supports three-way ordering (`compare`).
    Comparer = 2,
    /// Supports membership tests (`in`).
    Container = 3,
    /// Supports division (`_/_`).
    Divider = 4,
    /// Supports field presence tests (`has`).
    FieldTester = 5,
    /// Supports indexed access (`_[_]`).
    Indexer = 6,
    /// Can produce an iterator over its elements.
    Iterable = 7,
    /// Is an iterator.
    Iterator = 8,
    /// Supports regular-expression matching (`matches`).
    Matcher = 9,
    /// Supports modulus (`_%_`).
    Modder = 10,
    /// Supports multiplication (`_*_`).
    Multiplier = 11,
    /// Supports negation (`-_`, and logical `!_` for bool).
    Negater = 12,
    /// Supports receiver-style member functions.
    Receiver = 13,
    /// Supports `size()`.
    Sizer = 14,
    /// Supports subtraction (`_-_`).
    Subtractor = 15,
    /// Supports folding over its elements (comprehensions).
    Foldable = 16,
}

impl Trait {
    /// All traits, in id order.
    pub const ALL: [Trait; 16] = [
        Trait::Adder,
        Trait::Comparer,
        Trait::Container,
        Trait::Divider,
        Trait::FieldTester,
        Trait::Indexer,
        Trait::Iterable,
        Trait::Iterator,
        Trait::Matcher,
        Trait::Modder,
        Trait::Multiplier,
        Trait::Negater,
        Trait::Receiver,
        Trait::Sizer,
        Trait::Subtractor,
        Trait::Foldable,
    ];

    /// The stable small-integer identity of this trait.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Look up a trait by its stable id.
    pub fn from_id(id: u8) -> Option<Trait> {
        Trait::ALL.get(id.wrapping_sub(1) as usize).copied()
    }
}

/// A set of traits, stored as a bitmask keyed by trait id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraitMask(u32);

impl TraitMask {
    /// The empty set.
    pub const EMPTY: TraitMask = TraitMask(0);

    /// Build a mask from a list of traits.
    pub const fn of(traits: &[Trait]) -> TraitMask {
        let mut bits = 0u32;
        let mut i = 0;
        while i < traits.len() {
            bits |= 1 << (traits[i] as u8);
            i += 1;
        }
        TraitMask(bits)
    }

    /// Check membership.
    pub fn contains(self, t: Trait) -> bool {
        self.0 & (1 << t.id()) != 0
    }

    /// Union of two masks.
    pub fn union(self, other: TraitMask) -> TraitMask {
        TraitMask(self.0 | other.0)
    }

    /// True if no traits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over the traits in the mask, in id order.
    pub fn iter(self) -> impl Iterator<Item = Trait> {
        Trait::ALL.into_iter().filter(move |t| self.contains(*t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_ids_are_stable() {
        assert_eq!(Trait::Adder.id(), 1);
        assert_eq!(Trait::Comparer.id(), 2);
        assert_eq!(Trait::Container.id(), 3);
        assert_eq!(Trait::Divider.id(), 4);
        assert_eq!(Trait::FieldTester.id(), 5);
        assert_eq!(Trait::Indexer.id(), 6);
        assert_eq!(Trait::Iterable.id(), 7);
        assert_eq!(Trait::Iterator.id(), 8);
        assert_eq!(Trait::Matcher.id(), 9);
        assert_eq!(Trait::Modder.id(), 10);
        assert_eq!(Trait::Multiplier.id(), 11);
        assert_eq!(Trait::Negater.id(), 12);
        assert_eq!(Trait::Receiver.id(), 13);
        assert_eq!(Trait::Sizer.id(), 14);
        assert_eq!(Trait::Subtractor.id(), 15);
        assert_eq!(Trait::Foldable.id(), 16);
    }

    #[test]
    fn test_trait_from_id_roundtrip() {
        for t in Trait::ALL {
            assert_eq!(Trait::from_id(t.id()), Some(t));
        }
        assert_eq!(Trait::from_id(0), None);
        assert_eq!(Trait::from_id(17), None);
    }

    #[test]
    fn test_mask_membership() {
        let mask = TraitMask::of(&[Trait::Adder, Trait::Sizer]);
        assert!(mask.contains(Trait::Adder));
        assert!(mask.contains(Trait::Sizer));
        assert!(!mask.contains(Trait::Divider));
        assert!(!TraitMask::EMPTY.contains(Trait::Adder));
    }

    #[test]
    fn test_mask_union_and_iter() {
        let a = TraitMask::of(&[Trait::Adder]);
        let b = TraitMask::of(&[Trait::Comparer]);
        let both = a.union(b);
        let collected: Vec<Trait> = both.iter().collect();
        assert_eq!(collected, vec![Trait::Adder, Trait::Comparer]);
    }
}
