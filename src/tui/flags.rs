//! Per-screen condition registers.
//!
//! Each screen declares its own closed set of conditions with `bitflags!`
//! and keeps them in a [`FlagRegister`]. Several conditions may be active at
//! once; the warning cascade picks the first active one from a fixed
//! priority list.

use bitflags::Flags;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagRegister<F> {
    bits: F,
}

impl<F: Flags + Copy> Default for FlagRegister<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Flags + Copy> FlagRegister<F> {
    pub fn new() -> Self {
        Self { bits: F::empty() }
    }

    pub fn set(&mut self, flag: F) {
        self.bits.insert(flag);
    }

    /// Clear `flag`. Clearing an already clear flag is a no-op.
    pub fn clear(&mut self, flag: F) {
        self.bits.remove(flag);
    }

    pub fn clear_all(&mut self) {
        self.bits = F::empty();
    }

    /// Whether every bit of `flag` is set.
    pub fn is_set(&self, flag: F) -> bool {
        self.bits.contains(flag)
    }

    /// Whether any bit of `mask` is set.
    pub fn any_of(&self, mask: F) -> bool {
        self.bits.intersects(mask)
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Clear `flag`, returning whether it was set.
    pub fn take(&mut self, flag: F) -> bool {
        let was_set = self.is_set(flag);
        self.clear(flag);
        was_set
    }

    /// First flag of `priority` that is currently set.
    pub fn first_active(&self, priority: &[F]) -> Option<F> {
        priority.iter().copied().find(|flag| self.is_set(*flag))
    }

    pub fn bits(&self) -> F {
        self.bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitflags::bitflags;
    use proptest::prelude::*;

    bitflags! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        struct TestFlags: u8 {
            const A = 1;
            const B = 1 << 1;
            const C = 1 << 2;
            const D = 1 << 3;
        }
    }

    const ORDER: [TestFlags; 4] = [TestFlags::A, TestFlags::B, TestFlags::C, TestFlags::D];

    #[test]
    fn test_set_and_clear() {
        let mut flags = FlagRegister::<TestFlags>::new();
        flags.set(TestFlags::B);
        assert!(flags.is_set(TestFlags::B));
        assert!(!flags.is_set(TestFlags::A));

        flags.clear(TestFlags::B);
        flags.clear(TestFlags::B);
        assert!(flags.is_empty());
    }

    #[test]
    fn test_take_reports_once() {
        let mut flags = FlagRegister::<TestFlags>::new();
        flags.set(TestFlags::C);
        assert!(flags.take(TestFlags::C));
        assert!(!flags.take(TestFlags::C));
    }

    #[test]
    fn test_any_of_mask() {
        let mut flags = FlagRegister::<TestFlags>::new();
        flags.set(TestFlags::D);
        assert!(flags.any_of(TestFlags::C | TestFlags::D));
        assert!(!flags.any_of(TestFlags::A | TestFlags::B));
    }

    proptest! {
        #[test]
        fn first_active_is_highest_priority(bits in 0u8..16) {
            let mut flags = FlagRegister::<TestFlags>::new();
            for flag in ORDER {
                if bits & flag.bits() != 0 {
                    flags.set(flag);
                }
            }
            let expected = ORDER.iter().copied().find(|f| bits & f.bits() != 0);
            prop_assert_eq!(flags.first_active(&ORDER), expected);
        }

        #[test]
        fn clear_is_idempotent(bits in 0u8..16, target in 0usize..4) {
            let mut once = FlagRegister::<TestFlags>::new();
            once.set(TestFlags::from_bits_truncate(bits));
            let mut twice = once;
            once.clear(ORDER[target]);
            twice.clear(ORDER[target]);
            twice.clear(ORDER[target]);
            prop_assert_eq!(once, twice);
        }
    }
}
