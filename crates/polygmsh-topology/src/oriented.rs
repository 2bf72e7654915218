use std::ops::Neg;

/// A reference to a topological entity together with its traversal direction.
///
/// `reversed == false` follows the entity's canonical definition; `true`
/// traverses it backwards without creating a second entity.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Oriented<T> {
    entity: T,
    reversed: bool,
}

impl<T> Oriented<T> {
    pub const fn new(entity: T, reversed: bool) -> Self {
        Self { entity, reversed }
    }

    pub const fn forward(entity: T) -> Self {
        Self::new(entity, false)
    }

    pub const fn backward(entity: T) -> Self {
        Self::new(entity, true)
    }

    pub const fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// `1` for forward references, `-1` for reversed ones.
    pub const fn sign(&self) -> i8 {
        if self.reversed { -1 } else { 1 }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Oriented<U> {
        Oriented::new(f(self.entity), self.reversed)
    }
}

impl<T: Copy> Oriented<T> {
    pub fn entity(&self) -> T {
        self.entity
    }
}

impl<T> Neg for Oriented<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(self.entity, !self.reversed)
    }
}
