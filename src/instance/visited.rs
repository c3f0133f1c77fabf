use std::fmt::{Debug, Formatter};

use super::*;

/// Set of visited cities encoded as a bitmask; bit `i` is set iff city `i` was visited.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisitedSet(u32);

impl VisitedSet {
    pub const WIDTH: NumCities = u32::BITS;

    pub const EMPTY: Self = Self(0);

    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the set containing only `city`.
    ///
    /// # Example
    /// ```
    /// use hk_tsp::instance::VisitedSet;
    /// let visited = VisitedSet::singleton(3);
    /// assert!(visited.is_visited(3));
    /// assert_eq!(visited.len(), 1);
    /// ```
    pub fn singleton(city: City) -> Self {
        debug_assert!(city < Self::WIDTH);
        Self(1 << city)
    }

    /// Returns the set of all `n` cities, i.e. `(1 << n) - 1`.
    ///
    /// # Example
    /// ```
    /// use hk_tsp::instance::VisitedSet;
    /// assert_eq!(VisitedSet::full(4).bits(), 0b1111);
    /// assert_eq!(VisitedSet::full(32).bits(), u32::MAX);
    /// ```
    pub fn full(n: NumCities) -> Self {
        debug_assert!((1..=Self::WIDTH).contains(&n));
        Self(u32::MAX >> (Self::WIDTH - n))
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    /// Position of this set within a table with `2^n` columns
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_visited(self, city: City) -> bool {
        (self.0 >> city) & 1 == 1
    }

    /// Marks `city` visited
    pub fn visit(&mut self, city: City) {
        debug_assert!(city < Self::WIDTH);
        self.0 |= 1 << city;
    }

    /// Returns a copy of the set with `city` marked visited.
    ///
    /// # Example
    /// ```
    /// use hk_tsp::instance::VisitedSet;
    /// let visited = VisitedSet::singleton(0).with(2);
    /// assert_eq!(visited.bits(), 0b101);
    /// ```
    pub fn with(mut self, city: City) -> Self {
        self.visit(city);
        self
    }

    pub fn is_full(self, n: NumCities) -> bool {
        self == Self::full(n)
    }

    pub fn len(self) -> NumCities {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates over the visited cities in ascending order
    pub fn iter(self) -> impl Iterator<Item = City> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            (bits != 0).then(|| {
                let city = bits.trailing_zeros();
                bits &= bits - 1;
                city
            })
        })
    }

    /// Iterates over the cities in `0..n` that are not yet visited, in ascending order.
    ///
    /// # Example
    /// ```
    /// use hk_tsp::instance::VisitedSet;
    /// let visited = VisitedSet::from_bits(0b0101);
    /// assert_eq!(visited.unvisited(4).collect::<Vec<_>>(), vec![1, 3]);
    /// ```
    pub fn unvisited(self, n: NumCities) -> impl Iterator<Item = City> {
        Self(!self.0 & Self::full(n).0).iter()
    }
}

impl Debug for VisitedSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
