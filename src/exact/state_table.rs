use log::debug;

use crate::{errors::*, instance::*};

/// Marks a cost slot whose state has not been computed yet; no tour over at most
/// [`MAX_CITIES`] legs can reach this value.
const UNCOMPUTED: Cost = Cost::MAX;

/// Marks a next slot without a continuation; collides with no city as `MAX_CITIES < 255`.
const NO_CITY: u8 = u8::MAX;

/// Memoization table of the Held-Karp recursion. Both facets are indexed by the state
/// `(current, visited)` and stored flat as `current * 2^n + visited`.
///
/// Entries are written at most once; [`StateTable::store`] panics on a second write to
/// the same state.
pub struct StateTable {
    number_of_cities: NumCities,
    cost: Vec<Cost>,
    next: Vec<u8>,
    number_of_computed: usize,
}

impl StateTable {
    /// Number of bytes used by a single state
    pub const BYTES_PER_STATE: usize = size_of::<Cost>() + size_of::<u8>();

    /// Returns the number of states `n * 2^n`, or `None` if it does not fit in usize.
    pub fn number_of_states(n: NumCities) -> Option<usize> {
        1usize.checked_shl(n)?.checked_mul(n as usize)
    }

    /// Returns the number of bytes required for a table over `n` cities, or `None` on overflow.
    ///
    /// # Example
    /// ```
    /// use hk_tsp::exact::StateTable;
    /// assert_eq!(StateTable::required_bytes(4), Some(4 * 16 * StateTable::BYTES_PER_STATE));
    /// ```
    pub fn required_bytes(n: NumCities) -> Option<usize> {
        Self::number_of_states(n)?.checked_mul(Self::BYTES_PER_STATE)
    }

    /// Allocates a table with all states uncomputed, or fails with
    /// [`TspError::StateSpaceTooLarge`] if it needs more than `max_bytes`.
    pub fn try_new(n: NumCities, max_bytes: usize) -> Result<Self> {
        assert!((1..=MAX_CITIES).contains(&n));

        let too_large = |required_bytes| TspError::StateSpaceTooLarge {
            cities: n,
            required_bytes,
            budget_bytes: max_bytes,
        };

        let required_bytes = Self::required_bytes(n).ok_or_else(|| too_large(usize::MAX))?;
        if required_bytes > max_bytes {
            return Err(too_large(required_bytes));
        }

        // checked by required_bytes
        let states = n as usize * (1usize << n);
        debug!("Allocate state table for {n} cities: {states} states, {required_bytes} bytes");

        Ok(Self {
            number_of_cities: n,
            cost: vec![UNCOMPUTED; states],
            next: vec![NO_CITY; states],
            number_of_computed: 0,
        })
    }

    pub fn number_of_cities(&self) -> NumCities {
        self.number_of_cities
    }

    /// Capacity of the table, i.e. `n * 2^n`
    pub fn capacity(&self) -> usize {
        self.cost.len()
    }

    /// Number of states stored so far
    pub fn number_of_computed_states(&self) -> usize {
        self.number_of_computed
    }

    #[inline(always)]
    fn index_of(&self, current: City, visited: VisitedSet) -> usize {
        debug_assert!(current < self.number_of_cities);
        ((current as usize) << self.number_of_cities) | visited.index()
    }

    /// Minimum remaining cost from `(current, visited)` if it was computed
    pub fn cost(&self, current: City, visited: VisitedSet) -> Option<Cost> {
        let cost = self.cost[self.index_of(current, visited)];
        (cost != UNCOMPUTED).then_some(cost)
    }

    /// Next city along an optimal continuation from `(current, visited)`; `None` for
    /// uncomputed states and for states where all cities are visited.
    pub fn next(&self, current: City, visited: VisitedSet) -> Option<City> {
        let next = self.next[self.index_of(current, visited)];
        (next != NO_CITY).then_some(next as City)
    }

    pub fn is_computed(&self, current: City, visited: VisitedSet) -> bool {
        self.cost(current, visited).is_some()
    }

    /// Records the optimal remaining cost of `(current, visited)` and the city to move to.
    ///
    /// # Panics
    /// If the state was already computed.
    pub fn store(&mut self, current: City, visited: VisitedSet, cost: Cost, next: Option<City>) {
        let idx = self.index_of(current, visited);
        assert_eq!(
            self.cost[idx], UNCOMPUTED,
            "state ({current}, {visited:?}) computed twice"
        );
        debug_assert_ne!(cost, UNCOMPUTED);

        self.cost[idx] = cost;
        self.next[idx] = next.map_or(NO_CITY, |c| c as u8);
        self.number_of_computed += 1;
    }

    /// Iterates over all computed states as `(current, visited, cost, next)`
    pub fn computed_states(
        &self,
    ) -> impl Iterator<Item = (City, VisitedSet, Cost, Option<City>)> + '_ {
        let n = self.number_of_cities;
        let mask = (1usize << n) - 1;
        self.cost
            .iter()
            .zip(&self.next)
            .enumerate()
            .filter(|&(_, (&cost, _))| cost != UNCOMPUTED)
            .map(move |(idx, (&cost, &next))| {
                (
                    (idx >> n) as City,
                    VisitedSet::from_bits((idx & mask) as u32),
                    cost,
                    (next != NO_CITY).then_some(next as City),
                )
            })
    }
}
