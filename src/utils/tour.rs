use std::fmt::{Display, Formatter};

use itertools::Itertools;
use log::debug;
use serde::Serialize;

use crate::{errors::*, exact::StateTable, instance::*};

/// Order in which a round trip visits the cities. The first entry is the start city;
/// the closing leg back to it is implicit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Tour {
    cities: Vec<City>,
}

impl Tour {
    /// # Panics
    /// If `cities` is empty.
    pub fn new(cities: Vec<City>) -> Self {
        assert!(!cities.is_empty(), "a tour contains at least its start city");
        Self { cities }
    }

    /// Follows the next-city entries of `table` from the state `(start, {start})` until
    /// a state without continuation is reached, which is the case exactly when all
    /// cities were visited. On a table that was not solved from `start` the walk stops
    /// immediately and the tour only contains `start`. The walk also stops at an entry
    /// pointing to a visited city, so it takes at most `n - 1` steps on any table.
    pub fn reconstruct(table: &StateTable, start: City) -> Self {
        let mut cities = Vec::with_capacity(table.number_of_cities() as usize);
        cities.push(start);

        let mut current = start;
        let mut visited = VisitedSet::singleton(start);

        let n = table.number_of_cities();
        while let Some(next) = table
            .next(current, visited)
            .filter(|&next| next < n && !visited.is_visited(next))
        {
            cities.push(next);
            visited.visit(next);
            current = next;
        }

        debug!("Reconstructed tour with {} cities from {start}", cities.len());

        Self { cities }
    }

    pub fn start(&self) -> City {
        self.cities[0]
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Returns the number of cities on the tour (not counting the return to start)
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Always false; a tour contains at least its start city
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates over the tour including the return to the start city.
    ///
    /// # Example
    /// ```
    /// use hk_tsp::utils::Tour;
    /// let tour = Tour::new(vec![2, 0, 1]);
    /// assert_eq!(tour.closed_cycle().collect::<Vec<_>>(), vec![2, 0, 1, 2]);
    /// ```
    pub fn closed_cycle(&self) -> impl Iterator<Item = City> + '_ {
        self.cities
            .iter()
            .copied()
            .chain(std::iter::once(self.start()))
    }

    /// Sum of all legs including the closing leg back to the start.
    ///
    /// # Example
    /// ```
    /// use hk_tsp::{instance::DistanceMatrix, utils::Tour};
    /// let matrix = DistanceMatrix::try_from_rows([[0, 1, 2], [3, 0, 4], [5, 6, 0]]).unwrap();
    /// assert_eq!(Tour::new(vec![0, 1, 2]).cost(&matrix), 1 + 4 + 5);
    /// assert_eq!(Tour::new(vec![0, 2, 1]).cost(&matrix), 2 + 6 + 3);
    /// ```
    pub fn cost(&self, matrix: &DistanceMatrix) -> Cost {
        self.closed_cycle()
            .tuple_windows()
            .map(|(u, v)| matrix.distance(u, v) as Cost)
            .sum()
    }
}

impl InvariantCheck<TspError> for Tour {
    /// Checks that the tour visits each of the cities `0..len` exactly once.
    fn is_correct(&self) -> Result<()> {
        let mut visited = VisitedSet::EMPTY;

        for &city in &self.cities {
            if city as usize >= self.cities.len() {
                return Err(TspError::invariant(format!(
                    "city {city} out of range for a tour of {} cities",
                    self.cities.len()
                )));
            }
            if visited.is_visited(city) {
                return Err(TspError::invariant(format!("city {city} visited twice")));
            }
            visited.visit(city);
        }

        Ok(())
    }
}

impl Display for Tour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.closed_cycle().join(" -> "))
    }
}
