use std::time::Instant;

use log::debug;

use super::*;

/// Iterative Held-Karp without recursion. Visited sets are processed in descending
/// bitmask order; as `visited | bit(c) > visited`, every state a candidate refers to is
/// complete before it is read. Exactly the states reachable from the start are filled,
/// with the same tie-breaking as [`MemoizedSolver`].
pub struct BottomUpSolver<'a> {
    matrix: &'a DistanceMatrix,
    start: City,
    full: VisitedSet,
    table: StateTable,
    statistics: SolveStatistics,
}

impl<'a> BottomUpSolver<'a> {
    /// Fails if `start` is not a city of `matrix` or the state table exceeds
    /// `config.max_table_bytes`.
    pub fn new(matrix: &'a DistanceMatrix, start: City, config: &SolverConfig) -> Result<Self> {
        let table = prepare_table(matrix, start, config)?;

        Ok(Self {
            matrix,
            start,
            full: VisitedSet::full(matrix.number_of_cities()),
            table,
            statistics: SolveStatistics::default(),
        })
    }

    /// Cost of the state `(current, visited)`, which must be terminal or already stored.
    fn remaining_cost(&mut self, visited: VisitedSet, current: City) -> Cost {
        if visited == self.full {
            self.statistics.terminal_evaluations += 1;
            return self.matrix.distance(current, self.start) as Cost;
        }

        match self.table.cost(current, visited) {
            Some(cost) => {
                self.statistics.memo_hits += 1;
                cost
            }
            None => unreachable!("superset state ({current}, {visited:?}) read before it was filled"),
        }
    }

    fn compute_state(&mut self, visited: VisitedSet, current: City) {
        let matrix = self.matrix;
        let best = best_continuation(matrix, visited, current, |visited, city| {
            self.statistics.candidates_examined += 1;
            self.remaining_cost(visited, city)
        });

        if let Some((cost, next)) = best {
            self.table.store(current, visited, cost, Some(next));
            self.statistics.states_computed += 1;
        }
    }

    fn fill_table(&mut self) {
        let start_set = VisitedSet::singleton(self.start);

        for bits in (0..self.full.bits()).rev() {
            let visited = VisitedSet::from_bits(bits);
            if !visited.is_visited(self.start) {
                continue;
            }

            for current in visited.iter() {
                // we only return to the start once all cities are visited
                if current == self.start && visited != start_set {
                    continue;
                }
                self.compute_state(visited, current);
            }
        }
    }

    pub fn into_table(self) -> StateTable {
        self.table
    }
}

impl ExactSolver for BottomUpSolver<'_> {
    fn solve(&mut self) -> Cost {
        let start_set = VisitedSet::singleton(self.start);

        if !self.table.is_computed(self.start, start_set) {
            let timer = Instant::now();
            self.fill_table();
            self.statistics.elapsed += timer.elapsed();

            debug!(
                "Bottom-up fill from {}: {} of {} states computed",
                self.start,
                self.table.number_of_computed_states(),
                self.table.capacity()
            );
        }

        self.remaining_cost(start_set, self.start)
    }

    fn matrix(&self) -> &DistanceMatrix {
        self.matrix
    }

    fn start(&self) -> City {
        self.start
    }

    fn table(&self) -> &StateTable {
        &self.table
    }

    fn statistics(&self) -> SolveStatistics {
        self.statistics
    }
}
