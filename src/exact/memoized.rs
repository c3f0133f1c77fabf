use std::time::Instant;

use log::debug;

use super::*;

/// Top-down Held-Karp: evaluates `(current, visited)` recursively and memoizes every
/// state in a [`StateTable`]. Only states reachable from `(start, {start})` are computed,
/// each exactly once. The recursion depth is bounded by the number of cities.
pub struct MemoizedSolver<'a> {
    matrix: &'a DistanceMatrix,
    start: City,
    full: VisitedSet,
    table: StateTable,
    statistics: SolveStatistics,
}

impl<'a> MemoizedSolver<'a> {
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

    /// Returns the minimum cost of visiting all cities missing from `visited` and
    /// returning to the start, given that we are at `current`.
    fn evaluate(&mut self, visited: VisitedSet, current: City) -> Cost {
        debug_assert!(visited.is_visited(current));

        if visited == self.full {
            self.statistics.terminal_evaluations += 1;
            return self.matrix.distance(current, self.start) as Cost;
        }

        if let Some(cost) = self.table.cost(current, visited) {
            self.statistics.memo_hits += 1;
            return cost;
        }

        let matrix = self.matrix;
        let best = best_continuation(matrix, visited, current, |visited, city| {
            self.statistics.candidates_examined += 1;
            self.evaluate(visited, city)
        });

        let Some((cost, next)) = best else {
            unreachable!("({current}, {visited:?}) is not full but has no unvisited city");
        };

        self.table.store(current, visited, cost, Some(next));
        self.statistics.states_computed += 1;

        cost
    }

    pub fn into_table(self) -> StateTable {
        self.table
    }
}

impl ExactSolver for MemoizedSolver<'_> {
    fn solve(&mut self) -> Cost {
        let timer = Instant::now();
        let cost = self.evaluate(VisitedSet::singleton(self.start), self.start);
        self.statistics.elapsed += timer.elapsed();

        debug!(
            "Memoized solve from {}: {} of {} states computed",
            self.start,
            self.table.number_of_computed_states(),
            self.table.capacity()
        );

        cost
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
