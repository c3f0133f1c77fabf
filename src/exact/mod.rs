//! Exact solvers for the traveling salesman problem.
//!
//! Both Held-Karp solvers fill a [`StateTable`] where the state `(current, visited)` holds
//! the minimum cost of visiting all remaining cities and returning to the start. They
//! produce identical tables: candidates are scanned in ascending city order and the best
//! continuation is only replaced on strict improvement, so ties go to the lowest index.

pub mod bottom_up;
pub mod brute_force;
pub mod memoized;
pub mod state_table;

pub use bottom_up::BottomUpSolver;
pub use brute_force::*;
pub use memoized::MemoizedSolver;
pub use state_table::StateTable;

use std::time::Duration;

use log::info;
use serde::Serialize;

use crate::{
    config::{SolverConfig, Strategy},
    errors::*,
    instance::*,
    utils::Tour,
};

/// Counters collected while filling a [`StateTable`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SolveStatistics {
    /// States written to the table
    pub states_computed: u64,
    /// Lookups answered from the table without recomputation
    pub memo_hits: u64,
    /// Evaluations of states with all cities visited (the return leg)
    pub terminal_evaluations: u64,
    /// Candidate transitions `(current -> c)` compared during expansion
    pub candidates_examined: u64,
    #[serde(serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

fn serialize_millis<S: serde::Serializer>(
    duration: &Duration,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_u64(duration.as_millis() as u64)
}

/// Common interface of the Held-Karp solvers. A solver is bound to a matrix and a
/// start city at construction and owns its state table.
pub trait ExactSolver {
    /// Computes the cost of an optimal tour from the start city; later calls return
    /// the same value without recomputing any state.
    fn solve(&mut self) -> Cost;

    fn matrix(&self) -> &DistanceMatrix;

    fn start(&self) -> City;

    fn table(&self) -> &StateTable;

    fn statistics(&self) -> SolveStatistics;

    /// Reads the optimal tour from the table; call after [`ExactSolver::solve`].
    fn tour(&self) -> Tour {
        Tour::reconstruct(self.table(), self.start())
    }
}

/// Validates `matrix` and `start` against `config` and returns a solver for the
/// configured strategy.
pub fn build_solver<'a>(
    matrix: &'a DistanceMatrix,
    start: City,
    config: &SolverConfig,
) -> Result<Box<dyn ExactSolver + 'a>> {
    Ok(match config.strategy {
        Strategy::Memoized => Box::new(MemoizedSolver::new(matrix, start, config)?),
        Strategy::BottomUp => Box::new(BottomUpSolver::new(matrix, start, config)?),
    })
}

/// Result of [`solve_tsp`]
#[derive(Clone, Debug, Serialize)]
pub struct Solution {
    pub cost: Cost,
    pub tour: Tour,
    pub strategy: Strategy,
    pub statistics: SolveStatistics,
}

/// Solves the instance exactly: validates the input, fills the state table with the
/// configured strategy and reconstructs the optimal tour.
///
/// # Example
/// ```
/// use hk_tsp::{config::SolverConfig, exact::solve_tsp, instance::DistanceMatrix};
/// let matrix = DistanceMatrix::try_from_rows([
///     [0, 10, 15, 20],
///     [10, 0, 35, 25],
///     [15, 35, 0, 30],
///     [20, 25, 30, 0],
/// ])
/// .unwrap();
///
/// let solution = solve_tsp(&matrix, 0, &SolverConfig::default()).unwrap();
/// assert_eq!(solution.cost, 80);
/// assert_eq!(solution.tour.to_string(), "0 -> 1 -> 3 -> 2 -> 0");
/// ```
pub fn solve_tsp(matrix: &DistanceMatrix, start: City, config: &SolverConfig) -> Result<Solution> {
    let mut solver = build_solver(matrix, start, config)?;

    let cost = solver.solve();
    let tour = solver.tour();
    let statistics = solver.statistics();

    info!(
        "{} Held-Karp on {} cities from {start}: cost {cost}, {} states, {} memo hits, took {:?}",
        config.strategy,
        matrix.number_of_cities(),
        statistics.states_computed,
        statistics.memo_hits,
        statistics.elapsed
    );

    if config.paranoid {
        check_table(solver.table(), matrix, start)?;
        tour.is_correct()?;
        if tour.start() != start || tour.len() != matrix.len() {
            return Err(TspError::invariant(format!(
                "tour {tour} does not cover all {} cities from {start}",
                matrix.len()
            )));
        }
        if tour.cost(matrix) != cost {
            return Err(TspError::invariant(format!(
                "tour {tour} costs {} but solver reported {cost}",
                tour.cost(matrix)
            )));
        }
    }

    Ok(Solution {
        cost,
        tour,
        strategy: config.strategy,
        statistics,
    })
}

/// Allocates the table after validating `start` and the memory budget.
fn prepare_table(matrix: &DistanceMatrix, start: City, config: &SolverConfig) -> Result<StateTable> {
    matrix.check_start(start)?;
    StateTable::try_new(matrix.number_of_cities(), config.max_table_bytes)
}

/// Scans all unvisited cities `c` in ascending order and returns the minimum of
/// `d(current, c) + remaining(visited + c, c)` together with the first `c` attaining it.
/// Returns `None` iff all cities are visited.
#[inline(always)]
fn best_continuation(
    matrix: &DistanceMatrix,
    visited: VisitedSet,
    current: City,
    mut remaining: impl FnMut(VisitedSet, City) -> Cost,
) -> Option<(Cost, City)> {
    let mut best: Option<(Cost, City)> = None;

    for city in visited.unvisited(matrix.number_of_cities()) {
        let candidate =
            matrix.distance(current, city) as Cost + remaining(visited.with(city), city);

        // strict improvement only: on ties the lower index (seen first) is kept
        if best.is_none_or(|(best_cost, _)| candidate < best_cost) {
            best = Some((candidate, city));
        }
    }

    best
}

/// Verifies that every computed state is consistent with the matrix: the current city is
/// visited, full states are never stored, the next city is unvisited and the stored cost
/// equals the leg to the next city plus the remaining cost from there.
pub fn check_table(table: &StateTable, matrix: &DistanceMatrix, start: City) -> Result<()> {
    let n = matrix.number_of_cities();
    let remaining = |visited: VisitedSet, current: City| {
        if visited.is_full(n) {
            Some(matrix.distance(current, start) as Cost)
        } else {
            table.cost(current, visited)
        }
    };

    for (current, visited, cost, next) in table.computed_states() {
        if !visited.is_visited(current) || !visited.is_visited(start) {
            return Err(TspError::invariant(format!(
                "state ({current}, {visited:?}) is not reachable from {start}"
            )));
        }

        if visited.is_full(n) {
            return Err(TspError::invariant(format!(
                "terminal state ({current}, {visited:?}) was stored"
            )));
        }

        let Some(next) = next else {
            return Err(TspError::invariant(format!(
                "state ({current}, {visited:?}) has no continuation"
            )));
        };

        if visited.is_visited(next) {
            return Err(TspError::invariant(format!(
                "state ({current}, {visited:?}) continues to visited city {next}"
            )));
        }

        let expected = remaining(visited.with(next), next)
            .map(|rest| matrix.distance(current, next) as Cost + rest);

        if expected != Some(cost) {
            return Err(TspError::invariant(format!(
                "state ({current}, {visited:?}) stores {cost}, continuation via {next} yields {expected:?}"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use rayon::prelude::*;

    use super::*;
    use crate::testing::*;

    #[test]
    fn four_cities() {
        let matrix = four_city_matrix();

        for strategy in [Strategy::Memoized, Strategy::BottomUp] {
            let config = SolverConfig::default().with_strategy(strategy);
            let solution = solve_tsp(&matrix, 0, &config).unwrap();

            assert_eq!(solution.cost, 80);
            assert_eq!(solution.tour.cities(), &[0, 1, 3, 2]);
            assert_eq!(solution.tour.to_string(), "0 -> 1 -> 3 -> 2 -> 0");
            assert_eq!(solution.strategy, strategy);
        }
    }

    #[test]
    fn single_city() {
        let matrix = DistanceMatrix::try_from_rows([[0]]).unwrap();

        for strategy in [Strategy::Memoized, Strategy::BottomUp] {
            let config = SolverConfig::default().with_strategy(strategy);
            let solution = solve_tsp(&matrix, 0, &config).unwrap();

            assert_eq!(solution.cost, 0);
            assert_eq!(solution.tour.cities(), &[0]);
            assert_eq!(solution.tour.to_string(), "0 -> 0");
            assert_eq!(solution.statistics.states_computed, 0);
        }
    }

    #[test]
    fn two_cities_asymmetric() {
        let matrix = DistanceMatrix::try_from_rows([[0, 3], [8, 0]]).unwrap();

        for start in 0..2 {
            let solution = solve_tsp(&matrix, start, &SolverConfig::default()).unwrap();
            assert_eq!(solution.cost, 11);
            assert_eq!(solution.tour.cities(), &[start, 1 - start]);
        }
    }

    #[test]
    fn reference() {
        let matrix = reference_instance();

        for strategy in [Strategy::Memoized, Strategy::BottomUp] {
            let config = SolverConfig::default().with_strategy(strategy);
            let solution = solve_tsp(&matrix, REFERENCE_START, &config).unwrap();

            assert_eq!(solution.cost, 4469);
            assert_eq!(
                solution.tour.cities(),
                &[0, 1, 7, 9, 8, 12, 10, 11, 6, 5, 4, 2, 3]
            );
        }
    }

    #[test]
    fn reference_from_other_start() {
        let matrix = reference_instance();
        let solution = solve_tsp(&matrix, 5, &SolverConfig::default()).unwrap();

        // the optimal cycle does not depend on where it starts
        assert_eq!(solution.cost, 4469);
        assert_eq!(
            solution.tour.cities(),
            &[5, 4, 2, 3, 0, 1, 7, 9, 8, 12, 10, 11, 6]
        );
    }

    #[test]
    fn rejects_invalid_start() {
        let matrix = four_city_matrix();

        for strategy in [Strategy::Memoized, Strategy::BottomUp] {
            let config = SolverConfig::default().with_strategy(strategy);
            let err = solve_tsp(&matrix, 4, &config).unwrap_err();
            assert!(matches!(err, TspError::StartOutOfRange { start: 4, cities: 4 }));
            assert!(err.is_invalid_input());
        }
    }

    #[test]
    fn rejects_oversized_state_space() {
        let matrix = four_city_matrix();
        let config = SolverConfig::default().with_max_table_bytes(100);

        let err = solve_tsp(&matrix, 0, &config).unwrap_err();
        assert!(matches!(
            err,
            TspError::StateSpaceTooLarge {
                cities: 4,
                budget_bytes: 100,
                ..
            }
        ));
    }

    #[test]
    fn deterministic() {
        let mut rng = Pcg64::seed_from_u64(987);

        for n in [3, 6, 9] {
            let matrix = DistanceMatrix::random(&mut rng, n, 50);
            let first = solve_tsp(&matrix, 0, &SolverConfig::default()).unwrap();

            for _ in 0..3 {
                let again = solve_tsp(&matrix, 0, &SolverConfig::default()).unwrap();
                assert_eq!(again.cost, first.cost);
                assert_eq!(again.tour, first.tour);
            }
        }
    }

    #[test]
    fn strategies_agree() {
        let mut rng = Pcg64::seed_from_u64(31415);

        for (matrix, start) in random_instances(&mut rng, 2..=10).take(60) {
            let mut memoized = MemoizedSolver::new(&matrix, start, &SolverConfig::default()).unwrap();
            let mut bottom_up =
                BottomUpSolver::new(&matrix, start, &SolverConfig::default()).unwrap();

            assert_eq!(memoized.solve(), bottom_up.solve(), "{matrix:?} from {start}");
            assert_eq!(memoized.tour(), bottom_up.tour(), "{matrix:?} from {start}");

            // both fill exactly the reachable states with identical entries
            assert_eq!(
                memoized.table().computed_states().collect_vec(),
                bottom_up.table().computed_states().collect_vec()
            );
        }
    }

    #[test]
    fn matches_brute_force() {
        let mut rng = Pcg64::seed_from_u64(2718);

        for (matrix, start) in random_instances(&mut rng, 1..=8).take(100) {
            let solution = solve_tsp(&matrix, start, &SolverConfig::default()).unwrap();
            let (brute_cost, brute_tour) = brute_force(&matrix, start).unwrap();

            assert_eq!(solution.cost, brute_cost, "{matrix:?} from {start}");
            assert_eq!(brute_tour.cost(&matrix), brute_cost);
            assert_eq!(solution.tour.cost(&matrix), solution.cost);
        }
    }

    #[test]
    fn tours_are_consistent() {
        let mut rng = Pcg64::seed_from_u64(1618);

        for (matrix, start) in random_instances(&mut rng, 1..=11).take(50) {
            let solution = solve_tsp(&matrix, start, &SolverConfig::default()).unwrap();
            let tour = &solution.tour;

            assert_eq!(tour.start(), start);
            assert_eq!(tour.len(), matrix.len());
            assert_eq!(
                tour.cities().iter().copied().sorted().collect_vec(),
                matrix.cities().collect_vec()
            );

            let by_legs: Cost = tour
                .closed_cycle()
                .tuple_windows()
                .map(|(u, v)| matrix.distance(u, v) as Cost)
                .sum();
            assert_eq!(by_legs, solution.cost);
        }
    }

    #[test]
    fn independent_solves_in_parallel() {
        let mut rng = Pcg64::seed_from_u64(42);
        let instances = random_instances(&mut rng, 6..=10).take(16).collect_vec();

        let sequential = instances
            .iter()
            .map(|(m, s)| solve_tsp(m, *s, &SolverConfig::default()).unwrap().cost)
            .collect_vec();

        let parallel: Vec<_> = instances
            .par_iter()
            .map(|(m, s)| solve_tsp(m, *s, &SolverConfig::default()).unwrap().cost)
            .collect();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn check_table_detects_corruption() {
        let matrix = four_city_matrix();
        let mut table = StateTable::try_new(4, 1 << 20).unwrap();

        // claims a continuation cheaper than possible
        table.store(0, VisitedSet::singleton(0), 1, Some(1));
        assert!(matches!(
            check_table(&table, &matrix, 0),
            Err(TspError::InvariantViolation(_))
        ));

        let mut table = StateTable::try_new(4, 1 << 20).unwrap();
        table.store(2, VisitedSet::singleton(0), 5, Some(1));
        assert!(check_table(&table, &matrix, 0).is_err());
    }
}
