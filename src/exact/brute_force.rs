use itertools::Itertools;
use log::debug;

use crate::{errors::*, instance::*, utils::Tour};

/// Largest instance [`brute_force`] accepts; `9!` orders are enumerated at this size.
pub const MAX_BRUTE_FORCE_CITIES: NumCities = 10;

/// Computes an optimal tour by enumerating all `(n-1)!` orders of the non-start cities in
/// lexicographic order. Among several optimal tours the lexicographically smallest is
/// returned. Intended as a reference to cross-check the dynamic programs.
pub fn brute_force(matrix: &DistanceMatrix, start: City) -> Result<(Cost, Tour)> {
    matrix.check_start(start)?;

    let n = matrix.number_of_cities();
    if n > MAX_BRUTE_FORCE_CITIES {
        return Err(TspError::TooLargeForBruteForce {
            cities: n,
            max: MAX_BRUTE_FORCE_CITIES,
        });
    }

    let others = matrix.cities().filter(|&c| c != start).collect_vec();
    let mut best: Option<(Cost, Vec<City>)> = None;
    let mut orders = 0usize;

    for order in others.iter().copied().permutations(others.len()) {
        orders += 1;
        let cost = std::iter::once(start)
            .chain(order.iter().copied())
            .chain(std::iter::once(start))
            .tuple_windows()
            .map(|(u, v)| matrix.distance(u, v) as Cost)
            .sum::<Cost>();

        if best.as_ref().is_none_or(|(best_cost, _)| cost < *best_cost) {
            best = Some((cost, order));
        }
    }

    debug!("Brute force enumerated {orders} orders on {n} cities");

    // permutations(0) yields a single empty order, so best is always set
    let (cost, order) = best.unwrap_or_default();
    let mut cities = Vec::with_capacity(n as usize);
    cities.push(start);
    cities.extend(order);

    Ok((cost, Tour::new(cities)))
}
