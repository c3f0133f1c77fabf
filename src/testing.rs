use std::ops::RangeInclusive;

use rand::Rng;

use super::instance::*;

/// The four city example with optimal tour `0 -> 1 -> 3 -> 2 -> 0` of cost 80
pub fn four_city_matrix() -> DistanceMatrix {
    DistanceMatrix::try_from_rows([
        [0, 10, 15, 20],
        [10, 0, 35, 25],
        [15, 35, 0, 30],
        [20, 25, 30, 0],
    ])
    .unwrap()
}

/// Number of states `(current, visited)` reachable from `(start, {start})` excluding
/// the terminal ones: the start state plus, for every non-empty proper subset `S` of the
/// other cities, one state per member of `S`.
pub fn number_of_reachable_states(n: NumCities) -> u64 {
    if n < 2 {
        return 0;
    }

    let others = n as u64 - 1;
    let mut binomial = 1u64; // C(others, k)
    let mut states = 1;
    for k in 1..others {
        binomial = binomial * (others - k + 1) / k;
        states += binomial * k;
    }
    states
}

/// Infinite stream of random instances with a random start city; every third matrix is
/// symmetric.
pub fn random_instances(
    rng: &mut impl Rng,
    cities: RangeInclusive<NumCities>,
) -> impl Iterator<Item = (DistanceMatrix, City)> + '_ {
    (0..).map(move |i| {
        let n = rng.gen_range(cities.clone());
        let max_distance = rng.gen_range(1..=1000);
        let matrix = if i % 3 == 0 {
            DistanceMatrix::random_symmetric(rng, n, max_distance)
        } else {
            DistanceMatrix::random(rng, n, max_distance)
        };
        let start = rng.gen_range(0..n);
        (matrix, start)
    })
}

/// Like [`random_instances`] but with distances from `1..=3`, so that many states have
/// several optimal continuations.
pub fn tie_heavy_instances(
    rng: &mut impl Rng,
    cities: RangeInclusive<NumCities>,
) -> impl Iterator<Item = (DistanceMatrix, City)> + '_ {
    (0..).map(move |i| {
        let n = rng.gen_range(cities.clone());
        let matrix = if i % 2 == 0 {
            DistanceMatrix::random_symmetric(rng, n, 3)
        } else {
            DistanceMatrix::random(rng, n, 3)
        };
        let start = rng.gen_range(0..n);
        (matrix, start)
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reachable_states() {
        let expected = [0, 0, 1, 3, 10, 29, 76, 187];
        for (n, &states) in expected.iter().enumerate() {
            assert_eq!(number_of_reachable_states(n as NumCities), states, "n = {n}");
        }
    }
}
