use rand::Rng;

use super::*;

pub trait RandomDistanceMatrix: Sized {
    /// Generates a matrix on `n` cities where each off-diagonal entry is drawn
    /// independently and uniformly from `1..=max_distance`. The result is in general
    /// not symmetric.
    fn random<R: Rng>(rng: &mut R, n: NumCities, max_distance: Distance) -> Self;

    /// Same as [`RandomDistanceMatrix::random`] but `d(u, v) == d(v, u)` for all pairs
    fn random_symmetric<R: Rng>(rng: &mut R, n: NumCities, max_distance: Distance) -> Self;
}

impl RandomDistanceMatrix for DistanceMatrix {
    fn random<R: Rng>(rng: &mut R, n: NumCities, max_distance: Distance) -> Self {
        assert!(max_distance > 0);
        Self::from_fn(n, |_, _| rng.gen_range(1..=max_distance))
    }

    fn random_symmetric<R: Rng>(rng: &mut R, n: NumCities, max_distance: Distance) -> Self {
        let asymmetric = Self::random(rng, n, max_distance);
        Self::from_fn(n, |u, v| asymmetric.distance(u.min(v), u.max(v)))
    }
}
