use std::fmt::{Debug, Formatter};

use itertools::Itertools;

use super::*;
use crate::errors::*;

/// Immutable square table of travel costs; `distance(i, i) == 0` for all cities.
///
/// The matrix is the validation boundary of the crate: [`DistanceMatrix::try_from_rows`]
/// rejects every input violating the contract, so the solvers can rely on it without
/// checking again. Symmetry is not required.
#[derive(Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    number_of_cities: NumCities,
    distances: Vec<Distance>,
}

impl DistanceMatrix {
    /// Validates and stores the rows of a matrix.
    ///
    /// # Example
    /// ```
    /// use hk_tsp::instance::DistanceMatrix;
    /// let matrix = DistanceMatrix::try_from_rows(vec![vec![0, 3], vec![4, 0]]).unwrap();
    /// assert_eq!(matrix.number_of_cities(), 2);
    /// assert_eq!(matrix.distance(1, 0), 4);
    /// ```
    pub fn try_from_rows<R: AsRef<[i64]>>(rows: impl IntoIterator<Item = R>) -> Result<Self> {
        let rows = rows.into_iter().collect_vec();
        let n = rows.len();

        if n == 0 {
            return Err(TspError::EmptyMatrix);
        }

        if n > MAX_CITIES as usize {
            return Err(TspError::TooManyCities {
                cities: n,
                max: MAX_CITIES,
            });
        }

        let mut distances = Vec::with_capacity(n * n);
        for (from, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != n {
                return Err(TspError::NotSquare {
                    row: from,
                    len: row.len(),
                    expected: n,
                });
            }

            for (to, &value) in row.iter().enumerate() {
                let (from, to) = (from as City, to as City);
                if value < 0 {
                    return Err(TspError::NegativeDistance { from, to, value });
                }
                if from == to && value != 0 {
                    return Err(TspError::NonZeroDiagonal { city: from, value });
                }
                let value = Distance::try_from(value)
                    .map_err(|_| TspError::DistanceTooLarge { from, to, value })?;
                distances.push(value);
            }
        }

        Ok(Self {
            number_of_cities: n as NumCities,
            distances,
        })
    }

    /// Builds a matrix by evaluating `distance(from, to)` for all pairs of distinct cities;
    /// the diagonal is fixed to zero.
    ///
    /// # Example
    /// ```
    /// use hk_tsp::instance::DistanceMatrix;
    /// let matrix = DistanceMatrix::from_fn(3, |u, v| u.abs_diff(v) * 10);
    /// assert_eq!(matrix.distance(0, 2), 20);
    /// assert!(matrix.is_symmetric());
    /// ```
    ///
    /// # Panics
    /// If `n` is zero or exceeds [`MAX_CITIES`].
    pub fn from_fn(n: NumCities, mut distance: impl FnMut(City, City) -> Distance) -> Self {
        assert!((1..=MAX_CITIES).contains(&n));
        let distances = (0..n)
            .cartesian_product(0..n)
            .map(|(u, v)| if u == v { 0 } else { distance(u, v) })
            .collect();

        Self {
            number_of_cities: n,
            distances,
        }
    }

    pub fn number_of_cities(&self) -> NumCities {
        self.number_of_cities
    }

    /// Returns the number of cities as usize
    pub fn len(&self) -> usize {
        self.number_of_cities as usize
    }

    /// Always false; a matrix has at least one city
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn cities(&self) -> std::ops::Range<City> {
        0..self.number_of_cities
    }

    /// Cost of travelling from `from` to `to`.
    /// ** Panics if either city is out of range **
    #[inline(always)]
    pub fn distance(&self, from: City, to: City) -> Distance {
        debug_assert!(from < self.number_of_cities && to < self.number_of_cities);
        self.distances[from as usize * self.len() + to as usize]
    }

    pub fn row(&self, from: City) -> &[Distance] {
        let n = self.len();
        &self.distances[from as usize * n..(from as usize + 1) * n]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Distance]> + '_ {
        self.distances.chunks_exact(self.len())
    }

    pub fn is_symmetric(&self) -> bool {
        self.cities()
            .tuple_combinations()
            .all(|(u, v)| self.distance(u, v) == self.distance(v, u))
    }

    /// Fails with [`TspError::StartOutOfRange`] unless `start` names a city of this matrix.
    pub fn check_start(&self, start: City) -> Result<()> {
        if start < self.number_of_cities {
            Ok(())
        } else {
            Err(TspError::StartOutOfRange {
                start,
                cities: self.number_of_cities,
            })
        }
    }
}

impl Debug for DistanceMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.rows()).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_rows() {
        let matrix =
            DistanceMatrix::try_from_rows([[0, 1, 2], [3, 0, 4], [5, 6, 0]]).unwrap();

        assert_eq!(matrix.number_of_cities(), 3);
        assert_eq!(matrix.row(1), &[3, 0, 4]);
        assert_eq!(matrix.distance(2, 1), 6);
        assert_eq!(matrix.rows().count(), 3);
        assert!(!matrix.is_symmetric());
    }

    #[test]
    fn single_city() {
        let matrix = DistanceMatrix::try_from_rows([[0]]).unwrap();
        assert_eq!(matrix.number_of_cities(), 1);
        assert!(matrix.is_symmetric());
        assert!(matrix.check_start(0).is_ok());
        assert!(matches!(
            matrix.check_start(1),
            Err(TspError::StartOutOfRange { start: 1, cities: 1 })
        ));
    }

    #[test]
    fn rejects_empty() {
        let rows: Vec<Vec<i64>> = Vec::new();
        let err = DistanceMatrix::try_from_rows(rows).unwrap_err();
        assert!(matches!(err, TspError::EmptyMatrix));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn rejects_non_square() {
        let err = DistanceMatrix::try_from_rows(vec![vec![0, 1], vec![1]]).unwrap_err();
        assert!(matches!(
            err,
            TspError::NotSquare {
                row: 1,
                len: 1,
                expected: 2
            }
        ));
    }

    #[test]
    fn rejects_negative() {
        let err = DistanceMatrix::try_from_rows([[0, -1], [1, 0]]).unwrap_err();
        assert!(matches!(
            err,
            TspError::NegativeDistance {
                from: 0,
                to: 1,
                value: -1
            }
        ));
    }

    #[test]
    fn rejects_nonzero_diagonal() {
        let err = DistanceMatrix::try_from_rows([[0, 1], [1, 7]]).unwrap_err();
        assert!(matches!(
            err,
            TspError::NonZeroDiagonal { city: 1, value: 7 }
        ));
    }

    #[test]
    fn rejects_too_large_distance() {
        let too_large = Distance::MAX as i64 + 1;
        let err = DistanceMatrix::try_from_rows([[0, too_large], [1, 0]]).unwrap_err();
        assert!(matches!(err, TspError::DistanceTooLarge { from: 0, to: 1, .. }));

        assert!(DistanceMatrix::try_from_rows([[0, Distance::MAX as i64], [1, 0]]).is_ok());
    }

    #[test]
    fn rejects_too_many_cities() {
        let n = MAX_CITIES as usize + 1;
        let rows = vec![vec![0i64; n]; n];
        let err = DistanceMatrix::try_from_rows(rows).unwrap_err();
        assert!(matches!(err, TspError::TooManyCities { cities, .. } if cities == n));
    }

    #[test]
    fn from_fn_has_zero_diagonal() {
        let matrix = DistanceMatrix::from_fn(5, |u, v| 1 + u * 5 + v);
        for u in matrix.cities() {
            assert_eq!(matrix.distance(u, u), 0);
        }
        assert_eq!(matrix.distance(1, 2), 8);
        assert_eq!(matrix.distance(2, 1), 12);
    }
}
