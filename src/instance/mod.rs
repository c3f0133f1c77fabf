pub mod random;
pub mod matrix;
pub mod reference;
pub mod visited;

pub type City = u32;
pub type NumCities = City;

/// A single entry of the distance matrix
pub type Distance = u32;

/// Sum of distances along a (partial) tour; wide enough that no tour over at most
/// [`MAX_CITIES`] legs of [`Distance`] can overflow.
pub type Cost = u64;

/// Largest number of cities a [`VisitedSet`] can represent.
pub const MAX_CITIES: NumCities = VisitedSet::WIDTH;

pub use random::*;
pub use matrix::*;
pub use reference::*;
pub use visited::*;
