//! Exact solutions of small traveling salesman instances via the Held-Karp dynamic
//! program over `(current city, visited set)` states.

pub mod config;
pub mod errors;
pub mod exact;
pub mod instance;
pub mod io;
pub mod log;
pub mod utils;

pub mod prelude {
    pub use super::config::*;
    pub use super::errors::*;
    pub use super::exact::*;
    pub use super::instance::*;
    pub use super::io::*;
    pub use super::utils::*;
}

#[cfg(test)]
mod testing;
