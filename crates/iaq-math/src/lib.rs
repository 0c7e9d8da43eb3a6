//! IAQ forecast math utilities.

pub mod math;

pub use math::linalg::{cholesky_solve, SymMatrix};
pub use math::stable::*;
pub use math::stats::*;
