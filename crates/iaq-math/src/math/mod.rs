//! Core math modules.

pub mod linalg;
pub mod stable;
pub mod stats;
