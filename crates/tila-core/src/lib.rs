pub mod dates;
pub mod disclosure;
pub mod error;
pub mod link;
pub mod rounding;
pub mod schedule;
pub mod solver;
pub mod types;

pub use error::TilaError;
pub use types::*;

/// Standard result type for all disclosure-engine operations
pub type TilaResult<T> = Result<T, TilaError>;
