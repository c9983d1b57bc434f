pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "payment")]
pub mod insurance;

#[cfg(feature = "payment")]
pub mod payment;

#[cfg(feature = "affordability")]
pub mod affordability;

#[cfg(feature = "schedule")]
pub mod schedule;

pub use error::MortgageCalcError;
pub use types::*;

/// Standard result type for all mortgage-calc operations
pub type MortgageCalcResult<T> = Result<T, MortgageCalcError>;
