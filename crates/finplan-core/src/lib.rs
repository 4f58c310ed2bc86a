pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "loan")]
pub mod loan;

#[cfg(feature = "credit_score")]
pub mod credit_score;

#[cfg(feature = "growth")]
pub mod growth;

#[cfg(feature = "wealth")]
pub mod wealth;

#[cfg(feature = "tax")]
pub mod tax;

pub use error::FinPlanError;
pub use types::*;

/// Standard result type for all finplan operations
pub type FinPlanResult<T> = Result<T, FinPlanError>;
